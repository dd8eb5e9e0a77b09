//! Registry of every built-in demonstration participant.

use crate::registry::ParticipantRegistry;
use patterns_core::{
    AddItemCommand, Beer, CachedOrderHistory, CatalogLayout, ComboMeal, ConfigManager, Cuisine,
    DatabaseOrderHistory, FoodFactory, LasagnaCounter, LoginStrategy, OrderFacade, OrderObserver,
    OrderTemplate, OrderTracker, SaleStrategy, Shelf, ShippingStrategy, Snack, StripeAdapter,
    StripeGateway, Topping, ToppedFries, ValidationHandler, WeekDays,
};
use patterns_env::HarnessError;
use tracing::debug;

/// Tax applied by the sale strategies.
const SALE_TAX: f64 = 0.16;

/// Flat discount of the discount sale strategy.
const SALE_DISCOUNT: f64 = 3.0;

/// Exchange rate of the foreign sale strategy.
const DOLLAR_PRICE: f64 = 20.0;

/// Language the shared calendar is first built with.
const CALENDAR_LANG: &str = "en";

/// Builds a registry holding every built-in participant.
///
/// Nothing is constructed until a scenario resolves it.
pub fn registry() -> Result<ParticipantRegistry, HarnessError> {
    let mut registry = ParticipantRegistry::new();
    register_behavioral(&mut registry)?;
    register_creational(&mut registry)?;
    register_structural(&mut registry)?;
    debug!("Catalogue registry ready with {} bindings", registry.len());
    Ok(registry)
}

fn register_behavioral(registry: &mut ParticipantRegistry) -> Result<(), HarnessError> {
    // Strategy
    registry.register("shipping", "distance", || ShippingStrategy::Distance)?;
    registry.register("shipping", "free", || ShippingStrategy::Free)?;
    registry.register("sale", "regular", || SaleStrategy::Regular { tax: SALE_TAX })?;
    registry.register("sale", "discount", || SaleStrategy::Discount {
        tax: SALE_TAX,
        discount: SALE_DISCOUNT,
    })?;
    registry.register("sale", "foreign", || SaleStrategy::Foreign {
        dollar_price: DOLLAR_PRICE,
    })?;
    registry.register("login", "database", || LoginStrategy::Database)?;
    registry.register("login", "service", || LoginStrategy::Service)?;
    registry.register("login", "google", || LoginStrategy::Google)?;
    registry.register("catalog", "list", || CatalogLayout::Plain)?;
    registry.register("catalog", "detailed", || CatalogLayout::Detailed)?;
    registry.register("catalog", "images", || CatalogLayout::WithImages)?;

    // Observer
    registry.register("observer", "kitchen", || OrderObserver::Kitchen)?;
    registry.register("observer", "delivery", || OrderObserver::Delivery)?;

    // Command
    registry.register("command", "add_tacos", || AddItemCommand::new("Tacos"))?;

    // State
    registry.register("order_state", "tracker", OrderTracker::new)?;

    // Chain of responsibility
    registry.register("validation", "stock", || ValidationHandler::Stock)?;
    registry.register("validation", "payment", || ValidationHandler::Payment)?;
    Ok(())
}

fn register_creational(registry: &mut ParticipantRegistry) -> Result<(), HarnessError> {
    registry.register("factory", "food", || FoodFactory)?;
    registry.register("kitchen", "mexican", || Cuisine::Mexican)?;
    registry.register("kitchen", "japanese", || Cuisine::Japanese)?;
    registry.register("builder", "lasagna", LasagnaCounter::default)?;
    registry.register("config", "manager", ConfigManager::default)?;
    registry.register("week_days", "calendar", || WeekDays::new(CALENDAR_LANG))?;
    registry.register("prototype", "order", || {
        OrderTemplate::new(&["pizza", "tacos"], "Pirita #80")
    })?;
    registry.register("shelf", "intro", || {
        Shelf::new().with(Beer::new("XX", 3.0, 18)).with(Snack::new("chips", 15))
    })?;
    Ok(())
}

fn register_structural(registry: &mut ParticipantRegistry) -> Result<(), HarnessError> {
    registry.register("payment", "stripe", || StripeAdapter::new(StripeGateway))?;
    registry.register("fries", "plain", || ToppedFries::new(&[]))?;
    registry.register("fries", "cheese_bacon", || {
        ToppedFries::new(&[Topping::Cheese, Topping::Bacon])
    })?;
    registry.register("checkout", "facade", OrderFacade::default)?;
    registry.register("combo", "meal", ComboMeal::default)?;
    registry.register("history", "cached", || CachedOrderHistory::new(DatabaseOrderHistory))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use patterns_env::ParticipantKey;

    #[test]
    fn test_catalogue_registers_without_conflicts() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 31);
        assert!(registry.contains(&ParticipantKey::new("history", "cached")));
        assert!(registry.contains(&ParticipantKey::new("week_days", "calendar")));
    }

    #[test]
    fn test_variants_share_capability() {
        let registry = registry().unwrap();
        let keys = registry.keys();
        for key in &keys {
            for other in keys.iter().filter(|k| k.pattern == key.pattern) {
                assert_eq!(registry.capability_of(key), registry.capability_of(other));
            }
        }
    }
}
