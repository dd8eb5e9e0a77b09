//! Creational patterns: factory, abstract factory, builder, shared
//! configuration (singleton) and prototype.
//!
//! There is no process-wide singleton here. `ConfigManager` is an ordinary
//! value; it becomes "the" instance because the registry builds each binding
//! once and hands the same instance to every resolve.

use patterns_env::value::text_arg;
use patterns_env::{Capability, Participant, ParticipantFault, Role, Tracer, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Creates and prepares a dish by name.
pub const KITCHEN: Capability = Capability::new("kitchen", &["create"]);

/// Creates a consistent family of dishes.
pub const REGIONAL_KITCHEN: Capability =
    Capability::new("regional_kitchen", &["create_pizza", "create_sushi"]);

/// Step-wise construction of a lasagna.
pub const BUILDER: Capability = Capability::new("builder", &["size", "cheese", "build"]);

/// Shared key/value configuration.
pub const CONFIG: Capability = Capability::new("config", &["set", "get"]);

/// `open(lang?)` returns the language in use, `get_days()` the weekday names.
pub const WEEK_DAYS: Capability = Capability::new("week_days", &["open", "get_days"]);

/// Copies an order and extends the copy.
pub const PROTOTYPE: Capability = Capability::new("prototype", &["clone_with"]);

/// Errors raised while creating dishes.
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("unknown dish: {0}")]
    UnknownDish(String),
}

impl From<KitchenError> for ParticipantFault {
    fn from(err: KitchenError) -> Self {
        ParticipantFault::new(err.to_string())
    }
}

// =============================================================================
// FACTORY / ABSTRACT FACTORY
// =============================================================================

/// Everything the kitchens know how to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dish {
    Pizza,
    Sushi,
    Empanada,
    IceCream,
    MexicanPizza,
    JapanesePizza,
    MexicanSushi,
    JapaneseSushi,
}

impl Dish {
    /// Returns the dish name.
    pub fn name(&self) -> &'static str {
        match self {
            Dish::Pizza => "pizza",
            Dish::Sushi => "sushi",
            Dish::Empanada => "empanadas",
            Dish::IceCream => "ice cream",
            Dish::MexicanPizza => "mexican pizza",
            Dish::JapanesePizza => "japanese pizza",
            Dish::MexicanSushi => "mexican sushi (breaded)",
            Dish::JapaneseSushi => "japanese sushi",
        }
    }

    /// Prepares the dish.
    pub fn prepare(&self, tracer: &mut dyn Tracer) {
        tracer.emit(format!("Preparing {}", self.name()));
    }
}

impl std::str::FromStr for Dish {
    type Err = KitchenError;

    /// Only the generic dishes are orderable by name; regional ones come from a [`Cuisine`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pizza" => Ok(Dish::Pizza),
            "sushi" => Ok(Dish::Sushi),
            "empanada" | "empanadas" => Ok(Dish::Empanada),
            "ice_cream" | "icecream" | "ice cream" => Ok(Dish::IceCream),
            _ => Err(KitchenError::UnknownDish(s.to_string())),
        }
    }
}

/// Factory choosing the concrete dish from its name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodFactory;

impl FoodFactory {
    /// Creates the dish named `kind`.
    pub fn create(&self, kind: &str) -> Result<Dish, KitchenError> {
        kind.parse()
    }
}

impl Participant for FoodFactory {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "create" => {
                let dish = self.create(text_arg(args, 0)?)?;
                dish.prepare(tracer);
                Ok(Value::from(dish.name()))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for FoodFactory {
    const CAPABILITY: Capability = KITCHEN;
}

/// Abstract factory: each cuisine produces its own pizza and sushi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cuisine {
    Mexican,
    Japanese,
}

impl Cuisine {
    pub fn create_pizza(&self) -> Dish {
        match self {
            Cuisine::Mexican => Dish::MexicanPizza,
            Cuisine::Japanese => Dish::JapanesePizza,
        }
    }

    pub fn create_sushi(&self) -> Dish {
        match self {
            Cuisine::Mexican => Dish::MexicanSushi,
            Cuisine::Japanese => Dish::JapaneseSushi,
        }
    }
}

impl Participant for Cuisine {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        let dish = match method {
            "create_pizza" => self.create_pizza(),
            "create_sushi" => self.create_sushi(),
            other => return Err(ParticipantFault::unknown_method(other)),
        };
        dish.prepare(tracer);
        Ok(Value::from(dish.name()))
    }
}

impl Role for Cuisine {
    const CAPABILITY: Capability = REGIONAL_KITCHEN;
}

// =============================================================================
// BUILDER
// =============================================================================

/// A finished lasagna.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lasagna {
    size: String,
    cheese: String,
}

impl Lasagna {
    /// Starts a builder with the default size and cheese.
    pub fn builder() -> LasagnaBuilder {
        LasagnaBuilder::default()
    }

    pub fn describe(&self) -> String {
        format!("The lasagna is {} and comes with {} cheese", self.size, self.cheese)
    }
}

/// Builder for [`Lasagna`]; every option has a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LasagnaBuilder {
    size: String,
    cheese: String,
}

impl Default for LasagnaBuilder {
    fn default() -> Self {
        Self {
            size: "medium".to_string(),
            cheese: "mozzarella".to_string(),
        }
    }
}

impl LasagnaBuilder {
    /// Sets the size.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Sets the cheese.
    pub fn cheese(mut self, cheese: impl Into<String>) -> Self {
        self.cheese = cheese.into();
        self
    }

    /// Finishes the lasagna.
    pub fn build(self) -> Lasagna {
        Lasagna {
            size: self.size,
            cheese: self.cheese,
        }
    }
}

/// Counter taking lasagna orders one option at a time.
///
/// `build` hands out the lasagna and starts the next order from defaults.
#[derive(Debug, Clone, Default)]
pub struct LasagnaCounter {
    pending: LasagnaBuilder,
}

impl Participant for LasagnaCounter {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "size" => {
                let size = text_arg(args, 0)?;
                self.pending = std::mem::take(&mut self.pending).size(size);
                Ok(Value::Null)
            }
            "cheese" => {
                let cheese = text_arg(args, 0)?;
                self.pending = std::mem::take(&mut self.pending).cheese(cheese);
                Ok(Value::Null)
            }
            "build" => {
                let description = std::mem::take(&mut self.pending).build().describe();
                tracer.emit(description.clone());
                Ok(Value::String(description))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for LasagnaCounter {
    const CAPABILITY: Capability = BUILDER;
}

// =============================================================================
// SINGLETON
// =============================================================================

/// Application configuration shared by everyone who resolves it.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    entries: BTreeMap<String, Value>,
}

impl ConfigManager {
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }
}

impl Participant for ConfigManager {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "set" => {
                let key = text_arg(args, 0)?.to_string();
                let value = args
                    .get(1)
                    .cloned()
                    .ok_or_else(|| ParticipantFault::bad_argument(1, "present"))?;
                self.set(key, value);
                Ok(Value::Null)
            }
            // Missing keys read as null
            "get" => Ok(self.get(text_arg(args, 0)?).cloned().unwrap_or(Value::Null)),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for ConfigManager {
    const CAPABILITY: Capability = CONFIG;
}

const DAYS_ES: [&str; 7] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"];
const DAYS_EN: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Weekday names in the language fixed when the instance was built.
///
/// Later `open` calls may ask for another language; the shared instance keeps
/// the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDays {
    lang: String,
}

impl WeekDays {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Spanish for `es`, English otherwise.
    pub fn days(&self) -> &'static [&'static str] {
        if self.lang == "es" {
            &DAYS_ES
        } else {
            &DAYS_EN
        }
    }
}

impl Participant for WeekDays {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "open" => {
                if args.first().is_some_and(|a| !a.is_string()) {
                    return Err(ParticipantFault::bad_argument(0, "a string"));
                }
                Ok(Value::from(self.lang.clone()))
            }
            "get_days" => Ok(Value::from(self.days().to_vec())),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for WeekDays {
    const CAPABILITY: Capability = WEEK_DAYS;
}

// =============================================================================
// PROTOTYPE
// =============================================================================

/// An order that serves as the template for copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
    pub items: Vec<String>,
    pub address: String,
}

impl OrderTemplate {
    pub fn new(items: &[&str], address: impl Into<String>) -> Self {
        Self {
            items: items.iter().map(|i| i.to_string()).collect(),
            address: address.into(),
        }
    }
}

impl Participant for OrderTemplate {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "clone_with" => {
                let mut copy = self.clone();
                copy.items.push(text_arg(args, 0)?.to_string());

                tracer.emit(format!("Original: {}", self.items.join(", ")));
                tracer.emit(format!("Cloned: {}", copy.items.join(", ")));
                Ok(serde_json::json!({
                    "original": self.items,
                    "cloned": copy.items,
                }))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for OrderTemplate {
    const CAPABILITY: Capability = PROTOTYPE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_factory_creates_by_name() {
        let factory = FoodFactory;
        assert_eq!(factory.create("ice_cream").unwrap(), Dish::IceCream);
        assert_eq!(factory.create("Pizza").unwrap(), Dish::Pizza);
        assert!(matches!(factory.create("tofu"), Err(KitchenError::UnknownDish(_))));
    }

    #[test]
    fn test_factory_unknown_dish_is_fault() {
        let mut trace: Vec<String> = Vec::new();
        let err = FoodFactory.invoke("create", &[json!("tofu")], &mut trace).unwrap_err();
        assert_eq!(err.message(), "unknown dish: tofu");
        assert!(trace.is_empty());
    }

    #[test]
    fn test_cuisines_stay_consistent() {
        let mut trace: Vec<String> = Vec::new();
        let mut mexican = Cuisine::Mexican;
        mexican.invoke("create_pizza", &[], &mut trace).unwrap();
        mexican.invoke("create_sushi", &[], &mut trace).unwrap();
        assert_eq!(
            trace,
            vec!["Preparing mexican pizza", "Preparing mexican sushi (breaded)"]
        );
    }

    #[test]
    fn test_builder_defaults() {
        let lasagna = Lasagna::builder().size("small").build();
        assert_eq!(lasagna.describe(), "The lasagna is small and comes with mozzarella cheese");

        let lasagna = Lasagna::builder().size("large").cheese("manchego").build();
        assert_eq!(lasagna.describe(), "The lasagna is large and comes with manchego cheese");
    }

    #[test]
    fn test_counter_resets_after_build() {
        let mut trace: Vec<String> = Vec::new();
        let mut counter = LasagnaCounter::default();
        counter.invoke("cheese", &[json!("manchego")], &mut trace).unwrap();
        counter.invoke("build", &[], &mut trace).unwrap();
        let second = counter.invoke("build", &[], &mut trace).unwrap();
        assert_eq!(second, json!("The lasagna is medium and comes with mozzarella cheese"));
    }

    #[test]
    fn test_config_set_get() {
        let mut trace: Vec<String> = Vec::new();
        let mut config = ConfigManager::default();
        config
            .invoke("set", &[json!("apiURL"), json!("https://api.example.com")], &mut trace)
            .unwrap();
        assert_eq!(
            config.invoke("get", &[json!("apiURL")], &mut trace).unwrap(),
            json!("https://api.example.com")
        );
        assert_eq!(config.invoke("get", &[json!("missing")], &mut trace).unwrap(), Value::Null);
        assert!(config.invoke("set", &[json!("only_key")], &mut trace).is_err());
    }

    #[test]
    fn test_week_days_keep_first_language() {
        let mut calendar = WeekDays::new("en");
        let mut trace: Vec<String> = Vec::new();

        assert_eq!(calendar.invoke("open", &[json!("es")], &mut trace).unwrap(), json!("en"));
        let days = calendar.invoke("get_days", &[], &mut trace).unwrap();
        assert_eq!(days[0], json!("Monday"));
        assert_eq!(days.as_array().map(Vec::len), Some(7));
        assert!(calendar.invoke("open", &[json!(1)], &mut trace).is_err());

        assert_eq!(WeekDays::new("es").days()[2], "Miércoles");
        assert_eq!(WeekDays::new("fr").days(), &DAYS_EN);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_prototype_copy_is_independent() {
        let mut trace: Vec<String> = Vec::new();
        let mut template = OrderTemplate::new(&["pizza", "tacos"], "Pirita #80");
        let result = template.invoke("clone_with", &[json!("tortas")], &mut trace).unwrap();

        assert_eq!(result["original"], json!(["pizza", "tacos"]));
        assert_eq!(result["cloned"], json!(["pizza", "tacos", "tortas"]));
        assert_eq!(template.items, vec!["pizza", "tacos"]);
    }
}
