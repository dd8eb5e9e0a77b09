//! Pattern Catalogue - Design Pattern Demonstrations
//!
//! Every demonstration is a set of participants implementing
//! [`patterns_env::Participant`] and declaring a capability through
//! [`patterns_env::Role`]:
//! 1. **Behavioral**: strategies, observers, commands, order state, validation handlers
//! 2. **Creational**: factories, builder, shared configuration, prototype, intro products
//! 3. **Structural**: adapter, decorator, facade, composite, proxy
//!
//! Nothing here prints. Observable output goes through the [`patterns_env::Tracer`]
//! handed to each call.

pub mod behavioral;
pub mod beers;
pub mod creational;
pub mod products;
pub mod structural;

// Re-export key types for convenience
pub use behavioral::{
    AddItemCommand, CatalogLayout, LoginStrategy, OrderCheck, OrderObserver, OrderStage,
    OrderTracker, SaleStrategy, ShippingStrategy, ValidationHandler,
};
pub use beers::BeerListing;
pub use creational::{
    ConfigManager, Cuisine, Dish, FoodFactory, LasagnaBuilder, LasagnaCounter, OrderTemplate, WeekDays,
};
pub use products::{Beer, Product, Shelf, Snack};
pub use structural::{
    CachedOrderHistory, ComboMeal, DatabaseOrderHistory, MenuItem, OrderFacade, StripeAdapter,
    StripeGateway, Topping, ToppedFries,
};
