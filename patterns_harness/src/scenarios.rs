//! Built-in demonstration scenarios.
//!
//! Each scenario drives participants from the catalogue registry and asserts
//! the observable trace the demonstration is expected to produce.

use crate::script::{ScenarioScript, ScriptBuilder};
use patterns_core::beers;
use patterns_env::HarnessError;
use serde_json::json;

/// Pattern family a scenario demonstrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Behavioral,
    Creational,
    Structural,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Behavioral => "behavioral",
            Category::Creational => "creational",
            Category::Structural => "structural",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            "creational" => Ok(Category::Creational),
            "structural" => Ok(Category::Structural),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    // ═══════════════════════════════════════════════════
    // BEHAVIORAL
    // ═══════════════════════════════════════════════════
    /// Shipping cost strategies
    ShippingStrategy,

    /// Sale total strategies
    SaleStrategy,

    /// Login backends
    LoginStrategy,

    /// Beer catalogue layouts rendered to the render target
    CatalogLayout,

    /// Kitchen and delivery notified of an order
    OrderObserver,

    /// Add-item command with undo
    AddItemCommand,

    /// Order lifecycle state machine
    OrderState,

    /// Stock and payment validation chain
    OrderValidation,

    // ═══════════════════════════════════════════════════
    // CREATIONAL
    // ═══════════════════════════════════════════════════
    /// Dish factory
    FoodFactory,

    /// Regional kitchens (abstract factory)
    RegionalKitchen,

    /// Lasagna builder
    LasagnaBuilder,

    /// Shared configuration
    ConfigSingleton,

    /// Weekday names fixed by the first construction
    WeekDaysSingleton,

    /// Order prototype
    OrderPrototype,

    /// Products priced through a shared interface
    IntroProducts,

    // ═══════════════════════════════════════════════════
    // STRUCTURAL
    // ═══════════════════════════════════════════════════
    /// Stripe payment adapter
    PaymentAdapter,

    /// Topped fries decorator
    FoodDecorator,

    /// Checkout facade
    OrderFacade,

    /// Combo meal composite
    ComboComposite,

    /// Caching order history proxy
    OrderHistoryProxy,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::ShippingStrategy,
            ScenarioId::SaleStrategy,
            ScenarioId::LoginStrategy,
            ScenarioId::CatalogLayout,
            ScenarioId::OrderObserver,
            ScenarioId::AddItemCommand,
            ScenarioId::OrderState,
            ScenarioId::OrderValidation,
            ScenarioId::FoodFactory,
            ScenarioId::RegionalKitchen,
            ScenarioId::LasagnaBuilder,
            ScenarioId::ConfigSingleton,
            ScenarioId::WeekDaysSingleton,
            ScenarioId::OrderPrototype,
            ScenarioId::IntroProducts,
            ScenarioId::PaymentAdapter,
            ScenarioId::FoodDecorator,
            ScenarioId::OrderFacade,
            ScenarioId::ComboComposite,
            ScenarioId::OrderHistoryProxy,
        ]
    }

    /// Returns the scenarios of one category.
    pub fn by_category(category: Category) -> Vec<ScenarioId> {
        Self::all()
            .into_iter()
            .filter(|s| s.category() == category)
            .collect()
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::ShippingStrategy => "shipping_strategy",
            ScenarioId::SaleStrategy => "sale_strategy",
            ScenarioId::LoginStrategy => "login_strategy",
            ScenarioId::CatalogLayout => "catalog_layout",
            ScenarioId::OrderObserver => "order_observer",
            ScenarioId::AddItemCommand => "add_item_command",
            ScenarioId::OrderState => "order_state",
            ScenarioId::OrderValidation => "order_validation",
            ScenarioId::FoodFactory => "food_factory",
            ScenarioId::RegionalKitchen => "regional_kitchen",
            ScenarioId::LasagnaBuilder => "lasagna_builder",
            ScenarioId::ConfigSingleton => "config_singleton",
            ScenarioId::WeekDaysSingleton => "week_days_singleton",
            ScenarioId::OrderPrototype => "order_prototype",
            ScenarioId::IntroProducts => "intro_products",
            ScenarioId::PaymentAdapter => "payment_adapter",
            ScenarioId::FoodDecorator => "food_decorator",
            ScenarioId::OrderFacade => "order_facade",
            ScenarioId::ComboComposite => "combo_composite",
            ScenarioId::OrderHistoryProxy => "order_history_proxy",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::ShippingStrategy => "Distance-based and free shipping priced through one capability",
            ScenarioId::SaleStrategy => "Regular, discounted and foreign sale totals",
            ScenarioId::LoginStrategy => "Database, service and Google logins with admin credentials",
            ScenarioId::CatalogLayout => "Beer catalogue rendered as a list, in detail and with images",
            ScenarioId::OrderObserver => "Kitchen and delivery notified of order A1",
            ScenarioId::AddItemCommand => "Tacos added twice, one addition undone, audit log checked",
            ScenarioId::OrderState => "Order advanced past delivery",
            ScenarioId::OrderValidation => "Stock and payment handlers stopping invalid orders",
            ScenarioId::FoodFactory => "Dishes created by name",
            ScenarioId::RegionalKitchen => "Mexican and Japanese kitchens producing their own dishes",
            ScenarioId::LasagnaBuilder => "Custom lasagna, then one from defaults",
            ScenarioId::ConfigSingleton => "One configuration instance shared across resolves",
            ScenarioId::WeekDaysSingleton => "Calendar keeps the language it was first built with",
            ScenarioId::OrderPrototype => "Order copied and extended without touching the original",
            ScenarioId::IntroProducts => "Beer and snack labels through a shared product interface",
            ScenarioId::PaymentAdapter => "Checkout paying through the Stripe gateway adapter",
            ScenarioId::FoodDecorator => "Potato wedges with stacked toppings",
            ScenarioId::OrderFacade => "Order, payment and delivery behind one call",
            ScenarioId::ComboComposite => "Combo priced as the sum of its dishes",
            ScenarioId::OrderHistoryProxy => "Repeated order lookups answered from the cache",
        }
    }

    /// Returns the pattern family.
    pub fn category(&self) -> Category {
        match self {
            ScenarioId::ShippingStrategy
            | ScenarioId::SaleStrategy
            | ScenarioId::LoginStrategy
            | ScenarioId::CatalogLayout
            | ScenarioId::OrderObserver
            | ScenarioId::AddItemCommand
            | ScenarioId::OrderState
            | ScenarioId::OrderValidation => Category::Behavioral,
            ScenarioId::FoodFactory
            | ScenarioId::RegionalKitchen
            | ScenarioId::LasagnaBuilder
            | ScenarioId::ConfigSingleton
            | ScenarioId::WeekDaysSingleton
            | ScenarioId::OrderPrototype
            | ScenarioId::IntroProducts => Category::Creational,
            ScenarioId::PaymentAdapter
            | ScenarioId::FoodDecorator
            | ScenarioId::OrderFacade
            | ScenarioId::ComboComposite
            | ScenarioId::OrderHistoryProxy => Category::Structural,
        }
    }

    /// Builds the scenario's script.
    pub fn script(&self) -> Result<ScenarioScript, HarnessError> {
        let mut b = ScenarioScript::builder(self.name());
        match self {
            ScenarioId::ShippingStrategy => shipping_strategy(&mut b)?,
            ScenarioId::SaleStrategy => sale_strategy(&mut b)?,
            ScenarioId::LoginStrategy => login_strategy(&mut b)?,
            ScenarioId::CatalogLayout => catalog_layout(&mut b)?,
            ScenarioId::OrderObserver => order_observer(&mut b)?,
            ScenarioId::AddItemCommand => add_item_command(&mut b)?,
            ScenarioId::OrderState => order_state(&mut b)?,
            ScenarioId::OrderValidation => order_validation(&mut b)?,
            ScenarioId::FoodFactory => food_factory(&mut b)?,
            ScenarioId::RegionalKitchen => regional_kitchen(&mut b)?,
            ScenarioId::LasagnaBuilder => lasagna_builder(&mut b)?,
            ScenarioId::ConfigSingleton => config_singleton(&mut b)?,
            ScenarioId::WeekDaysSingleton => week_days_singleton(&mut b)?,
            ScenarioId::OrderPrototype => order_prototype(&mut b)?,
            ScenarioId::IntroProducts => intro_products(&mut b)?,
            ScenarioId::PaymentAdapter => payment_adapter(&mut b)?,
            ScenarioId::FoodDecorator => food_decorator(&mut b)?,
            ScenarioId::OrderFacade => order_facade(&mut b)?,
            ScenarioId::ComboComposite => combo_composite(&mut b)?,
            ScenarioId::OrderHistoryProxy => order_history_proxy(&mut b)?,
        };
        b.build()
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|id| id.name() == wanted || id.name().replace('_', "") == wanted)
            .ok_or_else(|| format!("Unknown scenario: {}", s))
    }
}

// =============================================================================
// BEHAVIORAL
// =============================================================================

fn shipping_strategy(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("shipping", "distance"), "calculate", vec![json!(100)])?
        .assert_equal(json!(120))?
        .invoke(("shipping", "free"), "calculate", vec![json!(100)])?
        .assert_equal(json!(0))?
        .assert_trace([
            "shipping.distance -> calculate(100) = 120",
            "shipping.free -> calculate(100) = 0",
        ])
}

fn sale_strategy(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("sale", "regular"), "calculate", vec![json!(100)])?
        .assert_equal(json!(116))?
        .invoke(("sale", "discount"), "calculate", vec![json!(100)])?
        .assert_equal(json!(113))?
        .invoke(("sale", "foreign"), "calculate", vec![json!(100)])?
        .assert_equal(json!(2000))?
        .assert_trace([
            "sale.regular -> calculate(100) = 116",
            "sale.discount -> calculate(100) = 113",
            "sale.foreign -> calculate(100) = 2000",
        ])
}

fn login_strategy(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("login", "database"), "login", vec![json!("admin"), json!("entra")])?
        .assert_equal(json!(true))?
        .invoke(("login", "service"), "login", vec![json!("admin"), json!("entra")])?
        .assert_equal(json!(true))?
        .invoke(("login", "google"), "login", vec![json!("admin"), json!("wrong")])?
        .assert_equal(json!(false))?
        .assert_trace([
            "Connecting to the database",
            "Logged in",
            r#"login.database -> login("admin", "entra") = true"#,
            "Connecting to the authentication service",
            "Logged in",
            r#"login.service -> login("admin", "entra") = true"#,
            "Connecting to Google",
            "Access denied",
            r#"login.google -> login("admin", "wrong") = false"#,
        ])
}

const CATALOG_LIST_HTML: &str = concat!(
    "<div><h2>Erdinger Pikantus</h2><p>Germany</p></div><hr />",
    "<div><h2>Corona</h2><p>Mexico</p></div><hr />",
    "<div><h2>Delirium Tremens</h2><p>Belgium</p></div><hr />",
);

const CATALOG_DETAILED_HTML: &str = concat!(
    "<div><h2>Erdinger Pikantus</h2><p>Germany</p>",
    "<p>A weizenbock brewed in the Bavarian town of Erding.</p></div><hr />",
    "<div><h2>Corona</h2><p>Mexico</p>",
    "<p>A worldwide brand distributed in more than 159 countries.</p></div><hr />",
    "<div><h2>Delirium Tremens</h2><p>Belgium</p>",
    "<p>A pale ale with fine effervescence and a dry, bitter finish.</p></div><hr />",
);

const CATALOG_IMAGES_HTML: &str = concat!(
    r#"<div><img width="10%" src="dxjcdxuv6chk2.cloudfront.net/assets/biere/flascheglas/pikantus-2020-v2.png" alt="Erdinger Pikantus" />"#,
    "<h2>Erdinger Pikantus</h2></div><hr />",
    r#"<div><img width="10%" src="upload.wikimedia.org/wikipedia/commons/0/0c/Corona-6Pack.JPG" alt="Corona" />"#,
    "<h2>Corona</h2></div><hr />",
    r#"<div><img width="10%" src="www.delirium.be/themes/custom/delirium/assets/img/beers/beer_delirium_tremens_bottle.png" alt="Delirium Tremens" />"#,
    "<h2>Delirium Tremens</h2></div><hr />",
);

/// Switches the layout strategy three times over one catalogue.
fn catalog_layout(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let listings = serde_json::to_value(beers::catalog())?;
    b.render(("catalog", "list"), "show", vec![listings.clone()])?
        .assert_equal(json!(CATALOG_LIST_HTML))?
        .render(("catalog", "detailed"), "show", vec![listings.clone()])?
        .assert_equal(json!(CATALOG_DETAILED_HTML))?
        .render(("catalog", "images"), "show", vec![listings])?
        .assert_equal(json!(CATALOG_IMAGES_HTML))
}

fn order_observer(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.broadcast(
        [("observer", "kitchen"), ("observer", "delivery")],
        "update",
        vec![json!("A1")],
    )?
    .assert_equal(json!([null, null]))?
    .assert_trace([
        "Kitchen: preparing order A1",
        r#"observer.kitchen -> update("A1") = null"#,
        "Delivery: waiting for order A1",
        r#"observer.delivery -> update("A1") = null"#,
    ])
}

fn add_item_command(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let command = ("command", "add_tacos");
    b.invoke(command, "execute", vec![])?
        .invoke(command, "execute", vec![])?
        .invoke(command, "undo", vec![])?
        .assert_equal(json!(["Tacos"]))?
        .assert_trace([
            r#"command.add_tacos -> execute() = ["Tacos"]"#,
            r#"command.add_tacos -> execute() = ["Tacos","Tacos"]"#,
            r#"command.add_tacos -> undo() = ["Tacos"]"#,
        ])?
        .invoke(command, "logs", vec![])?
        .assert_equal(json!(["Item added: Tacos", "Item added: Tacos", "Item removed: Tacos"]))
}

fn order_state(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let tracker = ("order_state", "tracker");
    b.invoke(tracker, "status", vec![])?
        .assert_equal(json!("New"))?
        .invoke(tracker, "next", vec![])?
        .invoke(tracker, "next", vec![])?
        .invoke(tracker, "next", vec![])?
        .assert_equal(json!("Delivered!"))?
        .invoke(tracker, "next", vec![])?
        .assert_equal(json!("Delivered!"))?
        .assert_trace([
            r#"order_state.tracker -> status() = "New""#,
            r#"order_state.tracker -> next() = "In the kitchen""#,
            r#"order_state.tracker -> next() = "Out for delivery""#,
            r#"order_state.tracker -> next() = "Delivered!""#,
            "The order was already delivered",
            r#"order_state.tracker -> next() = "Delivered!""#,
        ])
}

fn order_validation(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let handlers = [("validation", "stock"), ("validation", "payment")];
    b.chain(handlers, "handle", vec![json!({"in_stock": true, "paid": true})])?
        .assert_equal(json!(true))?
        .chain(handlers, "handle", vec![json!({"in_stock": true, "paid": false})])?
        .assert_equal(json!(false))?
        .chain(handlers, "handle", vec![json!({"in_stock": false, "paid": true})])?
        .assert_equal(json!(false))?
        .assert_trace([
            r#"validation.stock -> handle({"in_stock":true,"paid":true}) = true"#,
            r#"validation.payment -> handle({"in_stock":true,"paid":true}) = true"#,
            r#"validation.stock -> handle({"in_stock":true,"paid":false}) = true"#,
            "Not paid",
            r#"validation.payment -> handle({"in_stock":true,"paid":false}) = false"#,
            "Out of stock",
            r#"validation.stock -> handle({"in_stock":false,"paid":true}) = false"#,
        ])
}

// =============================================================================
// CREATIONAL
// =============================================================================

fn food_factory(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("factory", "food"), "create", vec![json!("pizza")])?
        .assert_equal(json!("pizza"))?
        .invoke(("factory", "food"), "create", vec![json!("ice_cream")])?
        .assert_equal(json!("ice cream"))?
        .assert_trace([
            "Preparing pizza",
            r#"factory.food -> create("pizza") = "pizza""#,
            "Preparing ice cream",
            r#"factory.food -> create("ice_cream") = "ice cream""#,
        ])
}

fn regional_kitchen(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("kitchen", "mexican"), "create_pizza", vec![])?
        .assert_equal(json!("mexican pizza"))?
        .invoke(("kitchen", "japanese"), "create_sushi", vec![])?
        .assert_equal(json!("japanese sushi"))?
        .assert_trace([
            "Preparing mexican pizza",
            r#"kitchen.mexican -> create_pizza() = "mexican pizza""#,
            "Preparing japanese sushi",
            r#"kitchen.japanese -> create_sushi() = "japanese sushi""#,
        ])
}

fn lasagna_builder(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let counter = ("builder", "lasagna");
    b.invoke(counter, "size", vec![json!("large")])?
        .invoke(counter, "cheese", vec![json!("parmesan")])?
        .invoke(counter, "build", vec![])?
        .assert_equal(json!("The lasagna is large and comes with parmesan cheese"))?
        .invoke(counter, "build", vec![])?
        .assert_equal(json!("The lasagna is medium and comes with mozzarella cheese"))?
        .assert_trace([
            r#"builder.lasagna -> size("large") = null"#,
            r#"builder.lasagna -> cheese("parmesan") = null"#,
            "The lasagna is large and comes with parmesan cheese",
            r#"builder.lasagna -> build() = "The lasagna is large and comes with parmesan cheese""#,
            "The lasagna is medium and comes with mozzarella cheese",
            r#"builder.lasagna -> build() = "The lasagna is medium and comes with mozzarella cheese""#,
        ])
}

fn config_singleton(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let config = ("config", "manager");
    b.construct(config)?
        .invoke(config, "set", vec![json!("theme"), json!("dark")])?
        // A later resolve of the same key sees the value set above
        .invoke(config, "get", vec![json!("theme")])?
        .assert_equal(json!("dark"))?
        .invoke(config, "get", vec![json!("language")])?
        .assert_equal(json!(null))?
        .assert_trace([
            r#"config.manager -> set("theme", "dark") = null"#,
            r#"config.manager -> get("theme") = "dark""#,
            r#"config.manager -> get("language") = null"#,
        ])
}

fn week_days_singleton(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let calendar = ("week_days", "calendar");
    let english = json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]);
    b.construct(calendar)?
        .invoke(calendar, "get_days", vec![])?
        .assert_equal(english.clone())?
        // Asking for Spanish later still yields the first instance
        .construct(calendar)?
        .invoke(calendar, "open", vec![json!("es")])?
        .assert_equal(json!("en"))?
        .invoke(calendar, "get_days", vec![])?
        .assert_equal(english)?
        .assert_trace([
            r#"week_days.calendar -> get_days() = ["Monday","Tuesday","Wednesday","Thursday","Friday","Saturday","Sunday"]"#,
            r#"week_days.calendar -> open("es") = "en""#,
            r#"week_days.calendar -> get_days() = ["Monday","Tuesday","Wednesday","Thursday","Friday","Saturday","Sunday"]"#,
        ])
}

fn order_prototype(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("prototype", "order"), "clone_with", vec![json!("tortas")])?
        .assert_equal(json!({
            "original": ["pizza", "tacos"],
            "cloned": ["pizza", "tacos", "tortas"],
        }))?
        .assert_trace([
            "Original: pizza, tacos",
            "Cloned: pizza, tacos, tortas",
            r#"prototype.order -> clone_with("tortas") = {"cloned":["pizza","tacos","tortas"],"original":["pizza","tacos"]}"#,
        ])
}

fn intro_products(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("shelf", "intro"), "prices", vec![])?
        .assert_equal(json!(["$18", "The price is: 15"]))?
        .invoke(("shelf", "intro"), "describe", vec![])?
        .assert_equal(json!(["XX 3", "chips"]))?
        .assert_trace([
            "$18",
            "The price is: 15",
            r#"shelf.intro -> prices() = ["$18","The price is: 15"]"#,
            "XX 3",
            "chips",
            r#"shelf.intro -> describe() = ["XX 3","chips"]"#,
        ])
}

// =============================================================================
// STRUCTURAL
// =============================================================================

fn payment_adapter(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("payment", "stripe"), "pay", vec![json!(90)])?
        .assert_trace(["Paying $90 with Stripe", "payment.stripe -> pay(90) = null"])
}

fn food_decorator(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("fries", "plain"), "cost", vec![])?
        .assert_equal(json!(50))?
        .invoke(("fries", "cheese_bacon"), "description", vec![])?
        .assert_equal(json!("Potato wedges with extra cheese with extra bacon"))?
        .invoke(("fries", "cheese_bacon"), "cost", vec![])?
        .assert_equal(json!(85))?
        .assert_trace([
            "fries.plain -> cost() = 50",
            r#"fries.cheese_bacon -> description() = "Potato wedges with extra cheese with extra bacon""#,
            "fries.cheese_bacon -> cost() = 85",
        ])
}

fn order_facade(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    b.invoke(("checkout", "facade"), "place_order", vec![])?
        .assert_trace([
            "Order created",
            "Payment processed",
            "Order dispatched",
            "checkout.facade -> place_order() = null",
        ])
}

fn combo_composite(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let combo = ("combo", "meal");
    b.invoke(combo, "add", vec![json!("Burger"), json!(80)])?
        .invoke(combo, "add", vec![json!("Fries"), json!(35)])?
        .invoke(combo, "add", vec![json!("Soda"), json!(25)])?
        .assert_equal(json!(3))?
        .invoke(combo, "name", vec![])?
        .assert_equal(json!("Combo: Burger, Fries, Soda"))?
        .invoke(combo, "price", vec![])?
        .assert_equal(json!(140))?
        .assert_trace([
            r#"combo.meal -> add("Burger", 80) = 1"#,
            r#"combo.meal -> add("Fries", 35) = 2"#,
            r#"combo.meal -> add("Soda", 25) = 3"#,
            r#"combo.meal -> name() = "Combo: Burger, Fries, Soda""#,
            "combo.meal -> price() = 140",
        ])
}

fn order_history_proxy(b: &mut ScriptBuilder) -> Result<&mut ScriptBuilder, HarnessError> {
    let history = ("history", "cached");
    b.invoke(history, "orders", vec![json!("user1")])?
        .invoke(history, "orders", vec![json!("user1")])?
        .assert_equal(json!(["Order 1", "Order 2"]))?
        .invoke(history, "orders", vec![json!("user2")])?
        .assert_trace([
            "Querying the database for user1",
            r#"history.cached -> orders("user1") = ["Order 1","Order 2"]"#,
            r#"history.cached -> orders("user1") = ["Order 1","Order 2"]"#,
            "Querying the database for user2",
            r#"history.cached -> orders("user2") = ["Order 1","Order 2"]"#,
        ])
}
