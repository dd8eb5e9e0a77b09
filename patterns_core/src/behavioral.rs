//! Behavioral patterns
//! ===================
//!
//! - **Strategy**: interchangeable pricing, login and list-layout algorithms
//! - **Observer**: kitchen and delivery react to an order notification
//! - **Command**: adding an item to an order, with undo and an audit log
//! - **State**: an order moving from new to delivered
//! - **Chain of responsibility**: stock and payment validation handlers
//!
//! The chain and the observer fan-out are driven from outside: handlers and
//! observers never hold references to each other.

use crate::beers::BeerListing;
use patterns_env::value::{decode_arg, number, number_arg, text_arg};
use patterns_env::{Capability, Participant, ParticipantFault, Role, Tracer, Value};
use serde::{Deserialize, Serialize};

// =============================================================================
// STRATEGY
// =============================================================================

/// Anything that turns an amount into a price.
pub const PRICING: Capability = Capability::new("pricing", &["calculate"]);

/// Login backends.
pub const AUTHENTICATION: Capability = Capability::new("authentication", &["login"]);

/// Renders the beer catalogue to HTML.
pub const PRESENTATION: Capability = Capability::new("presentation", &["show"]);

/// Shipping cost strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingStrategy {
    /// 20% of the order amount
    Distance,
    /// Always zero
    Free,
}

impl ShippingStrategy {
    /// Returns the shipping cost for an order amount.
    pub fn calculate(&self, amount: f64) -> f64 {
        match self {
            ShippingStrategy::Distance => amount * 1.2,
            ShippingStrategy::Free => 0.0,
        }
    }
}

impl Participant for ShippingStrategy {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "calculate" => Ok(number(self.calculate(number_arg(args, 0)?))),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for ShippingStrategy {
    const CAPABILITY: Capability = PRICING;
}

/// Sale total strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaleStrategy {
    /// Amount plus tax
    Regular { tax: f64 },
    /// Amount plus tax, minus a flat discount
    Discount { tax: f64, discount: f64 },
    /// Amount converted at a fixed dollar price
    Foreign { dollar_price: f64 },
}

impl SaleStrategy {
    /// Returns the sale total.
    pub fn calculate(&self, amount: f64) -> f64 {
        match *self {
            SaleStrategy::Regular { tax } => amount + amount * tax,
            SaleStrategy::Discount { tax, discount } => amount + amount * tax - discount,
            SaleStrategy::Foreign { dollar_price } => amount * dollar_price,
        }
    }
}

impl Participant for SaleStrategy {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "calculate" => Ok(number(self.calculate(number_arg(args, 0)?))),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for SaleStrategy {
    const CAPABILITY: Capability = PRICING;
}

/// The only credentials every login backend accepts.
const ADMIN_USER: &str = "admin";
const ADMIN_PASSWORD: &str = "entra";

/// Login strategies. They differ only in where they claim to check credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStrategy {
    Database,
    Service,
    Google,
}

impl LoginStrategy {
    /// Checks credentials, tracing where they were checked and the outcome.
    pub fn login(&self, user: &str, password: &str, tracer: &mut dyn Tracer) -> bool {
        let channel = match self {
            LoginStrategy::Database => "Connecting to the database",
            LoginStrategy::Service => "Connecting to the authentication service",
            LoginStrategy::Google => "Connecting to Google",
        };
        tracer.emit(channel.to_string());

        let ok = user == ADMIN_USER && password == ADMIN_PASSWORD;
        tracer.emit(if ok { "Logged in" } else { "Access denied" }.to_string());
        ok
    }
}

impl Participant for LoginStrategy {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "login" => {
                let user = text_arg(args, 0)?;
                let password = text_arg(args, 1)?;
                Ok(Value::Bool(self.login(user, password, tracer)))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for LoginStrategy {
    const CAPABILITY: Capability = AUTHENTICATION;
}

/// Ways of listing the beer catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLayout {
    /// Name and country
    Plain,
    /// Name, country and description
    Detailed,
    /// Thumbnail and name
    WithImages,
}

impl CatalogLayout {
    /// Renders the listings as an HTML fragment.
    pub fn show(&self, items: &[BeerListing]) -> String {
        items.iter().fold(String::new(), |mut html, item| {
            let body = match self {
                CatalogLayout::Plain => {
                    format!("<h2>{}</h2><p>{}</p>", item.name, item.country)
                }
                CatalogLayout::Detailed => format!(
                    "<h2>{}</h2><p>{}</p><p>{}</p>",
                    item.name, item.country, item.info
                ),
                CatalogLayout::WithImages => format!(
                    "<img width=\"10%\" src=\"{}\" alt=\"{}\" /><h2>{}</h2>",
                    item.img, item.name, item.name
                ),
            };
            html.push_str("<div>");
            html.push_str(&body);
            html.push_str("</div><hr />");
            html
        })
    }
}

impl Participant for CatalogLayout {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "show" => {
                let items: Vec<BeerListing> = decode_arg(args, 0)?;
                Ok(Value::String(self.show(&items)))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for CatalogLayout {
    const CAPABILITY: Capability = PRESENTATION;
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Reacts to an order notification.
pub const OBSERVER: Capability = Capability::new("observer", &["update"]);

/// Parties notified when an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderObserver {
    Kitchen,
    Delivery,
}

impl OrderObserver {
    /// Handles a notification for `order_id`.
    pub fn update(&self, order_id: &str, tracer: &mut dyn Tracer) {
        let message = match self {
            OrderObserver::Kitchen => format!("Kitchen: preparing order {}", order_id),
            OrderObserver::Delivery => format!("Delivery: waiting for order {}", order_id),
        };
        tracer.emit(message);
    }
}

impl Participant for OrderObserver {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "update" => {
                self.update(text_arg(args, 0)?, tracer);
                Ok(Value::Null)
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for OrderObserver {
    const CAPABILITY: Capability = OBSERVER;
}

// =============================================================================
// COMMAND
// =============================================================================

/// Reversible request with an audit log.
pub const COMMAND: Capability = Capability::new("command", &["execute", "undo", "logs", "order"]);

/// Adds one item to an order; `undo` removes it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItemCommand {
    /// Item this command adds
    item: String,

    /// Order the command operates on
    order: Vec<String>,

    /// One entry per execute/undo
    logs: Vec<String>,
}

impl AddItemCommand {
    /// Creates a command that adds `item` to an empty order.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            order: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Adds the item.
    pub fn execute(&mut self) {
        self.order.push(self.item.clone());
        self.logs.push(format!("Item added: {}", self.item));
    }

    /// Removes the most recently added item.
    ///
    /// Fails when the order is empty.
    pub fn undo(&mut self) -> Result<(), ParticipantFault> {
        if self.order.pop().is_none() {
            return Err(ParticipantFault::new("nothing to undo: order is empty"));
        }
        self.logs.push(format!("Item removed: {}", self.item));
        Ok(())
    }

    /// Returns the current order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns the audit log.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }
}

impl Participant for AddItemCommand {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "execute" => {
                self.execute();
                Ok(Value::from(self.order.clone()))
            }
            "undo" => {
                self.undo()?;
                Ok(Value::from(self.order.clone()))
            }
            "logs" => Ok(Value::from(self.logs.clone())),
            "order" => Ok(Value::from(self.order.clone())),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for AddItemCommand {
    const CAPABILITY: Capability = COMMAND;
}

// =============================================================================
// STATE
// =============================================================================

/// An object whose behavior follows its current stage.
pub const ORDER_STATE: Capability = Capability::new("order_state", &["next", "status"]);

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStage {
    #[default]
    New,
    Cooking,
    OutForDelivery,
    Delivered,
}

impl OrderStage {
    /// Returns the following stage, or `None` once delivered.
    pub fn next(self) -> Option<Self> {
        match self {
            OrderStage::New => Some(OrderStage::Cooking),
            OrderStage::Cooking => Some(OrderStage::OutForDelivery),
            OrderStage::OutForDelivery => Some(OrderStage::Delivered),
            OrderStage::Delivered => None,
        }
    }

    /// Returns the human-readable status.
    pub fn status(self) -> &'static str {
        match self {
            OrderStage::New => "New",
            OrderStage::Cooking => "In the kitchen",
            OrderStage::OutForDelivery => "Out for delivery",
            OrderStage::Delivered => "Delivered!",
        }
    }
}

/// Context holding an order's current stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderTracker {
    stage: OrderStage,
}

impl OrderTracker {
    /// Creates a tracker for a new order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the order. A delivered order stays delivered.
    pub fn next(&mut self, tracer: &mut dyn Tracer) {
        match self.stage.next() {
            Some(stage) => self.stage = stage,
            None => tracer.emit("The order was already delivered".to_string()),
        }
    }

    /// Returns the current stage.
    pub fn stage(&self) -> OrderStage {
        self.stage
    }
}

impl Participant for OrderTracker {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "next" => {
                self.next(tracer);
                Ok(Value::from(self.stage.status()))
            }
            "status" => Ok(Value::from(self.stage.status())),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for OrderTracker {
    const CAPABILITY: Capability = ORDER_STATE;
}

// =============================================================================
// CHAIN OF RESPONSIBILITY
// =============================================================================

/// One link of a validation chain: returns true to let the order continue.
pub const HANDLER: Capability = Capability::new("handler", &["handle"]);

/// Order facts the validation chain looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCheck {
    pub in_stock: bool,
    pub paid: bool,
}

/// Validation handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationHandler {
    Stock,
    Payment,
}

impl ValidationHandler {
    /// Returns true if the order passes this handler.
    pub fn handle(&self, order: &OrderCheck, tracer: &mut dyn Tracer) -> bool {
        let (ok, rejection) = match self {
            ValidationHandler::Stock => (order.in_stock, "Out of stock"),
            ValidationHandler::Payment => (order.paid, "Not paid"),
        };
        if !ok {
            tracer.emit(rejection.to_string());
        }
        ok
    }
}

impl Participant for ValidationHandler {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "handle" => {
                let order: OrderCheck = decode_arg(args, 0)?;
                Ok(Value::Bool(self.handle(&order, tracer)))
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for ValidationHandler {
    const CAPABILITY: Capability = HANDLER;
}
