//! Structural patterns
//! ===================
//!
//! - **Adapter**: an external payment gateway behind the `PaymentProcessor` interface
//! - **Decorator**: toppings wrapping a base dish, each adding cost and description
//! - **Facade**: one call placing, charging and dispatching an order
//! - **Composite**: combos made of dishes or other combos
//! - **Proxy**: a caching stand-in for a slow order-history lookup

use patterns_env::value::{number, number_arg, text_arg};
use patterns_env::{Capability, Participant, ParticipantFault, Role, Tracer, Value};
use std::collections::HashMap;

/// Charges an amount.
pub const PAYMENT: Capability = Capability::new("payment", &["pay"]);

/// A dish that reports what it is and what it costs.
pub const DISH: Capability = Capability::new("dish", &["description", "cost"]);

/// Single entry point for the whole ordering process.
pub const CHECKOUT: Capability = Capability::new("checkout", &["place_order"]);

/// Tree of menu items.
pub const MENU: Capability = Capability::new("menu", &["add", "name", "price"]);

/// Looks up a user's past orders.
pub const ORDER_HISTORY: Capability = Capability::new("order_history", &["orders"]);

// =============================================================================
// ADAPTER
// =============================================================================

/// The interface checkout code expects.
pub trait PaymentProcessor {
    fn pay(&self, amount: f64, tracer: &mut dyn Tracer);
}

/// Third-party gateway with its own method naming.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripeGateway;

impl StripeGateway {
    pub fn make_payment(&self, value: f64, tracer: &mut dyn Tracer) {
        tracer.emit(format!("Paying ${} with Stripe", number(value)));
    }
}

/// Makes [`StripeGateway`] usable as a [`PaymentProcessor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StripeAdapter {
    gateway: StripeGateway,
}

impl StripeAdapter {
    pub fn new(gateway: StripeGateway) -> Self {
        Self { gateway }
    }
}

impl PaymentProcessor for StripeAdapter {
    fn pay(&self, amount: f64, tracer: &mut dyn Tracer) {
        self.gateway.make_payment(amount, tracer);
    }
}

impl Participant for StripeAdapter {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "pay" => {
                self.pay(number_arg(args, 0)?, tracer);
                Ok(Value::Null)
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for StripeAdapter {
    const CAPABILITY: Capability = PAYMENT;
}

// =============================================================================
// DECORATOR
// =============================================================================

/// Common interface of the base dish and every topping wrapped around it.
pub trait Food: Send {
    fn description(&self) -> String;
    fn cost(&self) -> f64;
}

/// The undecorated dish.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotatoWedges;

impl Food for PotatoWedges {
    fn description(&self) -> String {
        "Potato wedges".to_string()
    }

    fn cost(&self) -> f64 {
        50.0
    }
}

struct WithCheese(Box<dyn Food>);

impl Food for WithCheese {
    fn description(&self) -> String {
        format!("{} with extra cheese", self.0.description())
    }

    fn cost(&self) -> f64 {
        self.0.cost() + 15.0
    }
}

struct WithBacon(Box<dyn Food>);

impl Food for WithBacon {
    fn description(&self) -> String {
        format!("{} with extra bacon", self.0.description())
    }

    fn cost(&self) -> f64 {
        self.0.cost() + 20.0
    }
}

/// Available toppings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topping {
    Cheese,
    Bacon,
}

impl Topping {
    /// Wraps `food` in this topping.
    pub fn wrap(self, food: Box<dyn Food>) -> Box<dyn Food> {
        match self {
            Topping::Cheese => Box::new(WithCheese(food)),
            Topping::Bacon => Box::new(WithBacon(food)),
        }
    }
}

/// Potato wedges with toppings applied in order.
pub struct ToppedFries {
    food: Box<dyn Food>,
}

impl ToppedFries {
    pub fn new(toppings: &[Topping]) -> Self {
        let food = toppings
            .iter()
            .fold(Box::new(PotatoWedges) as Box<dyn Food>, |food, topping| topping.wrap(food));
        Self { food }
    }
}

impl Participant for ToppedFries {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "description" => Ok(Value::String(self.food.description())),
            "cost" => Ok(number(self.food.cost())),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for ToppedFries {
    const CAPABILITY: Capability = DISH;
}

// =============================================================================
// FACADE
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
struct OrderService;

impl OrderService {
    fn create_order(&self, tracer: &mut dyn Tracer) {
        tracer.emit("Order created".to_string());
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PaymentService;

impl PaymentService {
    fn process_payment(&self, tracer: &mut dyn Tracer) {
        tracer.emit("Payment processed".to_string());
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DeliveryService;

impl DeliveryService {
    fn dispatch_order(&self, tracer: &mut dyn Tracer) {
        tracer.emit("Order dispatched".to_string());
    }
}

/// Hides the order, payment and delivery subsystems behind one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFacade {
    order: OrderService,
    payment: PaymentService,
    delivery: DeliveryService,
}

impl OrderFacade {
    pub fn place_order(&self, tracer: &mut dyn Tracer) {
        self.order.create_order(tracer);
        self.payment.process_payment(tracer);
        self.delivery.dispatch_order(tracer);
    }
}

impl Participant for OrderFacade {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "place_order" => {
                self.place_order(tracer);
                Ok(Value::Null)
            }
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for OrderFacade {
    const CAPABILITY: Capability = CHECKOUT;
}

// =============================================================================
// COMPOSITE
// =============================================================================

/// A menu entry: a single dish or a combo of entries.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Single { name: String, price: f64 },
    Combo(Vec<MenuItem>),
}

impl MenuItem {
    pub fn single(name: impl Into<String>, price: f64) -> Self {
        MenuItem::Single {
            name: name.into(),
            price,
        }
    }

    pub fn name(&self) -> String {
        match self {
            MenuItem::Single { name, .. } => name.clone(),
            MenuItem::Combo(items) => format!(
                "Combo: {}",
                items.iter().map(MenuItem::name).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// Sum of all dishes below this entry.
    pub fn price(&self) -> f64 {
        match self {
            MenuItem::Single { price, .. } => *price,
            MenuItem::Combo(items) => items.iter().map(MenuItem::price).sum(),
        }
    }
}

/// A combo assembled one dish at a time.
#[derive(Debug, Clone, Default)]
pub struct ComboMeal {
    items: Vec<MenuItem>,
}

impl ComboMeal {
    pub fn add(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    /// Returns the combo as a menu entry.
    pub fn as_item(&self) -> MenuItem {
        MenuItem::Combo(self.items.clone())
    }
}

impl Participant for ComboMeal {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        _tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "add" => {
                let name = text_arg(args, 0)?;
                let price = number_arg(args, 1)?;
                self.add(MenuItem::single(name, price));
                Ok(Value::from(self.items.len()))
            }
            "name" => Ok(Value::String(self.as_item().name())),
            "price" => Ok(number(self.as_item().price())),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl Role for ComboMeal {
    const CAPABILITY: Capability = MENU;
}

// =============================================================================
// PROXY
// =============================================================================

/// Source of a user's past orders.
pub trait OrderHistory: Send {
    fn orders(&mut self, user_id: &str, tracer: &mut dyn Tracer) -> Vec<String>;
}

/// The expensive lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseOrderHistory;

impl OrderHistory for DatabaseOrderHistory {
    fn orders(&mut self, user_id: &str, tracer: &mut dyn Tracer) -> Vec<String> {
        tracer.emit(format!("Querying the database for {}", user_id));
        vec!["Order 1".to_string(), "Order 2".to_string()]
    }
}

/// Proxy answering repeated lookups from a per-user cache.
#[derive(Debug, Clone, Default)]
pub struct CachedOrderHistory<H> {
    inner: H,
    cache: HashMap<String, Vec<String>>,
}

impl<H: OrderHistory> CachedOrderHistory<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }
}

impl<H: OrderHistory> OrderHistory for CachedOrderHistory<H> {
    fn orders(&mut self, user_id: &str, tracer: &mut dyn Tracer) -> Vec<String> {
        if let Some(hit) = self.cache.get(user_id) {
            return hit.clone();
        }
        let orders = self.inner.orders(user_id, tracer);
        self.cache.insert(user_id.to_string(), orders.clone());
        orders
    }
}

impl<H: OrderHistory> Participant for CachedOrderHistory<H> {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        match method {
            "orders" => Ok(Value::from(OrderHistory::orders(self, text_arg(args, 0)?, tracer))),
            other => Err(ParticipantFault::unknown_method(other)),
        }
    }
}

impl<H: OrderHistory + 'static> Role for CachedOrderHistory<H> {
    const CAPABILITY: Capability = ORDER_HISTORY;
}
