//! Intro example: a shelf of products priced through a shared interface.

use patterns_env::{Capability, Participant, ParticipantFault, Role, Tracer, Value};

/// Lists the price of every product on a shelf.
pub const SHELF: Capability = Capability::new("shelf", &["prices", "describe"]);

/// Anything that can be sold.
pub trait Product: Send {
    fn name(&self) -> String;

    /// Price as shown on the label.
    fn price_label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beer {
    pub name: String,
    /// Alcohol by volume, percent
    pub alcohol: f64,
    pub price: u32,
}

impl Beer {
    pub fn new(name: &str, alcohol: f64, price: u32) -> Self {
        Self {
            name: name.to_string(),
            alcohol,
            price,
        }
    }
}

impl Product for Beer {
    fn name(&self) -> String {
        format!("{} {}", self.name, self.alcohol)
    }

    fn price_label(&self) -> String {
        format!("${}", self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snack {
    pub name: String,
    pub price: u32,
}

impl Snack {
    pub fn new(name: &str, price: u32) -> Self {
        Self {
            name: name.to_string(),
            price,
        }
    }
}

impl Product for Snack {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn price_label(&self) -> String {
        format!("The price is: {}", self.price)
    }
}

/// Heterogeneous products handled through [`Product`] alone.
#[derive(Default)]
pub struct Shelf {
    products: Vec<Box<dyn Product>>,
}

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, product: impl Product + 'static) -> Self {
        self.products.push(Box::new(product));
        self
    }

    /// Returns every price label, in shelf order.
    pub fn prices(&self) -> Vec<String> {
        self.products.iter().map(|p| p.price_label()).collect()
    }
}

impl Participant for Shelf {
    fn invoke(
        &mut self,
        method: &str,
        _args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault> {
        let lines = match method {
            "prices" => self.prices(),
            "describe" => self.products.iter().map(|p| p.name()).collect(),
            other => return Err(ParticipantFault::unknown_method(other)),
        };
        for line in &lines {
            tracer.emit(line.clone());
        }
        Ok(Value::from(lines))
    }
}

impl Role for Shelf {
    const CAPABILITY: Capability = SHELF;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_differ_per_product() {
        let shelf = Shelf::new().with(Beer::new("XX", 3.0, 18)).with(Snack::new("chips", 15));
        assert_eq!(shelf.prices(), vec!["$18", "The price is: 15"]);
    }

    #[test]
    fn test_describe_traces_each_product() {
        let mut trace: Vec<String> = Vec::new();
        let mut shelf = Shelf::new().with(Beer::new("Indio", 4.0, 20));
        shelf.invoke("describe", &[], &mut trace).unwrap();
        assert_eq!(trace, vec!["Indio 4"]);
    }
}
