//! Participant and capability traits.

use crate::error::ParticipantFault;
use crate::value::Value;

/// A named method set that every variant of a pattern must satisfy.
///
/// Capabilities replace duck-typed dispatch: the registry records the
/// capability of each binding, and the runner refuses to call a method the
/// capability does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    name: &'static str,
    methods: &'static [&'static str],
}

impl Capability {
    /// Declares a capability.
    pub const fn new(name: &'static str, methods: &'static [&'static str]) -> Self {
        Self { name, methods }
    }

    /// Returns the capability name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared methods.
    pub fn methods(&self) -> &'static [&'static str] {
        self.methods
    }

    /// Returns true if `method` is part of this capability.
    pub fn supports(&self, method: &str) -> bool {
        self.methods.iter().any(|m| *m == method)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{{}}}", self.name, self.methods.join(","))
    }
}

/// Receiver of the textual events a participant produces while it runs.
///
/// Participants emit here instead of printing, so a run's observable output
/// can be asserted on.
pub trait Tracer {
    /// Records one message.
    fn emit(&mut self, message: String);
}

impl Tracer for Vec<String> {
    fn emit(&mut self, message: String) {
        self.push(message);
    }
}

/// A role instance that can be driven by name.
///
/// # Dispatch
///
/// ```text
/// runner                      participant
///   |-- invoke(method, args) ---->|
///   |                             |-- tracer.emit(..)   (zero or more)
///   |<--------- Ok(result) -------|
/// ```
///
/// Internal state may change across calls (a command's undo log, a state
/// machine's current stage); identity never does.
pub trait Participant: Send {
    /// Calls `method` with `args`.
    ///
    /// # Returns
    /// * `Ok(value)` - The method's result (`Value::Null` for "void" methods)
    /// * `Err(fault)` - Unknown method, bad argument or violated precondition
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
        tracer: &mut dyn Tracer,
    ) -> Result<Value, ParticipantFault>;
}

/// Static declaration of the capability a participant type implements.
///
/// Kept apart from [`Participant`] so that the latter stays object-safe.
pub trait Role: Participant + 'static {
    /// The capability every instance of this type satisfies.
    const CAPABILITY: Capability;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICING: Capability = Capability::new("pricing", &["calculate"]);

    #[test]
    fn test_capability_supports() {
        assert!(PRICING.supports("calculate"));
        assert!(!PRICING.supports("login"));
    }

    #[test]
    fn test_capability_display() {
        let command = Capability::new("command", &["execute", "undo"]);
        assert_eq!(command.to_string(), "command{execute,undo}");
    }

    #[test]
    fn test_vec_tracer_collects_in_order() {
        let mut out: Vec<String> = Vec::new();
        out.emit("a".to_string());
        out.emit("b".to_string());
        assert_eq!(out, vec!["a", "b"]);
    }
}
