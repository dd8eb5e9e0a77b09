//! Pattern Harness Environment Layer
//!
//! This crate holds the seams shared by the demonstration catalogue and the
//! scenario harness:
//!
//! - **Participants**: any value implementing [`Participant`] (dynamic method
//!   dispatch) and [`Role`] (its declared [`Capability`])
//! - **Tracing**: participants never print; they emit through a [`Tracer`]
//! - **Rendering**: pre-rendered content leaves the harness through a
//!   [`RenderTarget`], which never inspects it
//!
//! # Example
//!
//! ```ignore
//! use patterns_env::{Capability, Participant, ParticipantFault, Role, Tracer, Value};
//!
//! const GREETER: Capability = Capability::new("greeter", &["greet"]);
//!
//! struct Greeter;
//!
//! impl Participant for Greeter {
//!     fn invoke(&mut self, method: &str, args: &[Value], tracer: &mut dyn Tracer)
//!         -> Result<Value, ParticipantFault>
//!     {
//!         tracer.emit("hello".to_string());
//!         Ok(Value::Null)
//!     }
//! }
//!
//! impl Role for Greeter {
//!     const CAPABILITY: Capability = GREETER;
//! }
//! ```

mod error;
mod participant;
mod render;
mod types;
pub mod value;

pub use error::{HarnessError, ParticipantFault};
pub use participant::{Capability, Participant, Role, Tracer};
pub use render::{DiscardTarget, RenderTarget};
pub use types::ParticipantKey;
pub use value::Value;
