//! Pattern Registry & Scenario Runner
//!
//! A harness that hosts design pattern demonstrations uniformly: each
//! demonstration registers its participants, runs a scripted interaction and
//! asserts the observable trace.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                          │
//! │                                                              │
//! │  ScenarioScript ──► step loop ──► Passed / Failed / Errored  │
//! │                        │   │                                 │
//! │            resolve(key)│   │emit(message)                    │
//! │                        ▼   ▼                                 │
//! │  ┌──────────────────────┐ ┌───────────┐ ┌──────────────┐     │
//! │  │  RegistrySnapshot    │ │ TraceSink │ │ RenderTarget │     │
//! │  │ (pattern, variant) → │ └───────────┘ └──────────────┘     │
//! │  │  lazily built,       │                                    │
//! │  │  cached participant  │                                    │
//! │  └──────────────────────┘                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use patterns_harness::{catalog, ScenarioId, ScenarioRunner};
//!
//! let registry = catalog::registry()?;
//! let script = ScenarioId::ShippingStrategy.script()?;
//! let result = ScenarioRunner::new().run(&script, &registry);
//! assert!(result.passed());
//! ```

pub mod catalog;
mod exporter;
mod registry;
mod render;
mod runner;
pub mod scenarios;
mod script;
mod suite;
mod trace;

pub use exporter::RunExport;
pub use registry::{ParticipantHandle, ParticipantRegistry, RegistrySnapshot};
pub use render::RenderBuffer;
pub use runner::{RunResult, RunStatus, ScenarioRunner};
pub use scenarios::{Category, ScenarioId};
pub use script::{ScenarioScript, ScenarioStep, ScriptBuilder};
pub use suite::{run_suite, HarnessConfig};
pub use trace::{TraceEvent, TraceSink};
