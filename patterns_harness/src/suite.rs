//! Runs a selection of built-in scenarios.

use crate::catalog;
use crate::exporter::RunExport;
use crate::runner::ScenarioRunner;
use crate::scenarios::{Category, ScenarioId};
use patterns_env::HarnessError;
use tracing::{info, warn};

/// Suite settings.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Scenarios to run, in order
    pub scenarios: Vec<ScenarioId>,

    /// Stop after the first run that does not pass
    pub fail_fast: bool,

    /// Emit `key -> method(args) = result` lines into traces
    pub trace_invocations: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            scenarios: ScenarioId::all(),
            fail_fast: false,
            trace_invocations: true,
        }
    }
}

impl HarnessConfig {
    /// Restricts the suite to one category.
    pub fn only_category(mut self, category: Category) -> Self {
        self.scenarios.retain(|s| s.category() == category);
        self
    }
}

/// Runs every configured scenario, each against a freshly built catalogue
/// registry so no cached participant carries state between scenarios.
pub fn run_suite(config: &HarnessConfig) -> Result<RunExport, HarnessError> {
    let runner = ScenarioRunner::new().with_invocation_trace(config.trace_invocations);
    let mut export = RunExport::new();

    info!("Running {} scenarios", config.scenarios.len());

    for scenario in &config.scenarios {
        let registry = catalog::registry()?;
        let script = scenario.script()?;
        let result = runner.run(&script, &registry);
        let passed = result.passed();
        export.push(result);

        if !passed && config.fail_fast {
            warn!("Stopping after {} (fail-fast)", scenario);
            break;
        }
    }

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suite_passes() {
        let export = run_suite(&HarnessConfig::default()).unwrap();
        assert_eq!(export.total, ScenarioId::all().len());
        assert!(export.all_passed());
    }

    #[test]
    fn test_category_filter() {
        let config = HarnessConfig::default().only_category(Category::Creational);
        let export = run_suite(&config).unwrap();
        assert_eq!(export.total, 7);
        assert!(export
            .results
            .iter()
            .all(|r| r.scenario().parse::<ScenarioId>().unwrap().category() == Category::Creational));
    }

    #[test]
    fn test_without_invocation_lines_assertions_fail() {
        let config = HarnessConfig {
            scenarios: vec![ScenarioId::ShippingStrategy, ScenarioId::OrderFacade],
            fail_fast: true,
            trace_invocations: false,
        };
        let export = run_suite(&config).unwrap();
        // Shipping asserts invocation lines, so it fails and the suite stops
        assert_eq!(export.total, 1);
        assert_eq!(export.failed, 1);
    }
}
