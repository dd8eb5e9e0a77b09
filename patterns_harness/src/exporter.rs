//! JSON exporter for run results.
//!
//! Exports a batch of runs, traces included, for snapshot testing and CI.

use crate::runner::RunResult;
use patterns_env::HarnessError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete export of a batch of runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunExport {
    /// Number of runs
    pub total: usize,

    /// Runs that ended `Passed`
    pub passed: usize,

    /// Runs that ended `Failed` or `Errored`
    pub failed: usize,

    /// Every run, in execution order
    pub results: Vec<RunResult>,
}

impl RunExport {
    /// Creates an empty export.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a run and updates the counters.
    pub fn push(&mut self, result: RunResult) {
        self.total += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Returns true if every run passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the runs that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &RunResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Serializes the export to pretty JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), HarnessError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParticipantRegistry;
    use crate::runner::ScenarioRunner;
    use crate::script::ScenarioScript;
    use serde_json::json;

    fn sample_runs() -> RunExport {
        let runner = ScenarioRunner::new();
        let registry = ParticipantRegistry::new();
        let mut export = RunExport::new();

        export.push(runner.run(&ScenarioScript::builder("empty").build().unwrap(), &registry));

        let mut builder = ScenarioScript::builder("broken");
        builder.invoke(("strategy", "unknown"), "calculate", vec![json!(1)]).unwrap();
        export.push(runner.run(&builder.build().unwrap(), &registry));
        export
    }

    #[test]
    fn test_counters_track_outcomes() {
        let export = sample_runs();
        assert_eq!(export.total, 2);
        assert_eq!(export.passed, 1);
        assert_eq!(export.failed, 1);
        assert!(!export.all_passed());
        assert_eq!(export.failures().next().unwrap().scenario(), "broken");
    }

    #[test]
    fn test_write_to_file() {
        let export = sample_runs();
        let path = std::env::temp_dir().join(format!("patterns-export-{}.json", std::process::id()));
        export.write_to_file(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written["total"], 2);
        assert_eq!(written["results"][1]["status"], "errored");
        assert_eq!(
            written["results"][1]["failure_reason"],
            "Participant not found: strategy.unknown"
        );
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let export = RunExport::new();
        let err = export
            .write_to_file("/nonexistent-dir/for/sure/export.json")
            .unwrap_err();
        assert!(matches!(err, HarnessError::Export(_)));
    }
}
