//! Scenario runner - executes scripts against a registry snapshot.

use crate::registry::{ParticipantHandle, ParticipantRegistry, RegistrySnapshot};
use crate::script::{ScenarioScript, ScenarioStep};
use crate::trace::{TraceEvent, TraceSink};

use patterns_env::value::{self, join_args};
use patterns_env::{DiscardTarget, HarnessError, ParticipantFault, ParticipantKey, RenderTarget, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every step completed
    Passed,

    /// An assertion did not hold
    Failed,

    /// A participant faulted, or the script referenced something unusable
    Errored,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunStatus::Passed => "PASSED",
            RunStatus::Failed => "FAILED",
            RunStatus::Errored => "ERRORED",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of one `run` call. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique per run; not part of the trace content
    run_id: Uuid,

    /// Script that was run
    scenario: String,

    status: RunStatus,

    /// Same as `status == Passed`
    passed: bool,

    /// Steps started, including the one that ended the run
    steps_executed: usize,

    trace: Vec<TraceEvent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,

    /// First differing trace index, for trace mismatches
    #[serde(skip_serializing_if = "Option::is_none")]
    mismatch_index: Option<usize>,

    /// 0-based index of the step that ended the run early
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_step: Option<usize>,
}

impl RunResult {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn steps_executed(&self) -> usize {
        self.steps_executed
    }

    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// Returns the trace messages without sequence numbers.
    pub fn trace_messages(&self) -> Vec<&str> {
        self.trace.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn mismatch_index(&self) -> Option<usize> {
        self.mismatch_index
    }

    pub fn failed_step(&self) -> Option<usize> {
        self.failed_step
    }
}

/// Per-run state. A run starts `Running` and ends in exactly one terminal state.
#[derive(Debug)]
enum RunState {
    Running,
    Passed,
    Failed {
        step: usize,
        reason: String,
        mismatch_index: Option<usize>,
    },
    Errored {
        step: usize,
        error: HarnessError,
    },
}

/// What a successfully executed step asks of the run loop.
enum StepOutcome {
    Continue,
    Mismatch {
        reason: String,
        index: Option<usize>,
    },
}

/// Executes scenario scripts.
///
/// The runner holds no per-run state: one instance may serve any number of
/// runs, sequentially or from several threads.
///
/// # Run lifecycle
///
/// ```text
///   run(script, registry)
///          │
///          ▼
///      Running ──── step ok ────► next step
///          │
///          ├── all steps done ──────────────► Passed
///          ├── assertion mismatch ──────────► Failed   (remaining steps skipped)
///          └── fault / not found / bad step ► Errored  (remaining steps skipped)
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Emit a `key -> method(args) = result` line after each invocation
    trace_invocations: bool,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Creates a runner that traces every invocation.
    pub fn new() -> Self {
        Self {
            trace_invocations: true,
        }
    }

    /// Enables or disables invocation lines in the trace.
    ///
    /// With invocation lines off, the trace holds only what participants emit.
    pub fn with_invocation_trace(mut self, enabled: bool) -> Self {
        self.trace_invocations = enabled;
        self
    }

    /// Runs a script against a snapshot of `registry`, with a fresh trace
    /// and rendered content discarded.
    pub fn run(&self, script: &ScenarioScript, registry: &ParticipantRegistry) -> RunResult {
        let snapshot = registry.snapshot();
        let mut sink = TraceSink::new();
        self.run_snapshot(script, &snapshot, &mut sink, &mut DiscardTarget)
    }

    /// Runs a script with a caller-provided sink and render target.
    ///
    /// The sink is reset before the first step.
    pub fn run_snapshot(
        &self,
        script: &ScenarioScript,
        snapshot: &RegistrySnapshot,
        sink: &mut TraceSink,
        target: &mut dyn RenderTarget,
    ) -> RunResult {
        info!("Starting scenario: {} ({} steps)", script.name(), script.steps().len());
        sink.reset();

        let mut state = RunState::Running;
        let mut last_result: Option<Value> = None;
        let mut steps_executed = 0;

        for (index, step) in script.steps().iter().enumerate() {
            debug!("  step {} [{}]", index, step.kind());
            steps_executed += 1;

            match self.execute_step(step, snapshot, sink, target, &mut last_result) {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Mismatch { reason, index: mismatch_index }) => {
                    state = RunState::Failed {
                        step: index,
                        reason,
                        mismatch_index,
                    };
                    break;
                }
                Err(error) => {
                    state = RunState::Errored { step: index, error };
                    break;
                }
            }
        }

        if let RunState::Running = state {
            state = RunState::Passed;
        }

        self.finish(script, state, steps_executed, sink)
    }

    /// Turns a terminal state into the run's result.
    fn finish(
        &self,
        script: &ScenarioScript,
        state: RunState,
        steps_executed: usize,
        sink: &TraceSink,
    ) -> RunResult {
        let (status, failure_reason, mismatch_index, failed_step) = match state {
            RunState::Passed | RunState::Running => (RunStatus::Passed, None, None, None),
            RunState::Failed {
                step,
                reason,
                mismatch_index,
            } => (RunStatus::Failed, Some(reason), mismatch_index, Some(step)),
            RunState::Errored { step, error } => {
                (RunStatus::Errored, Some(error.to_string()), None, Some(step))
            }
        };

        match &failure_reason {
            None => info!("Scenario {} passed ({} trace events)", script.name(), sink.len()),
            Some(reason) => warn!("Scenario {} {}: {}", script.name(), status, reason),
        }

        RunResult {
            run_id: Uuid::new_v4(),
            scenario: script.name().to_string(),
            status,
            passed: status == RunStatus::Passed,
            steps_executed,
            trace: sink.events().to_vec(),
            failure_reason,
            mismatch_index,
            failed_step,
        }
    }

    fn execute_step(
        &self,
        step: &ScenarioStep,
        snapshot: &RegistrySnapshot,
        sink: &mut TraceSink,
        target: &mut dyn RenderTarget,
        last_result: &mut Option<Value>,
    ) -> Result<StepOutcome, HarnessError> {
        match step {
            ScenarioStep::Construct { target: key } => {
                snapshot.resolve(key)?;
            }

            ScenarioStep::Invoke {
                target: key,
                method,
                args,
            } => {
                let handle = snapshot.resolve(key)?;
                *last_result = Some(self.call(&handle, method, args, sink)?);
            }

            ScenarioStep::Chain {
                handlers,
                method,
                args,
            } => {
                let mut completed = true;
                for key in handlers {
                    let handle = snapshot.resolve(key)?;
                    let verdict = self.call(&handle, method, args, sink)?;
                    match verdict.as_bool() {
                        Some(true) => {}
                        Some(false) => {
                            debug!("  chain stopped at {}", key);
                            completed = false;
                            break;
                        }
                        None => return Err(not_a(key, "boolean", &verdict)),
                    }
                }
                *last_result = Some(Value::Bool(completed));
            }

            ScenarioStep::Broadcast {
                targets,
                method,
                args,
            } => {
                let mut results = Vec::with_capacity(targets.len());
                for key in targets {
                    let handle = snapshot.resolve(key)?;
                    results.push(self.call(&handle, method, args, sink)?);
                }
                *last_result = Some(Value::Array(results));
            }

            ScenarioStep::Render {
                target: key,
                method,
                args,
            } => {
                let handle = snapshot.resolve(key)?;
                let content = self.call(&handle, method, args, sink)?;
                let html = content.as_str().ok_or_else(|| not_a(key, "string", &content))?;
                target.set_content(html);
                *last_result = Some(content);
            }

            ScenarioStep::AssertTrace { expected } => {
                return Ok(compare_trace(sink.events(), expected));
            }

            ScenarioStep::AssertEqual { expected } => {
                let actual = last_result.as_ref().ok_or_else(|| {
                    HarnessError::invalid_script("assert_equal before any result was produced")
                })?;
                if !value::matches(actual, expected) {
                    return Ok(StepOutcome::Mismatch {
                        reason: format!("expected {}, got {}", expected, actual),
                        index: None,
                    });
                }
            }
        }
        Ok(StepOutcome::Continue)
    }

    /// Invokes one method and traces the invocation after whatever the
    /// participant emitted itself.
    fn call(
        &self,
        handle: &ParticipantHandle,
        method: &str,
        args: &[Value],
        sink: &mut TraceSink,
    ) -> Result<Value, HarnessError> {
        let result = handle.invoke(method, args, sink)?;
        if self.trace_invocations {
            sink.emit(format!(
                "{} -> {}({}) = {}",
                handle.key(),
                method,
                join_args(args),
                result
            ));
        }
        Ok(result)
    }
}

fn not_a(key: &ParticipantKey, expected: &str, got: &Value) -> HarnessError {
    HarnessError::participant(
        key,
        ParticipantFault::new(format!("expected a {} result, got {}", expected, got)),
    )
}

/// Compares actual trace messages against the expected sequence.
fn compare_trace(actual: &[TraceEvent], expected: &[String]) -> StepOutcome {
    let first_diff = actual
        .iter()
        .zip(expected)
        .position(|(event, want)| event.message != *want);

    let index = match first_diff {
        Some(i) => i,
        None if actual.len() == expected.len() => return StepOutcome::Continue,
        // One is a prefix of the other
        None => actual.len().min(expected.len()),
    };

    let shown = |s: Option<&str>| s.map_or_else(|| "<end of trace>".to_string(), |m| format!("{:?}", m));
    StepOutcome::Mismatch {
        reason: format!(
            "trace mismatch at index {}: expected {}, got {}",
            index,
            shown(expected.get(index).map(String::as_str)),
            shown(actual.get(index).map(|e| e.message.as_str())),
        ),
        index: Some(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderBuffer;
    use patterns_core::{CatalogLayout, ShippingStrategy, ValidationHandler};
    use patterns_env::value::text_arg;
    use patterns_env::{Capability, Participant, Role, Tracer};
    use proptest::prelude::*;
    use serde_json::json;

    const ECHO: Capability = Capability::new("echo", &["say", "fail", "count", "first", "pad"]);

    /// Emits its argument and returns it.
    struct Echo;

    impl Participant for Echo {
        fn invoke(
            &mut self,
            method: &str,
            args: &[Value],
            tracer: &mut dyn Tracer,
        ) -> Result<Value, ParticipantFault> {
            match method {
                "say" => {
                    let text = text_arg(args, 0)?.to_string();
                    tracer.emit(text.clone());
                    Ok(Value::from(text))
                }
                "fail" => Err(ParticipantFault::new("precondition violated")),
                "count" => Ok(json!(3)),
                "first" => {
                    let words: Vec<String> = Vec::new();
                    Ok(Value::from(words[0].clone()))
                }
                "pad" => Ok(Value::from(format!("{}{}", "x".repeat(90), text_arg(args, 0)?))),
                other => Err(ParticipantFault::unknown_method(other)),
            }
        }
    }

    impl Role for Echo {
        const CAPABILITY: Capability = ECHO;
    }

    fn echo_registry() -> ParticipantRegistry {
        let mut registry = ParticipantRegistry::new();
        registry.register("echo", "main", || Echo).unwrap();
        registry
    }

    fn quiet() -> ScenarioRunner {
        ScenarioRunner::new().with_invocation_trace(false)
    }

    #[test]
    fn test_empty_script_passes_with_empty_trace() {
        let script = ScenarioScript::builder("empty").build().unwrap();
        let result = ScenarioRunner::new().run(&script, &ParticipantRegistry::new());

        assert!(result.passed());
        assert_eq!(result.status(), RunStatus::Passed);
        assert!(result.trace().is_empty());
        assert_eq!(result.failure_reason(), None);
        assert_eq!(result.steps_executed(), 0);
    }

    #[test]
    fn test_shipping_results() {
        let mut registry = ParticipantRegistry::new();
        registry.register("shipping", "distance", || ShippingStrategy::Distance).unwrap();
        registry.register("shipping", "free", || ShippingStrategy::Free).unwrap();

        let mut builder = ScenarioScript::builder("shipping");
        builder
            .invoke(("shipping", "distance"), "calculate", vec![json!(100)]).unwrap()
            .assert_equal(json!(120)).unwrap()
            .invoke(("shipping", "free"), "calculate", vec![json!(100)]).unwrap()
            .assert_equal(json!(0)).unwrap()
            .assert_trace([
                "shipping.distance -> calculate(100) = 120",
                "shipping.free -> calculate(100) = 0",
            ]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &registry);
        assert!(result.passed(), "{:?}", result.failure_reason());
        assert_eq!(result.trace().len(), 2);
    }

    #[test]
    fn test_unknown_participant_errors() {
        let mut builder = ScenarioScript::builder("missing");
        builder
            .invoke(("strategy", "unknown"), "calculate", vec![json!(1)]).unwrap()
            .assert_equal(json!(1)).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &ParticipantRegistry::new());
        assert_eq!(result.status(), RunStatus::Errored);
        assert!(!result.passed());
        assert_eq!(
            result.failure_reason(),
            Some("Participant not found: strategy.unknown")
        );
        assert_eq!(result.steps_executed(), 1);
        assert_eq!(result.failed_step(), Some(0));
    }

    #[test]
    fn test_trace_mismatch_reports_first_index() {
        let mut builder = ScenarioScript::builder("mismatch");
        builder
            .invoke(("echo", "main"), "say", vec![json!("a")]).unwrap()
            .invoke(("echo", "main"), "say", vec![json!("c")]).unwrap()
            .assert_trace(["a", "b"]).unwrap()
            .invoke(("echo", "main"), "say", vec![json!("never")]).unwrap();
        let script = builder.build().unwrap();

        let result = quiet().run(&script, &echo_registry());
        assert_eq!(result.status(), RunStatus::Failed);
        assert_eq!(result.mismatch_index(), Some(1));
        assert!(result
            .failure_reason()
            .unwrap()
            .starts_with("trace mismatch at index 1"));
        // The step after the assertion never ran
        assert_eq!(result.trace_messages(), vec!["a", "c"]);
        assert_eq!(result.steps_executed(), 3);
    }

    #[test]
    fn test_shorter_trace_mismatches_at_end() {
        let mut builder = ScenarioScript::builder("short");
        builder
            .invoke(("echo", "main"), "say", vec![json!("a")]).unwrap()
            .assert_trace(["a", "b"]).unwrap();
        let script = builder.build().unwrap();

        let result = quiet().run(&script, &echo_registry());
        assert_eq!(result.mismatch_index(), Some(1));
        assert!(result.failure_reason().unwrap().contains("<end of trace>"));
    }

    #[test]
    fn test_assert_equal_mismatch_fails() {
        let mut builder = ScenarioScript::builder("count");
        builder
            .invoke(("echo", "main"), "count", vec![]).unwrap()
            .assert_equal(json!(4)).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert_eq!(result.status(), RunStatus::Failed);
        assert_eq!(result.failure_reason(), Some("expected 4, got 3"));
        assert_eq!(result.mismatch_index(), None);
    }

    #[test]
    fn test_participant_fault_errors_with_message() {
        let mut builder = ScenarioScript::builder("fault");
        builder.invoke(("echo", "main"), "fail", vec![]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert_eq!(result.status(), RunStatus::Errored);
        assert!(result.failure_reason().unwrap().contains("precondition violated"));
    }

    #[test]
    fn test_participant_panic_errors_with_message() {
        let mut builder = ScenarioScript::builder("panic");
        builder
            .invoke(("echo", "main"), "say", vec![json!("before")]).unwrap()
            .invoke(("echo", "main"), "first", vec![]).unwrap()
            .invoke(("echo", "main"), "say", vec![json!("never")]).unwrap();
        let script = builder.build().unwrap();
        let registry = echo_registry();

        let result = quiet().run(&script, &registry);
        assert_eq!(result.status(), RunStatus::Errored);
        assert_eq!(result.failed_step(), Some(1));
        let reason = result.failure_reason().unwrap();
        assert!(reason.starts_with("echo.main faulted: panicked:"), "{}", reason);
        assert!(reason.contains("index out of bounds"), "{}", reason);
        assert_eq!(result.trace_messages(), vec!["before"]);

        // The same registry keeps serving runs afterwards
        let mut builder = ScenarioScript::builder("after");
        builder.invoke(("echo", "main"), "say", vec![json!("again")]).unwrap();
        assert!(quiet().run(&builder.build().unwrap(), &registry).passed());
    }

    #[test]
    fn test_unsupported_method_errors() {
        let mut builder = ScenarioScript::builder("unsupported");
        builder.invoke(("echo", "main"), "shout", vec![]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert_eq!(result.status(), RunStatus::Errored);
        assert!(result.failure_reason().unwrap().contains("does not support method 'shout'"));
    }

    #[test]
    fn test_assert_equal_without_result_errors() {
        let mut builder = ScenarioScript::builder("premature");
        builder.assert_equal(json!(1)).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &ParticipantRegistry::new());
        assert_eq!(result.status(), RunStatus::Errored);
    }

    #[test]
    fn test_construct_only_resolves() {
        let mut builder = ScenarioScript::builder("construct");
        builder.construct(("echo", "main")).unwrap().assert_trace(Vec::<String>::new()).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert!(result.passed());
    }

    #[test]
    fn test_chain_stops_at_first_rejection() {
        let mut registry = ParticipantRegistry::new();
        registry.register("validation", "stock", || ValidationHandler::Stock).unwrap();
        registry.register("validation", "payment", || ValidationHandler::Payment).unwrap();

        let mut builder = ScenarioScript::builder("chain");
        builder
            .chain(
                [("validation", "stock"), ("validation", "payment")],
                "handle",
                vec![json!({"in_stock": false, "paid": false})],
            ).unwrap()
            .assert_equal(json!(false)).unwrap()
            .assert_trace(["Out of stock"]).unwrap();
        let script = builder.build().unwrap();

        let result = quiet().run(&script, &registry);
        assert!(result.passed(), "{:?}", result.failure_reason());
    }

    #[test]
    fn test_chain_requires_boolean_results() {
        let mut builder = ScenarioScript::builder("chain");
        builder.chain([("echo", "main")], "count", vec![]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert_eq!(result.status(), RunStatus::Errored);
    }

    #[test]
    fn test_broadcast_collects_results() {
        let mut registry = echo_registry();
        registry.register("echo", "other", || Echo).unwrap();

        let mut builder = ScenarioScript::builder("broadcast");
        builder
            .broadcast([("echo", "main"), ("echo", "other")], "say", vec![json!("hi")]).unwrap()
            .assert_equal(json!(["hi", "hi"])).unwrap()
            .assert_trace(["hi", "hi"]).unwrap();
        let script = builder.build().unwrap();

        assert!(quiet().run(&script, &registry).passed());
    }

    #[test]
    fn test_render_forwards_content() {
        let mut registry = ParticipantRegistry::new();
        registry.register("catalog", "list", || CatalogLayout::Plain).unwrap();

        let items = json!([{"name": "Corona", "country": "Mexico", "info": "", "img": ""}]);
        let mut builder = ScenarioScript::builder("render");
        builder.render(("catalog", "list"), "show", vec![items]).unwrap();
        let script = builder.build().unwrap();

        let mut sink = TraceSink::new();
        let mut buffer = RenderBuffer::new();
        let result = ScenarioRunner::new().run_snapshot(&script, &registry.snapshot(), &mut sink, &mut buffer);

        assert!(result.passed(), "{:?}", result.failure_reason());
        assert_eq!(buffer.content(), Some("<div><h2>Corona</h2><p>Mexico</p></div><hr />"));
    }

    #[test]
    fn test_render_requires_text() {
        let mut builder = ScenarioScript::builder("render");
        builder.render(("echo", "main"), "count", vec![]).unwrap();
        let script = builder.build().unwrap();

        let mut buffer = RenderBuffer::new();
        let result = ScenarioRunner::new().run_snapshot(
            &script,
            &echo_registry().snapshot(),
            &mut TraceSink::new(),
            &mut buffer,
        );
        assert_eq!(result.status(), RunStatus::Errored);
        assert_eq!(buffer.renders(), 0);
    }

    #[test]
    fn test_invocation_line_format() {
        let mut builder = ScenarioScript::builder("format");
        builder.invoke(("echo", "main"), "say", vec![json!("hi")]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        assert_eq!(result.trace_messages(), vec!["hi", "echo.main -> say(\"hi\") = \"hi\""]);
    }

    #[test]
    fn test_invocation_lines_keep_long_values_whole() {
        let mut builder = ScenarioScript::builder("long");
        builder
            .invoke(("echo", "main"), "pad", vec![json!("A")]).unwrap()
            .invoke(("echo", "main"), "pad", vec![json!("B")]).unwrap();
        let script = builder.build().unwrap();

        let result = ScenarioRunner::new().run(&script, &echo_registry());
        let lines = result.trace_messages();
        let padding = "x".repeat(90);
        assert_eq!(lines[0], format!("echo.main -> pad(\"A\") = \"{}A\"", padding));
        assert_eq!(lines[1], format!("echo.main -> pad(\"B\") = \"{}B\"", padding));

        let result_part = |line: &str| line.split(" = ").nth(1).map(str::to_string);
        assert_ne!(result_part(lines[0]), result_part(lines[1]));
    }

    #[test]
    fn test_run_snapshot_resets_sink() {
        let script = ScenarioScript::builder("empty").build().unwrap();
        let mut sink = TraceSink::new();
        sink.emit("stale");

        let result =
            ScenarioRunner::new().run_snapshot(&script, &echo_registry().snapshot(), &mut sink, &mut DiscardTarget);
        assert!(result.trace().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let script = ScenarioScript::builder("empty").build().unwrap();
        let registry = ParticipantRegistry::new();
        let runner = ScenarioRunner::new();
        assert_ne!(runner.run(&script, &registry).run_id(), runner.run(&script, &registry).run_id());
    }

    #[test]
    fn test_parallel_runs_with_own_sinks() {
        let mut registry = ParticipantRegistry::new();
        registry.register("shipping", "distance", || ShippingStrategy::Distance).unwrap();
        let snapshot = registry.snapshot();

        let mut builder = ScenarioScript::builder("parallel");
        builder
            .invoke(("shipping", "distance"), "calculate", vec![json!(50)]).unwrap()
            .assert_equal(json!(60)).unwrap();
        let script = builder.build().unwrap();
        let runner = ScenarioRunner::new();

        let results: Vec<RunResult> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        let mut sink = TraceSink::new();
                        runner.run_snapshot(&script, &snapshot, &mut sink, &mut DiscardTarget)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in &results {
            assert!(result.passed());
            assert_eq!(result.trace_messages(), results[0].trace_messages());
        }
    }

    #[test]
    fn test_result_serializes_trace_records() {
        let mut builder = ScenarioScript::builder("serialize");
        builder.invoke(("echo", "main"), "say", vec![json!("x")]).unwrap();
        let script = builder.build().unwrap();

        let result = quiet().run(&script, &echo_registry());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "passed");
        assert_eq!(value["trace"], json!([{"sequence": 0, "message": "x"}]));
        assert!(value.get("failure_reason").is_none());
    }

    proptest! {
        #[test]
        fn test_runs_are_deterministic_and_gapless(words in proptest::collection::vec("[a-z]{1,8}", 0..20)) {
            let mut builder = ScenarioScript::builder("echo");
            for word in &words {
                builder.invoke(("echo", "main"), "say", vec![json!(word)]).unwrap();
            }
            let script = builder.build().unwrap();
            let registry = echo_registry();
            let runner = ScenarioRunner::new();

            let first = runner.run(&script, &registry);
            let second = runner.run(&script, &registry);

            prop_assert!(first.passed());
            prop_assert_eq!(first.trace(), second.trace());
            prop_assert_eq!(first.trace().len(), words.len() * 2);
            for (i, event) in first.trace().iter().enumerate() {
                prop_assert_eq!(event.sequence, i as u64);
            }
        }
    }
}
