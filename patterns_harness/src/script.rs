//! Scenario scripts and their builder.

use patterns_env::{HarnessError, ParticipantKey, Value};
use serde::{Deserialize, Serialize};

/// One step of a scenario script.
///
/// Steps name participants by key only; resolving them is the runner's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Resolve the participant (building it if needed) without calling it
    Construct { target: ParticipantKey },

    /// Call one method; its return value becomes the last result
    Invoke {
        target: ParticipantKey,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Call `method` on each handler in order, stopping at the first `false`
    Chain {
        handlers: Vec<ParticipantKey>,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Call `method` on every target in order
    Broadcast {
        targets: Vec<ParticipantKey>,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Call a method returning markup and forward it to the render target
    Render {
        target: ParticipantKey,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    /// Compare the whole trace so far against `expected`
    AssertTrace { expected: Vec<String> },

    /// Compare the last result against `expected`
    AssertEqual { expected: Value },
}

impl ScenarioStep {
    /// Returns the step kind as written in serialized scripts.
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::Construct { .. } => "construct",
            ScenarioStep::Invoke { .. } => "invoke",
            ScenarioStep::Chain { .. } => "chain",
            ScenarioStep::Broadcast { .. } => "broadcast",
            ScenarioStep::Render { .. } => "render",
            ScenarioStep::AssertTrace { .. } => "assert_trace",
            ScenarioStep::AssertEqual { .. } => "assert_equal",
        }
    }
}

/// A named, immutable list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioScript {
    name: String,
    steps: Vec<ScenarioStep>,
}

impl ScenarioScript {
    /// Starts building a script.
    pub fn builder(name: impl Into<String>) -> ScriptBuilder {
        ScriptBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Serializes the script to JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        serde_json::from_str(json).map_err(|e| HarnessError::invalid_script(e.to_string()))
    }
}

/// Accumulates steps until [`ScriptBuilder::build`] freezes them.
///
/// ```ignore
/// let mut builder = ScenarioScript::builder("shipping");
/// builder
///     .invoke(("shipping", "distance"), "calculate", vec![json!(100)])?
///     .assert_equal(json!(120))?;
/// let script = builder.build();
/// ```
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    name: String,
    steps: Vec<ScenarioStep>,
    built: bool,
}

impl ScriptBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            built: false,
        }
    }

    fn push(&mut self, step: ScenarioStep) -> Result<&mut Self, HarnessError> {
        if self.built {
            return Err(HarnessError::immutable(&self.name));
        }
        self.steps.push(step);
        Ok(self)
    }

    pub fn construct(&mut self, target: impl Into<ParticipantKey>) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::Construct {
            target: target.into(),
        })
    }

    pub fn invoke(
        &mut self,
        target: impl Into<ParticipantKey>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::Invoke {
            target: target.into(),
            method: method.to_string(),
            args,
        })
    }

    pub fn chain<K: Into<ParticipantKey>>(
        &mut self,
        handlers: impl IntoIterator<Item = K>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::Chain {
            handlers: handlers.into_iter().map(Into::into).collect(),
            method: method.to_string(),
            args,
        })
    }

    pub fn broadcast<K: Into<ParticipantKey>>(
        &mut self,
        targets: impl IntoIterator<Item = K>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::Broadcast {
            targets: targets.into_iter().map(Into::into).collect(),
            method: method.to_string(),
            args,
        })
    }

    pub fn render(
        &mut self,
        target: impl Into<ParticipantKey>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::Render {
            target: target.into(),
            method: method.to_string(),
            args,
        })
    }

    pub fn assert_trace<S: Into<String>>(
        &mut self,
        expected: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::AssertTrace {
            expected: expected.into_iter().map(Into::into).collect(),
        })
    }

    pub fn assert_equal(&mut self, expected: Value) -> Result<&mut Self, HarnessError> {
        self.push(ScenarioStep::AssertEqual { expected })
    }

    /// Freezes the builder and returns the script.
    ///
    /// Any later call on this builder, including another `build`, fails with
    /// [`HarnessError::Immutable`].
    pub fn build(&mut self) -> Result<ScenarioScript, HarnessError> {
        if self.built {
            return Err(HarnessError::immutable(&self.name));
        }
        self.built = true;
        Ok(ScenarioScript {
            name: self.name.clone(),
            steps: self.steps.clone(),
        })
    }

    /// Returns true once `build` has been called.
    pub fn is_built(&self) -> bool {
        self.built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_steps_in_order() {
        let mut builder = ScenarioScript::builder("shipping");
        builder
            .construct(("shipping", "distance"))
            .unwrap()
            .invoke(("shipping", "distance"), "calculate", vec![json!(100)])
            .unwrap()
            .assert_equal(json!(120))
            .unwrap();
        let script = builder.build().unwrap();

        assert_eq!(script.name(), "shipping");
        let kinds: Vec<_> = script.steps().iter().map(ScenarioStep::kind).collect();
        assert_eq!(kinds, vec!["construct", "invoke", "assert_equal"]);
    }

    #[test]
    fn test_builder_rejects_changes_after_build() {
        let mut builder = ScenarioScript::builder("frozen");
        builder.assert_trace(Vec::<String>::new()).unwrap();
        let script = builder.build().unwrap();

        let err = builder.assert_equal(json!(1)).unwrap_err();
        assert!(matches!(err, HarnessError::Immutable(_)));
        assert!(builder.build().is_err());
        assert!(builder.is_built());
        assert_eq!(script.steps().len(), 1);
    }

    #[test]
    fn test_empty_script_builds() {
        let script = ScenarioScript::builder("empty").build().unwrap();
        assert!(script.steps().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut builder = ScenarioScript::builder("observer");
        builder
            .broadcast([("observer", "kitchen"), ("observer", "delivery")], "update", vec![json!("A1")])
            .unwrap();
        let script = builder.build().unwrap();

        let value: Value = serde_json::from_str(&script.to_json().unwrap()).unwrap();
        assert_eq!(value["steps"][0]["step"], "broadcast");
        assert_eq!(value["steps"][0]["targets"][1]["variant"], "delivery");

        let parsed = ScenarioScript::from_json(&script.to_json().unwrap()).unwrap();
        assert_eq!(parsed, script);
    }

    #[test]
    fn test_args_default_to_empty() {
        let json = r#"{"name":"s","steps":[{"step":"invoke","target":{"pattern":"a","variant":"b"},"method":"m"}]}"#;
        let script = ScenarioScript::from_json(json).unwrap();
        match &script.steps()[0] {
            ScenarioStep::Invoke { args, .. } => assert!(args.is_empty()),
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_step() {
        let err = ScenarioScript::from_json(r#"{"name":"s","steps":[{"step":"teleport"}]}"#).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidScript(_)));
    }
}
