//! Execution configuration.
//!
//! An explicit value threaded through the runner, never a process-wide
//! singleton. Defaults are safe (validate, log); `from_env` reads the
//! `SEDRUN_*` variables the container entrypoints set.

use serde::{Deserialize, Serialize};

use crate::resolve::SubstitutionPolicy;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Validate tasks before execution. Disable to trust upstream
    /// (orchestrator-level) validation.
    pub validate_tasks: bool,

    /// Record the resolved algorithm and invocation record into the task
    /// log. Disable to leave caller-provided logs untouched.
    pub collect_log: bool,

    /// Tolerance for substituting a nearby supported algorithm when the
    /// requested one is not registered.
    pub substitution_policy: SubstitutionPolicy,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            validate_tasks: true,
            collect_log: true,
            substitution_policy: SubstitutionPolicy::default(),
        }
    }
}

impl ExecConfig {
    /// Read configuration from `SEDRUN_VALIDATE_TASKS`,
    /// `SEDRUN_COLLECT_LOG`, and `SEDRUN_SUBSTITUTION_POLICY`.
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            validate_tasks: lookup("SEDRUN_VALIDATE_TASKS")
                .as_deref()
                .and_then(parse_flag)
                .unwrap_or(defaults.validate_tasks),
            collect_log: lookup("SEDRUN_COLLECT_LOG")
                .as_deref()
                .and_then(parse_flag)
                .unwrap_or(defaults.collect_log),
            substitution_policy: lookup("SEDRUN_SUBSTITUTION_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.substitution_policy),
        }
    }

    /// Set the substitution policy.
    pub fn with_substitution_policy(mut self, policy: SubstitutionPolicy) -> Self {
        self.substitution_policy = policy;
        self
    }

    /// Enable or disable pre-execution validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_tasks = validate;
        self
    }

    /// Enable or disable provenance logging.
    pub fn with_log_collection(mut self, collect: bool) -> Self {
        self.collect_log = collect;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
