//! Pre-execution task validation.
//!
//! The checks in [`checks`] are the raw validation primitives; this module
//! sequences them and aggregates every violation instead of stopping at the
//! first, so callers can show the modeler the full list in one pass.
//! Validation is entirely skippable via
//! [`crate::config::ExecConfig::validate_tasks`]; raising on a non-empty
//! list is the runner's job.

pub mod checks;

use serde::Serialize;

use crate::model::{Capabilities, Task, Variable};

/// Stable violation codes.
pub mod codes {
    pub const E_TASK: &str = "E_TASK";
    pub const E_LANGUAGE: &str = "E_LANGUAGE";
    pub const E_CHANGE: &str = "E_CHANGE";
    pub const E_SIM_TYPE: &str = "E_SIM_TYPE";
    pub const E_SIM_BOUNDS: &str = "E_SIM_BOUNDS";
    pub const E_VARIABLE: &str = "E_VARIABLE";
}

/// One structural problem found in a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Run every check against the task, in order, and aggregate all
/// violations. Empty result means the task is valid for this simulator.
pub fn validate_task(
    task: &Task,
    variables: &[Variable],
    capabilities: &Capabilities,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(checks::check_task(task));
    violations.extend(checks::check_model_language(
        task.model.language,
        &capabilities.languages,
    ));
    violations.extend(checks::check_model_changes(
        &task.model.changes,
        &capabilities.change_kinds,
    ));
    violations.extend(checks::check_simulation_kind(
        &task.simulation,
        &capabilities.simulation_kinds,
    ));
    violations.extend(checks::check_time_course(&task.simulation));
    violations.extend(checks::check_variables(variables));
    violations
}
