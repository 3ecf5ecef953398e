//! Task execution provenance.
//!
//! The log records what actually ran: the resolved algorithm (after any
//! substitution) and the invocation record. It is written exactly once, at
//! the end of a successful execution, and only when
//! [`crate::config::ExecConfig::collect_log`] is set. A caller may
//! pre-allocate a log and pass it in to be filled in place; logs are never
//! shared across concurrent task executions.

use serde::Serialize;

use crate::registry::MethodArgs;

/// Provenance for one executed task.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskLog {
    /// KiSAO id of the algorithm actually run.
    pub algorithm: Option<String>,
    pub simulator_details: Option<SimulatorDetails>,
}

/// Invocation record: implementation identity plus the effective argument
/// mapping.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatorDetails {
    /// e.g. `sedrun_sim::methods::lsoda`.
    pub method: String,
    pub arguments: MethodArgs,
}
