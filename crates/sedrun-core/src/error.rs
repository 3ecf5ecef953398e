//! Error taxonomy for task execution.
//!
//! Every failure mode of the core is a typed variant carrying enough
//! structured detail for a caller to report to an end user (offending
//! identifier, full ordered list of valid alternatives). Nothing is retried
//! inside the core; the archive orchestrator decides whether to continue
//! with the remaining tasks.

use std::path::PathBuf;

use crate::resolve::SubstitutionPolicy;
use crate::validate::Violation;
use crate::value::ValueType;

/// A raw override value that does not parse as the declared semantic type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{value}` is not a valid {expected} value")]
pub struct ParameterTypeError {
    pub value: String,
    pub expected: ValueType,
}

/// The model source could not be turned into a model handle.
#[derive(Debug, thiserror::Error)]
#[error("could not read model `{}`: {reason}", .path.display())]
pub struct ModelReadError {
    pub path: PathBuf,
    pub reason: String,
}

/// Task execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Aggregated structural problems found by the validator.
    #[error("task `{task_id}` is invalid:\n{}", format_violations(.violations))]
    TaskValidation {
        task_id: String,
        violations: Vec<Violation>,
    },

    /// Requested algorithm has no admissible substitute under the policy.
    /// The payload enumerates every supported algorithm in registry order.
    #[error(
        "algorithm `{requested}` is not supported and cannot be substituted under policy \
         `{policy}`; algorithm must have one of the following KiSAO ids:\n{}",
        format_catalog(.supported)
    )]
    UnsupportedAlgorithm {
        requested: String,
        policy: SubstitutionPolicy,
        supported: Vec<(String, String)>,
    },

    /// Override references a parameter not declared for the resolved algorithm.
    #[error(
        "algorithm parameter `{parameter}` is not supported by `{algorithm}`; \
         parameter must have one of the following KiSAO ids:\n{}",
        format_catalog(.supported)
    )]
    UnsupportedParameter {
        algorithm: String,
        parameter: String,
        supported: Vec<(String, String)>,
    },

    /// Override value does not parse as the declared type.
    #[error(transparent)]
    ParameterType(#[from] ParameterTypeError),

    /// A requested output could not be located in the raw results.
    #[error("requested variable `{variable_id}` could not be recorded from the simulation results")]
    VariableExtraction { variable_id: String },

    /// Model reading collaborator failed.
    #[error(transparent)]
    ModelRead(#[from] ModelReadError),

    /// Failure raised by the simulation method itself, passed through unmodified.
    #[error(transparent)]
    Simulation(#[from] anyhow::Error),
}

impl ExecError {
    /// Stable snake_case name of the error kind, for orchestrator reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskValidation { .. } => "task_validation",
            Self::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            Self::UnsupportedParameter { .. } => "unsupported_parameter",
            Self::ParameterType(_) => "parameter_type",
            Self::VariableExtraction { .. } => "variable_extraction",
            Self::ModelRead(_) => "model_read",
            Self::Simulation(_) => "simulation",
        }
    }
}

fn format_catalog(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(id, name)| format!("  - {}: {}", id, name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}
