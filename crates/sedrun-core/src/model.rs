//! Data model for SED-ML tasks as seen by the execution core.
//!
//! These types describe one simulation experiment: which model, which
//! algorithm, which time bounds, which outputs. They are constructed by the
//! archive orchestrator (one per SED-ML task element), read-only during
//! execution, and discarded after the task completes. SED-ML parsing itself
//! is the orchestrator's job.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// SED-ML URN for the time symbol.
pub const SYMBOL_TIME: &str = "urn:sedml:symbol:time";

/// Model encoding languages, by SED-ML URN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelLanguage {
    Sbml,
    Cellml,
    Neuroml,
    Bngl,
    Smoldyn,
    Vcml,
}

impl ModelLanguage {
    /// SED-ML language URN.
    pub fn urn(&self) -> &'static str {
        match self {
            Self::Sbml => "urn:sedml:language:sbml",
            Self::Cellml => "urn:sedml:language:cellml",
            Self::Neuroml => "urn:sedml:language:neuroml",
            Self::Bngl => "urn:sedml:language:bngl",
            Self::Smoldyn => "urn:sedml:language:smoldyn",
            Self::Vcml => "urn:sedml:language:vcml",
        }
    }
}

impl std::fmt::Display for ModelLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.urn())
    }
}

/// An in-place change to apply to the model before simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChange {
    /// Replace the value of a model attribute.
    Attribute { target: String, new_value: String },
    /// Add a new element below the target.
    AddElement { target: String, new_elements: String },
    /// Remove the target element.
    RemoveElement { target: String },
    /// Set the target from a computed expression.
    Compute { target: String, math: String },
}

impl ModelChange {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Attribute { .. } => ChangeKind::Attribute,
            Self::AddElement { .. } => ChangeKind::AddElement,
            Self::RemoveElement { .. } => ChangeKind::RemoveElement,
            Self::Compute { .. } => ChangeKind::Compute,
        }
    }
}

/// Discriminant of [`ModelChange`], used for capability checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Attribute,
    AddElement,
    RemoveElement,
    Compute,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Attribute => "attribute change",
            Self::AddElement => "add element",
            Self::RemoveElement => "remove element",
            Self::Compute => "compute change",
        };
        write!(f, "{}", name)
    }
}

/// Reference to the model a task simulates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    /// Path to the model source; the orchestrator has already resolved it
    /// out of the archive and applied any XML-level changes.
    pub source: PathBuf,
    pub language: ModelLanguage,
    pub changes: Vec<ModelChange>,
}

/// Requested simulation algorithm plus its parameter overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    /// KiSAO term of the requested algorithm, e.g. `KISAO_0000560`.
    pub kisao_id: String,
    pub changes: Vec<AlgorithmParameterChange>,
}

impl Algorithm {
    /// Algorithm with no parameter overrides.
    pub fn new(kisao_id: impl Into<String>) -> Self {
        Self {
            kisao_id: kisao_id.into(),
            changes: Vec::new(),
        }
    }
}

/// A raw textual parameter override, keyed by the parameter's KiSAO term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmParameterChange {
    pub kisao_id: String,
    pub new_value: String,
}

/// Simulation configuration, one variant per SED-ML simulation type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Simulation {
    UniformTimeCourse(UniformTimeCourse),
    OneStep(OneStep),
    SteadyState(SteadyState),
}

impl Simulation {
    pub fn kind(&self) -> SimulationKind {
        match self {
            Self::UniformTimeCourse(_) => SimulationKind::UniformTimeCourse,
            Self::OneStep(_) => SimulationKind::OneStep,
            Self::SteadyState(_) => SimulationKind::SteadyState,
        }
    }

    pub fn algorithm(&self) -> &Algorithm {
        match self {
            Self::UniformTimeCourse(s) => &s.algorithm,
            Self::OneStep(s) => &s.algorithm,
            Self::SteadyState(s) => &s.algorithm,
        }
    }
}

/// Discriminant of [`Simulation`], used for capability checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    UniformTimeCourse,
    OneStep,
    SteadyState,
}

impl std::fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::UniformTimeCourse => "uniform time course",
            Self::OneStep => "one step",
            Self::SteadyState => "steady state",
        };
        write!(f, "{}", name)
    }
}

/// Uniform time course bounds.
///
/// Invariants (enforced by the validator, not by construction):
/// `output_start_time >= initial_time`,
/// `output_end_time >= output_start_time`, all times finite.
/// Output series have `number_of_points + 1` entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformTimeCourse {
    pub algorithm: Algorithm,
    pub initial_time: f64,
    pub output_start_time: f64,
    pub output_end_time: f64,
    pub number_of_points: usize,
}

/// Single-step simulation (not executable by this core).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneStep {
    pub algorithm: Algorithm,
    pub step: f64,
}

/// Steady-state simulation (not executable by this core).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    pub algorithm: Algorithm,
}

/// One SED-ML task: a model plus a simulation to run on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub model: ModelSpec,
    pub simulation: Simulation,
}

/// A requested output variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique within a task's variable set.
    pub id: String,
    pub reference: VariableRef,
}

impl Variable {
    /// Variable recorded from a named simulation symbol.
    pub fn symbol(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference: VariableRef::Symbol(symbol.into()),
        }
    }

    /// Variable recorded from an XPath-like locator into the model.
    pub fn target(id: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference: VariableRef::Target(target.into()),
        }
    }
}

/// Discriminated reference into the model: a named simulation symbol
/// (e.g. `urn:sedml:symbol:time`) or an XPath-like locator. A variable
/// carries exactly one of the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRef {
    Symbol(String),
    Target(String),
}

/// Support sets a simulator declares; consumed by the validator.
#[derive(Clone, Debug, PartialEq)]
pub struct Capabilities {
    pub languages: Vec<ModelLanguage>,
    /// Model change kinds the simulator can apply. Empty means no in-place
    /// changes are supported.
    pub change_kinds: Vec<ChangeKind>,
    pub simulation_kinds: Vec<SimulationKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_kind_and_algorithm_accessors() {
        let sim = Simulation::UniformTimeCourse(UniformTimeCourse {
            algorithm: Algorithm::new("KISAO_0000560"),
            initial_time: 0.0,
            output_start_time: 0.0,
            output_end_time: 10.0,
            number_of_points: 100,
        });
        assert_eq!(sim.kind(), SimulationKind::UniformTimeCourse);
        assert_eq!(sim.algorithm().kisao_id, "KISAO_0000560");
    }

    #[test]
    fn change_kinds_match_variants() {
        let change = ModelChange::Attribute {
            target: "/sbml:sbml/sbml:model".to_string(),
            new_value: "1.0".to_string(),
        };
        assert_eq!(change.kind(), ChangeKind::Attribute);
    }

    #[test]
    fn language_urns() {
        assert_eq!(ModelLanguage::Sbml.urn(), "urn:sedml:language:sbml");
        assert_eq!(ModelLanguage::Sbml.to_string(), "urn:sedml:language:sbml");
    }
}
