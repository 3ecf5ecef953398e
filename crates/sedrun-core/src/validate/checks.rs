//! Validation primitives.
//!
//! Each check inspects one aspect of a task and returns the violations it
//! found; the sequencing and aggregation live in the parent module.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::{codes, Violation};
use crate::model::{
    ChangeKind, ModelChange, ModelLanguage, Simulation, SimulationKind, Task, Variable,
    VariableRef, SYMBOL_TIME,
};
use crate::results::target_id;

lazy_static! {
    static ref KISAO_ID_RE: Regex = Regex::new(r"^KISAO_\d{7}$").unwrap();
}

/// Well-formed KiSAO term, e.g. `KISAO_0000560`.
pub fn is_kisao_id(id: &str) -> bool {
    KISAO_ID_RE.is_match(id)
}

/// Structural well-formedness: model source present, KiSAO ids well-formed.
pub fn check_task(task: &Task) -> Vec<Violation> {
    let mut violations = Vec::new();

    if task.model.source.as_os_str().is_empty() {
        violations.push(Violation::new(
            codes::E_TASK,
            format!("model `{}` has no source", task.model.id),
        ));
    }

    let algorithm = task.simulation.algorithm();
    if !is_kisao_id(&algorithm.kisao_id) {
        violations.push(Violation::new(
            codes::E_TASK,
            format!(
                "`{}` is not a valid KiSAO algorithm id (expected KISAO_XXXXXXX)",
                algorithm.kisao_id
            ),
        ));
    }
    for change in &algorithm.changes {
        if !is_kisao_id(&change.kisao_id) {
            violations.push(Violation::new(
                codes::E_TASK,
                format!(
                    "`{}` is not a valid KiSAO parameter id (expected KISAO_XXXXXXX)",
                    change.kisao_id
                ),
            ));
        }
    }

    violations
}

/// Model language must be one of the simulator's declared languages.
pub fn check_model_language(
    language: ModelLanguage,
    supported: &[ModelLanguage],
) -> Vec<Violation> {
    if supported.contains(&language) {
        return Vec::new();
    }
    let names: Vec<_> = supported.iter().map(|l| l.urn()).collect();
    vec![Violation::new(
        codes::E_LANGUAGE,
        format!(
            "model language `{}` is not supported; supported languages: {}",
            language.urn(),
            names.join(", ")
        ),
    )]
}

/// Every model change kind must be within the declared supported subset.
pub fn check_model_changes(
    changes: &[ModelChange],
    supported: &[ChangeKind],
) -> Vec<Violation> {
    changes
        .iter()
        .filter(|c| !supported.contains(&c.kind()))
        .map(|c| {
            Violation::new(
                codes::E_CHANGE,
                format!("model changes of kind `{}` are not supported", c.kind()),
            )
        })
        .collect()
}

/// Simulation type must be within the declared supported types.
pub fn check_simulation_kind(
    simulation: &Simulation,
    supported: &[SimulationKind],
) -> Vec<Violation> {
    if supported.contains(&simulation.kind()) {
        return Vec::new();
    }
    vec![Violation::new(
        codes::E_SIM_TYPE,
        format!("`{}` simulations are not supported", simulation.kind()),
    )]
}

/// Uniform time course bounds: times finite, output window ordered after
/// the initial time, per the SED-ML contract. Other simulation kinds carry
/// no bounds to check here.
pub fn check_time_course(simulation: &Simulation) -> Vec<Violation> {
    let sim = match simulation {
        Simulation::UniformTimeCourse(sim) => sim,
        _ => return Vec::new(),
    };

    let mut violations = Vec::new();
    for (name, value) in [
        ("initial_time", sim.initial_time),
        ("output_start_time", sim.output_start_time),
        ("output_end_time", sim.output_end_time),
    ] {
        if !value.is_finite() {
            violations.push(Violation::new(
                codes::E_SIM_BOUNDS,
                format!("{} must be finite, got {}", name, value),
            ));
        }
    }
    if sim.output_start_time < sim.initial_time {
        violations.push(Violation::new(
            codes::E_SIM_BOUNDS,
            format!(
                "output_start_time ({}) must be at least initial_time ({})",
                sim.output_start_time, sim.initial_time
            ),
        ));
    }
    if sim.output_end_time < sim.output_start_time {
        violations.push(Violation::new(
            codes::E_SIM_BOUNDS,
            format!(
                "output_end_time ({}) must be at least output_start_time ({})",
                sim.output_end_time, sim.output_start_time
            ),
        ));
    }
    violations
}

/// Variable ids must be unique and every reference must resolve: the only
/// supported symbol is the time symbol, and targets must carry an element
/// id predicate.
pub fn check_variables(variables: &[Variable]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for variable in variables {
        if !seen.insert(variable.id.as_str()) {
            violations.push(Violation::new(
                codes::E_VARIABLE,
                format!("duplicate variable id `{}`", variable.id),
            ));
        }
        match &variable.reference {
            VariableRef::Symbol(symbol) => {
                if symbol != SYMBOL_TIME && symbol != "time" {
                    violations.push(Violation::new(
                        codes::E_VARIABLE,
                        format!(
                            "variable `{}` has unsupported symbol `{}`; only `{}` is supported",
                            variable.id, symbol, SYMBOL_TIME
                        ),
                    ));
                }
            }
            VariableRef::Target(target) => {
                if target_id(target).is_none() {
                    violations.push(Violation::new(
                        codes::E_VARIABLE,
                        format!(
                            "target of variable `{}` does not address an element id: `{}`",
                            variable.id, target
                        ),
                    ));
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Algorithm, AlgorithmParameterChange, ModelSpec, UniformTimeCourse};

    #[test]
    fn kisao_id_shape() {
        assert!(is_kisao_id("KISAO_0000560"));
        assert!(!is_kisao_id("KISAO_560"));
        assert!(!is_kisao_id("kisao_0000560"));
        assert!(!is_kisao_id("KISAO_00005601"));
    }

    #[test]
    fn task_check_flags_malformed_ids_and_missing_source() {
        let task = Task {
            id: "t".to_string(),
            model: ModelSpec {
                id: "m".to_string(),
                source: "".into(),
                language: ModelLanguage::Sbml,
                changes: Vec::new(),
            },
            simulation: Simulation::UniformTimeCourse(UniformTimeCourse {
                algorithm: Algorithm {
                    kisao_id: "CVODE".to_string(),
                    changes: vec![AlgorithmParameterChange {
                        kisao_id: "rtol".to_string(),
                        new_value: "1e-6".to_string(),
                    }],
                },
                initial_time: 0.0,
                output_start_time: 0.0,
                output_end_time: 1.0,
                number_of_points: 10,
            }),
        };
        let violations = check_task(&task);
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.code == codes::E_TASK));
    }

    #[test]
    fn bounds_violations_are_each_reported() {
        let sim = Simulation::UniformTimeCourse(UniformTimeCourse {
            algorithm: Algorithm::new("KISAO_0000030"),
            initial_time: 10.0,
            output_start_time: 5.0,
            output_end_time: 0.0,
            number_of_points: 10,
        });
        let violations = check_time_course(&sim);
        assert_eq!(violations.len(), 2);

        let sim = Simulation::UniformTimeCourse(UniformTimeCourse {
            algorithm: Algorithm::new("KISAO_0000030"),
            initial_time: f64::NAN,
            output_start_time: 0.0,
            output_end_time: 1.0,
            number_of_points: 10,
        });
        // NaN fails the finite check; NaN comparisons do not trip the
        // ordering checks.
        assert_eq!(check_time_course(&sim).len(), 1);
    }

    #[test]
    fn variable_checks() {
        let variables = vec![
            Variable::symbol("time", SYMBOL_TIME),
            Variable::symbol("time", "urn:sedml:symbol:amount"),
            Variable::target("A", "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='A']"),
            Variable::target("bad", "/sbml:sbml/sbml:model"),
        ];
        let violations = check_variables(&variables);
        // duplicate id + unsupported symbol + target without id predicate
        assert_eq!(violations.len(), 3);
    }
}
