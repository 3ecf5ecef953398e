//! Reference simulator for sedrun.
//!
//! Supplies the simulator-specific half of the execution contract: a
//! concrete model type with a file reader, built-in uniform time-course
//! integration methods, the declarative KiSAO method table that populates
//! the algorithm registry, and a family-based substitution advisor.
//!
//! ```no_run
//! use sedrun_core::ExecConfig;
//!
//! let runner = sedrun_sim::runner(ExecConfig::from_env());
//! // runner.execute_task(&task, &variables, None)?;
//! ```

pub mod advisor;
pub mod methods;
pub mod model;

use sedrun_core::{
    AlgorithmRegistry, AlgorithmSpec, Capabilities, ExecConfig, ModelLanguage, ParameterSpec,
    ParameterValue, SimulationKind, TaskRunner, ValueType,
};

use crate::advisor::KisaoFamilyAdvisor;
use crate::model::{Model, YamlModelReader};

/// The KiSAO method table: every algorithm this simulator supports, with
/// its parameter schema. Registry order is the enumeration order in error
/// messages and the tie-breaking order during substitution.
pub fn method_table() -> AlgorithmRegistry<Model> {
    AlgorithmRegistry::new(vec![
        AlgorithmSpec {
            kisao_id: "KISAO_0000560",
            name: "LSODA/LSODAR hybrid method",
            method_name: "sedrun_sim::methods::lsoda",
            method: methods::lsoda,
            parameters: vec![
                ParameterSpec {
                    kisao_id: "KISAO_0000209",
                    name: "relative tolerance",
                    arg: "rtol",
                    value_type: ValueType::Float,
                    default: ParameterValue::Float(1e-6),
                },
                ParameterSpec {
                    kisao_id: "KISAO_0000211",
                    name: "absolute tolerance",
                    arg: "atol",
                    value_type: ValueType::Float,
                    default: ParameterValue::Float(1e-12),
                },
                ParameterSpec {
                    kisao_id: "KISAO_0000415",
                    name: "maximum number of steps",
                    arg: "max_steps",
                    value_type: ValueType::Integer,
                    default: ParameterValue::Integer(20000),
                },
            ],
        },
        AlgorithmSpec {
            kisao_id: "KISAO_0000030",
            name: "Euler forward method",
            method_name: "sedrun_sim::methods::euler",
            method: methods::euler,
            parameters: vec![ParameterSpec {
                kisao_id: "KISAO_0000483",
                name: "step size",
                arg: "step_size",
                value_type: ValueType::Float,
                default: ParameterValue::Float(1e-3),
            }],
        },
        AlgorithmSpec {
            kisao_id: "KISAO_0000032",
            name: "explicit fourth-order Runge-Kutta method",
            method_name: "sedrun_sim::methods::rk4",
            method: methods::rk4,
            parameters: vec![ParameterSpec {
                kisao_id: "KISAO_0000483",
                name: "step size",
                arg: "step_size",
                value_type: ValueType::Float,
                default: ParameterValue::Float(1e-3),
            }],
        },
    ])
}

/// Declared support sets, consumed by the validator.
pub fn capabilities() -> Capabilities {
    Capabilities {
        languages: vec![ModelLanguage::Sbml],
        // No in-place model changes: the archive front-end applies changes
        // before the model reaches the simulator.
        change_kinds: Vec::new(),
        simulation_kinds: vec![SimulationKind::UniformTimeCourse],
    }
}

/// The assembled reference runner.
pub fn runner(config: ExecConfig) -> TaskRunner<Model> {
    TaskRunner::new(
        method_table(),
        Box::new(YamlModelReader),
        Box::new(KisaoFamilyAdvisor),
        capabilities(),
    )
    .with_config(config)
}
