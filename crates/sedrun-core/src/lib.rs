//! Execution core for SED-ML simulation tasks.
//!
//! A simulator embeds this crate to execute the tasks an archive
//! orchestrator hands it, one at a time: resolve the requested KiSAO
//! algorithm against a declarative registry (substituting a nearby supported
//! algorithm when the configured policy allows), validate and coerce the
//! task's textual parameter overrides against the algorithm's declared
//! schema, invoke the simulation method, extract exactly the requested
//! output variables, and return a `(VariableResults, TaskLog)` pair.
//!
//! # Architecture
//!
//! - [`registry`] — the enumerable table of supported algorithms: KiSAO id,
//!   display name, method handle, parameter schema.
//! - [`value`] — typed parameter values and coercion from raw overrides.
//! - [`resolve`] — substitution policy and algorithm resolution, with an
//!   ontology-aware [`SubstitutionAdvisor`] collaborator.
//! - [`validate`] — aggregating pre-execution checks against the
//!   simulator's declared [`model::Capabilities`].
//! - [`engine`] — [`TaskRunner`], the one-task execution sequence.
//!
//! Archive unpacking, SED-ML parsing, and report/plot writing are the
//! orchestrator's job; the core consumes a [`ModelReader`] and a
//! [`SubstitutionAdvisor`] and exposes [`TaskRunner::execute_task`].

pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod model;
pub mod reader;
pub mod registry;
pub mod resolve;
pub mod results;
pub mod validate;
pub mod value;

pub use config::ExecConfig;
pub use engine::TaskRunner;
pub use error::{ExecError, ModelReadError, ParameterTypeError};
pub use log::{SimulatorDetails, TaskLog};
pub use model::{
    Algorithm, AlgorithmParameterChange, Capabilities, ChangeKind, ModelChange, ModelLanguage,
    ModelSpec, OneStep, Simulation, SimulationKind, SteadyState, Task, UniformTimeCourse,
    Variable, VariableRef, SYMBOL_TIME,
};
pub use reader::ModelReader;
pub use registry::{AlgorithmRegistry, AlgorithmSpec, MethodArgs, MethodFn, ParameterSpec};
pub use resolve::{resolve_algorithm, NoSubstitution, SubstitutionAdvisor, SubstitutionPolicy};
pub use results::{extract_variable, target_id, RawResults, VariableResults, TIME_KEY};
pub use value::{coerce, ParameterValue, ValueType};
