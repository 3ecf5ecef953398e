//! One-task execution.
//!
//! [`TaskRunner::execute_task`] drives a task through validation, algorithm
//! resolution, parameter coercion, method invocation, variable extraction,
//! and provenance logging as a strict synchronous sequence with no internal
//! suspension points. Nothing is retried: every failure is terminal for the
//! task and surfaced with a typed [`ExecError`]; the archive orchestrator
//! decides whether to continue with the remaining tasks.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ExecConfig;
use crate::error::ExecError;
use crate::log::{SimulatorDetails, TaskLog};
use crate::model::{Capabilities, Simulation, SimulationKind, Task, Variable};
use crate::reader::ModelReader;
use crate::registry::{AlgorithmRegistry, MethodArgs};
use crate::resolve::{resolve_algorithm, SubstitutionAdvisor};
use crate::results::{extract_variable, VariableResults};
use crate::validate::{self, checks};
use crate::value::{coerce, ParameterValue};

/// Executes SED-ML tasks against one simulator: its algorithm registry, its
/// model reader, its substitution advisor, and its declared capabilities.
///
/// The runner holds no per-task state; one instance can serve an entire
/// archive, including from parallel orchestrators (the registry is
/// read-only and the collaborators are `Send + Sync`).
pub struct TaskRunner<M> {
    pub registry: AlgorithmRegistry<M>,
    pub reader: Box<dyn ModelReader<M>>,
    pub advisor: Box<dyn SubstitutionAdvisor>,
    pub capabilities: Capabilities,
    pub config: ExecConfig,
}

impl<M> TaskRunner<M> {
    pub fn new(
        registry: AlgorithmRegistry<M>,
        reader: Box<dyn ModelReader<M>>,
        advisor: Box<dyn SubstitutionAdvisor>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            registry,
            reader,
            advisor,
            capabilities,
            config: ExecConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    /// Execute one task and record the requested variables.
    ///
    /// Returns the results keyed by variable id (each series has
    /// `number_of_points + 1` entries) together with the task log. A
    /// caller-provided `log` is filled in place when logging is enabled;
    /// otherwise a fresh log is constructed. Idempotent given the same
    /// task and model state; writes nothing to disk.
    pub fn execute_task(
        &self,
        task: &Task,
        variables: &[Variable],
        log: Option<TaskLog>,
    ) -> Result<(VariableResults, TaskLog), ExecError> {
        let started = Instant::now();
        let mut log = log.unwrap_or_default();

        // Validate: aggregate every violation, then raise.
        if self.config.validate_tasks {
            let violations = validate::validate_task(task, variables, &self.capabilities);
            if !violations.is_empty() {
                return Err(ExecError::TaskValidation {
                    task_id: task.id.clone(),
                    violations,
                });
            }
        } else {
            debug!(task = %task.id, "task validation disabled, trusting upstream validation");
        }

        // Only uniform time courses are executable, whatever the declared
        // capabilities say.
        let sim = match &task.simulation {
            Simulation::UniformTimeCourse(sim) => sim,
            _ => {
                return Err(ExecError::TaskValidation {
                    task_id: task.id.clone(),
                    violations: checks::check_simulation_kind(
                        &task.simulation,
                        &[SimulationKind::UniformTimeCourse],
                    ),
                });
            }
        };

        // Resolve the requested algorithm, substituting under the policy.
        let requested = sim.algorithm.kisao_id.as_str();
        let spec = resolve_algorithm(
            requested,
            &self.registry,
            self.advisor.as_ref(),
            self.config.substitution_policy,
        )?;
        let substituted = spec.kisao_id != requested;

        // Build the argument mapping: declared defaults first, in
        // declaration order.
        let mut args = MethodArgs::new();
        for parameter in &spec.parameters {
            args.insert(parameter.arg, parameter.default.clone());
        }

        if substituted {
            // Overrides are tuned for the requested algorithm; they do not
            // transfer to a substitute.
            if !sim.algorithm.changes.is_empty() {
                warn!(
                    requested,
                    substitute = spec.kisao_id,
                    dropped = sim.algorithm.changes.len(),
                    "dropping parameter overrides after algorithm substitution"
                );
            }
        } else {
            for change in &sim.algorithm.changes {
                let parameter = spec.parameter(&change.kisao_id).ok_or_else(|| {
                    ExecError::UnsupportedParameter {
                        algorithm: spec.kisao_id.to_string(),
                        parameter: change.kisao_id.clone(),
                        supported: spec.parameter_catalog(),
                    }
                })?;
                let value = coerce(&change.new_value, parameter.value_type)?;
                args.insert(parameter.arg, value);
            }
        }

        // Time-course arguments are structural to every supported
        // simulation type and are never subject to override-by-identifier.
        args.insert("initial_time", ParameterValue::Float(sim.initial_time));
        args.insert(
            "output_start_time",
            ParameterValue::Float(sim.output_start_time),
        );
        args.insert(
            "output_end_time",
            ParameterValue::Float(sim.output_end_time),
        );
        args.insert(
            "number_of_points",
            ParameterValue::Integer(sim.number_of_points as i64),
        );

        // Invoke. Method failures propagate unmodified; execution failures
        // are the simulation method's own problem to classify.
        let model = self
            .reader
            .read_model(&task.model.source, task.model.language)?;
        let raw = (spec.method)(&model, &args)?;

        // Extract exactly the requested variables; any miss fails the task.
        let mut results = VariableResults::new();
        for variable in variables {
            let series = extract_variable(&raw, variable).ok_or_else(|| {
                ExecError::VariableExtraction {
                    variable_id: variable.id.clone(),
                }
            })?;
            results.insert(variable.id.clone(), series.to_vec());
        }

        if self.config.collect_log {
            log.algorithm = Some(spec.kisao_id.to_string());
            log.simulator_details = Some(SimulatorDetails {
                method: spec.method_name.to_string(),
                arguments: args,
            });
        }

        info!(
            task = %task.id,
            algorithm = spec.kisao_id,
            substituted,
            variables = results.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "task executed"
        );
        Ok((results, log))
    }
}
