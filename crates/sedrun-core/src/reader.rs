//! Model reading collaborator interface.

use std::path::Path;

use crate::error::ModelReadError;
use crate::model::ModelLanguage;

/// Turns a model source (already resolved out of the archive, with any
/// XML-level changes applied) into the simulator's model handle `M`.
///
/// `Send + Sync` so an orchestrator may share one reader across parallel
/// task executions.
pub trait ModelReader<M>: Send + Sync {
    fn read_model(&self, source: &Path, language: ModelLanguage) -> Result<M, ModelReadError>;
}
