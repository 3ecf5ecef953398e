//! Kinetic network models.
//!
//! The reference simulator integrates mass-action reaction networks: a set
//! of species with initial amounts and reactions that proceed at a rate
//! constant times the product of their reactant amounts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sedrun_core::{ModelLanguage, ModelReadError, ModelReader};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub species: Vec<Species>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
    pub initial_amount: f64,
}

/// Mass-action reaction: `rate = rate_constant * Π reactant amounts`.
/// Species without reactions stay constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub rate_constant: f64,
    #[serde(default)]
    pub reactants: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

impl Model {
    /// Initial amounts, in species declaration order.
    pub fn initial_state(&self) -> Vec<f64> {
        self.species.iter().map(|s| s.initial_amount).collect()
    }

    fn species_index(&self, id: &str) -> Option<usize> {
        self.species.iter().position(|s| s.id == id)
    }

    /// Every reaction participant must be a declared species.
    pub fn check(&self) -> Result<(), String> {
        for reaction in &self.reactions {
            for id in reaction.reactants.iter().chain(&reaction.products) {
                if self.species_index(id).is_none() {
                    return Err(format!(
                        "reaction `{}` references unknown species `{}`",
                        reaction.id, id
                    ));
                }
            }
        }
        Ok(())
    }

    /// Mass-action derivatives of `amounts` into `dydt`.
    ///
    /// Assumes [`check`](Self::check) has passed; participants of a checked
    /// model always resolve.
    pub fn derivatives(&self, amounts: &[f64], dydt: &mut [f64]) {
        dydt.fill(0.0);
        for reaction in &self.reactions {
            let mut rate = reaction.rate_constant;
            for id in &reaction.reactants {
                if let Some(i) = self.species_index(id) {
                    rate *= amounts[i];
                }
            }
            for id in &reaction.reactants {
                if let Some(i) = self.species_index(id) {
                    dydt[i] -= rate;
                }
            }
            for id in &reaction.products {
                if let Some(i) = self.species_index(id) {
                    dydt[i] += rate;
                }
            }
        }
    }
}

/// Reads the simulator's native kinetic network documents (YAML).
///
/// The archive front-end resolves model sources (SBML) into this form and
/// applies any XML-level changes before execution reaches the core; the
/// reader itself does no XML work.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlModelReader;

impl ModelReader<Model> for YamlModelReader {
    fn read_model(&self, source: &Path, _language: ModelLanguage) -> Result<Model, ModelReadError> {
        let text = std::fs::read_to_string(source).map_err(|e| ModelReadError {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model: Model = serde_yaml::from_str(&text).map_err(|e| ModelReadError {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
        model.check().map_err(|reason| ModelReadError {
            path: source.to_path_buf(),
            reason,
        })?;

        debug!(
            path = %source.display(),
            species = model.species.len(),
            reactions = model.reactions.len(),
            "read model"
        );
        Ok(model)
    }
}
