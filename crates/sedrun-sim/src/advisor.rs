//! KiSAO-family substitution advice.
//!
//! An offline stand-in for a full KiSAO ontology service: algorithm terms
//! are grouped into families, and the nearest supported algorithm is the
//! first supported id (in registry order) within the requested term's
//! family. Deterministic by construction.

use sedrun_core::{SubstitutionAdvisor, SubstitutionPolicy};

/// Deterministic-rate ODE integration methods.
const ODE_FAMILY: &[&str] = &[
    "KISAO_0000019", // CVODE
    "KISAO_0000030", // Euler forward method
    "KISAO_0000032", // explicit fourth-order Runge-Kutta method
    "KISAO_0000086", // Fehlberg method
    "KISAO_0000087", // Dormand-Prince method
    "KISAO_0000088", // LSODA
    "KISAO_0000560", // LSODA/LSODAR hybrid method
];

/// Stochastic simulation algorithms. None are registered; the family exists
/// so `same_family` requests for them fail instead of landing on an ODE
/// integrator.
const SSA_FAMILY: &[&str] = &[
    "KISAO_0000027", // Gibson-Bruck next reaction method
    "KISAO_0000029", // Gillespie direct method
    "KISAO_0000038", // sorting stochastic simulation algorithm
];

#[derive(Clone, Copy, Debug, Default)]
pub struct KisaoFamilyAdvisor;

impl KisaoFamilyAdvisor {
    fn family(id: &str) -> Option<&'static [&'static str]> {
        [ODE_FAMILY, SSA_FAMILY]
            .into_iter()
            .find(|family| family.contains(&id))
    }
}

impl SubstitutionAdvisor for KisaoFamilyAdvisor {
    fn nearest_supported(
        &self,
        requested: &str,
        supported: &[&str],
        policy: SubstitutionPolicy,
    ) -> Option<String> {
        match policy {
            SubstitutionPolicy::None => None,
            SubstitutionPolicy::SameFamily => {
                let family = Self::family(requested)?;
                supported
                    .iter()
                    .find(|id| family.contains(id))
                    .map(|id| id.to_string())
            }
            SubstitutionPolicy::Any => {
                if let Some(family) = Self::family(requested) {
                    if let Some(id) = supported.iter().find(|id| family.contains(id)) {
                        return Some(id.to_string());
                    }
                }
                supported.first().map(|id| id.to_string())
            }
        }
    }
}
