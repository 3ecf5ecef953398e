//! Algorithm resolution under a substitution policy.
//!
//! Resolution picks the algorithm actually run for a task. An exact registry
//! hit always wins, whatever the policy. Otherwise an ontology-aware
//! collaborator ([`SubstitutionAdvisor`]) is asked for the nearest supported
//! algorithm admissible under the policy.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExecError;
use crate::registry::{AlgorithmRegistry, AlgorithmSpec};

/// Tolerance for running a different-but-compatible algorithm when the
/// exact requested one is unsupported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionPolicy {
    /// Never substitute; only the exact requested algorithm is admissible.
    None,
    /// Substitute only within the requested algorithm's family.
    #[default]
    SameFamily,
    /// Any supported algorithm is admissible.
    Any,
}

impl std::fmt::Display for SubstitutionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::SameFamily => "same_family",
            Self::Any => "any",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SubstitutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "same_family" | "same-family" => Ok(Self::SameFamily),
            "any" => Ok(Self::Any),
            other => Err(format!("unknown substitution policy `{}`", other)),
        }
    }
}

/// Ontology-aware "nearest supported algorithm" search, supplied by the
/// simulator or an external KiSAO service.
pub trait SubstitutionAdvisor: Send + Sync {
    /// Rank `supported` (given in registry order) by ontological distance
    /// from `requested` and return the closest candidate admissible under
    /// `policy`, or `None`. Never called for exact matches or under
    /// [`SubstitutionPolicy::None`].
    fn nearest_supported(
        &self,
        requested: &str,
        supported: &[&str],
        policy: SubstitutionPolicy,
    ) -> Option<String>;
}

/// Advisor for simulators that ship no ontology table: never substitutes.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSubstitution;

impl SubstitutionAdvisor for NoSubstitution {
    fn nearest_supported(
        &self,
        _requested: &str,
        _supported: &[&str],
        _policy: SubstitutionPolicy,
    ) -> Option<String> {
        None
    }
}

/// Resolve the requested algorithm to the spec actually run.
///
/// Exact matches short-circuit the ontology search: distance-to-self is not
/// guaranteed to be defined, and exactness is the common case. An advisor
/// answer that is not in the registry is discarded with a warning. No
/// admissible candidate fails with [`ExecError::UnsupportedAlgorithm`],
/// whose payload enumerates the full catalog in registry order.
pub fn resolve_algorithm<'r, M>(
    requested: &str,
    registry: &'r AlgorithmRegistry<M>,
    advisor: &dyn SubstitutionAdvisor,
    policy: SubstitutionPolicy,
) -> Result<&'r AlgorithmSpec<M>, ExecError> {
    if let Some(spec) = registry.get(requested) {
        debug!(algorithm = requested, "requested algorithm is supported");
        return Ok(spec);
    }

    if policy != SubstitutionPolicy::None {
        let supported = registry.ids();
        if let Some(candidate) = advisor.nearest_supported(requested, &supported, policy) {
            match registry.get(&candidate) {
                Some(spec) => {
                    warn!(
                        requested,
                        substitute = %candidate,
                        policy = %policy,
                        "substituting nearest supported algorithm"
                    );
                    return Ok(spec);
                }
                None => {
                    warn!(
                        requested,
                        candidate = %candidate,
                        "advisor proposed an unregistered algorithm, ignoring"
                    );
                }
            }
        }
    }

    Err(ExecError::UnsupportedAlgorithm {
        requested: requested.to_string(),
        policy,
        supported: registry.catalog(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MethodArgs;
    use crate::results::RawResults;

    fn nop(_model: &(), _args: &MethodArgs) -> anyhow::Result<RawResults> {
        Ok(RawResults::default())
    }

    fn registry() -> AlgorithmRegistry<()> {
        AlgorithmRegistry::new(vec![
            AlgorithmSpec {
                kisao_id: "KISAO_0000030",
                name: "Euler forward method",
                method_name: "tests::nop",
                method: nop,
                parameters: Vec::new(),
            },
            AlgorithmSpec {
                kisao_id: "KISAO_0000032",
                name: "explicit fourth-order Runge-Kutta method",
                method_name: "tests::nop",
                method: nop,
                parameters: Vec::new(),
            },
        ])
    }

    /// Advisor that always proposes a fixed id, to prove it is not
    /// consulted on exact matches.
    struct Fixed(&'static str);

    impl SubstitutionAdvisor for Fixed {
        fn nearest_supported(
            &self,
            _requested: &str,
            _supported: &[&str],
            _policy: SubstitutionPolicy,
        ) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn exact_match_wins_under_every_policy() {
        let reg = registry();
        let advisor = Fixed("KISAO_0000032");
        for policy in [
            SubstitutionPolicy::None,
            SubstitutionPolicy::SameFamily,
            SubstitutionPolicy::Any,
        ] {
            for id in reg.ids() {
                let spec = resolve_algorithm(id, &reg, &advisor, policy).unwrap();
                assert_eq!(spec.kisao_id, id);
            }
        }
    }

    #[test]
    fn policy_none_never_substitutes() {
        let reg = registry();
        let err = resolve_algorithm(
            "KISAO_0000560",
            &reg,
            &Fixed("KISAO_0000030"),
            SubstitutionPolicy::None,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("KISAO_0000560"));
        assert!(message.contains("KISAO_0000030: Euler forward method"));
        assert!(message.contains("KISAO_0000032: explicit fourth-order Runge-Kutta method"));
    }

    #[test]
    fn advisor_substitute_is_used() {
        let reg = registry();
        let spec = resolve_algorithm(
            "KISAO_0000560",
            &reg,
            &Fixed("KISAO_0000032"),
            SubstitutionPolicy::SameFamily,
        )
        .unwrap();
        assert_eq!(spec.kisao_id, "KISAO_0000032");
    }

    #[test]
    fn unregistered_advisor_answer_is_discarded() {
        let reg = registry();
        let err = resolve_algorithm(
            "KISAO_0000560",
            &reg,
            &Fixed("KISAO_0000019"),
            SubstitutionPolicy::Any,
        )
        .unwrap_err();
        assert!(matches!(err, ExecError::UnsupportedAlgorithm { .. }));
    }

    #[test]
    fn policy_round_trips_through_str() {
        for policy in [
            SubstitutionPolicy::None,
            SubstitutionPolicy::SameFamily,
            SubstitutionPolicy::Any,
        ] {
            let parsed: SubstitutionPolicy = policy.to_string().parse().unwrap();
            assert_eq!(parsed, policy);
        }
        assert!("whatever".parse::<SubstitutionPolicy>().is_err());
    }
}
