//! Declarative mapping from KiSAO algorithm identifiers to simulation
//! methods and their parameter schemas.
//!
//! The registry is an explicit enumerable table built once at process
//! initialization and read-only thereafter; there is no mutation API.
//! Insertion order is significant: it is the deterministic order used when
//! enumerating supported algorithms in error messages and when breaking ties
//! during substitution.
//!
//! `M` is the simulator's model handle type; the registry's methods and the
//! model reader agree on it statically.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::results::RawResults;
use crate::value::{ParameterValue, ValueType};

/// Signature of a simulation method: model handle plus the effective
/// argument mapping, producing raw result series.
pub type MethodFn<M> = fn(&M, &MethodArgs) -> anyhow::Result<RawResults>;

/// Schema of one algorithm parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    /// KiSAO term of the parameter, e.g. `KISAO_0000209`.
    pub kisao_id: &'static str,
    /// Human-readable name, e.g. "relative tolerance".
    pub name: &'static str,
    /// Argument name the method accepts this parameter under.
    pub arg: &'static str,
    pub value_type: ValueType,
    pub default: ParameterValue,
}

/// One registered algorithm: identifier, display name, implementation
/// handle, and declared parameter schema. Immutable once registered.
pub struct AlgorithmSpec<M> {
    /// KiSAO term of the algorithm, e.g. `KISAO_0000560`.
    pub kisao_id: &'static str,
    /// Human-readable name, e.g. "LSODA/LSODAR hybrid method".
    pub name: &'static str,
    /// Implementation identity recorded in task logs,
    /// e.g. `sedrun_sim::methods::lsoda`.
    pub method_name: &'static str,
    pub method: MethodFn<M>,
    /// Declaration order is the enumeration order in error messages.
    pub parameters: Vec<ParameterSpec>,
}

impl<M> AlgorithmSpec<M> {
    /// Look up a parameter schema by its KiSAO term.
    pub fn parameter(&self, kisao_id: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.kisao_id == kisao_id)
    }

    /// `(kisao_id, name)` pairs of the declared parameters, in declaration
    /// order. Used in `UnsupportedParameter` error payloads.
    pub fn parameter_catalog(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .map(|p| (p.kisao_id.to_string(), p.name.to_string()))
            .collect()
    }
}

impl<M> std::fmt::Debug for AlgorithmSpec<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmSpec")
            .field("kisao_id", &self.kisao_id)
            .field("name", &self.name)
            .field("method_name", &self.method_name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Insertion-ordered table of supported algorithms.
pub struct AlgorithmRegistry<M> {
    algorithms: Vec<AlgorithmSpec<M>>,
}

impl<M> AlgorithmRegistry<M> {
    /// Build the registry from a static table. Later entries with a
    /// duplicate KiSAO id are unreachable through `get`; registration
    /// tables are expected to be duplicate-free.
    pub fn new(algorithms: Vec<AlgorithmSpec<M>>) -> Self {
        Self { algorithms }
    }

    pub fn get(&self, kisao_id: &str) -> Option<&AlgorithmSpec<M>> {
        self.algorithms.iter().find(|a| a.kisao_id == kisao_id)
    }

    pub fn contains(&self, kisao_id: &str) -> bool {
        self.get(kisao_id).is_some()
    }

    /// Registered KiSAO ids in insertion order.
    pub fn ids(&self) -> Vec<&str> {
        self.algorithms.iter().map(|a| a.kisao_id).collect()
    }

    /// `(kisao_id, name)` pairs in insertion order. Used in
    /// `UnsupportedAlgorithm` error payloads.
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.algorithms
            .iter()
            .map(|a| (a.kisao_id.to_string(), a.name.to_string()))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlgorithmSpec<M>> {
        self.algorithms.iter()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

impl<M> std::fmt::Debug for AlgorithmRegistry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Effective argument mapping for one method invocation: declared parameter
/// names to typed values, in insertion order. Serializes as an ordered JSON
/// object for provenance logging.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MethodArgs {
    entries: Vec<(String, ParameterValue)>,
}

impl MethodArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an argument. Replaces an existing entry in place, so an override
    /// keeps its default's position.
    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParameterValue::as_f64)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParameterValue::as_i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MethodArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
                method_name: "tests::nop",
                method: nop,
                parameters: Vec::new(),
            },
        ])
    }

    #[test]
    fn lookup_and_order() {
        let reg = registry();
        assert!(reg.contains("KISAO_0000030"));
        assert!(reg.get("KISAO_0000099").is_none());
        assert_eq!(reg.ids(), vec!["KISAO_0000030", "KISAO_0000032"]);
    }

    #[test]
    fn catalog_preserves_insertion_order() {
        let catalog = registry().catalog();
        assert_eq!(catalog[0].0, "KISAO_0000030");
        assert_eq!(catalog[1].1, "explicit fourth-order Runge-Kutta method");
    }

    #[test]
    fn parameter_lookup() {
        let reg = registry();
        let spec = reg.get("KISAO_0000030").unwrap();
        assert_eq!(spec.parameter("KISAO_0000483").unwrap().arg, "step_size");
        assert!(spec.parameter("KISAO_0000209").is_none());
    }

    #[test]
    fn method_args_replace_keeps_position() {
        let mut args = MethodArgs::new();
        args.insert("rtol", ParameterValue::Float(1e-6));
        args.insert("atol", ParameterValue::Float(1e-12));
        args.insert("rtol", ParameterValue::Float(2e-6));

        let names: Vec<_> = args.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rtol", "atol"]);
        assert_eq!(args.get_f64("rtol"), Some(2e-6));
    }

    #[test]
    fn method_args_serialize_in_insertion_order() {
        let mut args = MethodArgs::new();
        args.insert("b", ParameterValue::Integer(2));
        args.insert("a", ParameterValue::Integer(1));
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, "{\"b\":2,\"a\":1}");
    }
}
