//! Raw simulation output and requested-variable extraction.
//!
//! A simulation method returns [`RawResults`]: every series it produced,
//! keyed by `time` plus the model's element ids. The executor then pulls out
//! only the variables the task requested, keyed by variable id. An
//! unsatisfiable reference fails the whole task; no partial bundles with
//! missing keys are returned.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{Variable, VariableRef, SYMBOL_TIME};

/// Key under which methods record the output time grid.
pub const TIME_KEY: &str = "time";

lazy_static! {
    // `[@id='A']` or `[@id="A"]` predicates in XPath-like locators.
    static ref TARGET_ID_RE: Regex = Regex::new(r#"\[@id=["']([^"']+)["']\]"#).unwrap();
}

/// Results of one task execution, keyed by variable id. Each series has
/// `number_of_points + 1` entries. Owned by the caller after return.
pub type VariableResults = BTreeMap<String, Vec<f64>>;

/// All series produced by a simulation method, in production order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawResults {
    series: Vec<(String, Vec<f64>)>,
}

impl RawResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<f64>) {
        self.series.push((key.into(), values));
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Element id addressed by an XPath-like locator.
///
/// `/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='A']` → `A`.
/// The last id predicate wins when the locator carries several.
pub fn target_id(target: &str) -> Option<&str> {
    TARGET_ID_RE
        .captures_iter(target)
        .last()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Locate a requested variable's series in the raw results.
///
/// Symbols resolve to the time grid; targets resolve through their id
/// predicate. `None` means the reference is unsatisfiable against these
/// results.
pub fn extract_variable<'r>(raw: &'r RawResults, variable: &Variable) -> Option<&'r [f64]> {
    match &variable.reference {
        VariableRef::Symbol(symbol) if symbol == SYMBOL_TIME || symbol == TIME_KEY => {
            raw.get(TIME_KEY)
        }
        VariableRef::Symbol(_) => None,
        VariableRef::Target(target) => target_id(target).and_then(|id| raw.get(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawResults {
        let mut raw = RawResults::new();
        raw.insert(TIME_KEY, vec![0.0, 1.0, 2.0]);
        raw.insert("A", vec![1.0, 0.5, 0.25]);
        raw
    }

    #[test]
    fn target_id_single_and_double_quotes() {
        assert_eq!(
            target_id("/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='A']"),
            Some("A")
        );
        assert_eq!(
            target_id("/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id=\"C\"]"),
            Some("C")
        );
        assert_eq!(target_id("/sbml:sbml/sbml:model"), None);
    }

    #[test]
    fn target_id_last_predicate_wins() {
        let target = "/m:model[@id='mod']/m:species[@id='B']";
        assert_eq!(target_id(target), Some("B"));
    }

    #[test]
    fn extract_by_symbol() {
        let raw = raw();
        let time = Variable::symbol("t", SYMBOL_TIME);
        assert_eq!(extract_variable(&raw, &time), Some(&[0.0, 1.0, 2.0][..]));

        let unknown = Variable::symbol("x", "urn:sedml:symbol:amount");
        assert_eq!(extract_variable(&raw, &unknown), None);
    }

    #[test]
    fn extract_by_target() {
        let raw = raw();
        let var = Variable::target("A", "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='A']");
        assert_eq!(extract_variable(&raw, &var), Some(&[1.0, 0.5, 0.25][..]));

        let missing = Variable::target("Z", "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='Z']");
        assert_eq!(extract_variable(&raw, &missing), None);
    }
}
