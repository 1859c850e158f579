use crate::{
    formula::Formula,
    scenario::{label_of_variable, Agenda, JudgmentSet},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

/// A collective outcome: a truth value for each label of the agenda.
///
/// Outcomes are ordered and hashable by their label values, which allows to deduplicate them and to sort them deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Outcome(BTreeMap<usize, bool>);

impl Outcome {
    /// Builds an outcome from its label values.
    pub fn new(values: BTreeMap<usize, bool>) -> Self {
        Self(values)
    }

    /// Builds an outcome from a model projected onto label variables.
    ///
    /// Variables that are not label variables are ignored.
    pub(crate) fn from_projected_model(model: &BTreeMap<String, bool>) -> Self {
        Self(
            model
                .iter()
                .filter_map(|(name, value)| label_of_variable(name).map(|l| (l, *value)))
                .collect(),
        )
    }

    /// Returns the value of a label, if it is set by the outcome.
    pub fn value_of(&self, label: usize) -> Option<bool> {
        self.0.get(&label).copied()
    }

    /// Iterates over the pairs (label, value) of the outcome.
    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.0.iter().map(|(l, v)| (*l, *v))
    }

    /// Returns the labels accepted by this outcome.
    pub fn accepted_labels(&self) -> BTreeSet<usize> {
        self.iter().filter(|(_, v)| *v).map(|(l, _)| l).collect()
    }

    /// Returns the outcome as a mapping from agenda formulas to truth values.
    pub fn formula_values(&self, agenda: &Agenda) -> BTreeMap<Formula, bool> {
        self.iter()
            .filter_map(|(l, v)| agenda.get(l).map(|f| (f.clone(), v)))
            .collect()
    }

    /// Returns `true` iff the outcome gives each of the provided labels the provided value.
    pub fn agrees_with(&self, literals: &[(usize, bool)]) -> bool {
        literals.iter().all(|(l, v)| self.value_of(*l) == Some(*v))
    }

    /// Returns the number of labels on which the outcome and the judgment set disagree.
    pub fn hamming_distance(&self, judgment_set: &JudgmentSet) -> usize {
        self.iter()
            .filter(|(l, v)| judgment_set.accepts(*l) != *v)
            .count()
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self
            .iter()
            .map(|(l, v)| format!("{}: {}", l, v))
            .collect::<Vec<String>>();
        write!(f, "{{{}}}", values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(values: &[bool]) -> Outcome {
        Outcome::new(values.iter().enumerate().map(|(i, v)| (i + 1, *v)).collect())
    }

    #[test]
    fn test_from_projected_model() {
        let model = [("_l2", false), ("_l1", true), ("a", true)]
            .iter()
            .map(|(n, v)| (n.to_string(), *v))
            .collect::<BTreeMap<String, bool>>();
        assert_eq!(outcome(&[true, false]), Outcome::from_projected_model(&model));
    }

    #[test]
    fn test_display() {
        assert_eq!("{1: true, 2: false}", outcome(&[true, false]).to_string());
        assert_eq!("{}", outcome(&[]).to_string());
    }

    #[test]
    fn test_agrees_with() {
        let o = outcome(&[true, false, true]);
        assert!(o.agrees_with(&[(1, true), (2, false)]));
        assert!(!o.agrees_with(&[(1, true), (2, true)]));
        assert!(o.agrees_with(&[]));
        assert!(!o.agrees_with(&[(4, true)]));
    }

    #[test]
    fn test_accepted_labels() {
        assert_eq!(
            vec![1, 3],
            outcome(&[true, false, true])
                .accepted_labels()
                .into_iter()
                .collect::<Vec<usize>>()
        );
    }
}
