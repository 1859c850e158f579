use crate::formula::{negate_nnf, Formula};

/// Returns the name of the propositional variable standing for an agenda label.
///
/// Label variables start with an underscore, so they never clash with the variables of parsed formulas.
pub fn label_variable(label: usize) -> String {
    format!("_l{}", label)
}

/// Returns the agenda label a variable stands for, if it is a label variable.
pub fn label_of_variable(name: &str) -> Option<usize> {
    name.strip_prefix("_l").and_then(|n| n.parse().ok())
}

/// An ordered list of formulas, each one identified by a label.
///
/// Labels are dense integers starting at 1, given in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agenda {
    formulas: Vec<Formula>,
}

impl Agenda {
    pub(crate) fn push(&mut self, formula: Formula) -> usize {
        self.formulas.push(formula);
        self.formulas.len()
    }

    /// Returns the number of formulas in the agenda.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Returns `true` iff the agenda has no formula.
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Returns the formula associated with a label.
    pub fn get(&self, label: usize) -> Option<&Formula> {
        if label == 0 {
            return None;
        }
        self.formulas.get(label - 1)
    }

    /// Returns the label of a formula, if it belongs to the agenda.
    pub fn label_of(&self, formula: &Formula) -> Option<usize> {
        self.formulas
            .iter()
            .position(|f| f == formula)
            .map(|i| i + 1)
    }

    /// Iterates over the labels of the agenda.
    pub fn labels(&self) -> impl Iterator<Item = usize> {
        1..=self.formulas.len()
    }

    /// Iterates over the pairs (label, formula) of the agenda.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Formula)> + '_ {
        self.formulas.iter().enumerate().map(|(i, f)| (i + 1, f))
    }

    /// Returns the constraints binding each label variable to its formula.
    ///
    /// For each label `l` with formula `f`, the implications `l -> f` and `f -> l` are returned, in negation normal form.
    /// The formulas of the agenda are expected to be in negation normal form.
    pub fn biconditionals(&self) -> Vec<Formula> {
        self.iter()
            .flat_map(|(label, f)| {
                let label_atom = Formula::atom(label_variable(label));
                [
                    Formula::or(vec![Formula::not(label_atom.clone()), f.clone()]),
                    Formula::or(vec![negate_nnf(f), label_atom]),
                ]
            })
            .collect()
    }
}
