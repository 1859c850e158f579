use crate::formula::Formula;
use std::collections::BTreeSet;

/// The position shared by a group of voters: the agenda formulas they accept.
///
/// The agenda formulas that are not accepted are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgmentSet {
    multiplicity: usize,
    accepted: BTreeSet<Formula>,
    accepted_labels: BTreeSet<usize>,
}

impl JudgmentSet {
    pub(crate) fn new(
        multiplicity: usize,
        accepted: BTreeSet<Formula>,
        accepted_labels: BTreeSet<usize>,
    ) -> Self {
        Self {
            multiplicity,
            accepted,
            accepted_labels,
        }
    }

    /// Returns the number of voters sharing this judgment set.
    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    /// Returns the accepted formulas.
    pub fn accepted(&self) -> &BTreeSet<Formula> {
        &self.accepted
    }

    /// Returns the labels of the accepted formulas.
    pub fn accepted_labels(&self) -> &BTreeSet<usize> {
        &self.accepted_labels
    }

    /// Returns `true` iff the formula of the given label is accepted.
    pub fn accepts(&self, label: usize) -> bool {
        self.accepted_labels.contains(&label)
    }
}
