//! The errors raised by the aggregation core.
//!
//! Fallible functions of this crate return [`anyhow::Result`].
//! When the failure comes from the core itself (and not from a SAT solver), the root cause is an [`AggregationError`],
//! which can be recovered with [`anyhow::Error::downcast_ref`].

use std::fmt::Display;
use thiserror::Error;

/// The kinds of errors the aggregation core can raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// A formula text is malformed.
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// the byte offset at which the error was detected
        position: usize,
        /// a description of the error
        message: String,
    },
    /// A formula given to the CNF converter is not in negation normal form.
    #[error("cannot convert {0} to CNF: formula is not in negation normal form")]
    Conversion(String),
    /// A scenario mutation would break one of its invariants.
    #[error("inconsistent scenario: {invariant} ({detail})")]
    Consistency {
        /// the invariant that would be violated
        invariant: ViolatedInvariant,
        /// the formula or judgment set involved
        detail: String,
    },
    /// The name of an aggregation rule is not recognized.
    #[error(r#""{0}" is not a recognized aggregation rule"#)]
    UnknownRule(String),
}

impl AggregationError {
    pub(crate) fn syntax<T>(position: usize, message: T) -> Self
    where
        T: Into<String>,
    {
        AggregationError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn consistency<T>(invariant: ViolatedInvariant, detail: T) -> Self
    where
        T: Into<String>,
    {
        AggregationError::Consistency {
            invariant,
            detail: detail.into(),
        }
    }

    /// Returns the violated invariant if this error is a consistency error.
    pub fn violated_invariant(&self) -> Option<&ViolatedInvariant> {
        match self {
            AggregationError::Consistency { invariant, .. } => Some(invariant),
            _ => None,
        }
    }
}

/// The scenario invariants checked when a scenario is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolatedInvariant {
    /// A formula refers to a variable the scenario does not declare.
    UndeclaredVariable(String),
    /// A formula is added twice to the agenda.
    DuplicateAgendaFormula,
    /// A judgment set accepts a formula which is not in the agenda.
    UnknownAgendaFormula,
    /// A judgment set is given a null multiplicity.
    NullMultiplicity,
    /// The input constraints and the label definitions are unsatisfiable.
    InputConstraints,
    /// The output constraints and the label definitions are unsatisfiable.
    OutputConstraints,
    /// A judgment set (given by its index in the profile) contradicts the input constraints.
    JudgmentSet(usize),
}

impl Display for ViolatedInvariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolatedInvariant::UndeclaredVariable(v) => write!(f, "undeclared variable {}", v),
            ViolatedInvariant::DuplicateAgendaFormula => write!(f, "duplicate agenda formula"),
            ViolatedInvariant::UnknownAgendaFormula => write!(f, "formula not in agenda"),
            ViolatedInvariant::NullMultiplicity => write!(f, "null multiplicity"),
            ViolatedInvariant::InputConstraints => write!(f, "unsatisfiable input constraints"),
            ViolatedInvariant::OutputConstraints => write!(f, "unsatisfiable output constraints"),
            ViolatedInvariant::JudgmentSet(i) => {
                write!(f, "judgment set #{} violates the input constraints", i)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_from_anyhow() {
        let err = anyhow::Error::from(AggregationError::UnknownRule("borda".to_string()))
            .context("while selecting the rule");
        assert_eq!(
            Some(&AggregationError::UnknownRule("borda".to_string())),
            err.downcast_ref::<AggregationError>()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            r#""borda" is not a recognized aggregation rule"#,
            AggregationError::UnknownRule("borda".to_string()).to_string()
        );
        assert_eq!(
            "inconsistent scenario: judgment set #2 violates the input constraints (x1)",
            AggregationError::consistency(ViolatedInvariant::JudgmentSet(2), "x1").to_string()
        );
    }

    #[test]
    fn test_violated_invariant() {
        assert_eq!(
            Some(&ViolatedInvariant::OutputConstraints),
            AggregationError::consistency(ViolatedInvariant::OutputConstraints, "")
                .violated_invariant()
        );
        assert!(AggregationError::syntax(0, "foo")
            .violated_invariant()
            .is_none());
    }
}
