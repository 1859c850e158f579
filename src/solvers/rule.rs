use crate::error::AggregationError;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

/// The aggregation rules.
///
/// Each rule selects, among the admissible outcomes of a scenario, the ones that best represent the profile.
/// All tied outcomes are selected.
///
/// The string identifier of a rule is its lowercase name.
///
/// ```
/// # use jaggr::solvers::Rule;
/// assert_eq!(Rule::MaxHamming, Rule::try_from("maxhamming").unwrap());
/// assert_eq!("leximax", Rule::Leximax.to_string());
/// assert!(Rule::try_from("borda").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Rule {
    /// Maximizes the sum over the labels of the number of voters agreeing with the outcome.
    Kemeny,
    /// Maximizes lexicographically the sorted (descending) vector of the numbers of voters agreeing with the outcome on each label.
    Leximax,
    /// Maximizes the number of voters whose majority outcome is admissible.
    Young,
    /// Maximizes the number of strict majority judgments the outcome agrees with.
    Slater,
    /// Forces the strict majority judgments; ties are left free.
    Majority,
    /// Minimizes the maximal Hamming distance between the outcome and the judgment sets.
    MaxHamming,
}

impl TryFrom<&str> for Rule {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lowercase = value.to_ascii_lowercase();
        Rule::iter()
            .find(|r| r.as_ref() == lowercase)
            .ok_or_else(|| AggregationError::UnknownRule(value.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        assert_eq!(
            vec!["kemeny", "leximax", "young", "slater", "majority", "maxhamming"],
            Rule::iter().map(|r| r.to_string()).collect::<Vec<String>>()
        );
    }

    #[test]
    fn test_try_from() {
        for r in Rule::iter() {
            assert_eq!(r, Rule::try_from(r.as_ref()).unwrap());
        }
        assert_eq!(Rule::Kemeny, Rule::try_from("Kemeny").unwrap());
    }

    #[test]
    fn test_unknown_rule() {
        let err = Rule::try_from("borda").unwrap_err();
        assert_eq!(
            Some(&AggregationError::UnknownRule("borda".to_string())),
            err.downcast_ref::<AggregationError>()
        );
    }
}
