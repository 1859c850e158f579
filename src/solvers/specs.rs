use super::{AdmissibleOutcomes, BruteForceSolver, OptimizationSolver, Outcome, Rule};
use crate::scenario::Scenario;
use anyhow::Result;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

/// A trait for solvers able to aggregate the judgments of a scenario.
pub trait AggregationSolver {
    /// Returns the lazy sequence of the admissible outcomes of a scenario.
    fn admissible_outcomes(&self, scenario: &Scenario) -> Result<AdmissibleOutcomes>;

    /// Computes the outcomes selected by a rule.
    ///
    /// All tied outcomes are returned, sorted and without duplicates.
    /// The result is empty if the scenario has no admissible outcome.
    fn evaluate(&self, scenario: &Scenario, rule: Rule) -> Result<Vec<Outcome>>;

    /// Computes the outcomes selected by the rule with the given name.
    ///
    /// An [`UnknownRule`](crate::error::AggregationError::UnknownRule) error is returned before any computation if the name is not recognized.
    fn evaluate_by_name(&self, scenario: &Scenario, rule_name: &str) -> Result<Vec<Outcome>> {
        let rule = Rule::try_from(rule_name)?;
        self.evaluate(scenario, rule)
    }
}

/// The strategies used to evaluate the rules.
///
/// ```
/// # use jaggr::solvers::SolverStrategy;
/// assert_eq!(SolverStrategy::BruteForce, SolverStrategy::try_from("brute-force").unwrap());
/// assert_eq!("optimization", SolverStrategy::Optimization.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SolverStrategy {
    /// Enumerates the admissible outcomes and compares them.
    BruteForce,
    /// Builds an optimization problem which optimal models are the selected outcomes.
    Optimization,
}

impl TryFrom<&str> for SolverStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lowercase = value.to_ascii_lowercase();
        SolverStrategy::iter()
            .find(|s| s.as_ref() == lowercase)
            .ok_or_else(|| anyhow::anyhow!(r#"unknown solver strategy "{}""#, value))
    }
}

/// Builds a solver implementing the given strategy, relying on the default SAT solver.
pub fn new_aggregation_solver(strategy: SolverStrategy) -> Box<dyn AggregationSolver> {
    match strategy {
        SolverStrategy::BruteForce => Box::new(BruteForceSolver::new()),
        SolverStrategy::Optimization => Box::new(OptimizationSolver::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AggregationError, formula::parse, scenario::ScenarioBuilder};

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            vec!["brute-force", "optimization"],
            SolverStrategy::iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
        );
        assert_eq!(
            SolverStrategy::Optimization,
            SolverStrategy::try_from("Optimization").unwrap()
        );
        assert!(SolverStrategy::try_from("asp").is_err());
    }

    #[test]
    fn test_unknown_rule_name() {
        let mut builder = ScenarioBuilder::new();
        builder.add_variable("a").unwrap();
        builder.add_formula_to_agenda(&parse("a").unwrap()).unwrap();
        let scenario = builder.build();
        for strategy in SolverStrategy::iter() {
            let solver = new_aggregation_solver(strategy);
            let err = solver.evaluate_by_name(&scenario, "borda").unwrap_err();
            assert_eq!(
                Some(&AggregationError::UnknownRule("borda".to_string())),
                err.downcast_ref::<AggregationError>()
            );
            assert_eq!(2, solver.evaluate_by_name(&scenario, "kemeny").unwrap().len());
        }
    }
}
