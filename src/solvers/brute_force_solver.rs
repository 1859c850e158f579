use super::{
    rule_evaluator, specs::AggregationSolver, AdmissibleOutcomes, Outcome, OutcomeEnumerator,
    Rule,
};
use crate::{
    sat::{DefaultSatSolverFactory, SatSolverFactory},
    scenario::Scenario,
};
use anyhow::{Context, Result};
use log::info;

/// A solver that enumerates all the admissible outcomes before selecting the ones preferred by a rule.
///
/// # Example
///
/// ```
/// # use jaggr::formula::parse;
/// # use jaggr::scenario::ScenarioBuilder;
/// # use jaggr::solvers::{AggregationSolver, BruteForceSolver, Rule};
/// let mut builder = ScenarioBuilder::new();
/// builder.add_variable("x1").unwrap();
/// builder.add_variable("x2").unwrap();
/// builder.add_formula_to_agenda(&parse("x1").unwrap()).unwrap();
/// builder.add_formula_to_agenda(&parse("x2").unwrap()).unwrap();
/// builder.add_judgment_set(2, &[parse("x1").unwrap()]).unwrap();
/// builder.add_judgment_set(1, &[parse("x2").unwrap()]).unwrap();
/// let scenario = builder.build();
/// let outcomes = BruteForceSolver::new().evaluate(&scenario, Rule::Kemeny).unwrap();
/// assert_eq!(1, outcomes.len());
/// assert_eq!(Some(true), outcomes[0].value_of(1));
/// assert_eq!(Some(false), outcomes[0].value_of(2));
/// ```
pub struct BruteForceSolver {
    enumerator: OutcomeEnumerator,
}

impl Default for BruteForceSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BruteForceSolver {
    /// Builds a new brute-force solver.
    ///
    /// The underlying SAT solvers are the ones returned by the [`DefaultSatSolverFactory`].
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new brute-force solver.
    ///
    /// The SAT solvers to use are given through the solver factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self {
            enumerator: OutcomeEnumerator::new_with_sat_solver_factory(solver_factory),
        }
    }
}

impl AggregationSolver for BruteForceSolver {
    fn admissible_outcomes(&self, scenario: &Scenario) -> Result<AdmissibleOutcomes> {
        self.enumerator.admissible_outcomes(scenario)
    }

    fn evaluate(&self, scenario: &Scenario, rule: Rule) -> Result<Vec<Outcome>> {
        info!("evaluating rule {} by brute force", rule);
        let admissible = self
            .admissible_outcomes(scenario)?
            .collect::<Result<Vec<Outcome>>>()
            .context("while enumerating the admissible outcomes")?;
        info!("found {} admissible outcomes", admissible.len());
        let selected = rule_evaluator::evaluate(scenario, rule, &admissible);
        info!("rule {} selected {} outcomes", rule, selected.len());
        Ok(selected)
    }
}
