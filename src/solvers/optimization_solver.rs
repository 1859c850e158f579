use super::{
    rule_encodings::{encode_admissibility, encode_rule},
    specs::AggregationSolver,
    AdmissibleOutcomes, Outcome, Rule,
};
use crate::{
    sat::{DefaultSatSolverFactory, SatSolverFactory},
    scenario::Scenario,
};
use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeSet;

/// A solver that translates the rules into optimization problems.
///
/// The selected outcomes are computed as the optimal models of the problem, without listing all the admissible outcomes first.
/// It selects the same outcomes as the [`BruteForceSolver`](super::BruteForceSolver).
pub struct OptimizationSolver {
    solver_factory: Box<dyn SatSolverFactory>,
}

impl Default for OptimizationSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationSolver {
    /// Builds a new optimization solver.
    ///
    /// The underlying SAT solvers are the ones returned by the [`DefaultSatSolverFactory`].
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new optimization solver.
    ///
    /// The SAT solvers to use are given through the solver factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self { solver_factory }
    }
}

impl AggregationSolver for OptimizationSolver {
    fn admissible_outcomes(&self, scenario: &Scenario) -> Result<AdmissibleOutcomes> {
        let problem = encode_admissibility(scenario)?;
        Ok(AdmissibleOutcomes::new(
            problem.optimal_models(self.solver_factory.as_ref())?,
        ))
    }

    fn evaluate(&self, scenario: &Scenario, rule: Rule) -> Result<Vec<Outcome>> {
        info!("evaluating rule {} by optimization", rule);
        let problem = encode_rule(scenario, rule)
            .with_context(|| format!("while encoding rule {}", rule))?;
        info!(
            "the optimization problem for rule {} has {} objectives",
            rule,
            problem.objectives().len()
        );
        let selected = AdmissibleOutcomes::new(problem.optimal_models(self.solver_factory.as_ref())?)
            .collect::<Result<BTreeSet<Outcome>>>()
            .with_context(|| format!("while computing the optimal models for rule {}", rule))?;
        info!("rule {} selected {} outcomes", rule, selected.len());
        Ok(selected.into_iter().collect())
    }
}
