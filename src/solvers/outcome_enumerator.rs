use super::Outcome;
use crate::{
    formula::{CnfConverter, CnfFormula},
    sat::{DefaultSatSolverFactory, ModelEnumerator, SatSolverFactory},
    scenario::{label_variable, Scenario},
};
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// Translates into CNF the constraints an admissible outcome must satisfy.
///
/// These are the output constraints of the scenario and the biconditionals binding the label variables to their formulas.
pub(crate) fn admissibility_cnf(scenario: &Scenario) -> Result<CnfFormula> {
    let mut converter = CnfConverter::default();
    let mut variables = scenario.all_variables();
    let mut cnf = CnfFormula::default();
    let biconditionals = scenario.agenda().biconditionals();
    for f in scenario.output_constraints().iter().chain(biconditionals.iter()) {
        let (f_cnf, updated_variables) = converter
            .to_cnf(f, &variables)
            .with_context(|| format!("while translating {} into CNF", f))?;
        cnf.extend(f_cnf);
        variables = updated_variables;
    }
    Ok(cnf)
}

/// Returns the names of the label variables of a scenario.
pub(crate) fn label_variables(scenario: &Scenario) -> BTreeSet<String> {
    scenario.agenda().labels().map(label_variable).collect()
}

/// A lazy sequence of admissible outcomes.
///
/// Outcomes are computed on demand, so taking a prefix of the sequence never forces a complete enumeration.
/// Each outcome is returned once; their order is unspecified.
pub struct AdmissibleOutcomes {
    models: ModelEnumerator,
}

impl AdmissibleOutcomes {
    pub(crate) fn new(models: ModelEnumerator) -> Self {
        Self { models }
    }
}

impl Iterator for AdmissibleOutcomes {
    type Item = Result<Outcome>;

    fn next(&mut self) -> Option<Self::Item> {
        self.models
            .next()
            .map(|r| r.map(|m| Outcome::from_projected_model(&m)))
    }
}

/// Enumerates the admissible outcomes of a scenario.
///
/// An outcome is admissible if it is the restriction to the agenda labels of a model of the output constraints and the label biconditionals.
///
/// # Example
///
/// ```
/// # use jaggr::formula::parse;
/// # use jaggr::scenario::ScenarioBuilder;
/// # use jaggr::solvers::OutcomeEnumerator;
/// let mut builder = ScenarioBuilder::new();
/// builder.add_variable("a").unwrap();
/// builder.add_variable("b").unwrap();
/// builder.add_formula_to_agenda(&parse("a").unwrap()).unwrap();
/// builder.add_formula_to_agenda(&parse("b").unwrap()).unwrap();
/// builder.add_output_constraint(&parse("a -> b").unwrap()).unwrap();
/// let scenario = builder.build();
/// let outcomes = OutcomeEnumerator::new()
///     .admissible_outcomes(&scenario)
///     .unwrap()
///     .collect::<anyhow::Result<Vec<_>>>()
///     .unwrap();
/// assert_eq!(3, outcomes.len());
/// ```
pub struct OutcomeEnumerator {
    solver_factory: Box<dyn SatSolverFactory>,
}

impl Default for OutcomeEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeEnumerator {
    /// Builds an enumerator relying on the default SAT solver.
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds an enumerator relying on the SAT solvers built by the given factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self { solver_factory }
    }

    /// Returns the lazy sequence of the admissible outcomes of a scenario.
    pub fn admissible_outcomes(&self, scenario: &Scenario) -> Result<AdmissibleOutcomes> {
        let cnf = admissibility_cnf(scenario)?;
        Ok(AdmissibleOutcomes::new(ModelEnumerator::from_cnf(
            self.solver_factory.as_ref(),
            &cnf,
            &label_variables(scenario),
        )))
    }
}
