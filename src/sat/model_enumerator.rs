use super::{Literal, SatSolver, SatSolverFactory, Variable};
use crate::{encodings::VariableIndex, formula::CnfFormula};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

/// A lazy enumerator of the models of a SAT problem, projected onto a set of named variables.
///
/// Each time a model is found, a blocking clause forbidding its projection is added to the solver.
/// Thus, two models that only differ on variables outside the projection are returned once.
/// The enumeration stops when the problem becomes unsatisfiable, or at the first solver failure.
///
/// # Example
///
/// ```
/// # use jaggr::formula::{CnfClause, CnfFormula, CnfLiteral};
/// # use jaggr::sat::{DefaultSatSolverFactory, ModelEnumerator};
/// # use std::collections::BTreeSet;
/// let cnf = CnfFormula::new(vec![CnfClause::new(vec![
///     CnfLiteral::positive("a"),
///     CnfLiteral::positive("b"),
/// ])]);
/// let vars = ["a", "b"].iter().map(|s| s.to_string()).collect::<BTreeSet<String>>();
/// let models = ModelEnumerator::from_cnf(&DefaultSatSolverFactory, &cnf, &vars)
///     .collect::<anyhow::Result<Vec<_>>>()
///     .unwrap();
/// assert_eq!(3, models.len());
/// ```
pub struct ModelEnumerator {
    solver: Box<dyn SatSolver>,
    projection: Vec<(String, Variable)>,
    assumptions: Vec<Literal>,
    exhausted: bool,
}

impl ModelEnumerator {
    /// Builds an enumerator from a solver already loaded with the problem.
    ///
    /// The projection gives the name of each variable of interest; the assumptions hold for every solving call.
    pub fn new(
        solver: Box<dyn SatSolver>,
        projection: Vec<(String, Variable)>,
        assumptions: Vec<Literal>,
    ) -> Self {
        Self {
            solver,
            projection,
            assumptions,
            exhausted: false,
        }
    }

    /// Builds an enumerator of the total assignments of the given variables that satisfy a CNF formula.
    ///
    /// Variables of the formula which are not in the given set are existentially quantified.
    pub fn from_cnf(
        solver_factory: &dyn SatSolverFactory,
        cnf: &CnfFormula,
        variables: &BTreeSet<String>,
    ) -> Self {
        let mut solver = solver_factory.new_solver();
        let mut index = VariableIndex::default();
        let projection = variables
            .iter()
            .map(|v| (v.clone(), index.get_or_insert(v)))
            .collect();
        index.encode_cnf(cnf, solver.as_mut());
        Self::new(solver, projection, vec![])
    }
}

impl Iterator for ModelEnumerator {
    type Item = Result<BTreeMap<String, bool>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let model = match self
            .solver
            .solve_under_assumptions(&self.assumptions)
            .into_model()
        {
            Ok(Some(m)) => m,
            Ok(None) => {
                self.exhausted = true;
                return None;
            }
            Err(e) => {
                self.exhausted = true;
                return Some(Err(e));
            }
        };
        let projected = self
            .projection
            .iter()
            .map(|(name, v)| (name.clone(), model.value_of(*v).unwrap_or(false)))
            .collect::<BTreeMap<String, bool>>();
        let blocking_clause = self
            .projection
            .iter()
            .map(|(name, v)| v.literal(!projected[name]))
            .collect::<Vec<Literal>>();
        if blocking_clause.is_empty() {
            self.exhausted = true;
        } else {
            self.solver.add_clause(blocking_clause);
        }
        Some(Ok(projected))
    }
}
