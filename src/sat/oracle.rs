use super::{DefaultSatSolverFactory, SatSolverFactory};
use crate::{
    encodings::VariableIndex,
    formula::{to_nnf, CnfConverter, Formula},
};
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// A satisfiability oracle for conjunctions of formulas.
///
/// Each call translates the formulas into CNF with a fresh [`CnfConverter`] and runs a new SAT solver.
pub struct SatisfiabilityOracle {
    solver_factory: Box<dyn SatSolverFactory>,
}

impl Default for SatisfiabilityOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl SatisfiabilityOracle {
    /// Builds an oracle relying on the default SAT solver.
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds an oracle relying on the SAT solvers built by the given factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self { solver_factory }
    }

    /// Checks whether the conjunction of the formulas is satisfiable.
    ///
    /// The formulas are put in negation normal form if they are not.
    /// An empty conjunction is satisfiable.
    pub fn is_satisfiable(
        &self,
        formulas: &[Formula],
        variables: &BTreeSet<String>,
    ) -> Result<bool> {
        let mut converter = CnfConverter::default();
        let mut index = VariableIndex::default();
        variables.iter().for_each(|v| {
            index.get_or_insert(v);
        });
        let mut solver = self.solver_factory.new_solver();
        for f in formulas {
            let (cnf, _) = converter.to_cnf(&to_nnf(f), variables)?;
            index.encode_cnf(&cnf, solver.as_mut());
        }
        let model = solver
            .solve()
            .into_model()
            .context("while checking the satisfiability of a set of formulas")?;
        Ok(model.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;

    fn check(texts: &[&str]) -> bool {
        let formulas = texts
            .iter()
            .map(|t| parse(t).unwrap())
            .collect::<Vec<Formula>>();
        let vars = formulas
            .iter()
            .flat_map(|f| f.variables())
            .collect::<BTreeSet<String>>();
        SatisfiabilityOracle::new()
            .is_satisfiable(&formulas, &vars)
            .unwrap()
    }

    #[test]
    fn test_sat() {
        assert!(check(&["a -> b", "a"]));
        assert!(check(&["~(a & b) | c", "a & b"]));
    }

    #[test]
    fn test_unsat() {
        assert!(!check(&["a -> b", "a", "~b"]));
        assert!(!check(&["(a | b) & (~a | b) & (a | ~b) & (~a | ~b)"]));
    }

    #[test]
    fn test_empty_conjunction() {
        assert!(check(&[]));
    }
}
