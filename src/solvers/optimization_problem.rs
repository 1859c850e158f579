use crate::{
    encodings::{encode_at_least, encode_at_most, weighted_sum_value, VariableIndex, Weighted},
    formula::{CnfFormula, CnfLiteral},
    sat::{Assignment, Literal, ModelEnumerator, SatSolver, SatSolverFactory, Variable},
};
use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeSet;

/// A pseudo-boolean constraint `sum(terms) >= bound`, optionally guarded by a literal.
///
/// When a guard is set, the constraint only applies to the models in which the guard holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoBooleanConstraint {
    terms: Vec<Weighted<CnfLiteral>>,
    bound: usize,
    guard: Option<CnfLiteral>,
}

impl PseudoBooleanConstraint {
    /// Builds the constraint `sum(terms) >= bound`.
    pub fn at_least(terms: Vec<Weighted<CnfLiteral>>, bound: usize) -> Self {
        Self {
            terms,
            bound,
            guard: None,
        }
    }

    /// Makes this constraint apply only when the guard literal holds.
    pub fn guarded_by(mut self, guard: CnfLiteral) -> Self {
        self.guard = Some(guard);
        self
    }
}

/// An objective to minimize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    /// A weighted sum of literals.
    Sum(Vec<Weighted<CnfLiteral>>),
    /// The maximum of several weighted sums of literals (zero if there is no sum).
    Max(Vec<Vec<Weighted<CnfLiteral>>>),
}

impl Objective {
    fn sums(&self) -> Vec<&[Weighted<CnfLiteral>]> {
        match self {
            Objective::Sum(s) => vec![s.as_slice()],
            Objective::Max(sums) => sums.iter().map(|s| s.as_slice()).collect(),
        }
    }
}

/// A declarative optimization problem.
///
/// It is made of hard clauses, pseudo-boolean constraints, a set of projection variables and a priority-ordered list of objectives.
/// The optimal models are the ones that satisfy the constraints and minimize lexicographically the objectives:
/// the first objective is minimized, then the second one among the models optimal for the first one, and so on.
///
/// # Example
///
/// ```
/// # use jaggr::encodings::Weighted;
/// # use jaggr::formula::{CnfClause, CnfFormula, CnfLiteral};
/// # use jaggr::sat::DefaultSatSolverFactory;
/// # use jaggr::solvers::{Objective, OptimizationProblem};
/// let hard = CnfFormula::new(vec![CnfClause::new(vec![
///     CnfLiteral::positive("a"),
///     CnfLiteral::positive("b"),
/// ])]);
/// let mut problem = OptimizationProblem::new(hard, ["a", "b"].iter().map(|s| s.to_string()).collect());
/// problem.add_objective(Objective::Sum(vec![
///     Weighted::new(CnfLiteral::positive("a"), 1),
///     Weighted::new(CnfLiteral::positive("b"), 2),
/// ]));
/// let models = problem
///     .optimal_models(&DefaultSatSolverFactory)
///     .unwrap()
///     .collect::<anyhow::Result<Vec<_>>>()
///     .unwrap();
/// assert_eq!(1, models.len());
/// assert!(models[0]["a"] && !models[0]["b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptimizationProblem {
    hard_clauses: CnfFormula,
    constraints: Vec<PseudoBooleanConstraint>,
    projection: BTreeSet<String>,
    objectives: Vec<Objective>,
}

impl OptimizationProblem {
    /// Builds a problem without pseudo-boolean constraints nor objectives.
    pub fn new(hard_clauses: CnfFormula, projection: BTreeSet<String>) -> Self {
        Self {
            hard_clauses,
            projection,
            ..Default::default()
        }
    }

    /// Adds hard clauses.
    pub fn add_hard_clauses(&mut self, clauses: CnfFormula) {
        self.hard_clauses.extend(clauses);
    }

    /// Adds a pseudo-boolean constraint.
    pub fn add_constraint(&mut self, constraint: PseudoBooleanConstraint) {
        self.constraints.push(constraint);
    }

    /// Adds an objective, with a lower priority than the objectives added before.
    pub fn add_objective(&mut self, objective: Objective) {
        self.objectives.push(objective);
    }

    /// Returns the objectives, from the highest priority to the lowest.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Computes the optimal models, projected onto the projection variables.
    ///
    /// The objectives are optimized one after the other by a linear search on their upper bound:
    /// each time a model is found, the next call requires a strictly better value, until the problem becomes unsatisfiable.
    /// The optimal value of an objective is then fixed before the next objective is considered.
    /// The returned enumerator lazily lists the projections of the optimal models;
    /// it is empty if the hard constraints are unsatisfiable.
    pub fn optimal_models(
        &self,
        solver_factory: &dyn SatSolverFactory,
    ) -> Result<ModelEnumerator> {
        let mut solver = solver_factory.new_solver();
        let mut index = VariableIndex::default();
        let projection = self
            .projection
            .iter()
            .map(|v| (v.clone(), index.get_or_insert(v)))
            .collect::<Vec<(String, Variable)>>();
        index.encode_cnf(&self.hard_clauses, solver.as_mut());
        for c in &self.constraints {
            let terms = solver_terms(&mut index, &c.terms);
            let guard = c.guard.as_ref().map(|g| index.literal(g));
            encode_at_least(solver.as_mut(), &mut index, &terms, c.bound, guard);
        }
        let mut model = match solver
            .solve()
            .into_model()
            .context("while looking for a first model")?
        {
            Some(m) => m,
            None => {
                debug!("the hard constraints of the optimization problem are unsatisfiable");
                return Ok(ModelEnumerator::new(solver, projection, vec![]));
            }
        };
        for (i, objective) in self.objectives.iter().enumerate() {
            let sums = objective
                .sums()
                .into_iter()
                .map(|s| solver_terms(&mut index, s))
                .collect::<Vec<Vec<Weighted<Literal>>>>();
            let mut best = objective_value(&sums, &model);
            debug!("objective #{}: first bound is {}", i, best);
            while best > 0 {
                let selector = index.new_anonymous().positive();
                encode_objective_bound(
                    solver.as_mut(),
                    &mut index,
                    &sums,
                    best - 1,
                    Some(selector),
                );
                let result = solver
                    .solve_under_assumptions(&[selector])
                    .into_model()
                    .with_context(|| format!("while optimizing objective #{}", i))?;
                solver.add_clause(vec![selector.negate()]);
                match result {
                    Some(m) => {
                        best = objective_value(&sums, &m);
                        model = m;
                        debug!("objective #{}: new bound is {}", i, best);
                    }
                    None => break,
                }
            }
            debug!("objective #{}: optimal value is {}", i, best);
            encode_objective_bound(solver.as_mut(), &mut index, &sums, best, None);
        }
        Ok(ModelEnumerator::new(solver, projection, vec![]))
    }
}

fn solver_terms(
    index: &mut VariableIndex,
    terms: &[Weighted<CnfLiteral>],
) -> Vec<Weighted<Literal>> {
    terms
        .iter()
        .map(|t| Weighted::new(index.literal(t.thing()), t.weight()))
        .collect()
}

fn objective_value(sums: &[Vec<Weighted<Literal>>], model: &Assignment) -> usize {
    sums.iter()
        .map(|s| weighted_sum_value(s, model))
        .max()
        .unwrap_or(0)
}

fn encode_objective_bound(
    solver: &mut dyn SatSolver,
    index: &mut VariableIndex,
    sums: &[Vec<Weighted<Literal>>],
    bound: usize,
    guard: Option<Literal>,
) {
    sums.iter()
        .for_each(|s| encode_at_most(solver, index, s, bound, guard));
}
