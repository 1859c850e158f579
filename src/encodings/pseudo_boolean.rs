use super::VariableIndex;
use crate::sat::{Assignment, Literal, SatSolver, Variable};
use pblib_rs::PB2CNF;
use std::collections::BTreeMap;

/// A thing associated with a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Weighted<T> {
    weight: usize,
    thing: T,
}

impl<T> Weighted<T> {
    /// Builds a new weighted thing.
    pub fn new(thing: T, weight: usize) -> Self {
        Self { weight, thing }
    }

    /// Returns a reference to the thing.
    pub fn thing(&self) -> &T {
        &self.thing
    }

    /// Returns the weight of the thing.
    pub fn weight(&self) -> usize {
        self.weight
    }
}

/// Computes the value of a weighted sum of literals under an assignment.
pub fn weighted_sum_value(terms: &[Weighted<Literal>], assignment: &Assignment) -> usize {
    terms
        .iter()
        .filter(|t| assignment.literal_value(t.thing))
        .map(|t| t.weight)
        .sum()
}

/// Rewrites a weighted sum of literals into a constant plus a sum in which each variable occurs at most once.
///
/// Terms on the same literal are merged, and complementary terms `a.l + b.~l` become `min(a,b) + |a-b|.l'`.
/// Null weights are removed.
pub(crate) fn normalize(terms: &[Weighted<Literal>]) -> (usize, Vec<Weighted<Literal>>) {
    let mut per_var: BTreeMap<Variable, (usize, usize)> = BTreeMap::new();
    for t in terms {
        let entry = per_var.entry(t.thing.var()).or_default();
        if t.thing.is_positive() {
            entry.0 += t.weight;
        } else {
            entry.1 += t.weight;
        }
    }
    let mut constant = 0;
    let mut normalized = Vec::with_capacity(per_var.len());
    for (var, (pos, neg)) in per_var {
        constant += usize::min(pos, neg);
        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => normalized.push(Weighted::new(var.literal(true), pos - neg)),
            std::cmp::Ordering::Less => normalized.push(Weighted::new(var.literal(false), neg - pos)),
            std::cmp::Ordering::Equal => {}
        }
    }
    (constant, normalized)
}

/// Encodes the constraint `sum(terms) >= bound` into a SAT solver.
///
/// If a guard is given, the constraint only applies when the guard literal is true.
/// Auxiliary variables are allocated through the variable index.
pub fn encode_at_least(
    solver: &mut dyn SatSolver,
    index: &mut VariableIndex,
    terms: &[Weighted<Literal>],
    bound: usize,
    guard: Option<Literal>,
) {
    let (constant, terms) = normalize(terms);
    if bound <= constant {
        return;
    }
    let bound = bound - constant;
    let total = terms.iter().map(|t| t.weight).sum::<usize>();
    if bound > total {
        encode_infeasible(solver, guard);
        return;
    }
    let pb2cnf = PB2CNF::default();
    let weights = terms.iter().map(|t| t.weight as i64).collect();
    let literals = terms
        .iter()
        .map(|t| isize::from(t.thing) as i32)
        .collect();
    let first_aux_var = 1 + index.n_vars() as i32;
    let encoding = pb2cnf.encode_geq(weights, literals, bound as i64, first_aux_var);
    index.reserve_anonymous((encoding.next_free_var_id() - first_aux_var) as usize);
    encoding.clauses().iter().for_each(|clause| {
        let mut cl = clause
            .iter()
            .map(|l| Literal::from(*l))
            .collect::<Vec<Literal>>();
        if let Some(g) = guard {
            cl.push(g.negate());
        }
        solver.add_clause(cl);
    });
}

/// Encodes the constraint `sum(terms) <= bound` into a SAT solver.
///
/// See [`encode_at_least`] for the meaning of the guard.
pub fn encode_at_most(
    solver: &mut dyn SatSolver,
    index: &mut VariableIndex,
    terms: &[Weighted<Literal>],
    bound: usize,
    guard: Option<Literal>,
) {
    let (constant, terms) = normalize(terms);
    if bound < constant {
        encode_infeasible(solver, guard);
        return;
    }
    let bound = bound - constant;
    let total = terms.iter().map(|t| t.weight).sum::<usize>();
    if bound >= total {
        return;
    }
    let negated = terms
        .iter()
        .map(|t| Weighted::new(t.thing.negate(), t.weight))
        .collect::<Vec<Weighted<Literal>>>();
    encode_at_least(solver, index, &negated, total - bound, guard)
}

fn encode_infeasible(solver: &mut dyn SatSolver, guard: Option<Literal>) {
    match guard {
        Some(g) => solver.add_clause(vec![g.negate()]),
        None => solver.add_clause(vec![]),
    }
}
