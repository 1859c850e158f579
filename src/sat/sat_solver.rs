use super::cadical_solver::CadicalSolver;
use anyhow::{anyhow, Result};
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(NonZeroUsize);

impl Variable {
    /// Returns the positive literal of this variable.
    pub fn positive(self) -> Literal {
        Literal::from(usize::from(self) as isize)
    }

    /// Returns the literal of this variable with the given polarity.
    pub fn literal(self, positive: bool) -> Literal {
        if positive {
            self.positive()
        } else {
            self.positive().negate()
        }
    }
}

impl From<usize> for Variable {
    fn from(v: usize) -> Self {
        Self(NonZeroUsize::try_from(v).unwrap())
    }
}

impl From<i32> for Variable {
    fn from(v: i32) -> Self {
        if v < 0 {
            panic!("cannot build a variable from a negative integer")
        }
        Self(NonZeroUsize::try_from(v as usize).unwrap())
    }
}

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is positive.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

impl From<isize> for Literal {
    fn from(l: isize) -> Self {
        Self(NonZeroIsize::try_from(l).unwrap())
    }
}

impl From<i32> for Literal {
    fn from(l: i32) -> Self {
        Self(NonZeroIsize::try_from(l as isize).unwrap())
    }
}

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers or literals.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    pub(crate) fn new(assignment: Vec<Option<bool>>) -> Self {
        Self(assignment)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// In case the variable is not assigned (or is unknown to the solver), [Option::None] is returned.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns the value of a literal, considering unassigned variables as false.
    pub fn literal_value(&self, l: Literal) -> bool {
        self.value_of(l.var()).unwrap_or(false) == l.is_positive()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver gave no answer.
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// An error is returned if the solver answered [SolvingResult::Unknown].
    pub fn into_model(self) -> Result<Option<Assignment>> {
        match self {
            SolvingResult::Satisfiable(assignment) => Ok(Some(assignment)),
            SolvingResult::Unsatisfiable => Ok(None),
            SolvingResult::Unknown => Err(anyhow!("the SAT solver returned \"Unknown\"")),
        }
    }
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    /// Solves the problem formed by the clauses added so far and the provided assumptions.
    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult;

    /// Returns the highest variable index known by the solver.
    fn n_vars(&self) -> usize;

    /// Registers a listener, notified at the beginning and at the end of each solving call.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);
}

/// A listener for the solving calls of a SAT solver.
pub trait SolvingListener {
    /// Called when a solving process starts.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when a solving process ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A factory building fresh SAT solvers.
pub trait SatSolverFactory {
    /// Returns a new, empty, SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// The factory for the default SAT solver (CaDiCaL).
///
/// Each solver it builds logs its calls at the `debug` level.
#[derive(Default, Debug, Clone, Copy)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = Box::<CadicalSolver>::default();
        solver.add_listener(Box::new(SatSolvingLogger));
        solver
    }
}

struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        log::debug!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars,
            n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        log::debug!("SAT solver ended with result {}", r);
    }
}
