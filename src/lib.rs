//! Jaggr is a Judgment AGGRegation solver.
//!
//! A [`Scenario`](scenario::Scenario) gathers an agenda of propositional formulas, input and output constraints, and a profile of judgment sets.
//! Scenarios are built through a [`ScenarioBuilder`](scenario::ScenarioBuilder) which rejects every change that would make them inconsistent.
//! The outcomes selected by an aggregation [`Rule`](solvers::Rule) are then computed by an [`AggregationSolver`](solvers::AggregationSolver),
//! either by enumerating the admissible outcomes or by solving an optimization problem.
//!
//! ```
//! # use jaggr::formula::parse;
//! # use jaggr::scenario::ScenarioBuilder;
//! # use jaggr::solvers::{new_aggregation_solver, SolverStrategy};
//! let mut builder = ScenarioBuilder::new();
//! for v in ["p", "q"] {
//!     builder.add_variable(v).unwrap();
//! }
//! for f in ["p", "q", "p & q"] {
//!     builder.add_formula_to_agenda(&parse(f).unwrap()).unwrap();
//! }
//! builder.add_judgment_set(2, &[parse("p").unwrap()]).unwrap();
//! builder.add_judgment_set(1, &[parse("q").unwrap()]).unwrap();
//! let scenario = builder.build();
//! let solver = new_aggregation_solver(SolverStrategy::Optimization);
//! let outcomes = solver.evaluate_by_name(&scenario, "majority").unwrap();
//! assert_eq!(1, outcomes.len());
//! assert_eq!("{1: true, 2: false, 3: false}", outcomes[0].to_string());
//! ```

#![warn(missing_docs)]

pub mod encodings;

pub mod error;
pub use error::AggregationError;
pub use error::ViolatedInvariant;

pub mod formula;

pub mod sat;

pub mod scenario;

pub mod solvers;

pub mod utils;
