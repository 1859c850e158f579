//! Outcomes, aggregation rules and the solvers computing the outcomes selected by the rules.

mod brute_force_solver;
pub use brute_force_solver::BruteForceSolver;

mod optimization_problem;
pub use optimization_problem::Objective;
pub use optimization_problem::OptimizationProblem;
pub use optimization_problem::PseudoBooleanConstraint;

mod optimization_solver;
pub use optimization_solver::OptimizationSolver;

mod outcome;
pub use outcome::Outcome;

mod outcome_enumerator;
pub use outcome_enumerator::AdmissibleOutcomes;
pub use outcome_enumerator::OutcomeEnumerator;

mod rule;
pub use rule::Rule;

mod rule_encodings;

mod rule_evaluator;
pub use rule_evaluator::evaluate;

mod specs;
pub use specs::new_aggregation_solver;
pub use specs::AggregationSolver;
pub use specs::SolverStrategy;
