//! SAT solver interfaces and the SAT-based collaborators of the aggregation core.

mod cadical_solver;
pub use cadical_solver::CadicalSolver;

mod model_enumerator;
pub use model_enumerator::ModelEnumerator;

mod oracle;
pub use oracle::SatisfiabilityOracle;

mod sat_solver;
pub use sat_solver::Assignment;
pub use sat_solver::DefaultSatSolverFactory;
pub use sat_solver::Literal;
pub use sat_solver::SatSolver;
pub use sat_solver::SatSolverFactory;
pub use sat_solver::SolvingListener;
pub use sat_solver::SolvingResult;
pub use sat_solver::Variable;
