//! Objects used to encode formulas and pseudo-boolean constraints into SAT solvers.

mod pseudo_boolean;
pub use pseudo_boolean::encode_at_least;
pub use pseudo_boolean::encode_at_most;
pub use pseudo_boolean::weighted_sum_value;
pub use pseudo_boolean::Weighted;

mod variable_index;
pub use variable_index::VariableIndex;
