//! Propositional formulas: their syntax tree, their parser and their normal forms.

mod cnf;
pub use cnf::CnfClause;
pub use cnf::CnfConverter;
pub use cnf::CnfFormula;
pub use cnf::CnfLiteral;

mod ast;
pub use ast::Formula;

mod nnf;
pub use nnf::is_nnf;
pub use nnf::negate_nnf;
pub use nnf::to_nnf;

mod parser;
pub use parser::parse;
pub use parser::FormulaParser;
