use super::Formula;

/// Translates a formula into an equivalent formula in negation normal form.
///
/// Implications `a -> b` become `~a | b`, negations are pushed down to the atoms using De Morgan's laws, and double negations vanish.
/// The result contains no implication, and negations only apply to atoms.
///
/// This function is idempotent: a formula in negation normal form is returned unchanged.
///
/// ```
/// # use jaggr::formula::{parse, to_nnf};
/// let f = parse("~(a -> ~~b & c)").unwrap();
/// assert_eq!("(a & (~b | ~c))", to_nnf(&f).to_string());
/// ```
pub fn to_nnf(formula: &Formula) -> Formula {
    match formula {
        Formula::Atom(_) => formula.clone(),
        Formula::Not(inner) => negate_nnf(inner),
        Formula::And(operands) => Formula::And(operands.iter().map(to_nnf).collect()),
        Formula::Or(operands) => Formula::Or(operands.iter().map(to_nnf).collect()),
        Formula::Implies(premise, conclusion) => {
            Formula::Or(vec![negate_nnf(premise), to_nnf(conclusion)])
        }
    }
}

/// Returns the negation normal form of the negation of a formula.
pub fn negate_nnf(formula: &Formula) -> Formula {
    match formula {
        Formula::Atom(_) => Formula::not(formula.clone()),
        Formula::Not(inner) => to_nnf(inner),
        Formula::And(operands) => Formula::Or(operands.iter().map(negate_nnf).collect()),
        Formula::Or(operands) => Formula::And(operands.iter().map(negate_nnf).collect()),
        Formula::Implies(premise, conclusion) => {
            Formula::And(vec![to_nnf(premise), negate_nnf(conclusion)])
        }
    }
}

/// Returns `true` iff the formula is in negation normal form.
pub fn is_nnf(formula: &Formula) -> bool {
    match formula {
        Formula::Atom(_) => true,
        Formula::Not(inner) => matches!(inner.as_ref(), Formula::Atom(_)),
        Formula::And(operands) | Formula::Or(operands) => operands.iter().all(is_nnf),
        Formula::Implies(_, _) => false,
    }
}
