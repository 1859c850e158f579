use std::{collections::BTreeSet, fmt::Display};

/// A propositional formula.
///
/// Formulas are immutable syntax trees.
/// Conjunctions and disjunctions are n-ary and hold at least two operands when built by the [parser](crate::formula::parse).
///
/// The [`Display`] implementation writes a text that the parser reads back into the same tree:
/// binary operators are always parenthesized.
///
/// ```
/// # use jaggr::formula::{parse, Formula};
/// let f = parse("a -> b | c").unwrap();
/// assert_eq!(
///     Formula::implies(
///         Formula::atom("a"),
///         Formula::or(vec![Formula::atom("b"), Formula::atom("c")])
///     ),
///     f
/// );
/// assert_eq!("(a -> (b | c))", f.to_string());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formula {
    /// A propositional variable.
    Atom(String),
    /// The negation of a formula.
    Not(Box<Formula>),
    /// The conjunction of a list of formulas.
    And(Vec<Formula>),
    /// The disjunction of a list of formulas.
    Or(Vec<Formula>),
    /// An implication, from its premise to its conclusion.
    Implies(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Builds an atom.
    pub fn atom<T>(name: T) -> Self
    where
        T: Into<String>,
    {
        Formula::Atom(name.into())
    }

    /// Builds the negation of a formula.
    #[allow(clippy::should_implement_trait)]
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    /// Builds a conjunction.
    pub fn and(operands: Vec<Formula>) -> Self {
        Formula::And(operands)
    }

    /// Builds a disjunction.
    pub fn or(operands: Vec<Formula>) -> Self {
        Formula::Or(operands)
    }

    /// Builds an implication.
    pub fn implies(premise: Formula, conclusion: Formula) -> Self {
        Formula::Implies(Box::new(premise), Box::new(conclusion))
    }

    /// Returns `true` iff this formula is an atom or the negation of an atom.
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Atom(_) => true,
            Formula::Not(f) => matches!(f.as_ref(), Formula::Atom(_)),
            _ => false,
        }
    }

    /// Returns the set of variables occurring in this formula.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match self {
            Formula::Atom(v) => {
                vars.insert(v.clone());
            }
            Formula::Not(f) => f.collect_variables(vars),
            Formula::And(operands) | Formula::Or(operands) => {
                operands.iter().for_each(|f| f.collect_variables(vars))
            }
            Formula::Implies(premise, conclusion) => {
                premise.collect_variables(vars);
                conclusion.collect_variables(vars);
            }
        }
    }

    /// Evaluates this formula under an assignment given as the set of true variables.
    pub fn evaluate(&self, true_vars: &BTreeSet<String>) -> bool {
        match self {
            Formula::Atom(v) => true_vars.contains(v),
            Formula::Not(f) => !f.evaluate(true_vars),
            Formula::And(operands) => operands.iter().all(|f| f.evaluate(true_vars)),
            Formula::Or(operands) => operands.iter().any(|f| f.evaluate(true_vars)),
            Formula::Implies(premise, conclusion) => {
                !premise.evaluate(true_vars) || conclusion.evaluate(true_vars)
            }
        }
    }
}

fn write_operands(
    f: &mut std::fmt::Formatter<'_>,
    operands: &[Formula],
    operator: &str,
) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, op) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", operator)?;
        }
        write!(f, "{}", op)?;
    }
    write!(f, ")")
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Atom(v) => write!(f, "{}", v),
            Formula::Not(inner) => write!(f, "~{}", inner),
            Formula::And(operands) => write_operands(f, operands, "&"),
            Formula::Or(operands) => write_operands(f, operands, "|"),
            Formula::Implies(premise, conclusion) => {
                write!(f, "({} -> {})", premise, conclusion)
            }
        }
    }
}
