use super::{is_nnf, Formula};
use crate::error::AggregationError;
use anyhow::Result;
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::Display,
};

/// A literal of a CNF formula: a variable and its polarity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CnfLiteral {
    variable: String,
    positive: bool,
}

impl CnfLiteral {
    /// Builds a positive literal.
    pub fn positive<T>(variable: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            variable: variable.into(),
            positive: true,
        }
    }

    /// Builds a negative literal.
    pub fn negative<T>(variable: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            variable: variable.into(),
            positive: false,
        }
    }

    /// Returns the variable of this literal.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns `true` iff this literal is positive.
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// Returns the opposite literal.
    pub fn negate(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            positive: !self.positive,
        }
    }

    fn to_formula(&self) -> Formula {
        if self.positive {
            Formula::atom(self.variable.clone())
        } else {
            Formula::not(Formula::atom(self.variable.clone()))
        }
    }
}

impl Display for CnfLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "~{}", self.variable)
        }
    }
}

/// A disjunction of literals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CnfClause(Vec<CnfLiteral>);

impl CnfClause {
    /// Builds a clause from its literals.
    pub fn new(literals: Vec<CnfLiteral>) -> Self {
        Self(literals)
    }

    /// Returns the literals of this clause.
    pub fn literals(&self) -> &[CnfLiteral] {
        &self.0
    }

    /// Evaluates this clause under an assignment given as the set of true variables.
    pub fn evaluate(&self, true_vars: &BTreeSet<String>) -> bool {
        self.0
            .iter()
            .any(|l| true_vars.contains(&l.variable) == l.positive)
    }
}

impl Display for CnfClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let literals = self
            .0
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<String>>();
        write!(f, "({})", literals.join(" | "))
    }
}

/// A conjunction of clauses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CnfFormula(Vec<CnfClause>);

impl CnfFormula {
    /// Builds a CNF formula from its clauses.
    pub fn new(clauses: Vec<CnfClause>) -> Self {
        Self(clauses)
    }

    /// Returns the clauses of this formula.
    pub fn clauses(&self) -> &[CnfClause] {
        &self.0
    }

    /// Returns the number of clauses of this formula.
    pub fn n_clauses(&self) -> usize {
        self.0.len()
    }

    /// Appends the clauses of another CNF formula to this one.
    pub fn extend(&mut self, other: CnfFormula) {
        self.0.extend(other.0)
    }

    /// Returns the set of variables occurring in this formula.
    pub fn variables(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .flat_map(|cl| cl.0.iter().map(|l| l.variable.clone()))
            .collect()
    }

    /// Evaluates this formula under an assignment given as the set of true variables.
    pub fn evaluate(&self, true_vars: &BTreeSet<String>) -> bool {
        self.0.iter().all(|cl| cl.evaluate(true_vars))
    }

    /// Returns this CNF formula as a [`Formula`].
    ///
    /// Unit clauses become literals and the other ones become disjunctions.
    pub fn to_formula(&self) -> Formula {
        let operands = self
            .0
            .iter()
            .map(|cl| {
                if cl.0.len() == 1 {
                    cl.0[0].to_formula()
                } else {
                    Formula::or(cl.0.iter().map(|l| l.to_formula()).collect())
                }
            })
            .collect::<Vec<Formula>>();
        Formula::and(operands)
    }
}

impl Display for CnfFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clauses = self
            .0
            .iter()
            .map(|cl| cl.to_string())
            .collect::<Vec<String>>();
        write!(f, "{}", clauses.join(" & "))
    }
}

const DEFAULT_NAMESPACE: &str = "aux";

/// A Tseitin-style converter from formulas in negation normal form to CNF formulas.
///
/// Each compound subformula that cannot be written directly as a clause gets an auxiliary variable,
/// which is defined as equivalent to the subformula.
/// Auxiliary variables are named `_<namespace><n>`, where `n` is a counter owned by the converter.
/// A converter memoizes the names it gives: converting the same subformula twice, in the same call or in later calls,
/// uses the same auxiliary variable.
/// Two converters with the same namespace name the subformulas of the same sequence of inputs the same way.
///
/// Since the parser never produces names starting with an underscore, auxiliary variables never clash with formula variables.
///
/// # Example
///
/// ```
/// # use jaggr::formula::{parse, to_nnf, CnfConverter};
/// # use std::collections::BTreeSet;
/// let f = to_nnf(&parse("a -> b & c | d").unwrap());
/// let vars = f.variables();
/// let mut converter = CnfConverter::default();
/// let (cnf, new_vars) = converter.to_cnf(&f, &vars).unwrap();
/// assert!(new_vars.contains("_aux0"));
/// assert!(cnf.clauses().iter().all(|cl| !cl.literals().is_empty()));
/// ```
#[derive(Debug, Clone)]
pub struct CnfConverter {
    namespace: String,
    next_aux: usize,
    names: HashMap<Formula, String>,
}

impl Default for CnfConverter {
    fn default() -> Self {
        Self::new_with_namespace(DEFAULT_NAMESPACE)
    }
}

impl CnfConverter {
    /// Builds a converter which names its auxiliary variables in the given namespace.
    pub fn new_with_namespace(namespace: &str) -> Self {
        Self {
            namespace: format!("_{}", namespace),
            next_aux: 0,
            names: HashMap::new(),
        }
    }

    /// Converts a formula in negation normal form into an equivalent CNF formula.
    ///
    /// The equivalence holds up to the auxiliary variables, which are functionally defined by the original variables.
    /// The returned set of variables is the union of the provided one and the auxiliary variables the CNF formula uses.
    ///
    /// In case the formula is not in negation normal form, an [`AggregationError::Conversion`] is returned.
    pub fn to_cnf(
        &mut self,
        formula: &Formula,
        variables: &BTreeSet<String>,
    ) -> Result<(CnfFormula, BTreeSet<String>)> {
        if !is_nnf(formula) {
            return Err(AggregationError::Conversion(formula.to_string()).into());
        }
        let mut call = ConversionCall {
            converter: self,
            defined: HashSet::new(),
            clauses: vec![],
        };
        call.encode_conjunct(formula);
        let mut updated_variables = variables.clone();
        updated_variables.extend(call.defined);
        Ok((CnfFormula(call.clauses), updated_variables))
    }

    fn aux_name(&mut self, formula: &Formula) -> (String, bool) {
        if let Some(name) = self.names.get(formula) {
            return (name.clone(), false);
        }
        let name = format!("{}{}", self.namespace, self.next_aux);
        self.next_aux += 1;
        self.names.insert(formula.clone(), name.clone());
        (name, true)
    }
}

struct ConversionCall<'a> {
    converter: &'a mut CnfConverter,
    defined: HashSet<String>,
    clauses: Vec<CnfClause>,
}

impl ConversionCall<'_> {
    fn encode_conjunct(&mut self, formula: &Formula) {
        match formula {
            Formula::And(operands) => operands.iter().for_each(|op| self.encode_conjunct(op)),
            _ => {
                let mut literals = vec![];
                self.collect_disjuncts(formula, &mut literals);
                self.clauses.push(CnfClause(literals));
            }
        }
    }

    fn collect_disjuncts(&mut self, formula: &Formula, literals: &mut Vec<CnfLiteral>) {
        match formula {
            Formula::Or(operands) => operands
                .iter()
                .for_each(|op| self.collect_disjuncts(op, literals)),
            _ => {
                let l = self.literal_of(formula);
                literals.push(l)
            }
        }
    }

    fn literal_of(&mut self, formula: &Formula) -> CnfLiteral {
        match formula {
            Formula::Atom(v) => CnfLiteral::positive(v.clone()),
            Formula::Not(inner) => match inner.as_ref() {
                Formula::Atom(v) => CnfLiteral::negative(v.clone()),
                _ => unreachable!("negation of a compound formula in NNF"),
            },
            Formula::And(operands) | Formula::Or(operands) => {
                let (name, _) = self.converter.aux_name(formula);
                if self.defined.insert(name.clone()) {
                    let operand_literals = operands
                        .iter()
                        .map(|op| self.literal_of(op))
                        .collect::<Vec<CnfLiteral>>();
                    let aux = CnfLiteral::positive(name.clone());
                    let is_conjunction = matches!(formula, Formula::And(_));
                    self.add_definition(aux, operand_literals, is_conjunction);
                }
                CnfLiteral::positive(name)
            }
            Formula::Implies(_, _) => unreachable!("implication in NNF"),
        }
    }

    fn add_definition(&mut self, aux: CnfLiteral, operands: Vec<CnfLiteral>, is_conjunction: bool) {
        let (aux, operands) = if is_conjunction {
            (aux, operands)
        } else {
            (
                aux.negate(),
                operands.iter().map(|l| l.negate()).collect(),
            )
        };
        let mut long_clause = vec![aux.clone()];
        for op in operands {
            long_clause.push(op.negate());
            self.clauses.push(CnfClause(vec![aux.negate(), op]));
        }
        self.clauses.push(CnfClause(long_clause));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{parse, to_nnf};

    fn nnf(s: &str) -> Formula {
        to_nnf(&parse(s).unwrap())
    }

    fn all_assignments(vars: &BTreeSet<String>) -> Vec<BTreeSet<String>> {
        let vars = vars.iter().collect::<Vec<&String>>();
        (0..(1 << vars.len()))
            .map(|mask: usize| {
                vars.iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, v)| v.to_string())
                    .collect()
            })
            .collect()
    }

    fn assert_equisatisfiable(text: &str) {
        let f = nnf(text);
        let vars = f.variables();
        let (cnf, all_vars) = CnfConverter::default().to_cnf(&f, &vars).unwrap();
        let aux_vars = all_vars
            .difference(&vars)
            .cloned()
            .collect::<BTreeSet<String>>();
        for assignment in all_assignments(&vars) {
            let extended = all_assignments(&aux_vars).into_iter().any(|aux| {
                let mut full = assignment.clone();
                full.extend(aux);
                cnf.evaluate(&full)
            });
            assert_eq!(f.evaluate(&assignment), extended, "{} / {:?}", text, assignment);
        }
    }

    #[test]
    fn test_clause_needs_no_aux() {
        let f = nnf("a | ~b | c");
        let (cnf, vars) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!("(a | ~b | c)", cnf.to_string());
        assert_eq!(f.variables(), vars);
    }

    #[test]
    fn test_conjunction_of_clauses_needs_no_aux() {
        let f = nnf("(a | b) & ~c & (~a | c)");
        let (cnf, _) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!("(a | b) & (~c) & (~a | c)", cnf.to_string());
    }

    #[test]
    fn test_aux_definition() {
        let f = nnf("a | (b & c)");
        let (cnf, vars) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!(
            "(~_aux0 | b) & (~_aux0 | c) & (_aux0 | ~b | ~c) & (a | _aux0)",
            cnf.to_string()
        );
        assert!(vars.contains("_aux0"));
        assert_eq!(4, vars.len());
    }

    #[test]
    fn test_equisatisfiable() {
        let texts = [
            "a",
            "~a",
            "a -> b & c | d",
            "~(a & b) | (c & ~d)",
            "(a -> b) & (b -> c) & ~(a -> c)",
            "(a | b) & c -> (a & c) | (b & ~c)",
        ];
        for t in texts {
            assert_equisatisfiable(t);
        }
    }

    #[test]
    fn test_names_are_memoized() {
        let f = nnf("(a & b) | c");
        let mut converter = CnfConverter::default();
        let (cnf1, vars1) = converter.to_cnf(&f, &f.variables()).unwrap();
        let (cnf2, vars2) = converter.to_cnf(&f, &f.variables()).unwrap();
        assert_eq!(cnf1, cnf2);
        assert_eq!(vars1, vars2);
        let g = nnf("d | (a & b) & e");
        let (cnf3, vars3) = converter.to_cnf(&g, &g.variables()).unwrap();
        assert!(vars3.contains("_aux0"));
        assert!(cnf3.variables().contains("_aux0"));
        assert!(cnf3
            .clauses()
            .iter()
            .any(|cl| cl.literals() == [CnfLiteral::negative("_aux0"), CnfLiteral::positive("a")]));
    }

    #[test]
    fn test_shared_subformula_defined_once() {
        let f = nnf("((a & b) | c) & ((a & b) | d)");
        let (cnf, vars) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!(5, vars.len());
        assert_eq!(5, cnf.n_clauses());
    }

    #[test]
    fn test_deterministic_across_converters() {
        let f = nnf("(a & b) | (c & ~d) | e");
        let (cnf1, _) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        let (cnf2, _) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!(cnf1, cnf2);
    }

    #[test]
    fn test_namespace() {
        let f = nnf("(a & b) | c");
        let (_, vars) = CnfConverter::new_with_namespace("ns")
            .to_cnf(&f, &f.variables())
            .unwrap();
        assert!(vars.contains("_ns0"));
    }

    #[test]
    fn test_not_nnf() {
        let f = parse("a -> b").unwrap();
        let err = CnfConverter::default()
            .to_cnf(&f, &f.variables())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AggregationError>(),
            Some(AggregationError::Conversion(_))
        ));
    }

    #[test]
    fn test_to_formula() {
        let f = nnf("(a | ~b) & c");
        let (cnf, _) = CnfConverter::default().to_cnf(&f, &f.variables()).unwrap();
        assert_eq!("((a | ~b) & c)", cnf.to_formula().to_string());
    }
}
