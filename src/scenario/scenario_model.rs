use super::{label_variable, Agenda, JudgmentSet};
use crate::{
    error::{AggregationError, ViolatedInvariant},
    formula::{parse, to_nnf, Formula},
    sat::{SatSolverFactory, SatisfiabilityOracle},
};
use anyhow::{Context, Result};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// A judgment aggregation problem.
///
/// A scenario is made of a set of variables, an agenda, input constraints (that hold for each voter),
/// output constraints (that hold for the collective outcome) and a profile, which is a list of judgment sets.
/// All the formulas it holds are in negation normal form.
///
/// Scenarios are built by a [`ScenarioBuilder`], which checks their invariants, and are immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    variables: BTreeSet<String>,
    agenda: Agenda,
    input_constraints: Vec<Formula>,
    output_constraints: Vec<Formula>,
    profile: Vec<JudgmentSet>,
}

impl Scenario {
    /// Returns the variables declared by the scenario.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    /// Returns the declared variables and the label variables of the agenda.
    pub fn all_variables(&self) -> BTreeSet<String> {
        let mut all = self.variables.clone();
        all.extend(self.agenda.labels().map(label_variable));
        all
    }

    /// Returns the agenda.
    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// Returns the input constraints.
    pub fn input_constraints(&self) -> &[Formula] {
        &self.input_constraints
    }

    /// Returns the output constraints.
    pub fn output_constraints(&self) -> &[Formula] {
        &self.output_constraints
    }

    /// Returns the profile.
    pub fn profile(&self) -> &[JudgmentSet] {
        &self.profile
    }

    /// Returns the number of voters, that is the sum of the multiplicities of the judgment sets.
    pub fn voter_count(&self) -> usize {
        self.profile.iter().map(|j| j.multiplicity()).sum()
    }

    /// Returns the number of voters accepting the formula of a label.
    pub fn support_count(&self, label: usize) -> usize {
        self.profile
            .iter()
            .filter(|j| j.accepts(label))
            .map(|j| j.multiplicity())
            .sum()
    }

    /// Returns the support count of each label of the agenda.
    pub fn support_counts(&self) -> BTreeMap<usize, usize> {
        self.agenda
            .labels()
            .map(|l| (l, self.support_count(l)))
            .collect()
    }

    /// Returns the value the strict majority of the voters gives to a label.
    ///
    /// In case exactly half of the voters accept the formula, [`None`] is returned.
    pub fn strict_majority(&self, label: usize) -> Option<bool> {
        let support = 2 * self.support_count(label);
        let n = self.voter_count();
        match support.cmp(&n) {
            std::cmp::Ordering::Greater => Some(true),
            std::cmp::Ordering::Less => Some(false),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn judgment_set_formulas(&self, judgment_set: &JudgmentSet) -> Vec<Formula> {
        let mut formulas = self.input_constraints.clone();
        formulas.append(&mut self.agenda.biconditionals());
        formulas.extend(self.agenda.labels().map(|l| {
            let atom = Formula::atom(label_variable(l));
            if judgment_set.accepts(l) {
                atom
            } else {
                Formula::not(atom)
            }
        }));
        formulas
    }
}

/// A builder for [`Scenario`] objects that enforces their invariants.
///
/// Each mutator normalizes its formula, then checks with a SAT oracle that the resulting scenario is consistent:
/// every formula only uses declared variables,
/// the input constraints and the output constraints are satisfiable with the label definitions,
/// and each judgment set is consistent with the input constraints.
/// If a check fails, an [`AggregationError::Consistency`] naming the violated invariant is returned and the scenario is left unchanged.
///
/// # Example
///
/// ```
/// # use jaggr::formula::parse;
/// # use jaggr::scenario::ScenarioBuilder;
/// let mut builder = ScenarioBuilder::new();
/// builder.add_variable("a").unwrap();
/// builder.add_variable("b").unwrap();
/// builder.add_formula_to_agenda(&parse("a").unwrap()).unwrap();
/// builder.add_formula_to_agenda(&parse("b").unwrap()).unwrap();
/// builder.add_input_constraint(&parse("a -> b").unwrap()).unwrap();
/// builder.add_judgment_set(2, &[parse("a").unwrap(), parse("b").unwrap()]).unwrap();
/// assert!(builder.add_judgment_set(1, &[parse("a").unwrap()]).is_err());
/// let scenario = builder.build();
/// assert_eq!(2, scenario.voter_count());
/// ```
pub struct ScenarioBuilder {
    scenario: Scenario,
    oracle: SatisfiabilityOracle,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Builds a new builder for an empty scenario, using the default SAT solver for its checks.
    pub fn new() -> Self {
        Self {
            scenario: Scenario::default(),
            oracle: SatisfiabilityOracle::new(),
        }
    }

    /// Builds a new builder for an empty scenario, using the SAT solvers of the factory for its checks.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self {
            scenario: Scenario::default(),
            oracle: SatisfiabilityOracle::new_with_sat_solver_factory(solver_factory),
        }
    }

    /// Returns the scenario built so far.
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Consumes the builder and returns the scenario.
    pub fn build(self) -> Scenario {
        self.scenario
    }

    /// Declares a variable.
    ///
    /// The name must be a valid atom for the formula parser, or an [`AggregationError::Syntax`] is returned.
    pub fn add_variable(&mut self, name: &str) -> Result<()> {
        match parse(name).with_context(|| format!(r#"while declaring variable "{}""#, name))? {
            Formula::Atom(a) if a == name => {
                self.scenario.variables.insert(a);
                Ok(())
            }
            _ => Err(AggregationError::syntax(0, format!(r#""{}" is not an atom"#, name)).into()),
        }
    }

    /// Adds a formula to the agenda and returns its label.
    pub fn add_formula_to_agenda(&mut self, formula: &Formula) -> Result<usize> {
        let formula = to_nnf(formula);
        self.check_declared_variables(&formula)?;
        if self.scenario.agenda.label_of(&formula).is_some() {
            return Err(AggregationError::consistency(
                ViolatedInvariant::DuplicateAgendaFormula,
                formula.to_string(),
            )
            .into());
        }
        let mut candidate = self.scenario.clone();
        let label = candidate.agenda.push(formula.clone());
        self.check_input_constraints(&candidate, &formula)?;
        self.check_output_constraints(&candidate, &formula)?;
        self.check_judgment_sets(&candidate)?;
        self.scenario = candidate;
        debug!("added formula {} to the agenda with label {}", formula, label);
        Ok(label)
    }

    /// Adds an input constraint.
    pub fn add_input_constraint(&mut self, formula: &Formula) -> Result<()> {
        let formula = to_nnf(formula);
        self.check_declared_variables(&formula)?;
        let mut candidate = self.scenario.clone();
        candidate.input_constraints.push(formula.clone());
        self.check_input_constraints(&candidate, &formula)?;
        self.check_judgment_sets(&candidate)?;
        self.scenario = candidate;
        debug!("added input constraint {}", formula);
        Ok(())
    }

    /// Adds an output constraint.
    pub fn add_output_constraint(&mut self, formula: &Formula) -> Result<()> {
        let formula = to_nnf(formula);
        self.check_declared_variables(&formula)?;
        let mut candidate = self.scenario.clone();
        candidate.output_constraints.push(formula.clone());
        self.check_output_constraints(&candidate, &formula)?;
        self.scenario = candidate;
        debug!("added output constraint {}", formula);
        Ok(())
    }

    /// Adds a judgment set to the profile.
    ///
    /// The accepted formulas must belong to the agenda; the other agenda formulas are considered as rejected.
    pub fn add_judgment_set(&mut self, multiplicity: usize, accepted: &[Formula]) -> Result<()> {
        if multiplicity == 0 {
            return Err(AggregationError::consistency(
                ViolatedInvariant::NullMultiplicity,
                format!("judgment set #{}", self.scenario.profile.len()),
            )
            .into());
        }
        let mut accepted_formulas = BTreeSet::new();
        let mut accepted_labels = BTreeSet::new();
        for f in accepted.iter().map(to_nnf) {
            match self.scenario.agenda.label_of(&f) {
                Some(l) => {
                    accepted_labels.insert(l);
                    accepted_formulas.insert(f);
                }
                None => {
                    return Err(AggregationError::consistency(
                        ViolatedInvariant::UnknownAgendaFormula,
                        f.to_string(),
                    )
                    .into())
                }
            }
        }
        let judgment_set = JudgmentSet::new(multiplicity, accepted_formulas, accepted_labels);
        let index = self.scenario.profile.len();
        self.check_judgment_set(&self.scenario, &judgment_set, index)?;
        self.scenario.profile.push(judgment_set);
        debug!(
            "added judgment set #{} with multiplicity {}",
            index, multiplicity
        );
        Ok(())
    }

    fn check_declared_variables(&self, formula: &Formula) -> Result<()> {
        match formula
            .variables()
            .into_iter()
            .find(|v| !self.scenario.variables.contains(v))
        {
            Some(v) => Err(AggregationError::consistency(
                ViolatedInvariant::UndeclaredVariable(v),
                formula.to_string(),
            )
            .into()),
            None => Ok(()),
        }
    }

    fn check_input_constraints(&self, candidate: &Scenario, changed: &Formula) -> Result<()> {
        let mut formulas = candidate.input_constraints.clone();
        formulas.append(&mut candidate.agenda.biconditionals());
        if self.is_satisfiable(candidate, &formulas)? {
            Ok(())
        } else {
            Err(AggregationError::consistency(
                ViolatedInvariant::InputConstraints,
                changed.to_string(),
            )
            .into())
        }
    }

    fn check_output_constraints(&self, candidate: &Scenario, changed: &Formula) -> Result<()> {
        let mut formulas = candidate.output_constraints.clone();
        formulas.append(&mut candidate.agenda.biconditionals());
        if self.is_satisfiable(candidate, &formulas)? {
            Ok(())
        } else {
            Err(AggregationError::consistency(
                ViolatedInvariant::OutputConstraints,
                changed.to_string(),
            )
            .into())
        }
    }

    fn check_judgment_sets(&self, candidate: &Scenario) -> Result<()> {
        candidate
            .profile
            .iter()
            .enumerate()
            .try_for_each(|(i, j)| self.check_judgment_set(candidate, j, i))
    }

    fn check_judgment_set(
        &self,
        candidate: &Scenario,
        judgment_set: &JudgmentSet,
        index: usize,
    ) -> Result<()> {
        let formulas = candidate.judgment_set_formulas(judgment_set);
        if self.is_satisfiable(candidate, &formulas)? {
            Ok(())
        } else {
            let accepted = judgment_set
                .accepted()
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<String>>();
            Err(AggregationError::consistency(
                ViolatedInvariant::JudgmentSet(index),
                format!("accepted formulas: [{}]", accepted.join(", ")),
            )
            .into())
        }
    }

    fn is_satisfiable(&self, candidate: &Scenario, formulas: &[Formula]) -> Result<bool> {
        self.oracle
            .is_satisfiable(formulas, &candidate.all_variables())
            .context("while checking the consistency of a scenario")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(text: &str) -> Formula {
        parse(text).unwrap()
    }

    fn builder(vars: &[&str], agenda: &[&str]) -> ScenarioBuilder {
        let mut builder = ScenarioBuilder::new();
        vars.iter().for_each(|v| builder.add_variable(v).unwrap());
        agenda.iter().for_each(|t| {
            builder.add_formula_to_agenda(&f(t)).unwrap();
        });
        builder
    }

    fn violated_invariant(err: anyhow::Error) -> ViolatedInvariant {
        err.downcast_ref::<AggregationError>()
            .and_then(|e| e.violated_invariant())
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_add_variable() {
        let mut b = ScenarioBuilder::new();
        b.add_variable("x1").unwrap();
        assert!(b.scenario().variables().contains("x1"));
        for bad in ["", "a b", "_l1", "~a"] {
            let err = b.add_variable(bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<AggregationError>(),
                Some(AggregationError::Syntax { .. })
            ));
        }
    }

    #[test]
    fn test_labels_and_nnf() {
        let mut b = builder(&["a", "b"], &["a"]);
        assert_eq!(2, b.add_formula_to_agenda(&f("a -> b")).unwrap());
        assert_eq!(
            Some(&to_nnf(&f("a -> b"))),
            b.scenario().agenda().get(2)
        );
        assert_eq!(
            vec!["_l1", "_l2", "a", "b"],
            b.scenario().all_variables().into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_undeclared_variable() {
        let mut b = builder(&["a"], &[]);
        let err = b.add_formula_to_agenda(&f("a & c")).unwrap_err();
        assert_eq!(
            ViolatedInvariant::UndeclaredVariable("c".to_string()),
            violated_invariant(err)
        );
        let err = b.add_output_constraint(&f("d")).unwrap_err();
        assert_eq!(
            ViolatedInvariant::UndeclaredVariable("d".to_string()),
            violated_invariant(err)
        );
        assert!(b.scenario().agenda().is_empty());
        assert!(b.scenario().output_constraints().is_empty());
    }

    #[test]
    fn test_duplicate_agenda_formula() {
        let mut b = builder(&["a", "b"], &["a -> b"]);
        let err = b.add_formula_to_agenda(&f("~a | b")).unwrap_err();
        assert_eq!(ViolatedInvariant::DuplicateAgendaFormula, violated_invariant(err));
        assert_eq!(1, b.scenario().agenda().len());
    }

    #[test]
    fn test_unsatisfiable_constraints() {
        let mut b = builder(&["a"], &["a"]);
        b.add_input_constraint(&f("a")).unwrap();
        let err = b.add_input_constraint(&f("~a")).unwrap_err();
        assert_eq!(ViolatedInvariant::InputConstraints, violated_invariant(err));
        assert_eq!(1, b.scenario().input_constraints().len());
        b.add_output_constraint(&f("~a")).unwrap();
        let err = b.add_output_constraint(&f("a")).unwrap_err();
        assert_eq!(ViolatedInvariant::OutputConstraints, violated_invariant(err));
        assert_eq!(1, b.scenario().output_constraints().len());
    }

    #[test]
    fn test_judgment_set_checks() {
        let mut b = builder(&["a", "b"], &["a", "b"]);
        b.add_input_constraint(&f("a -> b")).unwrap();
        let err = b.add_judgment_set(0, &[]).unwrap_err();
        assert_eq!(ViolatedInvariant::NullMultiplicity, violated_invariant(err));
        let err = b.add_judgment_set(1, &[f("a & b")]).unwrap_err();
        assert_eq!(ViolatedInvariant::UnknownAgendaFormula, violated_invariant(err));
        b.add_judgment_set(1, &[f("b")]).unwrap();
        let err = b.add_judgment_set(1, &[f("a")]).unwrap_err();
        assert_eq!(ViolatedInvariant::JudgmentSet(1), violated_invariant(err));
        assert_eq!(1, b.scenario().profile().len());
    }

    #[test]
    fn test_mutations_recheck_judgment_sets() {
        let mut b = builder(&["a", "b"], &["a"]);
        b.add_judgment_set(1, &[f("a")]).unwrap();
        let err = b.add_input_constraint(&f("~a")).unwrap_err();
        assert_eq!(ViolatedInvariant::JudgmentSet(0), violated_invariant(err));
        let err = b.add_formula_to_agenda(&f("a | b")).unwrap_err();
        assert_eq!(ViolatedInvariant::JudgmentSet(0), violated_invariant(err));
        assert_eq!(1, b.scenario().agenda().len());
        assert!(b.scenario().input_constraints().is_empty());
    }

    #[test]
    fn test_support_counts() {
        let mut b = builder(&["x1", "x2"], &["x1", "x2"]);
        b.add_judgment_set(2, &[f("x1")]).unwrap();
        b.add_judgment_set(1, &[f("x2")]).unwrap();
        let scenario = b.build();
        assert_eq!(3, scenario.voter_count());
        assert_eq!(
            vec![(1, 2), (2, 1)],
            scenario.support_counts().into_iter().collect::<Vec<_>>()
        );
        assert_eq!(Some(true), scenario.strict_majority(1));
        assert_eq!(Some(false), scenario.strict_majority(2));
    }

    #[test]
    fn test_strict_majority_tie() {
        let mut b = builder(&["x1"], &["x1"]);
        b.add_judgment_set(1, &[f("x1")]).unwrap();
        b.add_judgment_set(1, &[]).unwrap();
        assert_eq!(None, b.scenario().strict_majority(1));
    }
}
