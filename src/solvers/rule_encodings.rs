use super::{
    optimization_problem::{Objective, OptimizationProblem, PseudoBooleanConstraint},
    outcome_enumerator::{admissibility_cnf, label_variables},
    Rule,
};
use crate::{
    encodings::Weighted,
    formula::{CnfClause, CnfFormula, CnfLiteral},
    scenario::{label_variable, Scenario},
};
use anyhow::Result;
use std::collections::BTreeSet;

fn label_literal(label: usize, positive: bool) -> CnfLiteral {
    if positive {
        CnfLiteral::positive(label_variable(label))
    } else {
        CnfLiteral::negative(label_variable(label))
    }
}

fn voter_variable(judgment_set_index: usize, voter: usize) -> String {
    format!("_v{}_{}", judgment_set_index, voter)
}

/// Translates the selection problem of a rule into an optimization problem.
///
/// The optimal models of the problem, projected onto the label variables, are exactly the outcomes selected by the rule.
pub(crate) fn encode_rule(scenario: &Scenario, rule: Rule) -> Result<OptimizationProblem> {
    let mut problem =
        OptimizationProblem::new(admissibility_cnf(scenario)?, label_variables(scenario));
    match rule {
        Rule::Kemeny => encode_kemeny(scenario, &mut problem),
        Rule::Leximax => encode_leximax(scenario, &mut problem),
        Rule::Young => encode_young(scenario, &mut problem),
        Rule::Slater => encode_slater(scenario, &mut problem),
        Rule::Majority => encode_majority(scenario, &mut problem),
        Rule::MaxHamming => encode_max_hamming(scenario, &mut problem),
    }
    Ok(problem)
}

/// Builds a problem which optimal models are the admissible outcomes.
pub(crate) fn encode_admissibility(scenario: &Scenario) -> Result<OptimizationProblem> {
    Ok(OptimizationProblem::new(
        admissibility_cnf(scenario)?,
        label_variables(scenario),
    ))
}

// the number of disagreeing voters is minimized
fn encode_kemeny(scenario: &Scenario, problem: &mut OptimizationProblem) {
    let n = scenario.voter_count();
    let terms = scenario
        .agenda()
        .labels()
        .flat_map(|l| {
            let support = scenario.support_count(l);
            [
                Weighted::new(label_literal(l, true), n - support),
                Weighted::new(label_literal(l, false), support),
            ]
        })
        .collect();
    problem.add_objective(Objective::Sum(terms));
}

// for each agreement value, from the highest to the lowest, the number of labels not reaching it is minimized
fn encode_leximax(scenario: &Scenario, problem: &mut OptimizationProblem) {
    let n = scenario.voter_count();
    let supports = scenario.support_counts();
    let values = supports
        .values()
        .flat_map(|s| [*s, n - *s])
        .collect::<BTreeSet<usize>>();
    for value in values.into_iter().rev() {
        let terms = supports
            .iter()
            .flat_map(|(l, s)| {
                let mut label_terms = Vec::with_capacity(2);
                if *s == value {
                    label_terms.push(Weighted::new(label_literal(*l, false), 1));
                }
                if n - *s == value {
                    label_terms.push(Weighted::new(label_literal(*l, true), 1));
                }
                label_terms
            })
            .collect();
        problem.add_objective(Objective::Sum(terms));
    }
}

fn strict_majority_literals(scenario: &Scenario) -> Vec<CnfLiteral> {
    scenario
        .agenda()
        .labels()
        .filter_map(|l| scenario.strict_majority(l).map(|v| label_literal(l, v)))
        .collect()
}

fn encode_majority(scenario: &Scenario, problem: &mut OptimizationProblem) {
    let units = strict_majority_literals(scenario)
        .into_iter()
        .map(|l| CnfClause::new(vec![l]))
        .collect();
    problem.add_hard_clauses(CnfFormula::new(units));
}

// the number of violated strict majority judgments is minimized
fn encode_slater(scenario: &Scenario, problem: &mut OptimizationProblem) {
    let terms = strict_majority_literals(scenario)
        .into_iter()
        .map(|l| Weighted::new(l.negate(), 1))
        .collect();
    problem.add_objective(Objective::Sum(terms));
}

fn encode_max_hamming(scenario: &Scenario, problem: &mut OptimizationProblem) {
    if scenario.profile().is_empty() {
        return;
    }
    let distances = scenario
        .profile()
        .iter()
        .map(|j| {
            scenario
                .agenda()
                .labels()
                .map(|l| Weighted::new(label_literal(l, !j.accepts(l)), 1))
                .collect::<Vec<Weighted<CnfLiteral>>>()
        })
        .collect();
    problem.add_objective(Objective::Max(distances));
}

// each voter gets an inclusion variable; the strict majority of the included voters must be followed
fn encode_young(scenario: &Scenario, problem: &mut OptimizationProblem) {
    let voters = scenario
        .profile()
        .iter()
        .enumerate()
        .map(|(i, j)| {
            let vars = (0..j.multiplicity())
                .map(|k| voter_variable(i, k))
                .collect::<Vec<String>>();
            (j, vars)
        })
        .collect::<Vec<_>>();
    for l in scenario.agenda().labels() {
        let mut accepting = vec![];
        let mut rejecting = vec![];
        voters.iter().for_each(|(j, vars)| {
            if j.accepts(l) {
                accepting.extend(vars.iter().cloned());
            } else {
                rejecting.extend(vars.iter().cloned());
            }
        });
        let mut add_constraint = |pro: &[String], con: &[String], guard: CnfLiteral| {
            let terms = pro
                .iter()
                .map(|v| Weighted::new(CnfLiteral::positive(v.as_str()), 1))
                .chain(
                    con.iter()
                        .map(|v| Weighted::new(CnfLiteral::negative(v.as_str()), 1)),
                )
                .collect();
            problem.add_constraint(
                PseudoBooleanConstraint::at_least(terms, con.len()).guarded_by(guard),
            );
        };
        add_constraint(&rejecting, &accepting, label_literal(l, false));
        add_constraint(&accepting, &rejecting, label_literal(l, true));
    }
    let excluded = voters
        .iter()
        .flat_map(|(_, vars)| vars.iter())
        .map(|v| Weighted::new(CnfLiteral::negative(v.as_str()), 1))
        .collect();
    problem.add_objective(Objective::Sum(excluded));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formula::parse, scenario::ScenarioBuilder};

    fn discursive_dilemma() -> Scenario {
        let mut b = ScenarioBuilder::new();
        b.add_variable("p").unwrap();
        b.add_variable("q").unwrap();
        for f in ["p", "q", "p & q"] {
            b.add_formula_to_agenda(&parse(f).unwrap()).unwrap();
        }
        let unanimous = ["p", "q", "p & q"]
            .iter()
            .map(|f| parse(f).unwrap())
            .collect::<Vec<_>>();
        b.add_judgment_set(1, &unanimous).unwrap();
        b.add_judgment_set(2, &[parse("p").unwrap()]).unwrap();
        b.build()
    }

    #[test]
    fn test_kemeny_single_objective() {
        let problem = encode_rule(&discursive_dilemma(), Rule::Kemeny).unwrap();
        assert_eq!(1, problem.objectives().len());
        match &problem.objectives()[0] {
            Objective::Sum(terms) => assert_eq!(6, terms.len()),
            _ => panic!(),
        }
    }

    #[test]
    fn test_leximax_tiers() {
        // supports are 3, 1, 1 out of 3 voters: the agreement values are 3, 2, 1 and 0
        let problem = encode_rule(&discursive_dilemma(), Rule::Leximax).unwrap();
        assert_eq!(4, problem.objectives().len());
    }

    #[test]
    fn test_majority_has_no_objective() {
        let problem = encode_rule(&discursive_dilemma(), Rule::Majority).unwrap();
        assert!(problem.objectives().is_empty());
    }

    #[test]
    fn test_max_hamming_empty_profile() {
        let mut b = ScenarioBuilder::new();
        b.add_variable("p").unwrap();
        b.add_formula_to_agenda(&parse("p").unwrap()).unwrap();
        let problem = encode_rule(&b.build(), Rule::MaxHamming).unwrap();
        assert!(problem.objectives().is_empty());
    }

    #[test]
    fn test_voter_variables() {
        assert_eq!("_v0_2", voter_variable(0, 2));
        assert!(parse(&voter_variable(0, 2)).is_err());
    }
}
