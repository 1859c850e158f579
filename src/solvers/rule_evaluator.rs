//! The selection of the rule-optimal outcomes among an explicit list of admissible outcomes.

use super::{Outcome, Rule};
use crate::scenario::Scenario;
use permutator::{CartesianProduct, Combination};
use std::{cmp::Reverse, collections::BTreeSet};

/// Returns the outcomes selected by a rule among the admissible ones.
///
/// All tied outcomes are returned, sorted, without duplicates.
/// If there is no admissible outcome, the result is empty.
pub fn evaluate(scenario: &Scenario, rule: Rule, admissible_outcomes: &[Outcome]) -> Vec<Outcome> {
    let selected = match rule {
        Rule::Kemeny => select_max(admissible_outcomes, |o| kemeny_score(scenario, o)),
        Rule::Leximax => select_max(admissible_outcomes, |o| leximax_vector(scenario, o)),
        Rule::MaxHamming => select_max(admissible_outcomes, |o| {
            Reverse(max_hamming_distance(scenario, o))
        }),
        Rule::Slater => select_slater(scenario, admissible_outcomes),
        Rule::Majority => select_majority(scenario, admissible_outcomes),
        Rule::Young => select_young(scenario, admissible_outcomes),
    };
    selected
        .into_iter()
        .collect::<BTreeSet<Outcome>>()
        .into_iter()
        .collect()
}

fn select_max<K, F>(outcomes: &[Outcome], key: F) -> Vec<Outcome>
where
    K: Ord,
    F: Fn(&Outcome) -> K,
{
    let keys = outcomes.iter().map(&key).collect::<Vec<K>>();
    match keys.iter().max() {
        Some(best) => outcomes
            .iter()
            .zip(keys.iter())
            .filter(|(_, k)| *k == best)
            .map(|(o, _)| o.clone())
            .collect(),
        None => vec![],
    }
}

/// The number of voters agreeing with the outcome on a label.
fn label_agreement(scenario: &Scenario, outcome: &Outcome, label: usize) -> usize {
    let support = scenario.support_count(label);
    if outcome.value_of(label) == Some(true) {
        support
    } else {
        scenario.voter_count() - support
    }
}

pub(crate) fn kemeny_score(scenario: &Scenario, outcome: &Outcome) -> usize {
    scenario
        .agenda()
        .labels()
        .map(|l| label_agreement(scenario, outcome, l))
        .sum()
}

fn leximax_vector(scenario: &Scenario, outcome: &Outcome) -> Vec<usize> {
    let mut v = scenario
        .agenda()
        .labels()
        .map(|l| label_agreement(scenario, outcome, l))
        .collect::<Vec<usize>>();
    v.sort_unstable_by(|a, b| b.cmp(a));
    v
}

fn max_hamming_distance(scenario: &Scenario, outcome: &Outcome) -> usize {
    scenario
        .profile()
        .iter()
        .map(|j| outcome.hamming_distance(j))
        .max()
        .unwrap_or(0)
}

fn strict_majority_literals(scenario: &Scenario) -> Vec<(usize, bool)> {
    scenario
        .agenda()
        .labels()
        .filter_map(|l| scenario.strict_majority(l).map(|v| (l, v)))
        .collect()
}

fn select_majority(scenario: &Scenario, outcomes: &[Outcome]) -> Vec<Outcome> {
    let forced = strict_majority_literals(scenario);
    outcomes
        .iter()
        .filter(|o| o.agrees_with(&forced))
        .cloned()
        .collect()
}

fn subsets_of_size(literals: &[(usize, bool)], size: usize) -> Vec<Vec<(usize, bool)>> {
    if size == 0 {
        vec![vec![]]
    } else if size == literals.len() {
        vec![literals.to_vec()]
    } else {
        literals
            .combination(size)
            .map(|c| c.into_iter().copied().collect())
            .collect()
    }
}

fn select_slater(scenario: &Scenario, outcomes: &[Outcome]) -> Vec<Outcome> {
    let majority_literals = strict_majority_literals(scenario);
    for size in (0..=majority_literals.len()).rev() {
        let selected = subsets_of_size(&majority_literals, size)
            .iter()
            .flat_map(|subset| outcomes.iter().filter(move |o| o.agrees_with(subset)))
            .cloned()
            .collect::<Vec<Outcome>>();
        if !selected.is_empty() {
            return selected;
        }
    }
    vec![]
}

/// For each number of included voters of each judgment set, computes the outcomes that agree with the strict majority of the included voters.
/// Voters of a same judgment set are interchangeable, so it is enough to consider how many of them are included.
fn select_young(scenario: &Scenario, outcomes: &[Outcome]) -> Vec<Outcome> {
    let mut best = None;
    let domains = scenario
        .profile()
        .iter()
        .map(|j| (0..=j.multiplicity()).collect::<Vec<usize>>())
        .collect::<Vec<Vec<usize>>>();
    if domains.is_empty() {
        update_young_selection(scenario, outcomes, &[], &mut best);
    } else {
        let domain_refs = domains
            .iter()
            .map(|d| d.as_slice())
            .collect::<Vec<&[usize]>>();
        domain_refs.as_slice().cart_prod().for_each(|p| {
            let included = p.into_iter().copied().collect::<Vec<usize>>();
            update_young_selection(scenario, outcomes, &included, &mut best);
        });
    }
    best.map(|(_, selected)| selected).unwrap_or_default()
}

fn update_young_selection(
    scenario: &Scenario,
    outcomes: &[Outcome],
    included: &[usize],
    best: &mut Option<(usize, Vec<Outcome>)>,
) {
    let profile = scenario.profile();
    let n_included = included.iter().sum::<usize>();
    if matches!(best, Some((n, _)) if *n > n_included) {
        return;
    }
    let forced = scenario
        .agenda()
        .labels()
        .filter_map(|l| {
            let support = profile
                .iter()
                .zip(included.iter())
                .filter(|(j, _)| j.accepts(l))
                .map(|(_, n)| *n)
                .sum::<usize>();
            match (2 * support).cmp(&n_included) {
                std::cmp::Ordering::Greater => Some((l, true)),
                std::cmp::Ordering::Less => Some((l, false)),
                std::cmp::Ordering::Equal => None,
            }
        })
        .collect::<Vec<(usize, bool)>>();
    let mut matching = outcomes
        .iter()
        .filter(|o| o.agrees_with(&forced))
        .cloned()
        .collect::<Vec<Outcome>>();
    if matching.is_empty() {
        return;
    }
    match best {
        Some((n, selected)) if *n == n_included => selected.append(&mut matching),
        _ => *best = Some((n_included, matching)),
    }
}
