mod common;

use common::build_scenario;
use jaggr::{
    scenario::Scenario,
    solvers::{AggregationSolver, BruteForceSolver, OptimizationSolver, Outcome, Rule},
};
use std::collections::BTreeSet;

fn scenarios() -> Vec<Scenario> {
    vec![
        build_scenario(
            &["p", "q"],
            &["p", "q", "p & q"],
            &[],
            &[],
            &[(1, &["p", "q", "p & q"]), (1, &["p"]), (1, &["q"])],
        ),
        build_scenario(
            &["a", "b", "c"],
            &["a", "b", "c", "a | b"],
            &[],
            &["~a | ~c"],
            &[
                (2, &["a", "b", "c", "a | b"]),
                (1, &["c"]),
                (3, &["a", "a | b"]),
                (1, &["b", "a | b"]),
            ],
        ),
        build_scenario(
            &["x", "y"],
            &["x", "y", "x -> y"],
            &[],
            &[],
            &[(2, &["x", "y", "x -> y"]), (2, &["x -> y"]), (1, &["x"])],
        ),
        build_scenario(
            &["a", "b"],
            &["a", "b", "a & b"],
            &[],
            &[],
            &[(1, &["a"]), (1, &["b"])],
        ),
        build_scenario(
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a -> b"],
            &["~b | ~c", "a | c"],
            &[(3, &["a", "b"]), (2, &["b", "c"]), (2, &["c"])],
        ),
        build_scenario(&["a", "b"], &["a", "b"], &[], &["a | b"], &[]),
    ]
}

fn check_strategies_agree(rule: Rule) {
    let brute_force = BruteForceSolver::new();
    let optimization = OptimizationSolver::new();
    for (i, scenario) in scenarios().iter().enumerate() {
        let expected = brute_force.evaluate(scenario, rule).unwrap();
        let actual = optimization.evaluate(scenario, rule).unwrap();
        assert_eq!(expected, actual, "rule {} on scenario #{}", rule, i);
    }
}

macro_rules! test_for_rule {
    ($rule:expr, $suffix:ident) => {
        paste::item! {
            #[test]
            fn [< test_strategies_agree_for_ $suffix >] () {
                check_strategies_agree($rule);
            }
        }
    };
}

test_for_rule!(Rule::Kemeny, kemeny);
test_for_rule!(Rule::Leximax, leximax);
test_for_rule!(Rule::Young, young);
test_for_rule!(Rule::Slater, slater);
test_for_rule!(Rule::Majority, majority);
test_for_rule!(Rule::MaxHamming, max_hamming);

#[test]
fn test_admissible_outcomes_agree() {
    let brute_force = BruteForceSolver::new();
    let optimization = OptimizationSolver::new();
    for scenario in scenarios() {
        let expected = brute_force
            .admissible_outcomes(&scenario)
            .unwrap()
            .collect::<anyhow::Result<BTreeSet<Outcome>>>()
            .unwrap();
        let actual = optimization
            .admissible_outcomes(&scenario)
            .unwrap()
            .collect::<anyhow::Result<BTreeSet<Outcome>>>()
            .unwrap();
        assert_eq!(expected, actual);
    }
}
