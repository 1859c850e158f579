use jaggr::{
    formula::parse,
    scenario::{Scenario, ScenarioBuilder},
};

pub fn build_scenario(
    vars: &[&str],
    agenda: &[&str],
    inputs: &[&str],
    outputs: &[&str],
    profile: &[(usize, &[&str])],
) -> Scenario {
    let mut builder = ScenarioBuilder::new();
    vars.iter().for_each(|v| builder.add_variable(v).unwrap());
    agenda.iter().for_each(|f| {
        builder.add_formula_to_agenda(&parse(f).unwrap()).unwrap();
    });
    inputs
        .iter()
        .for_each(|f| builder.add_input_constraint(&parse(f).unwrap()).unwrap());
    outputs
        .iter()
        .for_each(|f| builder.add_output_constraint(&parse(f).unwrap()).unwrap());
    profile.iter().for_each(|(multiplicity, accepted)| {
        let accepted = accepted
            .iter()
            .map(|f| parse(f).unwrap())
            .collect::<Vec<_>>();
        builder.add_judgment_set(*multiplicity, &accepted).unwrap()
    });
    builder.build()
}
