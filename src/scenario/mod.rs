//! Judgment aggregation scenarios: agendas, profiles and their consistency-checking builder.

mod agenda;
pub use agenda::label_of_variable;
pub use agenda::label_variable;
pub use agenda::Agenda;

mod judgment_set;
pub use judgment_set::JudgmentSet;

mod scenario_model;
pub use scenario_model::Scenario;
pub use scenario_model::ScenarioBuilder;
