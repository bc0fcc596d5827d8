mod scenario_input;
mod scenario_result;
mod tax_bracket;

pub use scenario_input::ScenarioInput;
pub use scenario_result::{BracketResult, ScenarioResult};
pub use tax_bracket::TaxBracket;
