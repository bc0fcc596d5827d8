//! Loaders that turn CSV files into scenarios and bracket schedules.

pub mod brackets;
pub mod scenarios;

pub use brackets::{BracketRecord, BracketScheduleError, BracketScheduleLoader};
pub use scenarios::{ScenarioCsvError, load_from_file, load_from_str};
