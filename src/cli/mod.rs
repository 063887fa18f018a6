//! Command-line interface for casebrief.

mod commands;

pub use commands::{is_verbose, run};
