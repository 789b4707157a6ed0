//! parser for scenario script files

use std::path::Path;
use tracing::debug;

use crate::error::PacerError;
use crate::language::{LoadingError, ScenarioSet};

pub mod errors;
pub mod expression;
pub mod parser;
pub(crate) mod resolver;
pub mod scanner;

/// Read a file and return an owned String. Ownership passes back to the
/// caller so the borrow taken by parse() below lives long enough.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a fully resolved ScenarioSet, or return the single
/// definitive diagnostic describing why it cannot be. `load` statements in
/// the content resolve relative to the directory containing `filename`.
pub fn parse(filename: &Path, content: &str) -> Result<ScenarioSet, PacerError> {
    let result = parser::parse_scenarios(filename, content);

    if let Ok(set) = &result {
        debug!(
            "Found {} scenario{}",
            set.len(),
            if set.len() == 1 { "" } else { "s" }
        );
        debug!(
            "Found {} group{}",
            set.groups
                .len(),
            if set
                .groups
                .len()
                == 1
            {
                ""
            } else {
                "s"
            }
        );
    }

    result
}
