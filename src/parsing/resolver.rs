//! the include and load resolver
//!
//! `include NAME` deep-copies a group's steps into the scenario being
//! built, expanding nested includes as it goes; `load "path"` runs the
//! whole pipeline over another file and hands the result back to the
//! builder for merging. Both thread an explicit "currently in progress"
//! set through the recursion, scoped to one parse invocation, so
//! concurrent parses never see each other.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::PacerError;
use crate::language::{Group, GroupEntry, ScenarioSet, Step};
use crate::parsing::errors::{CycleError, ParsingError, ReferenceError};
use crate::parsing::parser;

/// Expand a group into a fresh step list. Every step is cloned, so two
/// expansions of the same group share nothing.
pub(crate) fn expand<'i>(
    groups: &IndexMap<String, Group>,
    name: &str,
    offset: usize,
) -> Result<Vec<Step>, ParsingError<'i>> {
    let mut expanding: Vec<String> = Vec::new();
    let mut steps = Vec::new();
    expand_into(groups, name, offset, &mut expanding, &mut steps)?;
    Ok(steps)
}

fn expand_into<'i>(
    groups: &IndexMap<String, Group>,
    name: &str,
    offset: usize,
    expanding: &mut Vec<String>,
    steps: &mut Vec<Step>,
) -> Result<(), ParsingError<'i>> {
    if expanding
        .iter()
        .any(|seen| seen == name)
    {
        let mut chain = expanding.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(name);
        return Err(CycleError::Include(offset, chain).into());
    }

    let group = match groups.get(name) {
        Some(group) => group,
        None => return Err(ReferenceError::UnknownGroup(offset, name.to_string()).into()),
    };

    expanding.push(name.to_string());
    for entry in &group.entries {
        match entry {
            GroupEntry::Step(step) => steps.push(step.clone()),
            GroupEntry::Include { name: inner, .. } => {
                expand_into(groups, inner, offset, expanding, steps)?;
            }
        }
    }
    // only names still on the stack count as in progress: a group included
    // twice along different paths is not a cycle
    expanding.pop();

    Ok(())
}

/// Read and parse a file named by a `load` statement. Errors come back
/// already rendered against the loaded file's content; the builder wraps
/// them with the location of the `load` statement in the outer file.
pub(crate) fn load_file(path: &Path, loading: &mut Vec<PathBuf>) -> Result<ScenarioSet, PacerError> {
    debug!(?path, "loading scenario file");

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            return Err(PacerError {
                problem: format!("cannot load '{}'", path.to_string_lossy()),
                details: error.to_string(),
                filename: path.to_path_buf(),
                source: String::new(),
                offset: 0,
                cause: None,
            });
        }
    };

    match parser::build(path, &content, loading) {
        Ok(set) => Ok(set),
        Err(error) => Err(parser::render(path, &content, error)),
    }
}
