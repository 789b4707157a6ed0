//! the block scanner: raw text to depth-tagged statement records
//!
//! No tree is built here. Each surviving line becomes one [`Record`]; the
//! builder in parser.rs turns the flat depth-tagged sequence into scopes.

use crate::parsing::errors::LexError;

/// One statement: its nesting depth, its text with indentation stripped,
/// and the byte offset of the first character of the statement within the
/// file, from which line and column are recovered when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'i> {
    pub depth: usize,
    pub text: &'i str,
    pub offset: usize,
}

/// Scan raw input into an ordered sequence of records, skipping blank
/// lines and comment lines, and validating that indentation is spaces
/// only, aligns to the unit established by the first indented line, and
/// deepens at most one level at a time.
pub fn scan(content: &str) -> Result<Vec<Record<'_>>, LexError> {
    let mut records: Vec<Record> = Vec::new();

    // width of one indentation level, learned from the first indented line
    let mut unit = 0;
    let mut previous = 0;

    let mut offset = 0;
    for raw in content.split('\n') {
        let start = offset;
        offset += raw.len() + 1;

        let line = raw.strip_suffix('\r')
            .unwrap_or(raw);

        let trimmed = line.trim_start_matches(' ');
        if trimmed.is_empty() || trimmed.trim_end()
            .is_empty()
        {
            continue;
        }

        // a line whose first non-indent character is '#' is a comment in
        // full, regardless of how it is indented.
        if trimmed
            .trim_start()
            .starts_with('#')
        {
            continue;
        }

        // leading spaces are already stripped, so a tab here is either the
        // whole indentation or mixed in at the end of it
        if trimmed.starts_with('\t') {
            return Err(LexError::TabIndent(start + line.len() - trimmed.len()));
        }

        let width = line.len() - trimmed.len();
        let text = trimmed.trim_end();

        let depth = if width == 0 {
            0
        } else if records.is_empty() {
            // an indented statement with no enclosing block above it
            return Err(LexError::InconsistentIndent(start + width));
        } else if unit == 0 {
            unit = width;
            1
        } else {
            if width % unit != 0 {
                return Err(LexError::InconsistentIndent(start + width));
            }
            width / unit
        };

        if depth > previous + 1 {
            return Err(LexError::InconsistentIndent(start + width));
        }

        records.push(Record {
            depth,
            text,
            offset: start + width,
        });
        previous = depth;
    }

    Ok(records)
}
