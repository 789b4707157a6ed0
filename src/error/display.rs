use std::fmt;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

use crate::parsing::errors::ParsingError;

/// A definitive parse diagnostic: the problem, where it is, and (when the
/// failure happened inside a recursively loaded file) the error it wraps.
/// Owns its filename and source because loaded files' content only lives
/// for the duration of the resolver frame that read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacerError {
    pub problem: String,
    pub details: String,
    pub filename: PathBuf,
    pub source: String,
    pub offset: usize,
    pub cause: Option<Box<PacerError>>,
}

impl PacerError {
    pub(crate) fn new(filename: &Path, source: &str, error: ParsingError) -> PacerError {
        PacerError {
            problem: error.message(),
            details: error.details(),
            filename: filename.to_path_buf(),
            source: source.to_string(),
            offset: error.offset(),
            cause: None,
        }
    }

    /// Wrap an error from a loaded file with the location of the `load`
    /// statement that pulled that file in.
    pub(crate) fn wrap(
        filename: &Path,
        source: &str,
        offset: usize,
        inner: PacerError,
    ) -> PacerError {
        PacerError {
            problem: "error in loaded file".to_string(),
            details: format!("while loading {}", inner.filename.to_string_lossy()),
            filename: filename.to_path_buf(),
            source: source.to_string(),
            offset,
            cause: Some(Box::new(inner)),
        }
    }

    pub fn line(&self) -> usize {
        calculate_line_number(&self.source, self.offset) + 1
    }

    pub fn column(&self) -> usize {
        calculate_column_number(&self.source, self.offset) + 1
    }

    // Verbose detailed explanation
    pub fn full_details(&self) -> String {
        let i = calculate_line_number(&self.source, self.offset);
        let j = calculate_column_number(&self.source, self.offset);

        let code = self
            .source
            .lines()
            .nth(i)
            .unwrap_or("?");

        let line = i + 1;
        let column = j + 1;

        let width = line
            .to_string()
            .len();
        let width = 3.max(width);

        let mut text = format!(
            r#"
{}: {}
{}:{}:{}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>j$}

{}
            "#,
            "error".bright_red(),
            self.problem
                .bold(),
            self.filename
                .to_string_lossy(),
            line,
            column,
            ' ',
            '|'.bright_blue(),
            line.bright_blue(),
            '|'.bright_blue(),
            code,
            ' ',
            '|'.bright_blue(),
            '^'.bright_red(),
            self.details
        )
        .trim_ascii()
        .to_string();

        if let Some(cause) = &self.cause {
            text.push_str("\n\n");
            text.push_str(&format!("{}:", "caused by".bold()));
            text.push_str("\n\n");
            text.push_str(&cause.full_details());
        }

        text
    }
}

// Concise version for internal use
impl fmt::Display for PacerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {}:{}:{} {}",
            self.filename
                .to_string_lossy(),
            self.line(),
            self.column(),
            self.problem
        )?;

        if let Some(cause) = &self.cause {
            write!(f, "; {}", cause)?;
        }

        Ok(())
    }
}

// This returns a zero-origin result so that it can subsequently be used for
// splitting; for display to humans you'll have to add 1.
fn calculate_line_number(content: &str, offset: usize) -> usize {
    content[..offset]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
}

// Calculate the column number, also zero-origin for consistency.
fn calculate_column_number(content: &str, offset: usize) -> usize {
    let before = &content[..offset];
    match before.rfind('\n') {
        Some(start) => offset - start - 1,
        None => offset,
    }
}
