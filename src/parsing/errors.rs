//! the error taxonomy for scenario parsing
//!
//! Everything here is fatal: a file parses to a complete ScenarioSet or to
//! exactly one of these, carrying the byte offset it arose at. Offsets are
//! converted to file/line/column when the error is rendered as a
//! [`PacerError`](crate::error::PacerError).

use std::path::PathBuf;

use crate::error::PacerError;

/// Tokenization-level problems found while scanning blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    InconsistentIndent(usize),
    TabIndent(usize),
    UnterminatedString(usize),
}

/// Malformed statements and expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError<'i> {
    UnexpectedToken(usize, char),
    UnbalancedParens(usize),
    MissingValue(usize, &'static str),
    UnknownStatement(usize, &'i str),
    StrayComparison(usize),
    MisplacedStatement(usize, &'i str),
    UnexpectedIndent(usize),
    Expected(usize, &'static str),
}

/// Names that do not resolve to anything. These own their payloads: a
/// group name can originate in a file other than the one whose offset the
/// error carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    UnknownGroup(usize, String),
    UnresolvedLoad(usize, String, String),
}

/// Self-referential include or load chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    Include(usize, String),
    Load(usize, PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError<'i> {
    Lex(LexError),
    Syntax(SyntaxError<'i>),
    Reference(ReferenceError),
    Cycle(CycleError),
}

impl<'i> ParsingError<'i> {
    pub fn offset(&self) -> usize {
        match self {
            ParsingError::Lex(error) => match error {
                LexError::InconsistentIndent(offset) => *offset,
                LexError::TabIndent(offset) => *offset,
                LexError::UnterminatedString(offset) => *offset,
            },
            ParsingError::Syntax(error) => match error {
                SyntaxError::UnexpectedToken(offset, _) => *offset,
                SyntaxError::UnbalancedParens(offset) => *offset,
                SyntaxError::MissingValue(offset, _) => *offset,
                SyntaxError::UnknownStatement(offset, _) => *offset,
                SyntaxError::StrayComparison(offset) => *offset,
                SyntaxError::MisplacedStatement(offset, _) => *offset,
                SyntaxError::UnexpectedIndent(offset) => *offset,
                SyntaxError::Expected(offset, _) => *offset,
            },
            ParsingError::Reference(error) => match error {
                ReferenceError::UnknownGroup(offset, _) => *offset,
                ReferenceError::UnresolvedLoad(offset, _, _) => *offset,
            },
            ParsingError::Cycle(error) => match error {
                CycleError::Include(offset, _) => *offset,
                CycleError::Load(offset, _) => *offset,
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::Lex(error) => match error {
                LexError::InconsistentIndent(_) => "inconsistent indentation".to_string(),
                LexError::TabIndent(_) => "tab in indentation".to_string(),
                LexError::UnterminatedString(_) => "unterminated string".to_string(),
            },
            ParsingError::Syntax(error) => match error {
                SyntaxError::UnexpectedToken(_, c) => format!("unexpected character '{}'", c),
                SyntaxError::UnbalancedParens(_) => "unbalanced parentheses".to_string(),
                SyntaxError::MissingValue(_, _) => "missing required value".to_string(),
                SyntaxError::UnknownStatement(_, keyword) => {
                    format!("unknown statement '{}'", keyword)
                }
                SyntaxError::StrayComparison(_) => "comparison not allowed here".to_string(),
                SyntaxError::MisplacedStatement(_, keyword) => {
                    format!("'{}' is not allowed here", keyword)
                }
                SyntaxError::UnexpectedIndent(_) => "unexpected indentation".to_string(),
                SyntaxError::Expected(_, value) => format!("expected {}", value),
            },
            ParsingError::Reference(error) => match error {
                ReferenceError::UnknownGroup(_, name) => format!("unknown group '{}'", name),
                ReferenceError::UnresolvedLoad(_, path, _) => format!("cannot load '{}'", path),
            },
            ParsingError::Cycle(error) => match error {
                CycleError::Include(_, _) => "circular include".to_string(),
                CycleError::Load(_, _) => "circular load".to_string(),
            },
        }
    }

    pub fn details(&self) -> String {
        match self {
            ParsingError::Lex(error) => match error {
                LexError::InconsistentIndent(_) => {
                    "Indentation must be a whole multiple of the unit established by the \
                     first indented line, and can only deepen one level at a time."
                        .to_string()
                }
                LexError::TabIndent(_) => {
                    "Indent with spaces; tabs are not allowed in leading whitespace.".to_string()
                }
                LexError::UnterminatedString(_) => {
                    "The quote opened here is never closed.".to_string()
                }
            },
            ParsingError::Syntax(error) => match error {
                SyntaxError::UnbalancedParens(_) => {
                    "The argument list opened here is never closed.".to_string()
                }
                SyntaxError::MissingValue(_, what) => {
                    format!("This statement requires {}.", what)
                }
                SyntaxError::StrayComparison(_) => {
                    "A == comparison is only meaningful as the argument of an expect \
                     statement."
                        .to_string()
                }
                SyntaxError::UnexpectedIndent(_) => {
                    "The preceding statement does not open a block, so nothing can be \
                     nested under it."
                        .to_string()
                }
                _ => String::new(),
            },
            ParsingError::Reference(error) => match error {
                ReferenceError::UnknownGroup(_, _) => {
                    "include requires a group defined earlier in this file or in a file \
                     loaded before this point."
                        .to_string()
                }
                ReferenceError::UnresolvedLoad(_, _, details) => details.clone(),
            },
            ParsingError::Cycle(error) => match error {
                CycleError::Include(_, chain) => format!("Group inclusion loops: {}.", chain),
                CycleError::Load(_, path) => {
                    format!("{} is already being loaded.", path.to_string_lossy())
                }
            },
        }
    }
}

impl<'i> From<LexError> for ParsingError<'i> {
    fn from(error: LexError) -> Self {
        ParsingError::Lex(error)
    }
}

impl<'i> From<SyntaxError<'i>> for ParsingError<'i> {
    fn from(error: SyntaxError<'i>) -> Self {
        ParsingError::Syntax(error)
    }
}

impl<'i> From<ReferenceError> for ParsingError<'i> {
    fn from(error: ReferenceError) -> Self {
        ParsingError::Reference(error)
    }
}

impl<'i> From<CycleError> for ParsingError<'i> {
    fn from(error: CycleError) -> Self {
        ParsingError::Cycle(error)
    }
}

/// What the builder propagates. Either an ordinary parse error in the file
/// currently being parsed, or an already-rendered diagnostic from a file a
/// `load` statement pulled in, tagged with the load statement's offset so
/// the caller can wrap it with a location in the outer file.
#[derive(Debug)]
pub enum BuildError<'i> {
    Parsing(ParsingError<'i>),
    Loaded { offset: usize, inner: Box<PacerError> },
}

impl<'i> From<ParsingError<'i>> for BuildError<'i> {
    fn from(error: ParsingError<'i>) -> Self {
        BuildError::Parsing(error)
    }
}

impl<'i> From<LexError> for BuildError<'i> {
    fn from(error: LexError) -> Self {
        BuildError::Parsing(error.into())
    }
}

impl<'i> From<SyntaxError<'i>> for BuildError<'i> {
    fn from(error: SyntaxError<'i>) -> Self {
        BuildError::Parsing(error.into())
    }
}

impl<'i> From<ReferenceError> for BuildError<'i> {
    fn from(error: ReferenceError) -> Self {
        BuildError::Parsing(error.into())
    }
}

impl<'i> From<CycleError> for BuildError<'i> {
    fn from(error: CycleError) -> Self {
        BuildError::Parsing(error.into())
    }
}
