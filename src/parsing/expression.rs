//! the expression sub-language
//!
//! Parses the argument text of a statement into an [`Expression`] tree.
//! Nothing is evaluated here; every node keeps the exact source substring
//! it came from so the execution engine receives values verbatim, quotes
//! included.
//!
//! Precedence, low to high: `==` comparison (only via
//! [`parse_comparison`], i.e. only as the whole argument of an `expect`
//! statement), `~` concatenation (left-associative), postfix
//! `.method(args)` chaining, primaries.

use crate::language::{Expression, ExpressionKind, MethodCall, Numeric};
use crate::parsing::errors::{LexError, ParsingError, SyntaxError};

/// Parse an entire argument text as one expression. A top-level `==` is
/// rejected here; comparisons belong to `expect` statements only.
pub fn parse_expression(text: &str, base: usize) -> Result<Expression, ParsingError<'_>> {
    let mut cursor = Cursor::new(text, base);

    cursor.trim_whitespace();
    cursor.ensure_nonempty()?;

    let expression = cursor.read_concat()?;

    cursor.trim_whitespace();
    if !cursor.is_finished() {
        if cursor
            .remaining()
            .starts_with("==")
        {
            return Err(SyntaxError::StrayComparison(cursor.offset()).into());
        }
        return Err(cursor.unexpected());
    }

    Ok(expression)
}

/// Parse the argument of an `expect` statement: either a plain expression
/// or `left == right`.
pub fn parse_comparison(text: &str, base: usize) -> Result<Expression, ParsingError<'_>> {
    let mut cursor = Cursor::new(text, base);

    cursor.trim_whitespace();
    cursor.ensure_nonempty()?;

    let start = cursor.pos();
    let left = cursor.read_concat()?;

    cursor.trim_whitespace();
    if cursor.is_finished() {
        return Ok(left);
    }

    if !cursor
        .remaining()
        .starts_with("==")
    {
        return Err(cursor.unexpected());
    }
    cursor.advance(2);

    cursor.trim_whitespace();
    cursor.ensure_nonempty()?;
    let right = cursor.read_concat()?;

    cursor.trim_whitespace();
    if !cursor.is_finished() {
        return Err(cursor.unexpected());
    }

    let raw = cursor
        .span(start)
        .to_string();
    Ok(Expression {
        kind: ExpressionKind::Compare {
            left: Box::new(left),
            op: "==".to_string(),
            right: Box::new(right),
        },
        raw,
    })
}

/// Character-level parse state over one statement's argument text. The
/// original slice stays around so nodes can carry their exact source
/// spans; `base` is the absolute offset of that text within the file, so
/// reported offsets line up with the scanner's records.
struct Cursor<'i> {
    original: &'i str,
    source: &'i str,
    base: usize,
}

impl<'i> Cursor<'i> {
    fn new(text: &'i str, base: usize) -> Cursor<'i> {
        Cursor {
            original: text,
            source: text,
            base,
        }
    }

    // position within the statement text; source is always a suffix of
    // original.
    fn pos(&self) -> usize {
        self.original
            .len()
            - self
                .source
                .len()
    }

    // absolute position within the file
    fn offset(&self) -> usize {
        self.base + self.pos()
    }

    fn remaining(&self) -> &'i str {
        self.source
    }

    fn span(&self, start: usize) -> &'i str {
        &self.original[start..self.pos()]
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
    }

    fn trim_whitespace(&mut self) {
        let trimmed = self
            .source
            .trim_start();
        self.source = trimmed;
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn ensure_nonempty(&self) -> Result<(), ParsingError<'i>> {
        if self.is_finished() {
            return Err(SyntaxError::MissingValue(self.offset(), "an expression").into());
        }
        Ok(())
    }

    fn unexpected(&self) -> ParsingError<'i> {
        match self.peek_next_char() {
            Some(c) => SyntaxError::UnexpectedToken(self.offset(), c).into(),
            None => SyntaxError::MissingValue(self.offset(), "an expression").into(),
        }
    }

    fn read_concat(&mut self) -> Result<Expression, ParsingError<'i>> {
        let start = self.pos();
        let mut expression = self.read_chain()?;

        loop {
            self.trim_whitespace();
            if self.peek_next_char() != Some('~') {
                break;
            }
            self.advance(1);
            self.trim_whitespace();
            self.ensure_nonempty()?;

            let right = self.read_chain()?;
            let raw = self
                .span(start)
                .to_string();
            expression = Expression {
                kind: ExpressionKind::Concat(Box::new(expression), Box::new(right)),
                raw,
            };
        }

        Ok(expression)
    }

    fn read_chain(&mut self) -> Result<Expression, ParsingError<'i>> {
        let start = self.pos();
        let base = self.read_primary(false)?;

        let mut calls = Vec::new();
        while self.chains_next() {
            self.advance(1);
            let name = self.read_identifier()?;
            if self.peek_next_char() != Some('(') {
                return Err(SyntaxError::Expected(self.offset(), "an argument list").into());
            }
            let args = self.read_arguments(true)?;
            calls.push(MethodCall {
                name: name.to_string(),
                args,
            });
        }

        if calls.is_empty() {
            return Ok(base);
        }

        let raw = self
            .span(start)
            .to_string();
        Ok(Expression {
            kind: ExpressionKind::Chain {
                base: Box::new(base),
                calls,
            },
            raw,
        })
    }

    // a '.' immediately followed by a letter continues a method chain;
    // anything else (including whitespace before the dot) ends it.
    fn chains_next(&self) -> bool {
        let mut chars = self
            .source
            .chars();
        if chars.next() != Some('.') {
            return false;
        }
        match chars.next() {
            Some(c) => c.is_ascii_alphabetic() || c == '_',
            None => false,
        }
    }

    fn read_primary(&mut self, current_allowed: bool) -> Result<Expression, ParsingError<'i>> {
        self.trim_whitespace();
        let start = self.pos();

        let c = match self.peek_next_char() {
            Some(c) => c,
            None => {
                return Err(SyntaxError::MissingValue(self.offset(), "an expression").into());
            }
        };

        if c == '\'' || c == '"' {
            return self.read_string();
        }

        if c.is_ascii_digit() || c == '-' {
            return self.read_number();
        }

        if c == '@' {
            if !current_allowed {
                return Err(SyntaxError::UnexpectedToken(self.offset(), '@').into());
            }
            self.advance(1);
            return Ok(Expression {
                kind: ExpressionKind::Current,
                raw: "@".to_string(),
            });
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let name = self.read_identifier()?;

            if name == "true" || name == "false" {
                return Ok(Expression {
                    kind: ExpressionKind::Bool(name == "true"),
                    raw: name.to_string(),
                });
            }

            if self.peek_next_char() == Some('(') {
                let args = self.read_arguments(false)?;
                let raw = self
                    .span(start)
                    .to_string();
                return Ok(Expression {
                    kind: ExpressionKind::Call {
                        name: name.to_string(),
                        args,
                    },
                    raw,
                });
            }

            return Ok(Expression {
                kind: ExpressionKind::Variable(name.to_string()),
                raw: name.to_string(),
            });
        }

        Err(SyntaxError::UnexpectedToken(self.offset(), c).into())
    }

    /// Consume a quoted string. Content is taken verbatim between the
    /// matching quote characters; there is no escape processing.
    fn read_string(&mut self) -> Result<Expression, ParsingError<'i>> {
        let opening = self.offset();
        let quote = self
            .peek_next_char()
            .unwrap();

        let inner = &self.source[1..];
        let end = match inner.find(quote) {
            Some(i) => i,
            None => return Err(LexError::UnterminatedString(opening).into()),
        };

        let value = &inner[..end];
        let width = end + 2;
        let raw = &self.source[..width];

        let expression = Expression {
            kind: ExpressionKind::String(value.to_string()),
            raw: raw.to_string(),
        };
        self.advance(width);

        Ok(expression)
    }

    fn read_number(&mut self) -> Result<Expression, ParsingError<'i>> {
        let start = self.pos();
        let content = self.source;

        let mut width = 0;
        if content.starts_with('-') {
            width += 1;
        }
        width += digits(&content[width..]);
        if width == 0 || (width == 1 && content.starts_with('-')) {
            return Err(SyntaxError::Expected(self.offset(), "a number").into());
        }

        // a '.' followed by a digit extends this into a decimal; a '.'
        // followed by a letter is a method chain on the integer.
        let mut decimal = false;
        if content[width..].starts_with('.') {
            let fraction = digits(&content[width + 1..]);
            if fraction > 0 {
                decimal = true;
                width += 1 + fraction;
            }
        }

        self.advance(width);
        let raw = self.span(start);

        let kind = if decimal {
            ExpressionKind::Number(Numeric::Decimal(raw.to_string()))
        } else {
            let value = raw
                .parse::<i64>()
                .map_err(|_| SyntaxError::Expected(self.base + start, "a representable integer"))?;
            ExpressionKind::Number(Numeric::Integral(value))
        };

        Ok(Expression {
            kind,
            raw: raw.to_string(),
        })
    }

    fn read_identifier(&mut self) -> Result<&'i str, ParsingError<'i>> {
        let content = self.source;
        let end = content
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(content.len());

        if end == 0 {
            return Err(SyntaxError::Expected(self.offset(), "an identifier").into());
        }

        self.advance(end);
        Ok(&content[..end])
    }

    /// Consume a parenthesized, comma-separated argument list, possibly
    /// empty. In the arguments of a chained method call (and only there) a
    /// bare `@` is a valid argument.
    fn read_arguments(&mut self, in_method: bool) -> Result<Vec<Expression>, ParsingError<'i>> {
        let opening = self.offset();
        self.advance(1); // consume '('

        let mut args = Vec::new();
        loop {
            self.trim_whitespace();

            match self.peek_next_char() {
                Some(')') => {
                    self.advance(1);
                    break;
                }
                None => return Err(SyntaxError::UnbalancedParens(opening).into()),
                _ => {}
            }

            let arg = if in_method && self.peek_next_char() == Some('@') {
                self.read_primary(true)?
            } else {
                self.read_concat()?
            };
            args.push(arg);

            self.trim_whitespace();
            match self.peek_next_char() {
                Some(',') => {
                    self.advance(1);
                }
                Some(')') => {
                    self.advance(1);
                    break;
                }
                Some(c) => {
                    return Err(SyntaxError::UnexpectedToken(self.offset(), c).into());
                }
                None => return Err(SyntaxError::UnbalancedParens(opening).into()),
            }
        }

        Ok(args)
    }
}

// width of the run of ascii digits at the front of content
fn digits(content: &str) -> usize {
    content
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(content.len())
}
