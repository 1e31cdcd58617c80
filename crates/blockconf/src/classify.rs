//! Single-line classification
//!
//! Every non-blank line of a blockconf file is exactly one of:
//!
//! ```text
//! comment     := [ws]* '#' any*
//! assignment  := ident '=' text ['#' any*]
//! open-block  := ident '{' [ws]* ['#' any*]
//! close-block := '}' [ws]* ['#' any*]
//! empty-block := ident '{' [ws]* '}' [ws]* ['#' any*]
//! inline      := ident '{' [ws]* ident '=' plain '}' [ws]* ['#' any*]
//! ```
//!
//! `plain` is text without `{` or `}`. `inline` is shorthand for a block
//! holding a single assignment, so `branch{ broken=yes }` reads the same as
//! the three-line form.
//!
//! Classification is purely local to the line; nesting is the parser's job.

use crate::error::SyntaxError;

/// What one trimmed, non-empty line means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// Whole line is a comment
    Comment,
    /// `key = value`
    Value { key: &'a str, value: &'a str },
    /// `key {`
    OpenBlock { key: &'a str },
    /// `}`
    CloseBlock,
    /// `key {}`
    EmptyBlock { key: &'a str },
    /// `key { inner = value }`
    InlineBlock {
        key: &'a str,
        inner: &'a str,
        value: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ident,
    Value { start: usize },
    Open,
    Close,
    Empty,
}

/// Classify one line
///
/// `#` ends scanning wherever it appears. Before any of `=`, `{`, `}` it
/// turns the whole line into a comment; after one of them it is an inline
/// comment and the text already scanned is kept.
///
/// # Errors
/// Returns the [`SyntaxError`] describing why the line is malformed
pub fn classify(line: &str) -> Result<LineEvent<'_>, SyntaxError> {
    let mut mode = Mode::Ident;
    let mut ident_end = line.len();
    let mut end = line.len();

    for (i, c) in line.char_indices() {
        if c == '#' {
            if mode == Mode::Ident {
                return Ok(LineEvent::Comment);
            }
            end = i;
            break;
        }

        match mode {
            Mode::Ident => match c {
                '=' => {
                    ident_end = i;
                    mode = Mode::Value { start: i + 1 };
                }
                '{' => {
                    ident_end = i;
                    mode = Mode::Open;
                }
                '}' => {
                    ident_end = i;
                    mode = Mode::Close;
                }
                _ => {}
            },
            Mode::Value { .. } => {}
            Mode::Open => {
                if c == '}' {
                    mode = Mode::Empty;
                } else if !c.is_whitespace() {
                    let key = line[..ident_end].trim();
                    return inline_block(key, &line[i..]).ok_or(SyntaxError::StrayAfterOpen);
                }
            }
            Mode::Close => {
                if !c.is_whitespace() {
                    return Err(SyntaxError::StrayAfterClose);
                }
            }
            Mode::Empty => {
                if !c.is_whitespace() {
                    return Err(SyntaxError::StrayAfterEmpty);
                }
            }
        }
    }

    let key = line[..ident_end].trim();
    match mode {
        Mode::Ident => Err(SyntaxError::Undefined),
        Mode::Value { start } => Ok(LineEvent::Value {
            key,
            value: line[start..end].trim(),
        }),
        Mode::Open => Ok(LineEvent::OpenBlock { key }),
        Mode::Empty => Ok(LineEvent::EmptyBlock { key }),
        Mode::Close if key.is_empty() => Ok(LineEvent::CloseBlock),
        Mode::Close => Err(SyntaxError::IdentBeforeClose),
    }
}

/// Body of a one-line block: `inner = value }`, optionally followed by a comment
///
/// The value may not contain braces, so `x{ a = b } }` or `x{ a = b {}` are
/// rejected rather than read as a value ending in a brace.
fn inline_block<'a>(key: &'a str, rest: &'a str) -> Option<LineEvent<'a>> {
    let body = match rest.find('#') {
        Some(i) => &rest[..i],
        None => rest,
    };
    let body = body.trim_end().strip_suffix('}')?;
    match classify(body).ok()? {
        LineEvent::Value { key: inner, value } if !value.contains(['{', '}']) => {
            Some(LineEvent::InlineBlock { key, inner, value })
        }
        _ => None,
    }
}
