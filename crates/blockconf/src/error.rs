//! Error types for blockconf
//!
//! One enum, [`Error`], covers:
//! - Structural parse failures (malformed line, bad nesting)
//! - Accessor cardinality violations (missing / multiple values or blocks)
//! - Yes/no coercion and typed conversion failures
//! - Upstream source failures, passed through unchanged
//!
//! Accessor errors never invalidate the tree; the caller can keep querying.

use crate::convert::ConvertError;
use blockconf_source::SourceError;
use std::fmt;

/// Why a line (or the block structure) was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// Non-whitespace after `{` on an open-block line
    StrayAfterOpen,
    /// Non-whitespace after a lone `}`
    StrayAfterClose,
    /// Non-whitespace after `{}` on an empty-block line
    StrayAfterEmpty,
    /// Identifier text before a closing `}`
    IdentBeforeClose,
    /// None of `=`, `{`, `}` or `#` on the line
    Undefined,
    /// `}` with no block open
    UnexpectedClose,
    /// End of input inside a block
    Unterminated {
        /// Key of the innermost open block
        key: String,
        /// Line that opened it
        opened_at: usize,
    },
    /// Nesting deeper than the configured limit
    TooDeep {
        /// Configured limit
        max: usize,
    },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrayAfterOpen => write!(f, "unexpected character after '{{'"),
            Self::StrayAfterClose => write!(f, "unexpected character after '}}'"),
            Self::StrayAfterEmpty => write!(f, "unexpected character after '{{}}'"),
            Self::IdentBeforeClose => write!(f, "identifier before '}}'"),
            Self::Undefined => write!(f, "expected '=', '{{', '}}' or '#'"),
            Self::UnexpectedClose => write!(f, "'}}' without matching '{{'"),
            Self::Unterminated { key, opened_at } => {
                write!(f, "block '{key}' opened at line {opened_at} is never closed")
            }
            Self::TooDeep { max } => write!(f, "blocks nested deeper than {max}"),
        }
    }
}

/// blockconf error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input; the whole parse is aborted
    #[error("parse error in {path} line {line}: {kind}")]
    Parse {
        kind: SyntaxError,
        path: String,
        line: usize,
    },

    /// No value for a key that requires one
    #[error("missing value: key={key}")]
    MissingValue { key: String },

    /// More than one value where exactly one is required
    #[error("multiple values: key={key} values={values:?}")]
    MultipleValues { key: String, values: Vec<String> },

    /// No block for a key that requires one
    #[error("missing block: key={key}")]
    MissingBlock { key: String },

    /// More than one block where exactly one is required
    #[error("multiple blocks: key={key} count={count}")]
    MultipleBlocks { key: String, count: usize },

    /// Value is not one of `y`, `yes`, `n`, `no`
    #[error("invalid yes/no value: key={key} value={value}")]
    InvalidBoolean { key: String, value: String },

    /// String to typed value conversion failed
    #[error(transparent)]
    Conversion(#[from] ConvertError),

    /// The line source failed (open, read, decompress)
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Error {
    /// Create parse error
    pub fn parse(kind: SyntaxError, path: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            kind,
            path: path.into(),
            line,
        }
    }

    /// Structural parse failure?
    #[inline]
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Missing or multiple value/block?
    #[inline]
    #[must_use]
    pub fn is_cardinality(&self) -> bool {
        matches!(
            self,
            Self::MissingValue { .. }
                | Self::MultipleValues { .. }
                | Self::MissingBlock { .. }
                | Self::MultipleBlocks { .. }
        )
    }

    /// Offending key, for accessor errors
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingValue { key }
            | Self::MultipleValues { key, .. }
            | Self::MissingBlock { key }
            | Self::MultipleBlocks { key, .. }
            | Self::InvalidBoolean { key, .. } => Some(key),
            Self::Parse { .. } | Self::Conversion(_) | Self::Source(_) => None,
        }
    }
}

/// Result type alias for blockconf operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
