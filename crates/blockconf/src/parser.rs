//! Block parser
//!
//! Consumes a line source and builds the [`Node`] tree. Nesting is tracked with
//! an explicit stack of open frames rather than native recursion. The depth
//! limit is capped at [`MAX_DEPTH_CEILING`] because the finished tree is still
//! cloned, compared and printed recursively.
//!
//! ```text
//! line source → classify() → frame stack → Node
//!                              ↑_____↓
//!                 OpenBlock pushes, CloseBlock pops into parent
//! ```

use crate::classify::{classify, LineEvent};
use crate::config::{BlockPolicy, ParserConfig, MAX_DEPTH_CEILING};
use crate::error::{Error, Result, SyntaxError};
use crate::node::Node;
use blockconf_source::SourceError;
use std::io::BufRead;
use std::path::Path;

/// A block whose closing `}` has not been seen yet
struct Frame {
    key: String,
    node: Node,
    opened_at: usize,
}

/// Parser for blockconf text
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create parser with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse every line of `reader`
    ///
    /// `label` identifies the input in error messages (usually its path).
    /// Line numbers count every physical line, blank and comment lines
    /// included.
    ///
    /// # Errors
    /// - `Error::Parse` on the first malformed line or nesting violation; no
    ///   partial tree is returned
    /// - `Error::Source` if reading from `reader` fails
    pub fn parse(&self, reader: impl BufRead, label: &str) -> Result<Node> {
        tracing::debug!(label, config = ?self.config, "parsing");

        let max_depth = self.config.effective_max_depth();
        let mut root = Node::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut line_num = 0;

        for line in reader.lines() {
            let line = line.map_err(|e| SourceError::read(label, e))?;
            line_num += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = classify(line).map_err(|kind| Error::parse(kind, label, line_num))?;
            let current = stack.last_mut().map_or(&mut root, |f| &mut f.node);

            match event {
                LineEvent::Comment => {}
                LineEvent::Value { key, value } => current.push_value(key, value),
                LineEvent::EmptyBlock { key } => current.push_child(key, Node::default()),
                LineEvent::InlineBlock { key, inner, value } => {
                    let child = Node::builder().value(inner, value).build();
                    current.push_child(key, child);
                }
                LineEvent::OpenBlock { key } => {
                    if stack.len() >= max_depth {
                        return Err(Error::parse(
                            SyntaxError::TooDeep { max: max_depth },
                            label,
                            line_num,
                        ));
                    }
                    tracing::trace!(key, line = line_num, depth = stack.len() + 1, "open block");
                    stack.push(Frame {
                        key: key.to_owned(),
                        node: Node::default(),
                        opened_at: line_num,
                    });
                }
                LineEvent::CloseBlock => match stack.pop() {
                    Some(frame) => {
                        tracing::trace!(key = %frame.key, line = line_num, "close block");
                        let parent = stack.last_mut().map_or(&mut root, |f| &mut f.node);
                        parent.push_child(&frame.key, frame.node);
                    }
                    None => match self.config.blocks {
                        BlockPolicy::Strict => {
                            return Err(Error::parse(SyntaxError::UnexpectedClose, label, line_num));
                        }
                        BlockPolicy::Lenient => {
                            tracing::warn!(label, line = line_num, "stray '}}' at top level, ignoring the rest of the input");
                            break;
                        }
                    },
                },
            }
        }

        if let Some(frame) = stack.last() {
            match self.config.blocks {
                BlockPolicy::Strict => {
                    return Err(Error::parse(
                        SyntaxError::Unterminated {
                            key: frame.key.clone(),
                            opened_at: frame.opened_at,
                        },
                        label,
                        line_num,
                    ));
                }
                BlockPolicy::Lenient => {
                    tracing::warn!(
                        label,
                        key = %frame.key,
                        opened_at = frame.opened_at,
                        open = stack.len(),
                        "end of input inside a block, closing it"
                    );
                    while let Some(frame) = stack.pop() {
                        let parent = stack.last_mut().map_or(&mut root, |f| &mut f.node);
                        parent.push_child(&frame.key, frame.node);
                    }
                }
            }
        }

        tracing::debug!(
            label,
            lines = line_num,
            values = root.value_keys().count(),
            blocks = root.children().count(),
            "parsed"
        );
        Ok(root)
    }

    /// Open `path` and parse it; `.gz` and `.zst` files are decompressed first
    ///
    /// # Errors
    /// - `Error::Source` if the file cannot be opened or read
    /// - `Error::Parse` on the first malformed line
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<Node> {
        let path = path.as_ref();
        let reader = blockconf_source::open(path)?;
        self.parse(reader, &path.display().to_string())
    }

    /// Parse a document held in memory
    ///
    /// # Errors
    /// Returns `Error::Parse` on the first malformed line
    pub fn parse_str(&self, text: &str, label: &str) -> Result<Node> {
        self.parse(text.as_bytes(), label)
    }
}
