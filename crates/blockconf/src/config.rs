//! Parser configuration

use serde::{Deserialize, Serialize};

/// Default maximum block nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard cap on [`ParserConfig::max_depth`]
///
/// `Node` clones, comparisons, printing and serialization recurse once per
/// nesting level; trees up to this depth stay well inside a 2 MiB thread stack.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// How unbalanced braces are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPolicy {
    /// Unclosed blocks at end of input and stray `}` are parse errors
    #[default]
    Strict,
    /// End of input closes every open block; a stray `}` at top level stops
    /// parsing and keeps what was read so far
    Lenient,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum block nesting depth, capped at [`MAX_DEPTH_CEILING`]
    pub max_depth: usize,
    /// Handling of unbalanced braces
    pub blocks: BlockPolicy,
}

impl ParserConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum nesting depth, clamped to [`MAX_DEPTH_CEILING`]
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    /// Depth limit the parser enforces
    #[inline]
    #[must_use]
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }

    /// With brace handling policy
    #[inline]
    #[must_use]
    pub fn with_blocks(mut self, blocks: BlockPolicy) -> Self {
        self.blocks = blocks;
        self
    }

    /// Lenient configuration (unclosed blocks are closed silently)
    #[inline]
    #[must_use]
    pub fn lenient() -> Self {
        Self::default().with_blocks(BlockPolicy::Lenient)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            blocks: BlockPolicy::Strict,
        }
    }
}
