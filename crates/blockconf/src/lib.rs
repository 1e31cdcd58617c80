//! blockconf
//!
//! Brace-delimited, multi-valued configuration files.
//!
//! ```text
//! tree{
//!   name = cool tree
//!   trunk{
//!     size = 10   # meters
//!   }
//!   branch{ broken=yes }
//!   branch{
//!     leave{}
//!   }
//! }
//! ```
//!
//! # Core Operations
//!
//! - **Parse**: text → [`Node`] tree ([`Parser`], [`Node::from_path`])
//! - **Query**: typed, cardinality-checked accessors on [`Node`]
//! - **Convert**: raw strings → typed values ([`FromValue`], [`ConvertRegistry`])
//! - **Print**: [`Node`] → normalized text (`Display`, [`Node::print`])
//!
//! # Architecture
//!
//! ```text
//! line source → classify → Parser → Node → accessors → caller
//!                                     │         ↑
//!                                     │   ConvertRegistry
//!                                     └→ printer → text
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use blockconf::Node;
//!
//! let forest = Node::from_path("forest.conf")?;
//! for tree in forest.find_blocks("tree") {
//!     let name: String = tree.get_unique_value("name")?;
//!     let size: usize = tree.get_unique_block("trunk")?.get_unique_value("size")?;
//!     for branch in tree.find_blocks("branch") {
//!         if branch.get_yes_no_or("broken", false)? {
//!             continue;
//!         }
//!         for leave in branch.find_blocks("leave") {
//!             let color = leave.get_unique_value_or("color", "green".to_string())?;
//!             println!("{name} ({size}m): {color}");
//!         }
//!     }
//! }
//! # Ok::<(), blockconf::Error>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod access;
pub mod classify;
pub mod config;
pub mod convert;
pub mod error;
mod node;
pub mod parser;
mod printer;

// Re-exports for convenience
pub use classify::{classify, LineEvent};
pub use config::{BlockPolicy, ParserConfig, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
pub use convert::{ConvertError, ConvertRegistry, FromValue};
pub use error::{Error, Result, SyntaxError};
pub use node::{Node, NodeBuilder, ANONYMOUS};
pub use parser::Parser;

/// Re-export of the line source crate
pub use blockconf_source as source;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for reading blockconf files
    pub use crate::{ConvertRegistry, Error, FromValue, Node, Parser, ParserConfig, Result};
}
