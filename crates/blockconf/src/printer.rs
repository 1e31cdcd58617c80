//! Serializer back to blockconf text
//!
//! Output is the normalized form: one `key=value` line per value, blocks as
//! `key{` … `}`, two spaces of indentation per level. Comments and source
//! spacing are not kept, but parsing the output of a parsed tree gives the
//! same tree back.

use crate::node::Node;
use std::fmt;
use std::io;

const INDENT: &str = "  ";

impl Node {
    /// Write this node's content at `indent` levels
    ///
    /// # Errors
    /// Propagates errors from `out`
    pub fn print<W: fmt::Write>(&self, out: &mut W, indent: usize) -> fmt::Result {
        let pad = INDENT.repeat(indent);

        for (key, values) in self.values() {
            for value in values {
                writeln!(out, "{pad}{key}={value}")?;
            }
        }

        for (key, child) in self.children() {
            writeln!(out, "{pad}{key}{{")?;
            child.print(out, indent + 1)?;
            writeln!(out, "{pad}}}")?;
        }

        Ok(())
    }

    /// Write the normalized text to an `io::Write` sink
    ///
    /// # Errors
    /// Propagates I/O errors from `out`
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.to_string().as_bytes())?;
        out.flush()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f, 0)
    }
}
