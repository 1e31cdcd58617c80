//! Testing utilities for blockconf workspace
//!
//! Shared fixtures, tree strategies and file helpers.

#![allow(missing_docs)]

use blockconf::Node;
use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two trees, one with a broken branch and three leaves
pub const FOREST: &str = "\
tree{
 name = cool tree

 trunk{
   type = big and ugly
   size = 10 #I'm a comment, size is in meters
 }

 branch{
   broken=yes
 }

 branch{
   broken=no
   leave{} #default color = green


   leave{
     color=yellow
   }

   leave{
     color=yellow
   }
 }
}


tree{
 name = dead tree
 trunk{
   type = small
   size = 2
 }
}
";

/// The compact three-branch scenario, with one-line blocks
pub const COMPACT_TREE: &str = "\
tree{
 name = cool tree
 branch{ broken=yes }
 branch{ broken=no }
}
";

pub fn forest() -> Node {
    Node::parse_str(FOREST).unwrap()
}

/// Write `text` to `name` inside a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_fixture(name: &str, text: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

/// Keys the parser reproduces exactly: no `=`, `{`, `}` or `#`, no outer spaces
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_.-]{0,8}"
}

/// Values the parser reproduces exactly: no `#`, no outer spaces
pub fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.,:/={}-]{0,16}".prop_map(|s| s.trim().to_string())
}

/// Arbitrary trees up to `depth` levels of nesting
pub fn node_strategy(depth: u32) -> impl Strategy<Value = Node> {
    let leaf = prop::collection::vec((key_strategy(), value_strategy()), 0..6).prop_map(|values| {
        values
            .iter()
            .fold(Node::builder(), |b, (k, v)| b.value(k, v))
            .build()
    });

    leaf.prop_recursive(depth, 48, 4, |inner| {
        (
            prop::collection::vec((key_strategy(), value_strategy()), 0..6),
            prop::collection::vec((key_strategy(), inner), 0..4),
        )
            .prop_map(|(values, children)| {
                let builder = values
                    .iter()
                    .fold(Node::builder(), |b, (k, v)| b.value(k, v));
                children
                    .into_iter()
                    .fold(builder, |b, (k, child)| b.child(&k, child))
                    .build()
            })
    })
}
