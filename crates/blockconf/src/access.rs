//! Typed accessors over a [`Node`]
//!
//! Every query is local: a failed lookup returns an error describing the
//! offending key and leaves the tree untouched.
//!
//! | Query | Zero entries | One entry | Several entries |
//! |-------|--------------|-----------|-----------------|
//! | `get_values` | `MissingValue` | `[v]` | `[v1, v2, ..]` |
//! | `find_values` | `[]` | `[v]` | `[v1, v2, ..]` |
//! | `get_unique_value` | `MissingValue` | `v` | `MultipleValues` |
//! | `get_unique_value_or` | default | `v` | `MultipleValues` |
//! | `get_blocks` | `MissingBlock` | `[b]` | `[b1, b2, ..]` |
//! | `find_blocks` | `[]` | `[b]` | `[b1, b2, ..]` |
//! | `get_unique_block` | `MissingBlock` | `b` | `MultipleBlocks` |
//!
//! Blocks are returned as shared references bounded by the tree's lifetime;
//! clone one to get an owned copy.

use crate::convert::{ConvertError, ConvertRegistry, FromValue};
use crate::error::{Error, Result};
use crate::node::Node;
use std::any::Any;

const YES: [&str; 2] = ["y", "yes"];
const NO: [&str; 2] = ["n", "no"];

impl Node {
    /// Number of values for `key` (0 if unknown)
    #[inline]
    #[must_use]
    pub fn count_values(&self, key: &str) -> usize {
        self.raw_values(key).len()
    }

    /// Number of child blocks named `key` (0 if unknown)
    #[must_use]
    pub fn count_blocks(&self, key: &str) -> usize {
        self.children().filter(|(k, _)| *k == key).count()
    }

    /// At least one value for `key`
    #[inline]
    #[must_use]
    pub fn has_value(&self, key: &str) -> bool {
        self.count_values(key) > 0
    }

    /// Exactly one value for `key`
    #[inline]
    #[must_use]
    pub fn has_unique_value(&self, key: &str) -> bool {
        self.count_values(key) == 1
    }

    /// Every value for `key`, converted, in source order
    ///
    /// # Errors
    /// - `Error::MissingValue` if `key` has no value
    /// - `Error::Conversion` if a value does not convert
    pub fn get_values<T: FromValue>(&self, key: &str) -> Result<Vec<T>> {
        self.required_values(key)?;
        self.convert_all(key, T::from_value)
    }

    /// Like [`Node::get_values`], but an unknown key yields an empty list
    ///
    /// # Errors
    /// Returns `Error::Conversion` if a value does not convert
    pub fn find_values<T: FromValue>(&self, key: &str) -> Result<Vec<T>> {
        self.convert_all(key, T::from_value)
    }

    /// [`Node::get_values`] using conversions from `registry`
    ///
    /// # Errors
    /// Same as [`Node::get_values`]; also fails if `T` is not registered
    pub fn get_values_with<T: Any>(&self, registry: &ConvertRegistry, key: &str) -> Result<Vec<T>> {
        self.required_values(key)?;
        self.convert_all(key, |raw| registry.convert::<T>(raw))
    }

    /// The single value for `key`, converted
    ///
    /// # Errors
    /// - `Error::MissingValue` if `key` has no value
    /// - `Error::MultipleValues` if it has more than one
    /// - `Error::Conversion` if the value does not convert
    pub fn get_unique_value<T: FromValue>(&self, key: &str) -> Result<T> {
        Ok(T::from_value(self.unique_raw(key)?)?)
    }

    /// [`Node::get_unique_value`] using conversions from `registry`
    ///
    /// # Errors
    /// Same as [`Node::get_unique_value`]; also fails if `T` is not registered
    pub fn get_unique_value_with<T: Any>(&self, registry: &ConvertRegistry, key: &str) -> Result<T> {
        Ok(registry.convert::<T>(self.unique_raw(key)?)?)
    }

    /// The single value for `key`, or `default` if the key is absent
    ///
    /// `default` is returned as is; no conversion is attempted.
    ///
    /// # Errors
    /// - `Error::MultipleValues` if `key` has more than one value
    /// - `Error::Conversion` if the value does not convert
    pub fn get_unique_value_or<T: FromValue>(&self, key: &str, default: T) -> Result<T> {
        match self.optional_raw(key)? {
            Some(raw) => Ok(T::from_value(raw)?),
            None => Ok(default),
        }
    }

    /// [`Node::get_unique_value_or`] using conversions from `registry`
    ///
    /// # Errors
    /// Same as [`Node::get_unique_value_or`]; also fails if `T` is not registered
    pub fn get_unique_value_or_with<T: Any>(
        &self,
        registry: &ConvertRegistry,
        key: &str,
        default: T,
    ) -> Result<T> {
        match self.optional_raw(key)? {
            Some(raw) => Ok(registry.convert::<T>(raw)?),
            None => Ok(default),
        }
    }

    /// Every child block named `key`, in source order
    ///
    /// # Errors
    /// Returns `Error::MissingBlock` if there is none
    pub fn get_blocks(&self, key: &str) -> Result<Vec<&Node>> {
        let blocks = self.find_blocks(key);
        if blocks.is_empty() {
            return Err(Error::MissingBlock {
                key: key.to_owned(),
            });
        }
        Ok(blocks)
    }

    /// Every child block named `key`; empty if there is none
    #[must_use]
    pub fn find_blocks(&self, key: &str) -> Vec<&Node> {
        self.children()
            .filter(|(k, _)| *k == key)
            .map(|(_, node)| node)
            .collect()
    }

    /// The single child block named `key`
    ///
    /// # Errors
    /// - `Error::MissingBlock` if there is none
    /// - `Error::MultipleBlocks` if there is more than one
    pub fn get_unique_block(&self, key: &str) -> Result<&Node> {
        let mut blocks = self.get_blocks(key)?;
        if blocks.len() > 1 {
            return Err(Error::MultipleBlocks {
                key: key.to_owned(),
                count: blocks.len(),
            });
        }
        Ok(blocks.swap_remove(0))
    }

    /// Follow unique blocks down `path`
    ///
    /// An empty path returns `self`.
    ///
    /// # Errors
    /// Fails on the first segment that is missing or ambiguous, like
    /// [`Node::get_unique_block`]
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Result<&Node> {
        path.iter()
            .try_fold(self, |node, key| node.get_unique_block(key.as_ref()))
    }

    /// `y`/`yes` → `true`, `n`/`no` → `false` (case-sensitive)
    ///
    /// # Errors
    /// - `Error::MissingValue` / `Error::MultipleValues` unless exactly one value
    /// - `Error::InvalidBoolean` for any other value
    pub fn get_yes_no(&self, key: &str) -> Result<bool> {
        yes_no(key, self.unique_raw(key)?)
    }

    /// Like [`Node::get_yes_no`], but returns `default` when the key is absent
    /// or its single value is empty
    ///
    /// # Errors
    /// - `Error::MultipleValues` if `key` has more than one value
    /// - `Error::InvalidBoolean` for a non-empty value other than y/yes/n/no
    pub fn get_yes_no_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.optional_raw(key)? {
            None | Some("") => Ok(default),
            Some(raw) => yes_no(key, raw),
        }
    }

    fn required_values(&self, key: &str) -> Result<&[String]> {
        let values = self.raw_values(key);
        if values.is_empty() {
            return Err(Error::MissingValue {
                key: key.to_owned(),
            });
        }
        Ok(values)
    }

    fn unique_raw(&self, key: &str) -> Result<&str> {
        match self.required_values(key)? {
            [only] => Ok(only.as_str()),
            values => Err(multiple(key, values)),
        }
    }

    fn optional_raw(&self, key: &str) -> Result<Option<&str>> {
        match self.raw_values(key) {
            [] => Ok(None),
            [only] => Ok(Some(only.as_str())),
            values => Err(multiple(key, values)),
        }
    }

    fn convert_all<T>(
        &self,
        key: &str,
        convert: impl Fn(&str) -> Result<T, ConvertError>,
    ) -> Result<Vec<T>> {
        self.raw_values(key)
            .iter()
            .map(|raw| convert(raw).map_err(Error::from))
            .collect()
    }
}

fn multiple(key: &str, values: &[String]) -> Error {
    Error::MultipleValues {
        key: key.to_owned(),
        values: values.to_vec(),
    }
}

fn yes_no(key: &str, raw: &str) -> Result<bool> {
    if YES.contains(&raw) {
        Ok(true)
    } else if NO.contains(&raw) {
        Ok(false)
    } else {
        Err(Error::InvalidBoolean {
            key: key.to_owned(),
            value: raw.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample() -> Node {
        Node::builder()
            .value("name", "cool tree")
            .values("size", ["10", "12"])
            .value("count", "7")
            .value("bad_count", "7x")
            .value("empty", "")
            .value("broken", "yes")
            .value("maybe", "maybe")
            .value("upper", "YES")
            .child("trunk", Node::builder().value("type", "big").build())
            .empty_child("leave")
            .child("leave", Node::builder().value("color", "yellow").build())
            .build()
    }

    #[test]
    fn counts() {
        let node = sample();
        assert_eq!(node.count_values("size"), 2);
        assert_eq!(node.count_values("missing"), 0);
        assert_eq!(node.count_blocks("leave"), 2);
        assert_eq!(node.count_blocks("missing"), 0);
    }

    #[test]
    fn has_value() {
        let node = sample();
        assert!(node.has_value("size"));
        assert!(!node.has_unique_value("size"));
        assert!(node.has_unique_value("name"));
        assert!(node.has_unique_value("empty"));
        assert!(!node.has_value("missing"));
    }

    #[test]
    fn get_values_converts_in_order() {
        let node = sample();
        assert_eq!(node.get_values::<u32>("size").unwrap(), [10, 12]);
        assert_eq!(node.get_values::<String>("name").unwrap(), ["cool tree"]);
    }

    #[test]
    fn get_values_missing() {
        let node = sample();
        let err = node.get_values::<String>("missing").unwrap_err();
        assert!(matches!(err, Error::MissingValue { ref key } if key == "missing"));
        assert!(node.find_values::<String>("missing").unwrap().is_empty());
    }

    #[test]
    fn get_unique_value() {
        let node = sample();
        assert_eq!(node.get_unique_value::<String>("name").unwrap(), "cool tree");
        assert_eq!(node.get_unique_value::<usize>("count").unwrap(), 7);

        match node.get_unique_value::<u32>("size").unwrap_err() {
            Error::MultipleValues { key, values } => {
                assert_eq!(key, "size");
                assert_eq!(values, ["10", "12"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            node.get_unique_value::<String>("missing"),
            Err(Error::MissingValue { .. })
        ));
    }

    #[test]
    fn get_unique_value_conversion_error() {
        let node = sample();
        match node.get_unique_value::<u32>("bad_count").unwrap_err() {
            Error::Conversion(e) => {
                assert_eq!(e.raw, "7x");
                assert_eq!(e.target, "u32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn get_unique_value_or() {
        let node = sample();
        assert_eq!(
            node.get_unique_value_or("color", "green".to_string()).unwrap(),
            "green"
        );
        assert_eq!(node.get_unique_value_or("count", 0_u8).unwrap(), 7);
        assert!(matches!(
            node.get_unique_value_or("size", 0_u32),
            Err(Error::MultipleValues { .. })
        ));
        assert!(matches!(
            node.get_unique_value_or("bad_count", 0_u32),
            Err(Error::Conversion(_))
        ));
    }

    #[test]
    fn registry_accessors() {
        let mut registry = ConvertRegistry::with_builtins();
        registry.register::<Duration, _>("seconds", |raw| {
            raw.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConvertError::new(raw, "seconds", e.to_string()))
        });

        let node = sample();
        assert_eq!(
            node.get_unique_value_with::<Duration>(&registry, "count").unwrap(),
            Duration::from_secs(7)
        );
        assert_eq!(
            node.get_values_with::<Duration>(&registry, "size").unwrap(),
            [Duration::from_secs(10), Duration::from_secs(12)]
        );
        assert_eq!(
            node.get_unique_value_or_with(&registry, "missing", Duration::ZERO).unwrap(),
            Duration::ZERO
        );
        assert!(matches!(
            node.get_unique_value_with::<Duration>(&ConvertRegistry::new(), "count"),
            Err(Error::Conversion(_))
        ));
    }

    #[test]
    fn blocks() {
        let node = sample();
        assert_eq!(node.get_blocks("leave").unwrap().len(), 2);
        assert!(node.find_blocks("missing").is_empty());
        assert!(matches!(
            node.get_blocks("missing"),
            Err(Error::MissingBlock { .. })
        ));

        let trunk = node.get_unique_block("trunk").unwrap();
        assert_eq!(trunk.raw_values("type"), ["big"]);

        match node.get_unique_block("leave").unwrap_err() {
            Error::MultipleBlocks { key, count } => {
                assert_eq!(key, "leave");
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blocks_keep_source_order() {
        let node = sample();
        let leaves = node.get_blocks("leave").unwrap();
        assert!(leaves[0].is_empty());
        assert_eq!(leaves[1].get_unique_value::<String>("color").unwrap(), "yellow");
    }

    #[test]
    fn get_path() {
        let root = Node::builder().child("tree", sample()).build();
        let trunk = root.get_path(&["tree", "trunk"]).unwrap();
        assert_eq!(trunk.raw_values("type"), ["big"]);
        assert_eq!(root.get_path::<&str>(&[]).unwrap(), &root);
        assert!(matches!(
            root.get_path(&["tree", "leave"]),
            Err(Error::MultipleBlocks { .. })
        ));
    }

    #[test]
    fn yes_no_coercion() {
        let node = sample();
        assert!(node.get_yes_no("broken").unwrap());
        assert!(matches!(
            node.get_yes_no("maybe"),
            Err(Error::InvalidBoolean { ref value, .. }) if value == "maybe"
        ));
        // case-sensitive
        assert!(matches!(
            node.get_yes_no("upper"),
            Err(Error::InvalidBoolean { .. })
        ));
        assert!(matches!(
            node.get_yes_no("missing"),
            Err(Error::MissingValue { .. })
        ));
        assert!(matches!(
            node.get_yes_no("empty"),
            Err(Error::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn yes_no_short_forms() {
        let node = Node::builder()
            .value("a", "y")
            .value("b", "n")
            .value("c", "no")
            .build();
        assert!(node.get_yes_no("a").unwrap());
        assert!(!node.get_yes_no("b").unwrap());
        assert!(!node.get_yes_no("c").unwrap());
    }

    #[test]
    fn yes_no_with_default() {
        let node = sample();
        assert!(!node.get_yes_no_or("missing", false).unwrap());
        assert!(node.get_yes_no_or("missing", true).unwrap());
        assert!(node.get_yes_no_or("empty", true).unwrap());
        assert!(node.get_yes_no_or("broken", false).unwrap());
        assert!(matches!(
            node.get_yes_no_or("maybe", false),
            Err(Error::InvalidBoolean { .. })
        ));
        assert!(matches!(
            node.get_yes_no_or("size", false),
            Err(Error::MultipleValues { .. })
        ));
    }

    #[test]
    fn errors_do_not_poison_the_tree() {
        let node = sample();
        assert!(node.get_unique_value::<u32>("size").is_err());
        assert_eq!(node.get_unique_value::<String>("name").unwrap(), "cool tree");
    }
}
