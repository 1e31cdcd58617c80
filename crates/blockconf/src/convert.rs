//! String to typed value conversion
//!
//! Two extension points, both usable without touching this module:
//!
//! - [`FromValue`]: implement it for your own types; the typed accessors
//!   (`get_unique_value::<T>`, ...) use it directly.
//! - [`ConvertRegistry`]: a `TypeId`-keyed table of conversion closures, filled
//!   at startup. Use it for foreign types you cannot implement a trait for, or
//!   to override a built-in rule; the `*_with` accessors take one.
//!
//! Built-in conversions are strict: the whole value must parse, so `"10abc"`
//! is not a `u32`. `String` is the identity conversion.

use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

/// A raw value could not be converted to the requested type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert '{raw}' to {target}: {reason}")]
pub struct ConvertError {
    /// The offending raw value
    pub raw: String,
    /// Label of the target type
    pub target: String,
    /// Underlying parse failure
    pub reason: String,
}

impl ConvertError {
    /// Create conversion error
    pub fn new(raw: impl Into<String>, target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Conversion from a raw configuration value
///
/// # Example
/// ```rust,ignore
/// struct Color(u8, u8, u8);
///
/// impl FromValue for Color {
///     fn from_value(raw: &str) -> Result<Self, ConvertError> {
///         match raw {
///             "green" => Ok(Color(0, 255, 0)),
///             "yellow" => Ok(Color(255, 255, 0)),
///             _ => Err(ConvertError::new(raw, Self::type_label(), "unknown color")),
///         }
///     }
/// }
///
/// let color: Color = leaf.get_unique_value("color")?;
/// ```
pub trait FromValue: Sized {
    /// Convert one raw (already trimmed) value
    ///
    /// # Errors
    /// Returns `ConvertError` if `raw` is not a valid `Self`
    fn from_value(raw: &str) -> Result<Self, ConvertError>;

    /// Label reported in conversion errors
    #[must_use]
    fn type_label() -> &'static str {
        type_name::<Self>()
    }
}

impl FromValue for String {
    #[inline]
    fn from_value(raw: &str) -> Result<Self, ConvertError> {
        Ok(raw.to_owned())
    }

    fn type_label() -> &'static str {
        "string"
    }
}

macro_rules! impl_from_value_via_from_str {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(raw: &str) -> Result<Self, ConvertError> {
                    raw.parse::<$t>()
                        .map_err(|e| ConvertError::new(raw, Self::type_label(), e.to_string()))
                }
            }
        )*
    };
}

impl_from_value_via_from_str!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, PathBuf,
    IpAddr, SocketAddr,
);

type ConvertFn = dyn Fn(&str) -> Result<Box<dyn Any + Send>, ConvertError> + Send + Sync;

#[derive(Clone)]
struct Converter {
    label: &'static str,
    convert: Arc<ConvertFn>,
}

/// Registry of string → `T` conversions, keyed by `TypeId`
///
/// Built once at startup, then shared read-only.
#[derive(Clone, Default)]
pub struct ConvertRegistry {
    converters: HashMap<TypeId, Converter>,
}

static BUILTINS: Lazy<ConvertRegistry> = Lazy::new(ConvertRegistry::with_builtins);

impl ConvertRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Create registry with every built-in [`FromValue`] conversion
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_from_value::<String>();
        registry.register_from_value::<u8>();
        registry.register_from_value::<u16>();
        registry.register_from_value::<u32>();
        registry.register_from_value::<u64>();
        registry.register_from_value::<u128>();
        registry.register_from_value::<usize>();
        registry.register_from_value::<i8>();
        registry.register_from_value::<i16>();
        registry.register_from_value::<i32>();
        registry.register_from_value::<i64>();
        registry.register_from_value::<i128>();
        registry.register_from_value::<isize>();
        registry.register_from_value::<f32>();
        registry.register_from_value::<f64>();
        registry.register_from_value::<bool>();
        registry.register_from_value::<char>();
        registry.register_from_value::<PathBuf>();
        registry.register_from_value::<IpAddr>();
        registry.register_from_value::<SocketAddr>();
        registry
    }

    /// Shared registry holding the built-in conversions
    #[inline]
    #[must_use]
    pub fn builtins() -> &'static Self {
        &BUILTINS
    }

    /// Register a conversion for `T`
    ///
    /// Replaces any previous conversion for the same type; returns `true` if
    /// one was replaced.
    pub fn register<T, F>(&mut self, label: &'static str, f: F) -> bool
    where
        T: Any + Send,
        F: Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
    {
        let convert: Arc<ConvertFn> =
            Arc::new(move |raw: &str| f(raw).map(|v| Box::new(v) as Box<dyn Any + Send>));
        self.converters
            .insert(TypeId::of::<T>(), Converter { label, convert })
            .is_some()
    }

    /// Register `T`'s own [`FromValue`] conversion
    pub fn register_from_value<T>(&mut self) -> bool
    where
        T: FromValue + Any + Send,
    {
        self.register::<T, _>(T::type_label(), T::from_value)
    }

    /// Check if a conversion for `T` is registered
    #[inline]
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Label registered for `T`
    #[must_use]
    pub fn label<T: Any>(&self) -> Option<&'static str> {
        self.converters.get(&TypeId::of::<T>()).map(|c| c.label)
    }

    /// Number of registered conversions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Convert `raw` to `T`
    ///
    /// # Errors
    /// Returns `ConvertError` if no conversion is registered for `T` or the
    /// registered conversion rejects `raw`
    pub fn convert<T: Any>(&self, raw: &str) -> Result<T, ConvertError> {
        let converter = self
            .converters
            .get(&TypeId::of::<T>())
            .ok_or_else(|| ConvertError::new(raw, type_name::<T>(), "no conversion registered"))?;

        (converter.convert)(raw)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ConvertError::new(raw, converter.label, "conversion produced a different type"))
    }
}

impl fmt::Debug for ConvertRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels: Vec<_> = self.converters.values().map(|c| c.label).collect();
        labels.sort_unstable();
        f.debug_struct("ConvertRegistry")
            .field("converter_count", &self.converters.len())
            .field("labels", &labels)
            .finish()
    }
}
