//! Value types held by the configuration stores.

use super::manager::ConfigManager;
use super::store::ConfigStore;
use std::fmt;

/// The three value types a key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Free text.
    String,
    /// On/off switch.
    Bool,
    /// Signed integer.
    Int,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
        })
    }
}

/// A catalogue default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// String default.
    Str(&'static str),
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int(i64),
}

impl DefaultValue {
    /// Type of the value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
}

/// A type with its own store in [`ConfigManager`].
///
/// Implemented for `String`, `bool` and `i64` only.
pub trait ConfigValue:
    Clone + Default + PartialEq + fmt::Display + Send + Sync + 'static + sealed::Sealed
{
    /// Catalogue type tag.
    const KIND: ValueKind;

    /// Extract a default of this type.
    fn from_default(default: DefaultValue) -> Option<Self>;

    /// Parse the config file representation.
    fn parse(raw: &str) -> Option<Self>;

    #[doc(hidden)]
    fn store(manager: &ConfigManager) -> &ConfigStore<Self>;

    #[doc(hidden)]
    fn store_mut(manager: &mut ConfigManager) -> &mut ConfigStore<Self>;
}

impl ConfigValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_default(default: DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Str(s) => Some(s.to_owned()),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }

    fn store(manager: &ConfigManager) -> &ConfigStore<Self> {
        &manager.strings
    }

    fn store_mut(manager: &mut ConfigManager) -> &mut ConfigStore<Self> {
        &mut manager.strings
    }
}

impl ConfigValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_default(default: DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    fn store(manager: &ConfigManager) -> &ConfigStore<Self> {
        &manager.bools
    }

    fn store_mut(manager: &mut ConfigManager) -> &mut ConfigStore<Self> {
        &mut manager.bools
    }
}

impl ConfigValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_default(default: DefaultValue) -> Option<Self> {
        match default {
            DefaultValue::Int(n) => Some(n),
            _ => None,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn store(manager: &ConfigManager) -> &ConfigStore<Self> {
        &manager.ints
    }

    fn store_mut(manager: &mut ConfigManager) -> &mut ConfigStore<Self> {
        &mut manager.ints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        for raw in ["true", "TRUE", "1", "Yes"] {
            assert_eq!(bool::parse(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "NO"] {
            assert_eq!(bool::parse(raw), Some(false), "{raw}");
        }
        assert_eq!(bool::parse("on"), None);
        assert_eq!(bool::parse(""), None);
    }

    #[test]
    fn test_parse_int_requires_full_input() {
        assert_eq!(i64::parse("2000"), Some(2000));
        assert_eq!(i64::parse("-5"), Some(-5));
        assert_eq!(i64::parse("20ms"), None);
        assert_eq!(i64::parse(" 20"), None);
        assert_eq!(i64::parse(""), None);
    }

    #[test]
    fn test_defaults_match_type() {
        assert_eq!(i64::from_default(DefaultValue::Int(7)), Some(7));
        assert_eq!(i64::from_default(DefaultValue::Bool(true)), None);
        assert_eq!(String::from_default(DefaultValue::Str("x")), Some("x".to_owned()));
    }
}
