//! Helpers for reading and writing the flat `info` maps of canvas objects.

use serde_json::{Map, Value};

use crate::node::ObjectBase;

pub(crate) fn read_f64(info: &Map<String, Value>, key: &str, default: f64) -> f64 {
    info.get(key).and_then(Value::as_f64).unwrap_or(default)
}

pub(crate) fn read_bool(info: &Map<String, Value>, key: &str, default: bool) -> bool {
    info.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub(crate) fn read_string(info: &Map<String, Value>, key: &str, default: &str) -> String {
    info.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

pub(crate) fn read_opt_string(info: &Map<String, Value>, key: &str) -> Option<String> {
    info.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Writes object properties following the override rules.
///
/// Ordinary objects omit values equal to their default. Prefab instances
/// write exactly the property sets named in their override list, defaults
/// included.
pub(crate) struct InfoWriter<'a> {
    info: &'a mut Map<String, Value>,
    base: &'a ObjectBase,
    saving: bool,
}

impl<'a> InfoWriter<'a> {
    pub fn new(info: &'a mut Map<String, Value>, base: &'a ObjectBase, saving: bool) -> Self {
        Self { info, base, saving }
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub fn is_instance(&self) -> bool {
        self.base.is_prefab_instance()
    }

    pub fn is_overriding(&self, tag: &str) -> bool {
        self.base.is_overriding(tag)
    }

    pub fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.info.insert(key.to_owned(), value.into());
    }

    /// Writes `value` unless it equals `default`. Not subject to overrides.
    pub fn put_default<T>(&mut self, key: &str, value: T, default: T)
    where
        T: PartialEq + Into<Value>,
    {
        if value != default {
            self.put(key, value);
        }
    }

    /// Writes a property belonging to the `tag` override set.
    pub fn put_prop<T>(&mut self, tag: &str, key: &str, value: T, default: T)
    where
        T: PartialEq + Into<Value>,
    {
        if !self.is_overriding(tag) {
            return;
        }
        if self.is_instance() || value != default {
            self.put(key, value);
        }
    }

    /// Writes a property with no default whenever its set is overridden.
    pub fn put_tagged(&mut self, tag: &str, key: &str, value: impl Into<Value>) {
        if self.is_overriding(tag) {
            self.put(key, value);
        }
    }

    pub fn put_opt<T: Into<Value>>(&mut self, tag: &str, key: &str, value: Option<T>) {
        if let Some(value) = value
            && self.is_overriding(tag)
        {
            self.put(key, value);
        }
    }
}

/// Declares a string-valued enum stored verbatim in canvas JSON.
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
        default $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            pub fn parse(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub(crate) fn read(info: &serde_json::Map<String, serde_json::Value>, key: &str) -> Self {
                info.get(key)
                    .and_then(serde_json::Value::as_str)
                    .and_then(Self::parse)
                    .unwrap_or_default()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use json_enum;
