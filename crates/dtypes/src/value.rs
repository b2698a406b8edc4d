// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime value model.
//!
//! `Value` is what gets observed: metadata records made of scalars, lists and
//! string-keyed mappings. Every value carries a [`ValueKind`] tag which the
//! registry uses to pick an inference constructor.

use std::collections::BTreeMap;

/// Runtime class tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Set,
    Dict,
    Object,
}

impl ValueKind {
    /// Class name reported for values of this kind.
    ///
    /// `Object` values report their own class name instead, see
    /// [`Value::class_name`].
    pub const fn class_name(self) -> &'static str {
        match self {
            ValueKind::None => "NoneType",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Set => "set",
            ValueKind::Dict => "dict",
            ValueKind::Object => "object",
        }
    }

    /// Sequence-like kinds accepted by `list` descriptors.
    pub const fn is_sequence(self) -> bool {
        matches!(self, ValueKind::List | ValueKind::Tuple | ValueKind::Set)
    }
}

/// An observed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Unordered collection; element order carries no meaning.
    Set(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    /// Opaque instance of a named class.
    Object {
        class_name: String,
    },
}

impl Value {
    /// Build an opaque object value.
    pub fn object(class_name: impl Into<String>) -> Self {
        Value::Object {
            class_name: class_name.into(),
        }
    }

    /// Build a dict value from `(key, value)` pairs.
    pub fn dict<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Set(_) => ValueKind::Set,
            Value::Dict(_) => ValueKind::Dict,
            Value::Object { .. } => ValueKind::Object,
        }
    }

    /// Runtime class name, as matched by `object` descriptors.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Object { class_name } => class_name,
            other => other.kind().class_name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Elements of a sequence-like value.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and real floats
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Dict(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Dict(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_keep_int_float_split() {
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert_eq!(Value::from(json!(3.5)), Value::Float(3.5));
        assert_eq!(Value::from(json!(u64::MAX)).kind(), ValueKind::Float);
    }

    #[test]
    fn json_containers_map_to_list_and_dict() {
        let v = Value::from(json!({"a": [1, null], "b": "x"}));
        let map = v.as_dict().expect("dict");
        assert_eq!(map["a"], Value::List(vec![Value::Int(1), Value::None]));
        assert_eq!(map["b"], Value::Str("x".into()));
    }

    #[test]
    fn class_names() {
        assert_eq!(Value::None.class_name(), "NoneType");
        assert_eq!(Value::from(1.0).class_name(), "float");
        assert_eq!(Value::object("Image").class_name(), "Image");
        assert_eq!(Value::object("Image").kind(), ValueKind::Object);
    }

    #[test]
    fn sequence_kinds() {
        assert!(ValueKind::Tuple.is_sequence());
        assert!(ValueKind::Set.is_sequence());
        assert!(!ValueKind::Dict.is_sequence());
        assert!(Value::Tuple(vec![]).as_elements().is_some());
        assert!(Value::Str("ab".into()).as_elements().is_none());
    }
}
