// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The descriptor lattice.
//!
//! A [`Type`] describes the shape of a value or of a family of values. Leaf
//! kinds are unit variants, so each exists exactly once; composite kinds wrap
//! immutable nodes. Narrowing never mutates: [`Type::assign`] always returns
//! a new descriptor, and a mismatch is reported as [`Type::Never`].
//!
//! Equality is identity-or-equal-canonical-serialization: two descriptors are
//! equal iff their canonical JSON renderings are byte-equal.

mod constant;
mod dict;
mod leaf;
mod list;
mod object;
mod union;

pub use constant::{ConstType, ConstValue, Literal};
pub use dict::{DictType, KeyPolicy, TypeSpec};
pub use list::ListType;
pub use object::ObjectType;
pub use union::UnionType;

pub(crate) use constant::CONST_KIND;
pub(crate) use dict::DICT_KIND;
pub(crate) use leaf::LEAF_KINDS;
pub(crate) use list::LIST_KIND;
pub(crate) use object::OBJECT_KIND;
pub(crate) use union::UNION_KIND;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::canonical::to_canonical_json;
use crate::params::{encode_params, Params};
use crate::registry::{ArtifactContext, TypeRegistry};
use crate::value::{Value, ValueKind};

/// A type descriptor.
#[derive(Debug, Clone)]
pub enum Type {
    /// Absorbing element: no value satisfies it.
    Never,
    /// Any value except absence.
    Any,
    /// Placeholder resolved by inference on first assignment.
    Unknown,
    /// Absence of a value.
    None,
    Text,
    /// Integers and floats alike.
    Number,
    Boolean,
    Union(UnionType),
    List(ListType),
    Dict(DictType),
    Const(ConstType),
    Object(ObjectType),
}

impl Type {
    /// `Union([t, None])`.
    pub fn optional(t: Type) -> Type {
        Type::Union(UnionType::new([t, Type::None]))
    }

    /// Wire discriminant of this kind.
    pub const fn name(&self) -> &'static str {
        match self {
            Type::Never => "never",
            Type::Any => "any",
            Type::Unknown => "unknown",
            Type::None => "none",
            Type::Text => "text",
            Type::Number => "number",
            Type::Boolean => "boolean",
            Type::Union(_) => "union",
            Type::List(_) => "list",
            Type::Dict(_) => "dictionary",
            Type::Const(_) => "const",
            Type::Object(_) => "object",
        }
    }

    pub const fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    /// True for the seven parameterless singleton kinds.
    pub const fn is_leaf(&self) -> bool {
        matches!(
            self,
            Type::Never
                | Type::Any
                | Type::Unknown
                | Type::None
                | Type::Text
                | Type::Number
                | Type::Boolean
        )
    }

    /// Parameters of this descriptor (empty for leaves).
    pub fn params(&self) -> Params {
        match self {
            Type::Union(u) => u.params(),
            Type::List(l) => l.params(),
            Type::Dict(d) => d.params(),
            Type::Const(c) => c.params(),
            Type::Object(o) => o.params(),
            _ => Params::new(),
        }
    }

    /// Wire form: `{"wb_type": name, "params": {...}}`, without `params`
    /// when there are none.
    pub fn to_json(&self, ctx: Option<&dyn ArtifactContext>) -> Json {
        let mut out = Map::new();
        out.insert("wb_type".to_string(), Json::String(self.name().to_string()));
        let params = encode_params(&self.params(), ctx);
        if !params.is_empty() {
            out.insert("params".to_string(), Json::Object(params));
        }
        Json::Object(out)
    }

    /// Canonical string form, used for equality, hashing and ordering.
    pub fn canonical(&self) -> String {
        to_canonical_json(&self.to_json(None))
    }

    /// Narrow against `value` using the process-wide registry.
    pub fn assign(&self, value: &Value) -> Type {
        self.assign_in(value, TypeRegistry::global())
    }

    /// Narrow against `value`, re-inferring through `registry` where needed.
    ///
    /// Total: a value this descriptor cannot accommodate yields `Never`.
    pub fn assign_in(&self, value: &Value, registry: &TypeRegistry) -> Type {
        let kind = value.kind();
        match self {
            Type::Never => Type::Never,
            Type::Any => accept_if(kind != ValueKind::None, Type::Any),
            Type::Unknown => {
                if kind == ValueKind::None {
                    Type::Never
                } else {
                    registry.infer(value)
                }
            }
            Type::None => accept_if(kind == ValueKind::None, Type::None),
            Type::Text => accept_if(kind == ValueKind::Str, Type::Text),
            Type::Number => accept_if(
                matches!(kind, ValueKind::Int | ValueKind::Float),
                Type::Number,
            ),
            Type::Boolean => accept_if(kind == ValueKind::Bool, Type::Boolean),
            Type::Union(u) => u.assign_in(value, registry),
            Type::List(l) => l.assign_in(value, registry),
            Type::Dict(d) => d.assign_in(value, registry),
            Type::Const(c) => accept_if(c.accepts(value), self.clone()),
            Type::Object(o) => accept_if(o.accepts(value), self.clone()),
        }
    }
}

fn accept_if(accepted: bool, t: Type) -> Type {
    if accepted {
        t
    } else {
        Type::Never
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        // kinds have unique discriminants, so differing variants never match
        if mem::discriminant(self) != mem::discriminant(other) {
            return false;
        }
        self.is_leaf() || self.canonical() == other.canonical()
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json(None).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        TypeRegistry::global()
            .from_discriminant(&json, None)
            .map_err(serde::de::Error::custom)
    }
}

impl From<UnionType> for Type {
    fn from(u: UnionType) -> Self {
        Type::Union(u)
    }
}

impl From<ListType> for Type {
    fn from(l: ListType) -> Self {
        Type::List(l)
    }
}

impl From<DictType> for Type {
    fn from(d: DictType) -> Self {
        Type::Dict(d)
    }
}

impl From<ConstType> for Type {
    fn from(c: ConstType) -> Self {
        Type::Const(c)
    }
}

impl From<ObjectType> for Type {
    fn from(o: ObjectType) -> Self {
        Type::Object(o)
    }
}
