// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dictionary descriptors: per-key member descriptors plus a key policy.
//!
//! The policy decides what happens to keys the descriptor knows but the
//! value lacks, and to keys the value carries but the descriptor does not:
//!
//! | policy         | known key missing          | unknown key present |
//! |----------------|----------------------------|---------------------|
//! | `Exact`        | must accept absence        | rejected            |
//! | `Subset`       | kept unchanged (optional)  | rejected            |
//! | `Unrestricted` | kept unchanged (optional)  | added by inference  |

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::DtypeError;
use crate::params::{ParamValue, Params};
use crate::registry::{TypeKind, TypeRegistry};
use crate::types::{ListType, Type};
use crate::value::{Value, ValueKind};

pub(crate) const DICT_KIND: TypeKind = TypeKind {
    name: "dictionary",
    inferable_from: &[ValueKind::Dict],
    infer: Some(infer_dict),
    decode: decode_dict,
};

// ---------------------------------------------------------------------------
// KeyPolicy
// ---------------------------------------------------------------------------

/// How missing and extra keys are treated while narrowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPolicy {
    /// Keys must match exactly.
    #[default]
    #[serde(rename = "E")]
    Exact,
    /// Known keys are optional, unknown keys are disallowed.
    #[serde(rename = "S")]
    Subset,
    /// Known keys are optional, unknown keys are inferred and added.
    #[serde(rename = "U")]
    Unrestricted,
}

impl KeyPolicy {
    /// One-letter wire code.
    pub const fn code(self) -> &'static str {
        match self {
            KeyPolicy::Exact => "E",
            KeyPolicy::Subset => "S",
            KeyPolicy::Unrestricted => "U",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(KeyPolicy::Exact),
            "S" => Some(KeyPolicy::Subset),
            "U" => Some(KeyPolicy::Unrestricted),
            _ => None,
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// TypeSpec
// ---------------------------------------------------------------------------

/// Shorthand accepted by [`DictType::from_spec`].
///
/// A nested mapping becomes a nested dict under the same policy. A list of
/// length 1 wraps its element in a list descriptor; an empty list stands for
/// a list of unknown elements.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Type(Type),
    Dict(BTreeMap<String, TypeSpec>),
    List(Vec<TypeSpec>),
}

impl From<Type> for TypeSpec {
    fn from(t: Type) -> Self {
        TypeSpec::Type(t)
    }
}

impl TypeSpec {
    fn resolve(self, key: &str, policy: KeyPolicy) -> Result<Type, DtypeError> {
        match self {
            TypeSpec::Type(t) => Ok(t),
            TypeSpec::Dict(nested) => DictType::from_spec(nested, policy).map(Type::Dict),
            TypeSpec::List(mut items) => match items.len() {
                0 => Ok(Type::List(ListType::default())),
                1 => {
                    let inner = items.remove(0).resolve(key, policy)?;
                    Ok(Type::List(ListType::new(inner)))
                }
                n => Err(DtypeError::InvalidSpec {
                    key: key.to_string(),
                    reason: format!("lists must have length 0 or 1, found {n}"),
                }),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// DictType
// ---------------------------------------------------------------------------

/// String-keyed mapping with a descriptor per key.
#[derive(Debug, Clone)]
pub struct DictType {
    type_map: Arc<BTreeMap<String, Type>>,
    policy: KeyPolicy,
}

impl DictType {
    pub fn new(type_map: BTreeMap<String, Type>, policy: KeyPolicy) -> Self {
        Self {
            type_map: Arc::new(type_map),
            policy,
        }
    }

    /// Infer a descriptor per entry of `sample`.
    ///
    /// Nested mappings become nested dicts under the same policy.
    pub fn from_sample(
        sample: &BTreeMap<String, Value>,
        policy: KeyPolicy,
    ) -> Result<Self, DtypeError> {
        Self::from_sample_in(sample, policy, TypeRegistry::global())
    }

    pub fn from_sample_in(
        sample: &BTreeMap<String, Value>,
        policy: KeyPolicy,
        registry: &TypeRegistry,
    ) -> Result<Self, DtypeError> {
        let mut type_map = BTreeMap::new();
        for (key, item) in sample {
            type_map.insert(key.clone(), infer_member(item, policy, registry)?);
        }
        Ok(Self::new(type_map, policy))
    }

    /// Build from the nested shorthand notation.
    pub fn from_spec(
        spec: BTreeMap<String, TypeSpec>,
        policy: KeyPolicy,
    ) -> Result<Self, DtypeError> {
        let mut type_map = BTreeMap::new();
        for (key, entry) in spec {
            let t = entry.resolve(&key, policy)?;
            type_map.insert(key, t);
        }
        Ok(Self::new(type_map, policy))
    }

    pub fn type_map(&self) -> &BTreeMap<String, Type> {
        &self.type_map
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    pub(crate) fn params(&self) -> Params {
        let type_map = self
            .type_map
            .iter()
            .map(|(k, t)| (k.clone(), ParamValue::Type(t.clone())))
            .collect();
        Params::from([
            ("type_map".to_string(), ParamValue::Map(type_map)),
            ("policy".to_string(), ParamValue::from(self.policy.code())),
        ])
    }

    pub(crate) fn assign_in(&self, value: &Value, registry: &TypeRegistry) -> Type {
        let Some(map) = value.as_dict() else {
            return Type::Never;
        };

        let mut narrowed = BTreeMap::new();
        for (key, known) in self.type_map.iter() {
            match map.get(key) {
                Some(item) => {
                    let next = known.assign_in(item, registry);
                    if next.is_never() {
                        log::trace!("[dtypes] dict key `{key}` rejected {:?}", item.kind());
                        return Type::Never;
                    }
                    narrowed.insert(key.clone(), next);
                }
                None => {
                    // a missing key narrows as if it held no value
                    let next = known.assign_in(&Value::None, registry);
                    if !next.is_never() {
                        narrowed.insert(key.clone(), next);
                    } else if self.policy == KeyPolicy::Exact {
                        log::trace!("[dtypes] dict key `{key}` missing under exact policy");
                        return Type::Never;
                    } else {
                        narrowed.insert(key.clone(), known.clone());
                    }
                }
            }
        }

        for (key, item) in map {
            if self.type_map.contains_key(key) {
                continue;
            }
            if self.policy != KeyPolicy::Unrestricted {
                log::trace!(
                    "[dtypes] dict key `{key}` not allowed under {} policy",
                    self.policy
                );
                return Type::Never;
            }
            match infer_member(item, self.policy, registry) {
                Ok(t) if !t.is_never() => {
                    narrowed.insert(key.clone(), t);
                }
                _ => return Type::Never,
            }
        }

        Type::Dict(DictType::new(narrowed, self.policy))
    }
}

impl Default for DictType {
    fn default() -> Self {
        Self::new(BTreeMap::new(), KeyPolicy::default())
    }
}

fn infer_member(
    item: &Value,
    policy: KeyPolicy,
    registry: &TypeRegistry,
) -> Result<Type, DtypeError> {
    match item {
        Value::Dict(nested) => DictType::from_sample_in(nested, policy, registry).map(Type::Dict),
        other => registry.try_infer(other),
    }
}

fn infer_dict(value: &Value, registry: &TypeRegistry) -> Result<Type, DtypeError> {
    let sample = value
        .as_dict()
        .ok_or_else(|| DtypeError::invalid_params("dictionary", "sample is not a mapping"))?;
    let policy = registry.config().default_key_policy;
    DictType::from_sample_in(sample, policy, registry).map(Type::Dict)
}

fn decode_dict(mut params: Params) -> Result<Type, DtypeError> {
    let policy = match params.remove("policy") {
        None => KeyPolicy::default(),
        Some(ParamValue::Scalar(Json::String(code))) => KeyPolicy::from_code(&code)
            .ok_or_else(|| {
                DtypeError::invalid_params("dictionary", format!("unknown policy `{code}`"))
            })?,
        Some(_) => {
            return Err(DtypeError::invalid_params(
                "dictionary",
                "`policy` must be a string",
            ))
        }
    };

    let entries = match params.remove("type_map") {
        None => BTreeMap::new(),
        Some(ParamValue::Map(entries)) => entries,
        Some(_) => {
            return Err(DtypeError::invalid_params(
                "dictionary",
                "`type_map` must be a mapping",
            ))
        }
    };

    let mut type_map = BTreeMap::new();
    for (key, entry) in entries {
        match entry {
            ParamValue::Type(t) => {
                type_map.insert(key, t);
            }
            _ => {
                return Err(DtypeError::invalid_params(
                    "dictionary",
                    format!("`type_map` entry `{key}` must be a descriptor"),
                ))
            }
        }
    }
    Ok(Type::Dict(DictType::new(type_map, policy)))
}
