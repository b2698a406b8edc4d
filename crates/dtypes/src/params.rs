// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor parameters and their wire encoding.
//!
//! A descriptor's parameters form a small tree whose leaves are JSON scalars
//! or nested descriptors. Encoding replaces each nested descriptor with its
//! own `{"wb_type", "params"}` object; decoding resolves any nested object
//! carrying a `wb_type` key back through the registry.

use std::collections::BTreeMap;

use serde_json::{Map, Value as Json};

use crate::error::DtypeError;
use crate::registry::{ArtifactContext, TypeRegistry};
use crate::types::Type;

/// Named parameters of a descriptor.
pub type Params = BTreeMap<String, ParamValue>;

/// One node of a parameter tree.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// JSON scalar: null, bool, number or string.
    Scalar(Json),
    Seq(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
    Type(Type),
}

impl ParamValue {
    pub fn as_type(&self) -> Option<&Type> {
        match self {
            ParamValue::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(Json::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Encode into wire JSON, serializing nested descriptors.
    pub fn to_json(&self, ctx: Option<&dyn ArtifactContext>) -> Json {
        match self {
            ParamValue::Scalar(json) => json.clone(),
            ParamValue::Seq(items) => {
                Json::Array(items.iter().map(|p| p.to_json(ctx)).collect())
            }
            ParamValue::Map(map) => Json::Object(encode_map(map, ctx)),
            ParamValue::Type(t) => t.to_json(ctx),
        }
    }
}

impl From<Type> for ParamValue {
    fn from(t: Type) -> Self {
        ParamValue::Type(t)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Scalar(Json::String(s.to_string()))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Scalar(Json::Bool(b))
    }
}

/// Encode a full parameter map.
pub fn encode_params(params: &Params, ctx: Option<&dyn ArtifactContext>) -> Map<String, Json> {
    encode_map(params, ctx)
}

fn encode_map(
    map: &BTreeMap<String, ParamValue>,
    ctx: Option<&dyn ArtifactContext>,
) -> Map<String, Json> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.to_json(ctx)))
        .collect()
}

/// Decode one wire JSON node, resolving nested descriptors via `registry`.
///
/// An object is a nested descriptor iff its `wb_type` entry is a string.
pub fn decode_param(
    json: &Json,
    registry: &TypeRegistry,
    ctx: Option<&dyn ArtifactContext>,
) -> Result<ParamValue, DtypeError> {
    match json {
        // a nested descriptor names its kind with a string; a `type_map` whose
        // member is keyed `wb_type` holds a descriptor object there instead
        Json::Object(map) if map.get("wb_type").is_some_and(Json::is_string) => {
            registry.from_discriminant(json, ctx).map(ParamValue::Type)
        }
        Json::Object(map) => {
            let mut out = BTreeMap::new();
            for (key, item) in map {
                out.insert(key.clone(), decode_param(item, registry, ctx)?);
            }
            Ok(ParamValue::Map(out))
        }
        Json::Array(items) => items
            .iter()
            .map(|item| decode_param(item, registry, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(ParamValue::Seq),
        scalar => Ok(ParamValue::Scalar(scalar.clone())),
    }
}

/// Decode the `params` field of a serialized descriptor.
///
/// A missing or `null` field decodes to an empty map.
pub fn decode_params(
    json: Option<&Json>,
    registry: &TypeRegistry,
    ctx: Option<&dyn ArtifactContext>,
) -> Result<Params, DtypeError> {
    match json {
        None | Some(Json::Null) => Ok(Params::new()),
        Some(Json::Object(map)) => {
            let mut params = Params::new();
            for (key, item) in map {
                params.insert(key.clone(), decode_param(item, registry, ctx)?);
            }
            Ok(params)
        }
        Some(other) => Err(DtypeError::NotAnObject(other.to_string())),
    }
}
