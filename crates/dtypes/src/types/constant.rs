// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Const descriptors: exactly one literal value (or one set of literals).

use serde_json::{Number, Value as Json};

use crate::canonical::to_canonical_json;
use crate::error::DtypeError;
use crate::params::{ParamValue, Params};
use crate::registry::TypeKind;
use crate::types::Type;
use crate::value::Value;

pub(crate) const CONST_KIND: TypeKind = TypeKind {
    name: "const",
    inferable_from: &[],
    infer: None,
    decode: decode_const,
};

/// A scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    /// Always finite.
    Float(f64),
    Str(String),
}

impl Literal {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Int(i) => Some(Literal::Int(*i)),
            Value::Float(f) if f.is_finite() => Some(Literal::Float(*f)),
            Value::Str(s) => Some(Literal::Str(s.clone())),
            _ => None,
        }
    }

    fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Bool(b) => Some(Literal::Bool(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Some(Literal::Int(i)),
                None => n.as_f64().filter(|f| f.is_finite()).map(Literal::Float),
            },
            Json::String(s) => Some(Literal::Str(s.clone())),
            _ => None,
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Literal::Bool(b) => Json::Bool(*b),
            Literal::Int(i) => Json::from(*i),
            Literal::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Literal::Str(s) => Json::String(s.clone()),
        }
    }
}

/// Value held by a const descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Scalar(Literal),
    /// Deduplicated and sorted by canonical form, so equal sets compare equal.
    Set(Vec<Literal>),
}

impl ConstValue {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Set(items) => items
                .iter()
                .map(Literal::from_value)
                .collect::<Option<Vec<_>>>()
                .map(normalize_set),
            other => Literal::from_value(other).map(ConstValue::Scalar),
        }
    }
}

fn normalize_set(mut items: Vec<Literal>) -> ConstValue {
    items.sort_by_cached_key(|lit| to_canonical_json(&lit.to_json()));
    items.dedup();
    ConstValue::Set(items)
}

/// Matches only values equal to the stored literal.
#[derive(Debug, Clone)]
pub struct ConstType {
    value: ConstValue,
}

impl ConstType {
    /// Build from a str, int, finite float, bool or a set of those.
    pub fn new(value: &Value) -> Result<Self, DtypeError> {
        ConstValue::from_value(value)
            .map(|value| Self { value })
            .ok_or_else(|| DtypeError::UnsupportedConst(format!("{value:?}")))
    }

    pub fn value(&self) -> &ConstValue {
        &self.value
    }

    pub fn is_set(&self) -> bool {
        matches!(self.value, ConstValue::Set(_))
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        ConstValue::from_value(value).is_some_and(|v| v == self.value)
    }

    pub(crate) fn params(&self) -> Params {
        let val = match &self.value {
            ConstValue::Scalar(lit) => ParamValue::Scalar(lit.to_json()),
            ConstValue::Set(items) => ParamValue::Seq(
                items
                    .iter()
                    .map(|lit| ParamValue::Scalar(lit.to_json()))
                    .collect(),
            ),
        };
        Params::from([
            ("val".to_string(), val),
            ("is_set".to_string(), ParamValue::from(self.is_set())),
        ])
    }
}

fn decode_const(mut params: Params) -> Result<Type, DtypeError> {
    let is_set = match params.remove("is_set") {
        None => false,
        Some(ParamValue::Scalar(Json::Bool(b))) => b,
        Some(_) => return Err(DtypeError::invalid_params("const", "`is_set` must be a bool")),
    };

    let value = match (params.remove("val"), is_set) {
        (Some(ParamValue::Scalar(json)), false) => Literal::from_json(&json)
            .map(ConstValue::Scalar)
            .ok_or_else(|| {
                DtypeError::invalid_params("const", format!("unsupported literal {json}"))
            }),
        (Some(ParamValue::Seq(items)), true) => items
            .iter()
            .map(|item| match item {
                ParamValue::Scalar(json) => Literal::from_json(json),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(normalize_set)
            .ok_or_else(|| DtypeError::invalid_params("const", "set members must be literals")),
        (Some(_), _) => Err(DtypeError::invalid_params(
            "const",
            "`val` does not match `is_set`",
        )),
        (None, _) => Err(DtypeError::invalid_params("const", "missing `val`")),
    }?;
    Ok(Type::Const(ConstType { value }))
}
