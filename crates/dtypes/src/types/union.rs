// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Union descriptors: an "or" of member descriptors.
//!
//! Members are flattened (a union never contains a union) and kept sorted by
//! canonical form, so construction order never shows up in the wire form.
//! `Unknown` members are placeholders: each one can absorb exactly one shape
//! that no concrete member accepts.

use std::iter;
use std::sync::Arc;

use crate::error::DtypeError;
use crate::params::{ParamValue, Params};
use crate::registry::{TypeKind, TypeRegistry};
use crate::types::Type;
use crate::value::Value;

pub(crate) const UNION_KIND: TypeKind = TypeKind {
    name: "union",
    inferable_from: &[],
    infer: None,
    decode: decode_union,
};

/// Ordered, flattened set of alternatives.
#[derive(Debug, Clone)]
pub struct UnionType {
    allowed_types: Arc<[Type]>,
}

impl UnionType {
    /// Build a union, flattening nested unions and sorting members.
    ///
    /// Duplicates are kept; the multiplicity of `Unknown` is significant.
    pub fn new(allowed_types: impl IntoIterator<Item = Type>) -> Self {
        let mut flat = Vec::new();
        flatten_into(allowed_types, &mut flat);
        flat.sort_by_cached_key(Type::canonical);
        Self {
            allowed_types: flat.into(),
        }
    }

    /// Members in canonical order.
    pub fn allowed_types(&self) -> &[Type] {
        &self.allowed_types
    }

    pub(crate) fn params(&self) -> Params {
        let members = self
            .allowed_types
            .iter()
            .cloned()
            .map(ParamValue::Type)
            .collect();
        Params::from([("allowed_types".to_string(), ParamValue::Seq(members))])
    }

    /// The first concrete member accepting `value` is narrowed in place and
    /// later members are kept as-is. Only when nothing accepts does one
    /// `Unknown` placeholder get consumed by inference.
    pub(crate) fn assign_in(&self, value: &Value, registry: &TypeRegistry) -> Type {
        let mut resolved = Vec::with_capacity(self.allowed_types.len() + 1);
        let mut accepted = false;
        let mut unknown_count = 0usize;

        for member in self.allowed_types.iter() {
            if accepted {
                resolved.push(member.clone());
            } else if matches!(member, Type::Unknown) {
                unknown_count += 1;
            } else {
                let narrowed = member.assign_in(value, registry);
                if narrowed.is_never() {
                    resolved.push(member.clone());
                } else {
                    resolved.push(narrowed);
                    accepted = true;
                }
            }
        }

        if !accepted {
            if unknown_count == 0 {
                log::trace!("[dtypes] union rejected {:?}", value.kind());
                return Type::Never;
            }
            let inferred = Type::Unknown.assign_in(value, registry);
            if inferred.is_never() {
                return Type::Never;
            }
            resolved.push(inferred);
            unknown_count -= 1;
        }

        resolved.extend(iter::repeat(Type::Unknown).take(unknown_count));
        Type::Union(UnionType::new(resolved))
    }
}

fn flatten_into(types: impl IntoIterator<Item = Type>, out: &mut Vec<Type>) {
    for t in types {
        match t {
            Type::Union(inner) => flatten_into(inner.allowed_types.iter().cloned(), out),
            other => out.push(other),
        }
    }
}

fn decode_union(mut params: Params) -> Result<Type, DtypeError> {
    let members = match params.remove("allowed_types") {
        Some(ParamValue::Seq(items)) => items,
        Some(_) => {
            return Err(DtypeError::invalid_params(
                "union",
                "`allowed_types` must be a list",
            ))
        }
        None => {
            return Err(DtypeError::invalid_params(
                "union",
                "missing `allowed_types`",
            ))
        }
    };

    let mut allowed = Vec::with_capacity(members.len());
    for member in members {
        match member {
            ParamValue::Type(t) => allowed.push(t),
            _ => {
                return Err(DtypeError::invalid_params(
                    "union",
                    "`allowed_types` entries must be descriptors",
                ))
            }
        }
    }
    Ok(Type::Union(UnionType::new(allowed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn union(types: impl IntoIterator<Item = Type>) -> Type {
        Type::Union(UnionType::new(types))
    }

    #[test]
    fn nested_unions_are_flattened() {
        let inner = union([Type::Text, Type::None]);
        let outer = UnionType::new([Type::Number, inner]);
        assert_eq!(
            outer.allowed_types(),
            &[Type::None, Type::Number, Type::Text]
        );
    }

    #[test]
    fn member_order_is_canonical() {
        assert_eq!(
            union([Type::Number, Type::Text]),
            union([Type::Text, Type::Number])
        );
        assert_eq!(
            union([Type::Text, Type::Number]).to_json(None),
            json!({"wb_type": "union", "params": {"allowed_types": [
                {"wb_type": "number"}, {"wb_type": "text"}
            ]}})
        );
    }

    #[test]
    fn first_accepting_member_wins() {
        let t = union([Type::Number, Type::Text]);
        assert_eq!(t.assign(&Value::from(1)), t);
        assert_eq!(t.assign(&Value::from("a")), t);
    }

    #[test]
    fn boolean_is_not_a_number_or_text() {
        let t = union([Type::Number, Type::Text]);
        assert_eq!(t.assign(&Value::from(true)), Type::Never);
    }

    #[test]
    fn unknown_placeholder_absorbs_one_new_shape() {
        let t = union([Type::Number, Type::Unknown]);
        let narrowed = t.assign(&Value::from(true));
        assert_eq!(narrowed, union([Type::Boolean, Type::Number]));

        // the placeholder is gone now
        assert_eq!(narrowed.assign(&Value::from("a")), Type::Never);
    }

    #[test]
    fn unused_placeholders_survive() {
        let t = union([Type::Unknown, Type::Unknown, Type::Text]);
        assert_eq!(
            t.assign(&Value::from("a")),
            union([Type::Text, Type::Unknown, Type::Unknown])
        );
        assert_eq!(
            t.assign(&Value::from(3)),
            union([Type::Number, Type::Text, Type::Unknown])
        );
    }

    #[test]
    fn placeholder_does_not_absorb_absence() {
        let t = union([Type::Text, Type::Unknown]);
        assert_eq!(t.assign(&Value::None), Type::Never);
    }

    #[test]
    fn optional_accepts_absence() {
        let t = Type::optional(Type::Text);
        assert_eq!(t.assign(&Value::None), t);
        assert_eq!(t.assign(&Value::from("x")), t);
        assert_eq!(t.assign(&Value::from(1)), Type::Never);
    }

    #[test]
    fn empty_union_accepts_nothing() {
        assert_eq!(union(Vec::new()).assign(&Value::from(1)), Type::Never);
    }

    #[test]
    fn decode_requires_descriptor_members() {
        let params = Params::from([(
            "allowed_types".to_string(),
            ParamValue::Seq(vec![ParamValue::from("number")]),
        )]);
        assert!(matches!(
            decode_union(params),
            Err(DtypeError::InvalidParams { kind: "union", .. })
        ));
        assert!(decode_union(Params::new()).is_err());
    }
}
