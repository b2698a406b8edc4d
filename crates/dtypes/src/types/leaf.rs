// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry entries for the singleton kinds.
//!
//! Narrowing rules for leaves live in [`Type::assign_in`]; this module only
//! describes which runtime classes infer to which leaf and how leaves decode.

use crate::error::DtypeError;
use crate::params::Params;
use crate::registry::{TypeKind, TypeRegistry};
use crate::types::Type;
use crate::value::{Value, ValueKind};

macro_rules! leaf_kind {
    ($name:literal, $variant:ident, [$($class:ident),*]) => {{
        fn infer(_: &Value, _: &TypeRegistry) -> Result<Type, DtypeError> {
            Ok(Type::$variant)
        }
        fn decode(_: Params) -> Result<Type, DtypeError> {
            Ok(Type::$variant)
        }
        TypeKind {
            name: $name,
            inferable_from: &[$(ValueKind::$class),*],
            infer: Some(infer),
            decode,
        }
    }};
}

/// Leaf entries, in registration order.
pub(crate) const LEAF_KINDS: [TypeKind; 7] = [
    leaf_kind!("never", Never, []),
    leaf_kind!("any", Any, []),
    leaf_kind!("unknown", Unknown, []),
    leaf_kind!("none", None, [None]),
    leaf_kind!("text", Text, [Str]),
    leaf_kind!("number", Number, [Int, Float]),
    leaf_kind!("boolean", Boolean, [Bool]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_descriptor_discriminants() {
        let expected = [
            Type::Never,
            Type::Any,
            Type::Unknown,
            Type::None,
            Type::Text,
            Type::Number,
            Type::Boolean,
        ];
        for (kind, t) in LEAF_KINDS.iter().zip(expected.iter()) {
            assert_eq!(kind.name, t.name());
            assert_eq!((kind.decode)(Params::new()).unwrap(), *t);
        }
    }

    #[test]
    fn number_is_inferable_from_both_numeric_classes() {
        let number = &LEAF_KINDS[5];
        assert_eq!(number.inferable_from, &[ValueKind::Int, ValueKind::Float]);
    }
}
