// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object descriptors: fallback matching on runtime class name.

use crate::error::DtypeError;
use crate::params::{ParamValue, Params};
use crate::registry::TypeKind;
use crate::types::Type;
use crate::value::Value;

pub(crate) const OBJECT_KIND: TypeKind = TypeKind {
    name: "object",
    inferable_from: &[],
    infer: None,
    decode: decode_object,
};

/// Matches values whose class name equals `class_name`.
#[derive(Debug, Clone)]
pub struct ObjectType {
    class_name: String,
}

impl ObjectType {
    pub fn new(class_name: impl Into<String>) -> Result<Self, DtypeError> {
        let class_name = class_name.into();
        if class_name.is_empty() {
            return Err(DtypeError::InvalidClassName);
        }
        Ok(Self { class_name })
    }

    /// Descriptor for the class of `value`.
    pub fn of(value: &Value) -> Result<Self, DtypeError> {
        Self::new(value.class_name())
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        value.class_name() == self.class_name
    }

    pub(crate) fn params(&self) -> Params {
        Params::from([(
            "class_name".to_string(),
            ParamValue::from(self.class_name.as_str()),
        )])
    }
}

fn decode_object(params: Params) -> Result<Type, DtypeError> {
    let class_name = params
        .get("class_name")
        .and_then(ParamValue::as_str)
        .ok_or_else(|| DtypeError::invalid_params("object", "missing string `class_name`"))?;
    ObjectType::new(class_name).map(Type::Object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_on_class_name() {
        let t = Type::Object(ObjectType::new("Image").unwrap());
        assert_eq!(t.assign(&Value::object("Image")), t);
        assert_eq!(t.assign(&Value::object("Audio")), Type::Never);
        assert_eq!(t.assign(&Value::from("Image")), Type::Never);
    }

    #[test]
    fn builtin_classes_have_names_too() {
        let t = Type::Object(ObjectType::of(&Value::from(1)).unwrap());
        assert_eq!(t.assign(&Value::from(7)), t);
        assert_eq!(t.assign(&Value::from(7.0)), Type::Never);
    }

    #[test]
    fn empty_class_name_is_rejected() {
        assert!(matches!(ObjectType::new(""), Err(DtypeError::InvalidClassName)));
        assert!(decode_object(Params::new()).is_err());
    }
}
