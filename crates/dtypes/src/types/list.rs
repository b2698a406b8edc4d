// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! List descriptors: homogeneous sequences.

use std::sync::Arc;

use crate::error::DtypeError;
use crate::params::{ParamValue, Params};
use crate::registry::{TypeKind, TypeRegistry};
use crate::types::Type;
use crate::value::{Value, ValueKind};

pub(crate) const LIST_KIND: TypeKind = TypeKind {
    name: "list",
    inferable_from: &[ValueKind::List, ValueKind::Tuple, ValueKind::Set],
    infer: Some(infer_list),
    decode: decode_list,
};

/// Sequence whose elements all narrow into `element_type`.
#[derive(Debug, Clone)]
pub struct ListType {
    element_type: Arc<Type>,
}

impl ListType {
    pub fn new(element_type: Type) -> Self {
        Self {
            element_type: Arc::new(element_type),
        }
    }

    /// Fold an initial sample into a list descriptor.
    ///
    /// Starts from `Unknown`, or `Optional[Unknown]` if the sample holds an
    /// absent element. Unlike [`Type::assign`], incompatible elements are a
    /// construction error.
    pub fn from_sample(items: &[Value]) -> Result<Self, DtypeError> {
        Self::from_sample_in(items, TypeRegistry::global())
    }

    pub fn from_sample_in(items: &[Value], registry: &TypeRegistry) -> Result<Self, DtypeError> {
        let mut element = if items.iter().any(Value::is_none) {
            Type::optional(Type::Unknown)
        } else {
            Type::Unknown
        };

        for item in items {
            let next = element.assign_in(item, registry);
            if next.is_never() {
                return Err(DtypeError::IncompatibleElements {
                    expected: element.canonical(),
                    found: format!("{item:?}"),
                });
            }
            element = next;
        }
        Ok(Self::new(element))
    }

    pub fn element_type(&self) -> &Type {
        &self.element_type
    }

    pub(crate) fn params(&self) -> Params {
        Params::from([(
            "element_type".to_string(),
            ParamValue::Type((*self.element_type).clone()),
        )])
    }

    pub(crate) fn assign_in(&self, value: &Value, registry: &TypeRegistry) -> Type {
        let Some(items) = value.as_elements() else {
            return Type::Never;
        };

        let mut element = (*self.element_type).clone();
        for item in items {
            element = element.assign_in(item, registry);
            if element.is_never() {
                log::trace!("[dtypes] list element {:?} rejected", item.kind());
                return Type::Never;
            }
        }
        Type::List(ListType::new(element))
    }
}

impl Default for ListType {
    /// List of not-yet-observed elements.
    fn default() -> Self {
        Self::new(Type::Unknown)
    }
}

fn infer_list(value: &Value, registry: &TypeRegistry) -> Result<Type, DtypeError> {
    let items = value
        .as_elements()
        .ok_or_else(|| DtypeError::invalid_params("list", "sample is not a sequence"))?;
    ListType::from_sample_in(items, registry).map(Type::List)
}

fn decode_list(mut params: Params) -> Result<Type, DtypeError> {
    match params.remove("element_type") {
        Some(ParamValue::Type(element)) => Ok(Type::List(ListType::new(element))),
        Some(_) => Err(DtypeError::invalid_params(
            "list",
            "`element_type` must be a descriptor",
        )),
        None => Err(DtypeError::invalid_params("list", "missing `element_type`")),
    }
}
