// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: inference and polymorphic decoding.
//!
//! The registry maps a wire discriminant to a decoder, and a runtime class
//! tag to an inference constructor. Registration takes `&mut self`, so a
//! registry is filled by a single writer and only shared once complete.
//!
//! The process-wide registry is frozen on first use:
//!
//! ```rust
//! use dtypes::{TypeRegistry, Type, Value};
//!
//! let registry = TypeRegistry::global();
//! assert_eq!(registry.infer(&Value::from("a")), Type::Text);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value as Json;

use crate::config::InferenceConfig;
use crate::error::DtypeError;
use crate::params::{decode_params, Params};
use crate::types::{
    ObjectType, Type, CONST_KIND, DICT_KIND, LEAF_KINDS, LIST_KIND, OBJECT_KIND, UNION_KIND,
};
use crate::value::{Value, ValueKind};

static GLOBAL_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Opaque handle identifying the artifact a descriptor is stored alongside.
///
/// Passed through serialization untouched; descriptor kinds whose
/// parameters reference externally stored objects resolve them through it.
pub trait ArtifactContext: fmt::Debug + Send + Sync {
    fn artifact_id(&self) -> &str;
}

/// Builds a descriptor from a sample value.
pub type InferFn = fn(&Value, &TypeRegistry) -> Result<Type, DtypeError>;

/// Builds a descriptor from already-decoded parameters.
pub type DecodeFn = fn(Params) -> Result<Type, DtypeError>;

/// Registry entry for one descriptor kind.
#[derive(Clone, Copy)]
pub struct TypeKind {
    /// Wire discriminant.
    pub name: &'static str,
    /// Runtime classes this kind is inferred from.
    pub inferable_from: &'static [ValueKind],
    /// Constructor used for inference, if the kind has default mappings.
    pub infer: Option<InferFn>,
    pub decode: DecodeFn,
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKind")
            .field("name", &self.name)
            .field("inferable_from", &self.inferable_from)
            .field("infers", &self.infer.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// Catalog of descriptor kinds.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    by_name: HashMap<&'static str, TypeKind>,
    by_class: HashMap<ValueKind, TypeKind>,
    config: InferenceConfig,
}

impl TypeRegistry {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: InferenceConfig) -> Self {
        TypeRegistry {
            by_name: HashMap::new(),
            by_class: HashMap::new(),
            config,
        }
    }

    /// Create a registry holding the built-in kinds.
    pub fn with_defaults(config: InferenceConfig) -> Self {
        let mut registry = Self::with_config(config);
        for kind in LEAF_KINDS {
            registry.register(kind);
        }
        for kind in [LIST_KIND, DICT_KIND, UNION_KIND, OBJECT_KIND, CONST_KIND] {
            registry.register(kind);
        }
        registry
    }

    /// Record `kind` under its name and every class it is inferable from.
    ///
    /// A later registration replaces an earlier one for the same name or
    /// class.
    pub fn register(&mut self, kind: TypeKind) {
        log::debug!(
            "[dtypes] registering kind `{}` for {:?}",
            kind.name,
            kind.inferable_from
        );
        self.by_name.insert(kind.name, kind);
        if kind.infer.is_some() {
            for class in kind.inferable_from {
                self.by_class.insert(*class, kind);
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeKind> {
        self.by_name.get(name)
    }

    /// Registered discriminants (sorted for determinism).
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer a descriptor for `value`, surfacing constructor failures.
    ///
    /// Classes without a registered constructor fall back to an `object`
    /// descriptor carrying the class name.
    pub fn try_infer(&self, value: &Value) -> Result<Type, DtypeError> {
        match self.by_class.get(&value.kind()).and_then(|kind| kind.infer) {
            Some(infer) => infer(value, self),
            None => ObjectType::of(value).map(Type::Object),
        }
    }

    /// Infer a descriptor for `value`. Never fails: a sample no descriptor
    /// can describe (such as a heterogeneous list) infers to `Never`.
    pub fn infer(&self, value: &Value) -> Type {
        self.try_infer(value).unwrap_or_else(|err| {
            log::trace!("[dtypes] inference of {:?} failed: {err}", value.kind());
            Type::Never
        })
    }

    /// Decode a serialized descriptor.
    ///
    /// A missing `wb_type`, or one with no registered kind, is an error.
    pub fn from_discriminant(
        &self,
        json: &Json,
        ctx: Option<&dyn ArtifactContext>,
    ) -> Result<Type, DtypeError> {
        let object = json
            .as_object()
            .ok_or_else(|| DtypeError::NotAnObject(json.to_string()))?;
        let name = object
            .get("wb_type")
            .and_then(Json::as_str)
            .ok_or(DtypeError::MissingDiscriminant)?;
        let kind = self
            .lookup(name)
            .ok_or_else(|| DtypeError::UnknownDiscriminant(name.to_string()))?;

        if let Some(ctx) = ctx {
            log::trace!("[dtypes] decoding `{name}` for artifact {}", ctx.artifact_id());
        }
        let params = decode_params(object.get("params"), self, ctx)?;
        (kind.decode)(params)
    }

    /// Parse and decode a serialized descriptor from JSON text.
    pub fn from_json_str(
        &self,
        text: &str,
        ctx: Option<&dyn ArtifactContext>,
    ) -> Result<Type, DtypeError> {
        let json: Json = serde_json::from_str(text)?;
        self.from_discriminant(&json, ctx)
    }

    // -----------------------------------------------------------------------
    // Process-wide instance
    // -----------------------------------------------------------------------

    /// Freeze `registry` as the process-wide registry.
    ///
    /// Must run before the first call to [`TypeRegistry::global`]; otherwise
    /// the registry is handed back.
    pub fn install(registry: TypeRegistry) -> Result<(), TypeRegistry> {
        let names = registry.names();
        GLOBAL_REGISTRY
            .set(Arc::new(registry))
            .map_err(Arc::unwrap_or_clone)?;
        log::debug!("[dtypes] installed global registry with kinds {names:?}");
        Ok(())
    }

    /// The process-wide registry, initialized with the built-in kinds unless
    /// one was installed first.
    pub fn global() -> &'static TypeRegistry {
        Self::global_arc()
    }

    /// Shared handle to the process-wide registry, for owners that hold
    /// their registry behind an `Arc`.
    pub fn shared() -> Arc<TypeRegistry> {
        Arc::clone(Self::global_arc())
    }

    fn global_arc() -> &'static Arc<TypeRegistry> {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(TypeRegistry::with_defaults(InferenceConfig::default())))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer a descriptor for `value` with the process-wide registry.
pub fn type_of(value: &Value) -> Type {
    TypeRegistry::global().infer(value)
}

/// Decode a serialized descriptor with the process-wide registry.
pub fn from_json(json: &Json, ctx: Option<&dyn ArtifactContext>) -> Result<Type, DtypeError> {
    TypeRegistry::global().from_discriminant(json, ctx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
