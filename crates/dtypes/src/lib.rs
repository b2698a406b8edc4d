// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural type descriptors for semi-structured metadata.
//!
//! Descriptors are inferred from observed values, narrowed as more values
//! are observed, and moved across storage boundaries in a discriminated JSON
//! form. They back schema validation for artifact metadata: nested records
//! of scalars, lists and dictionaries.
//!
//! # Features
//!
//! - **Inference**: [`type_of`] maps a [`Value`] to the most specific descriptor
//! - **Narrowing**: [`Type::assign`] widens or narrows a descriptor with a new
//!   observation; mismatches yield [`Type::Never`], never an error
//! - **Wire form**: `{"wb_type": <name>, "params": {...}}`, decoded through
//!   the [`TypeRegistry`]
//! - **Canonical equality**: descriptors compare by canonical JSON, so union
//!   member order and dict key order never cause false inequality
//!
//! # Usage
//!
//! ```rust
//! use dtypes::{type_of, Type, Value};
//! use serde_json::json;
//!
//! let first = Value::from(json!({"loss": 0.5, "tags": ["a"]}));
//! let schema = type_of(&first);
//!
//! let next = Value::from(json!({"loss": 0.25, "tags": ["b", "c"]}));
//! assert_eq!(schema.assign(&next), schema);
//!
//! let broken = Value::from(json!({"loss": "high", "tags": []}));
//! assert_eq!(schema.assign(&broken), Type::Never);
//!
//! let wire = schema.to_json(None);
//! assert_eq!(dtypes::from_json(&wire, None).unwrap(), schema);
//! ```

pub mod canonical;
pub mod config;
pub mod error;
pub mod params;
pub mod registry;
pub mod types;
pub mod value;

pub use config::{ConfigError, InferenceConfig};
pub use error::DtypeError;
pub use params::{ParamValue, Params};
pub use registry::{from_json, type_of, ArtifactContext, TypeKind, TypeRegistry};
pub use types::{
    ConstType, ConstValue, DictType, KeyPolicy, ListType, Literal, ObjectType, Type, TypeSpec,
    UnionType,
};
pub use value::{Value, ValueKind};
