// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Latest-schema store for `dtypes` descriptors.
//!
//! Keeps one descriptor per name, narrowed by each observed value, and
//! persists the store as one JSON file per schema with the descriptor in
//! its wire form.
//!
//! # Usage
//!
//! ```rust
//! use dtypes::{Type, Value};
//! use dtypes_store::{SchemaStore, StoreError};
//! use serde_json::json;
//!
//! let mut store = SchemaStore::new();
//! store.observe("epoch", &Value::from(json!(1))).unwrap();
//! assert_eq!(store.get("epoch").unwrap().dtype, Type::Number);
//!
//! let err = store.observe("epoch", &Value::from(json!("one"))).unwrap_err();
//! assert!(matches!(err, StoreError::Incompatible { .. }));
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod store;

pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::StoreError;
pub use persistence::FilePersistence;
pub use store::{SchemaEntry, SchemaStore};
