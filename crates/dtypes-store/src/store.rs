// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::SystemTime;

use dtypes::{Type, TypeRegistry, Value};
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::StoreError;

// ---------------------------------------------------------------------------
// SchemaEntry
// ---------------------------------------------------------------------------

/// The latest schema known under a name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaEntry {
    /// Schema name (e.g. a metadata key or a table column).
    pub name: String,
    /// Starts at 1, bumped each time the descriptor changes.
    pub revision: u32,
    /// Current descriptor. Never `Type::Never`.
    pub dtype: Type,
    /// 64-bit hash of the canonical descriptor.
    pub hash: u64,
    /// Time of the last descriptor change.
    pub updated_at: SystemTime,
}

impl SchemaEntry {
    pub(crate) fn new(name: &str, dtype: Type) -> Self {
        let hash = compute_hash(&dtype);
        SchemaEntry {
            name: name.to_string(),
            revision: 1,
            dtype,
            hash,
            updated_at: SystemTime::now(),
        }
    }
}

/// Hash of the canonical form, so equal descriptors hash equal.
pub(crate) fn compute_hash(dtype: &Type) -> u64 {
    let mut hasher = DefaultHasher::new();
    dtype.canonical().hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// SchemaStore
// ---------------------------------------------------------------------------

/// In-memory store of the latest descriptor per name.
///
/// Observations narrow the stored descriptor; an observation that would
/// narrow it to `Never` is rejected and leaves the entry as it was.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    schemas: HashMap<String, SchemaEntry>,
    registry: Arc<TypeRegistry>,
}

impl SchemaStore {
    /// Create an empty store using the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::shared())
    }

    /// Create an empty store narrowing through `registry`.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        SchemaStore {
            schemas: HashMap::new(),
            registry,
        }
    }

    /// Create an empty store with a registry built from `config.inference`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_registry(Arc::new(TypeRegistry::with_defaults(
            config.inference.clone(),
        )))
    }

    /// Registry used for inference and decoding.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Expose the inner map (used by persistence layer).
    pub(crate) fn inner(&self) -> &HashMap<String, SchemaEntry> {
        &self.schemas
    }

    /// Insert a fully-formed entry (used by persistence layer).
    pub(crate) fn insert_entry(&mut self, entry: SchemaEntry) {
        self.schemas.insert(entry.name.clone(), entry);
    }

    /// Narrow the schema stored under `name` with an observed value.
    ///
    /// A name seen for the first time starts from `Unknown`, so its schema is
    /// the descriptor inferred from `value`.
    pub fn observe(&mut self, name: &str, value: &Value) -> Result<&SchemaEntry, StoreError> {
        let narrowed = self.check(name, value)?;
        Ok(self.upsert(name, narrowed))
    }

    /// Narrow without storing: returns the descriptor `observe` would store.
    pub fn check(&self, name: &str, value: &Value) -> Result<Type, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let narrowed = match self.schemas.get(name) {
            Some(entry) => entry.dtype.assign_in(value, &self.registry),
            None => Type::Unknown.assign_in(value, &self.registry),
        };
        if narrowed.is_never() {
            log::trace!("[dtypes-store] {:?} rejected by schema `{name}`", value.kind());
            return Err(StoreError::Incompatible {
                name: name.to_string(),
            });
        }
        Ok(narrowed)
    }

    /// Store `dtype` under `name`, replacing any previous descriptor.
    ///
    /// Returns the entry's revision.
    pub fn put(&mut self, name: &str, dtype: Type) -> Result<u32, StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if dtype.is_never() {
            return Err(StoreError::Incompatible {
                name: name.to_string(),
            });
        }
        Ok(self.upsert(name, dtype).revision)
    }

    fn upsert(&mut self, name: &str, dtype: Type) -> &SchemaEntry {
        match self.schemas.entry(name.to_string()) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                if entry.dtype != dtype {
                    entry.hash = compute_hash(&dtype);
                    entry.dtype = dtype;
                    entry.revision += 1;
                    entry.updated_at = SystemTime::now();
                    log::debug!(
                        "[dtypes-store] schema `{name}` now at revision {}",
                        entry.revision
                    );
                }
                entry
            }
            Entry::Vacant(vacant) => {
                log::debug!("[dtypes-store] new schema `{name}`");
                vacant.insert(SchemaEntry::new(name, dtype))
            }
        }
    }

    /// Retrieve the schema stored under `name`.
    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.schemas.get(name)
    }

    /// Remove and return the schema stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<SchemaEntry> {
        self.schemas.remove(name)
    }

    /// All schema names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
