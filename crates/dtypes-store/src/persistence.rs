// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dtypes::{ArtifactContext, TypeRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::{compute_hash, SchemaEntry, SchemaStore};

// ---------------------------------------------------------------------------
// On-disk record
// ---------------------------------------------------------------------------

/// A schema file: the entry with its descriptor in wire form.
#[derive(Debug, Serialize, Deserialize)]
struct SchemaFile {
    name: String,
    revision: u32,
    hash: u64,
    updated_at: SystemTime,
    dtype: Json,
}

/// Identifies the schema file a descriptor is read from or written to.
#[derive(Debug)]
struct SchemaArtifact {
    id: String,
}

impl SchemaArtifact {
    fn for_path(path: &Path) -> Self {
        SchemaArtifact {
            id: path.display().to_string(),
        }
    }
}

impl ArtifactContext for SchemaArtifact {
    fn artifact_id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// FilePersistence
// ---------------------------------------------------------------------------

/// File-based persistence for `SchemaStore`.
///
/// Stores each schema as a JSON file at `{directory}/{schema_name}.json`.
#[derive(Debug)]
pub struct FilePersistence {
    directory: PathBuf,
    pretty: bool,
    registry: Arc<TypeRegistry>,
}

impl FilePersistence {
    /// Create a new `FilePersistence` rooted at the given directory,
    /// decoding through the process-wide registry.
    ///
    /// The directory is created if it does not exist.
    pub fn new(directory: PathBuf) -> Result<Self, StoreError> {
        Self::open(
            directory,
            true,
            TypeRegistry::shared(),
        )
    }

    /// Create a `FilePersistence` from a store configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::open(
            config.directory.clone(),
            config.pretty,
            Arc::new(TypeRegistry::with_defaults(config.inference.clone())),
        )
    }

    fn open(
        directory: PathBuf,
        pretty: bool,
        registry: Arc<TypeRegistry>,
    ) -> Result<Self, StoreError> {
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                StoreError::Io(format!(
                    "failed to create directory {}: {}",
                    directory.display(),
                    e
                ))
            })?;
        }
        Ok(FilePersistence {
            directory,
            pretty,
            registry,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Persist every schema in the store.
    ///
    /// Existing files are overwritten, and schema files of names no longer
    /// in the store are deleted. Other files in the directory are left alone.
    pub fn save(&self, store: &SchemaStore) -> Result<(), StoreError> {
        let mut written = HashSet::new();
        for (name, entry) in store.inner() {
            let path = self.path_for(name);
            let artifact = SchemaArtifact::for_path(&path);
            let record = SchemaFile {
                name: entry.name.clone(),
                revision: entry.revision,
                hash: entry.hash,
                updated_at: entry.updated_at,
                dtype: entry.dtype.to_json(Some(&artifact)),
            };
            let json = if self.pretty {
                serde_json::to_string_pretty(&record)?
            } else {
                serde_json::to_string(&record)?
            };
            fs::write(&path, json).map_err(|e| {
                StoreError::Io(format!("failed to write {}: {}", path.display(), e))
            })?;
            written.insert(path);
        }
        self.prune(&written)?;
        log::debug!(
            "[dtypes-store] saved {} schema(s) to {}",
            store.len(),
            self.directory.display()
        );
        Ok(())
    }

    /// Load every schema file from the directory into a new store.
    ///
    /// Files that are not schema records are skipped with a warning. A schema
    /// record whose descriptor does not decode fails the whole load.
    pub fn load(&self) -> Result<SchemaStore, StoreError> {
        let mut store = SchemaStore::with_registry(Arc::clone(&self.registry));

        for path in self.json_files()? {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("[dtypes-store] skipping unreadable {}: {}", path.display(), e);
                    continue;
                }
            };
            let record: SchemaFile = match serde_json::from_str(&content) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("[dtypes-store] skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let artifact = SchemaArtifact::for_path(&path);
            let dtype = self
                .registry
                .from_discriminant(&record.dtype, Some(&artifact))?;
            if dtype.is_never() {
                return Err(StoreError::Incompatible { name: record.name });
            }

            let hash = compute_hash(&dtype);
            if hash != record.hash {
                log::debug!(
                    "[dtypes-store] rehashed `{}` from {}",
                    record.name,
                    path.display()
                );
            }
            store.insert_entry(SchemaEntry {
                name: record.name,
                revision: record.revision,
                dtype,
                hash,
                updated_at: record.updated_at,
            });
        }

        log::debug!(
            "[dtypes-store] loaded {} schema(s) from {}",
            store.len(),
            self.directory.display()
        );
        Ok(store)
    }

    /// Delete schema records that were not written by the current save.
    fn prune(&self, written: &HashSet<PathBuf>) -> Result<(), StoreError> {
        for path in self.json_files()? {
            if written.contains(&path) {
                continue;
            }
            let is_schema = fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str::<SchemaFile>(&content).ok())
                .is_some();
            if !is_schema {
                continue;
            }
            fs::remove_file(&path).map_err(|e| {
                StoreError::Io(format!("failed to remove {}: {}", path.display(), e))
            })?;
            log::debug!("[dtypes-store] removed stale {}", path.display());
        }
        Ok(())
    }

    /// Regular `*.json` files directly under the directory.
    fn json_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.directory).map_err(|e| {
            StoreError::Io(format!(
                "failed to read directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let mut files = Vec::new();
        for dir_entry in entries {
            let dir_entry =
                dir_entry.map_err(|e| StoreError::Io(format!("dir entry error: {}", e)))?;
            let path = dir_entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.json", escape_name(name)))
    }
}

/// Escape a schema name for use as a file name.
///
/// Characters that are problematic in filesystem paths, and `%` itself, are
/// percent-encoded, so distinct names always map to distinct files.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dtypes::{DtypeError, Type, Value};
    use serde_json::json;

    #[test]
    fn directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested").join("schemas");
        assert!(!nested.exists());

        let persistence = FilePersistence::new(nested.clone()).unwrap();
        assert!(nested.exists());
        assert_eq!(persistence.directory(), nested.as_path());
    }

    #[test]
    fn load_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();
        let store = persistence.load().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_holds_wire_form() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();

        let mut store = SchemaStore::new();
        store
            .observe("run/config", &Value::from(json!({"lr": 0.1})))
            .unwrap();
        persistence.save(&store).unwrap();

        let content = fs::read_to_string(dir.path().join("run%2Fconfig.json")).unwrap();
        let record: Json = serde_json::from_str(&content).unwrap();
        assert_eq!(record["name"], json!("run/config"));
        assert_eq!(record["revision"], json!(1));
        assert_eq!(
            record["dtype"],
            json!({"wb_type": "dictionary", "params": {
                "type_map": {"lr": {"wb_type": "number"}},
                "policy": "E"
            }})
        );
    }

    #[test]
    fn foreign_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();
        fs::write(dir.path().join("other.json"), r#"{"hello": "world"}"#).unwrap();

        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();
        let store = persistence.load().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_discriminant_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();

        let mut store = SchemaStore::new();
        store.put("img", Type::Text).unwrap();
        persistence.save(&store).unwrap();

        let path = dir.path().join("img.json");
        let mut record: Json = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        record["dtype"] = json!({"wb_type": "image-file"});
        fs::write(&path, record.to_string()).unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Dtype(DtypeError::UnknownDiscriminant(ref name)) if name == "image-file"
        ));
    }

    #[test]
    fn escape_name_is_injective() {
        assert_eq!(escape_name("metrics::train/loss"), "metrics%3A%3Atrain%2Floss");
        assert_eq!(escape_name("a\\b?c"), "a%5Cb%3Fc");
        assert_eq!(escape_name("plain_name"), "plain_name");
        assert_ne!(escape_name("train/loss"), escape_name("train_loss"));
        assert_ne!(escape_name("a%2Fb"), escape_name("a/b"));
    }

    #[test]
    fn names_differing_only_in_escaped_chars_keep_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();

        let mut store = SchemaStore::new();
        store.put("train/loss", Type::Number).unwrap();
        store.put("train_loss", Type::Text).unwrap();
        store.put("train%2Floss", Type::Boolean).unwrap();
        persistence.save(&store).unwrap();

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.names(), vec!["train%2Floss", "train/loss", "train_loss"]);
        assert_eq!(loaded.get("train/loss").unwrap().dtype, Type::Number);
        assert_eq!(loaded.get("train_loss").unwrap().dtype, Type::Text);
        assert_eq!(loaded.get("train%2Floss").unwrap().dtype, Type::Boolean);
    }

    #[test]
    fn save_removes_files_of_removed_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("other.json"), r#"{"hello": "world"}"#).unwrap();

        let mut store = SchemaStore::new();
        store.put("a", Type::Number).unwrap();
        store.put("b", Type::Text).unwrap();
        persistence.save(&store).unwrap();
        assert!(dir.path().join("b.json").exists());

        store.remove("b").unwrap();
        persistence.save(&store).unwrap();

        assert!(!dir.path().join("b.json").exists());
        assert!(dir.path().join("other.json").exists());
        assert_eq!(persistence.load().unwrap().names(), vec!["a"]);
    }
}
