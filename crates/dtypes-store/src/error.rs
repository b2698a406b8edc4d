// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use dtypes::DtypeError;
use thiserror::Error;

/// Errors produced by the schema store and its persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schema names must be non-empty.
    #[error("schema name is empty")]
    EmptyName,

    /// The observation does not fit the stored schema.
    #[error("value is incompatible with schema `{name}`")]
    Incompatible { name: String },

    /// A stored descriptor failed to decode.
    #[error("descriptor error: {0}")]
    Dtype(#[from] DtypeError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
