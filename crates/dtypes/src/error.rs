// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for descriptor construction and decoding.
//!
//! Ordinary mismatches during narrowing are not errors: they produce
//! [`Type::Never`](crate::Type::Never). `DtypeError` only covers misuse of
//! constructors and malformed wire documents.

use thiserror::Error;

/// Construction and decoding failures.
#[derive(Debug, Error)]
pub enum DtypeError {
    /// A serialized descriptor was not a JSON object.
    #[error("serialized descriptor must be a JSON object, found {0}")]
    NotAnObject(String),

    /// The `wb_type` discriminant is absent or not a string.
    #[error("serialized descriptor must contain a string `wb_type` key")]
    MissingDiscriminant,

    /// No kind is registered under the discriminant.
    #[error("missing type handler for `{0}`")]
    UnknownDiscriminant(String),

    /// Parameters do not match what the kind expects.
    #[error("invalid params for `{kind}`: {reason}")]
    InvalidParams {
        /// Discriminant of the kind being built.
        kind: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// An initial list sample held elements that cannot share a descriptor.
    #[error("list contained incompatible types: expected {expected}, found item {found}")]
    IncompatibleElements {
        /// Canonical form of the element descriptor folded so far.
        expected: String,
        /// Debug rendering of the offending element.
        found: String,
    },

    /// A `const` descriptor was built from a non-literal value.
    #[error("const descriptors only hold str, int, float, bool or sets of those, found {0}")]
    UnsupportedConst(String),

    /// An entry of the nested dict shorthand is malformed.
    #[error("invalid dict spec for key `{key}`: {reason}")]
    InvalidSpec {
        /// Key whose spec was rejected.
        key: String,
        /// What was wrong.
        reason: String,
    },

    /// `object` descriptors need a non-empty class name.
    #[error("object descriptors need a non-empty class name")]
    InvalidClassName,

    /// Raw JSON text could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DtypeError {
    pub(crate) fn invalid_params(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            kind,
            reason: reason.into(),
        }
    }
}
