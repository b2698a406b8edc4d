// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Inference configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! # policy for dict descriptors produced by inference: "E", "S" or "U"
//! default_key_policy = "S"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::types::KeyPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings consulted by the registry while inferring descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Key policy of dict descriptors inferred from mappings.
    #[serde(default)]
    pub default_key_policy: KeyPolicy,
}

impl InferenceConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the key policy for inferred dicts.
    pub fn with_default_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.default_key_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_to_exact() {
        assert_eq!(InferenceConfig::default().default_key_policy, KeyPolicy::Exact);
        assert_eq!(
            InferenceConfig::from_toml_str("").unwrap(),
            InferenceConfig::default()
        );
    }

    #[test]
    fn parses_policy_codes() {
        let config = InferenceConfig::from_toml_str("default_key_policy = \"U\"").unwrap();
        assert_eq!(config.default_key_policy, KeyPolicy::Unrestricted);
    }

    #[test]
    fn rejects_unknown_fields_and_codes() {
        assert!(matches!(
            InferenceConfig::from_toml_str("default_key_policy = \"X\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(InferenceConfig::from_toml_str("strict = true").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_key_policy = \"S\"").unwrap();
        let config = InferenceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_key_policy, KeyPolicy::Subset);

        assert!(matches!(
            InferenceConfig::from_file("/nonexistent/dtypes.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
