// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Store configuration

use std::path::PathBuf;

use dtypes::{InferenceConfig, KeyPolicy};
use serde::{Deserialize, Serialize};

/// Schema store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one `{name}.json` file per schema
    pub directory: PathBuf,

    /// Pretty-print persisted schema files
    pub pretty: bool,

    /// Inference settings for descriptors produced by `observe`
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("schemas"),
            pretty: true,
            inference: InferenceConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    directory: Option<PathBuf>,
    pretty: Option<bool>,
    default_key_policy: Option<KeyPolicy>,
}

impl StoreConfigBuilder {
    /// Set the persistence directory
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Pretty-print schema files (default: true)
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Key policy of dicts inferred on first observation (default: exact)
    pub fn default_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.default_key_policy = Some(policy);
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        let defaults = StoreConfig::default();
        let inference = match self.default_key_policy {
            Some(policy) => defaults.inference.with_default_key_policy(policy),
            None => defaults.inference,
        };

        StoreConfig {
            directory: self.directory.unwrap_or(defaults.directory),
            pretty: self.pretty.unwrap_or(defaults.pretty),
            inference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::builder()
            .directory("/tmp/runs")
            .pretty(false)
            .default_key_policy(KeyPolicy::Unrestricted)
            .build();

        assert_eq!(config.directory, PathBuf::from("/tmp/runs"));
        assert!(!config.pretty);
        assert_eq!(config.inference.default_key_policy, KeyPolicy::Unrestricted);
    }

    #[test]
    fn test_config_defaults() {
        let config = StoreConfig::default();

        assert_eq!(config.directory, PathBuf::from("schemas"));
        assert!(config.pretty);
        assert_eq!(config.inference.default_key_policy, KeyPolicy::Exact);
    }
}
