//! Configuration for the hierarchy engine
use crate::models::InstanceTypeMapping;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hard ceiling on any configured depth; caps stack depth and lookups
const MAX_SUPPORTED_DEPTH: u32 = 50;

/// Environment variable overriding `max_depth`
pub const ENV_MAX_DEPTH: &str = "INFRACAT_MAX_DEPTH";
/// Environment variable overriding `default_depth`
pub const ENV_DEFAULT_DEPTH: &str = "INFRACAT_DEFAULT_DEPTH";
/// Environment variable overriding `unknown_name`
pub const ENV_UNKNOWN_NAME: &str = "INFRACAT_UNKNOWN_NAME";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },
}

/// Configuration for `HierarchyService`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchyConfig {
    /// Smallest accepted subtree depth
    pub min_depth: u32,

    /// Largest accepted subtree depth
    pub max_depth: u32,

    /// Depth used when the caller does not supply one
    pub default_depth: u32,

    /// Maximum number of ancestors walked by root-path and dependency-chain resolution
    pub max_chain_length: usize,

    /// Placeholder for names that cannot be resolved
    pub unknown_name: String,

    /// Fixed `instance_type_id → catalog` mapping
    pub instance_types: InstanceTypeMapping,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            min_depth: 1,
            max_depth: MAX_SUPPORTED_DEPTH,
            default_depth: 3,
            max_chain_length: 64,
            unknown_name: "Unknown".to_string(),
            instance_types: InstanceTypeMapping::default(),
        }
    }
}

impl HierarchyConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `INFRACAT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from a variable lookup (environment or otherwise)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_DEPTH) {
            self.max_depth = parse_depth(ENV_MAX_DEPTH, &value)?;
        }
        if let Some(value) = lookup(ENV_DEFAULT_DEPTH) {
            self.default_depth = parse_depth(ENV_DEFAULT_DEPTH, &value)?;
        }
        if let Some(value) = lookup(ENV_UNKNOWN_NAME) {
            self.unknown_name = value;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_depth == 0 {
            return Err(ConfigError::Invalid(
                "min_depth must be greater than 0".to_string(),
            ));
        }

        if self.min_depth > self.max_depth {
            return Err(ConfigError::Invalid(format!(
                "min_depth ({}) cannot exceed max_depth ({})",
                self.min_depth, self.max_depth
            )));
        }

        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max_depth cannot exceed {}",
                MAX_SUPPORTED_DEPTH
            )));
        }

        if !self.depth_in_range(self.default_depth) {
            return Err(ConfigError::Invalid(format!(
                "default_depth ({}) must lie in [{}, {}]",
                self.default_depth, self.min_depth, self.max_depth
            )));
        }

        if self.max_chain_length == 0 {
            return Err(ConfigError::Invalid(
                "max_chain_length must be greater than 0".to_string(),
            ));
        }

        if self.unknown_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "unknown_name cannot be empty".to_string(),
            ));
        }

        if self.instance_types.is_empty() {
            return Err(ConfigError::Invalid(
                "instance_types must map at least one type id".to_string(),
            ));
        }

        let duplicates = self.instance_types.duplicate_kinds();
        if !duplicates.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "instance_types maps a catalog more than once: {:?}",
                duplicates
            )));
        }

        Ok(())
    }

    /// Whether `depth` is an accepted subtree depth
    pub fn depth_in_range(&self, depth: u32) -> bool {
        (self.min_depth..=self.max_depth).contains(&depth)
    }
}

fn parse_depth(var: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceType;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HierarchyConfig::default();
        assert_eq!(config.min_depth, 1);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.default_depth, 3);
        assert_eq!(config.unknown_name, "Unknown");
        assert_eq!(config.instance_types.len(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = HierarchyConfig::default();

        config.min_depth = 0;
        assert!(config.validate().is_err());

        config.min_depth = 10;
        config.max_depth = 5;
        assert!(config.validate().is_err());

        config.min_depth = 1;
        config.max_depth = 51;
        assert!(config.validate().is_err());

        config.max_depth = 50;
        config.default_depth = 0;
        assert!(config.validate().is_err());

        config.default_depth = 3;
        config.unknown_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.unknown_name = "Unknown".to_string();
        config.instance_types =
            InstanceTypeMapping::from_pairs([(1, InstanceType::School), (2, InstanceType::School)]);
        assert!(config.validate().is_err());

        config.instance_types = InstanceTypeMapping::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MAX_DEPTH, "20"),
            (ENV_DEFAULT_DEPTH, "5"),
            (ENV_UNKNOWN_NAME, "Desconocido"),
        ]
        .into_iter()
        .collect();

        let config = HierarchyConfig::default()
            .with_overrides(|var| vars.get(var).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.default_depth, 5);
        assert_eq!(config.unknown_name, "Desconocido");
    }

    #[test]
    fn test_override_rejects_garbage() {
        let result = HierarchyConfig::default().with_overrides(|var| {
            (var == ENV_MAX_DEPTH).then(|| "deep".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));

        // Parses, but falls outside the supported range
        let result = HierarchyConfig::default().with_overrides(|var| {
            (var == ENV_MAX_DEPTH).then(|| "500".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"maxDepth": 10, "instanceTypes": {{"1": "direction", "2": "school"}}}}"#
        )
        .unwrap();

        let config = HierarchyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.min_depth, 1);
        assert_eq!(config.instance_types.resolve(2), Some(InstanceType::School));
        assert_eq!(config.instance_types.resolve(6), None);
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            HierarchyConfig::from_file("/nonexistent/infracat.json"),
            Err(ConfigError::Read { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            HierarchyConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
