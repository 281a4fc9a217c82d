//! # Runtime Configuration
//!
//! Sizes that are fixed for the life of an [`Ecs`](crate::Ecs) but chosen
//! at startup. Per-type component maxima are compile-time and live in the
//! registry declaration instead.
//!
//! ```toml
//! max_entities = 4096
//! frame_arena_bytes = 1048576
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::{EcsError, EcsResult};

/// Default entity capacity.
pub const DEFAULT_MAX_ENTITIES: usize = 4096;

/// Default size of the per-frame scratch arena (1 MiB).
pub const DEFAULT_FRAME_ARENA_BYTES: usize = 1 << 20;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] EcsError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup sizes for an ECS session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcsConfig {
    /// Maximum number of simultaneously live entities.
    pub max_entities: usize,
    /// Bytes reserved for per-frame scratch allocations.
    pub frame_arena_bytes: usize,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            frame_arena_bytes: DEFAULT_FRAME_ARENA_BYTES,
        }
    }
}

impl EcsConfig {
    /// Creates a config with the given entity capacity and the default
    /// frame arena.
    #[must_use]
    pub fn with_max_entities(max_entities: usize) -> Self {
        Self {
            max_entities,
            ..Self::default()
        }
    }

    /// Checks that every size is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the entity capacity is zero or
    /// collides with the null entity, or the frame arena is empty.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 {
            return Err(EcsError::InvalidConfig(
                "max_entities must be greater than zero".to_string(),
            ));
        }
        if self.max_entities >= u32::MAX as usize {
            return Err(EcsError::InvalidConfig(format!(
                "max_entities must be below {}",
                u32::MAX
            )));
        }
        if self.frame_arena_bytes == 0 {
            return Err(EcsError::InvalidConfig(
                "frame_arena_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EcsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = EcsConfig::from_toml_str("max_entities = 64").unwrap();
        assert_eq!(config.max_entities, 64);
        assert_eq!(config.frame_arena_bytes, DEFAULT_FRAME_ARENA_BYTES);
    }

    #[test]
    fn test_reject_zero_entities() {
        let err = EcsConfig::from_toml_str("max_entities = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(EcsError::InvalidConfig(_))));
    }

    #[test]
    fn test_reject_unknown_keys() {
        let err = EcsConfig::from_toml_str("max_entitys = 8").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EcsConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
