//! # Game Configuration
//!
//! One TOML file holds the ECS sizes and the demo scene:
//!
//! ```toml
//! [ecs]
//! max_entities = 4096
//! frame_arena_bytes = 1048576
//!
//! [scene]
//! sprites = 512
//! frames = 600
//! delta_seconds = 0.016
//! sprite_lifetime_seconds = 4.0
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use std::path::Path;

use cinder_core::{ConfigError, ConfigResult, EcsConfig, EcsError, EcsResult};
use serde::{Deserialize, Serialize};

use crate::components::MAX_SPRITES;

/// Scene setup for the demo runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Sprites kept alive in the scene.
    pub sprites: usize,
    /// Frames to simulate.
    pub frames: u64,
    /// Fixed step per frame, in seconds.
    pub delta_seconds: f32,
    /// Lifetime of the short-lived sprites, in seconds. Zero disables expiry.
    pub sprite_lifetime_seconds: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sprites: 512,
            frames: 600,
            delta_seconds: 1.0 / 60.0,
            sprite_lifetime_seconds: 4.0,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CinderConfig {
    /// ECS sizes.
    pub ecs: EcsConfig,
    /// Demo scene.
    pub scene: SceneConfig,
}

impl CinderConfig {
    /// Checks the ECS sizes and that the scene fits in them.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if any value is out of range.
    pub fn validate(&self) -> EcsResult<()> {
        self.ecs.validate()?;
        // One slot goes to the camera.
        let room = self.ecs.max_entities.saturating_sub(1).min(MAX_SPRITES);
        if self.scene.sprites > room {
            return Err(EcsError::InvalidConfig(format!(
                "scene.sprites is {} but at most {room} fit",
                self.scene.sprites
            )));
        }
        if !self.scene.delta_seconds.is_finite() || self.scene.delta_seconds < 0.0 {
            return Err(EcsError::InvalidConfig(
                "scene.delta_seconds must be a non-negative number".to_string(),
            ));
        }
        if !self.scene.sprite_lifetime_seconds.is_finite()
            || self.scene.sprite_lifetime_seconds < 0.0
        {
            return Err(EcsError::InvalidConfig(
                "scene.sprite_lifetime_seconds must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates TOML text.
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

    /// Loads and validates a file.
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
