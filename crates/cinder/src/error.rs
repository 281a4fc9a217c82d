//! Errors surfaced by the game layer.

use cinder_core::{ConfigError, EcsError};
use thiserror::Error;

/// Anything that can stop a game session.
#[derive(Error, Debug)]
pub enum CinderError {
    /// Loading or validating configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An ECS operation failed.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// Result type for game-layer operations.
pub type CinderResult<T> = Result<T, CinderError>;
