//! # ECS Error Types
//!
//! Recoverable failures of entity and component operations. Exhausting a
//! fixed capacity is reported here; memory corruption goes through
//! [`fatal`](crate::fatal::fatal) instead.

use thiserror::Error;

use super::entity::Entity;
use crate::memory::MemoryError;

/// Errors that can occur in the ECS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Every entity id is in use.
    #[error("entity capacity exhausted: {capacity} entities alive")]
    EntityCapacity {
        /// Maximum number of entities.
        capacity: usize,
    },

    /// The component type has reached its declared maximum.
    #[error("component capacity exhausted for {component}: max {max_count}")]
    ComponentCapacity {
        /// Component type name.
        component: &'static str,
        /// Declared maximum live instances.
        max_count: usize,
    },

    /// The entity already has a component of this type.
    #[error("{entity} already has a {component}")]
    DuplicateComponent {
        /// The entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The entity has no component of this type.
    #[error("{entity} has no {component}")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// Component type name.
        component: &'static str,
    },

    /// The entity is not alive.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The entity id is beyond the storage's entity range.
    #[error("{entity} is outside the entity range 0..{max_entities}")]
    EntityOutOfRange {
        /// The entity.
        entity: Entity,
        /// Entity capacity the storage was built for.
        max_entities: usize,
    },

    /// Invalid ECS configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Arena setup failed.
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
