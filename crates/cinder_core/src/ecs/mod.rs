//! # Entity Component System
//!
//! A fixed-capacity sparse-set ECS.
//!
//! ## Design Philosophy
//!
//! - All storage is pre-allocated when the [`Ecs`] is created
//! - One sparse set per component type, densely packed for iteration
//! - Entity ids are plain indices, recycled through a fixed free-list
//! - The component set is closed and declared at compile time

mod component;
mod entity;
mod error;
mod manager;
mod registry;
mod sparse_set;

pub use component::Component;
pub use entity::{Entity, EntityRegistry};
pub use error::{EcsError, EcsResult};
pub use manager::Ecs;
pub use registry::{ComponentRegistry, Storage};
pub use sparse_set::{ComponentData, ErasedStorage, SparseSet};
