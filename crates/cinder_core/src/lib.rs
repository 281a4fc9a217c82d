//! # Cinder Core
//!
//! Fixed-capacity Entity Component System (ECS) designed for:
//! - O(1) entity and component operations
//! - Zero heap allocations once a session is running
//! - Deterministic, single-threaded frame updates
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the frame loop** - all memory is sized at startup
//! 2. **No pointers out of arenas** - pool blocks and stack spans are indices
//! 3. **Recoverable errors are values** - only memory corruption hits [`fatal`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_core::{Ecs, EcsConfig};
//!
//! let mut ecs = Ecs::<GameComponents>::new(&EcsConfig::default())?;
//! let player = ecs.create_entity()?;
//! ecs.add_component(player, Transform::default())?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod fatal;
pub mod memory;

pub use config::{ConfigError, ConfigResult, EcsConfig};
pub use ecs::{
    Component, ComponentData, ComponentRegistry, Ecs, EcsError, EcsResult, Entity,
    EntityRegistry, ErasedStorage, SparseSet, Storage,
};
pub use fatal::{fatal, FatalCode};
pub use memory::{
    MemoryError, MemoryResult, PoolAllocator, PoolHandle, StackAllocator, StackMarker, StackSpan,
};
