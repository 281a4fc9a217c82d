//! # Cinder
//!
//! Game layer on top of [`cinder_core`]:
//! - [`components`] - the closed component set and its registry
//! - [`systems`] - the ordered per-frame pipeline
//! - [`render`] - sprite draw data packed for the renderer
//!
//! ## Frame Loop
//!
//! ```rust,ignore
//! let frame = ecs.begin_frame();
//! let time = clock.tick(frame, delta);
//! systems_update(&mut ecs, &time)?;
//! let batch = build_sprite_batch(&mut ecs)?;
//! renderer.draw(batch.instances(&ecs)?);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod components;
pub mod config;
pub mod error;
pub mod render;
pub mod scene;
pub mod systems;
pub mod time;

pub use components::GameComponents;
pub use config::{CinderConfig, SceneConfig};
pub use error::{CinderError, CinderResult};
pub use render::{build_sprite_batch, SpriteBatch, SpriteInstance};
pub use systems::{systems_update, PIPELINE};
pub use time::{FrameClock, FrameTime};

/// The ECS specialized to the game's components.
pub type Ecs = cinder_core::Ecs<GameComponents>;
