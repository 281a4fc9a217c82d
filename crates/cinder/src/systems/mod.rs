//! # System Pipeline
//!
//! The per-frame update is a fixed, ordered list of stages. Each stage
//! reads values written by the stages before it:
//!
//! ```text
//! camera_control ─► camera_matrix ─► transform_matrix ─► sprite_billboard ─► spin ─► expire_lifetimes
//! ```
//!
//! Gameplay runs last, so its changes reach the matrices on the next frame.

mod camera;
mod gameplay;
mod sprite;
mod transform;

use cinder_core::EcsResult;
use tracing::debug_span;

use crate::time::FrameTime;
use crate::Ecs;

pub use camera::{active_camera, camera_control, camera_matrix, MAX_PITCH};
pub use gameplay::{expire_lifetimes, spin};
pub use sprite::sprite_billboard;
pub use transform::transform_matrix;

/// A pipeline stage.
pub type SystemFn = fn(&mut Ecs, &FrameTime) -> EcsResult<()>;

/// Every stage, in execution order.
pub const PIPELINE: [(&str, SystemFn); 6] = [
    ("camera_control", camera_control),
    ("camera_matrix", camera_matrix),
    ("transform_matrix", transform_matrix),
    ("sprite_billboard", sprite_billboard),
    ("spin", spin),
    ("expire_lifetimes", expire_lifetimes),
];

/// Runs the whole pipeline once.
///
/// # Errors
///
/// Stops at the first stage that fails and returns its error. Stages
/// before it have already been applied.
pub fn systems_update(ecs: &mut Ecs, time: &FrameTime) -> EcsResult<()> {
    for (name, system) in PIPELINE {
        let _span = debug_span!("system", stage = name, frame = time.frame).entered();
        system(ecs, time)?;
    }
    Ok(())
}
