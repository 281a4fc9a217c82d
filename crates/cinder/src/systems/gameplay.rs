//! Gameplay stages that run after everything the renderer depends on.
//!
//! Changes made here show up in the matrices of the next frame.

use cinder_core::{EcsResult, Entity};
use glam::{Quat, Vec3};
use tracing::debug;

use crate::components::GameComponents;
use crate::time::FrameTime;
use crate::Ecs;

/// Rotates every spinning transform.
///
/// # Errors
///
/// Infallible; returns a result to fit the pipeline.
pub fn spin(ecs: &mut Ecs, time: &FrameTime) -> EcsResult<()> {
    let GameComponents {
        transforms, spins, ..
    } = ecs.components_mut();

    for (entity, spin) in spins.iter() {
        let axis = Vec3::from_array(spin.axis).normalize_or_zero();
        if axis == Vec3::ZERO {
            continue;
        }
        if let Some(transform) = transforms.get_mut(entity) {
            let delta = Quat::from_axis_angle(axis, spin.speed * time.delta_seconds);
            transform.rotation = (delta * transform.rotation()).normalize().to_array();
        }
    }
    Ok(())
}

/// Counts lifetimes down and destroys entities whose time is up.
///
/// Expired ids are staged in the frame arena, since entities cannot be
/// destroyed while their storage is being walked.
///
/// # Errors
///
/// Returns an arena error if the frame arena cannot hold the expired ids.
pub fn expire_lifetimes(ecs: &mut Ecs, time: &FrameTime) -> EcsResult<()> {
    let (components, arena) = ecs.frame_parts_mut();

    let mut expired = 0usize;
    for (_, lifetime) in components.lifetimes.iter_mut() {
        lifetime.remaining -= time.delta_seconds;
        if lifetime.remaining <= 0.0 {
            expired += 1;
        }
    }
    if expired == 0 {
        return Ok(());
    }

    let marker = arena.marker();
    let span = arena.allocate_slice::<u32>(expired)?;
    let staged = arena.slice_mut::<u32>(span)?;
    let doomed = components
        .lifetimes
        .iter()
        .filter(|(_, lifetime)| lifetime.remaining <= 0.0)
        .map(|(entity, _)| entity.id());
    for (slot, id) in staged.iter_mut().zip(doomed) {
        *slot = id;
    }

    for index in 0..expired {
        let id = ecs.frame_arena().slice::<u32>(span)?[index];
        ecs.destroy_entity(Entity::from_raw(id))?;
    }
    ecs.frame_arena_mut().free_to_marker(marker);

    debug!(expired, "lifetimes expired");
    Ok(())
}
