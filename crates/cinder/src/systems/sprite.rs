//! Sprite billboard stage.
//!
//! Reads the transform matrices written earlier in the same frame, so it
//! must run after the transform stage.

use cinder_core::EcsResult;
use glam::{EulerRot, Mat4, Quat, Vec3};

use super::camera::active_camera;
use crate::components::{GameComponents, SpriteMode, Transform};
use crate::time::FrameTime;
use crate::Ecs;

/// Writes every sprite's quad-to-world matrix.
///
/// Billboarded sprites take the active camera's orientation (all of it for
/// [`SpriteMode::Spherical`], only the heading for
/// [`SpriteMode::Cylindrical`]). Sprites without a transform are skipped.
///
/// # Errors
///
/// Infallible; returns a result to fit the pipeline.
pub fn sprite_billboard(ecs: &mut Ecs, _time: &FrameTime) -> EcsResult<()> {
    let GameComponents {
        transforms,
        cameras,
        sprites,
        ..
    } = ecs.components_mut();

    let camera_rotation = active_camera(cameras)
        .and_then(|camera| transforms.get(camera))
        .map_or(Quat::IDENTITY, Transform::rotation);
    let (camera_yaw, _, _) = camera_rotation.to_euler(EulerRot::YXZ);
    let upright_rotation = Quat::from_rotation_y(camera_yaw);

    for (entity, sprite) in sprites.iter_mut() {
        let Some(transform) = transforms.get(entity) else {
            continue;
        };
        let quad = Vec3::new(sprite.size[0], sprite.size[1], 1.0);
        let matrix = transform.matrix();

        let world = match sprite.mode() {
            SpriteMode::Fixed => matrix * Mat4::from_scale(quad),
            SpriteMode::Spherical | SpriteMode::Cylindrical => {
                let (scale, _, translation) = matrix.to_scale_rotation_translation();
                let rotation = if sprite.mode() == SpriteMode::Spherical {
                    camera_rotation
                } else {
                    upright_rotation
                };
                Mat4::from_scale_rotation_translation(scale * quad, rotation, translation)
            }
        };
        sprite.world = world.to_cols_array();
    }
    Ok(())
}
