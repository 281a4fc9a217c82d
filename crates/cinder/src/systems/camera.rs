//! Camera stages: free-look control, then view/projection matrices.

use cinder_core::{EcsResult, Entity, SparseSet};
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::components::{Camera, GameComponents};
use crate::time::FrameTime;
use crate::Ecs;

/// Pitch limit, just short of straight up or down.
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Returns the first active camera in storage order.
#[must_use]
pub fn active_camera(cameras: &SparseSet<Camera>) -> Option<Entity> {
    cameras
        .iter()
        .find(|(_, camera)| camera.is_active())
        .map(|(entity, _)| entity)
}

/// Applies and clears controller input, writing the camera entity's
/// transform rotation and translation.
///
/// # Errors
///
/// Infallible; returns a result to fit the pipeline.
pub fn camera_control(ecs: &mut Ecs, time: &FrameTime) -> EcsResult<()> {
    let GameComponents {
        transforms,
        camera_controllers,
        ..
    } = ecs.components_mut();

    for (entity, controller) in camera_controllers.iter_mut() {
        let [look_x, look_y] = controller.look_input;
        controller.yaw = (controller.yaw - look_x * controller.look_sensitivity)
            .rem_euclid(std::f32::consts::TAU);
        controller.pitch = (controller.pitch - look_y * controller.look_sensitivity)
            .clamp(-MAX_PITCH, MAX_PITCH);

        let movement = Vec3::from_array(controller.move_input).clamp_length_max(1.0);
        controller.look_input = [0.0; 2];
        controller.move_input = [0.0; 3];

        let Some(transform) = transforms.get_mut(entity) else {
            continue;
        };
        let rotation = Quat::from_euler(EulerRot::YXZ, controller.yaw, controller.pitch, 0.0);
        let step = rotation * movement * controller.move_speed * time.delta_seconds;
        transform.rotation = rotation.to_array();
        transform.translation = (transform.translation() + step).to_array();
    }
    Ok(())
}

/// Rebuilds every camera's view, projection and view-projection matrices
/// from the camera entity's translation and rotation.
///
/// # Errors
///
/// Infallible; returns a result to fit the pipeline.
pub fn camera_matrix(ecs: &mut Ecs, _time: &FrameTime) -> EcsResult<()> {
    let GameComponents {
        transforms,
        cameras,
        ..
    } = ecs.components_mut();

    for (entity, camera) in cameras.iter_mut() {
        let (rotation, translation) = transforms
            .get(entity)
            .map_or((Quat::IDENTITY, Vec3::ZERO), |t| (t.rotation(), t.translation()));

        let view = Mat4::from_rotation_translation(rotation, translation).inverse();
        let projection = Mat4::perspective_rh(
            camera.fov_y,
            camera.aspect.max(f32::EPSILON),
            camera.near,
            camera.far,
        );

        camera.view = view.to_cols_array();
        camera.projection = projection.to_cols_array();
        camera.view_projection = (projection * view).to_cols_array();
    }
    Ok(())
}
