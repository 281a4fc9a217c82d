//! Transform stage.

use cinder_core::EcsResult;
use glam::Mat4;

use crate::time::FrameTime;
use crate::Ecs;

/// Recomputes every local-to-world matrix from translation, rotation and
/// scale.
///
/// # Errors
///
/// Infallible; returns a result to fit the pipeline.
pub fn transform_matrix(ecs: &mut Ecs, _time: &FrameTime) -> EcsResult<()> {
    for (_, transform) in ecs.components_mut().transforms.iter_mut() {
        transform.matrix = Mat4::from_scale_rotation_translation(
            transform.scale(),
            transform.rotation(),
            transform.translation(),
        )
        .to_cols_array();
    }
    Ok(())
}
