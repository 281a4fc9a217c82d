//! # Render Boundary
//!
//! After the update, sprite draw data is packed into the frame arena. The
//! renderer receives a [`SpriteBatch`] and reads the instances as plain
//! bytes; it never touches component storage.

use bytemuck::{Pod, Zeroable};
use cinder_core::{EcsResult, StackSpan};
use glam::Mat4;

use crate::components::{GameComponents, IDENTITY};
use crate::systems::active_camera;
use crate::Ecs;

/// Per-instance vertex data for one sprite quad.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SpriteInstance {
    /// Quad-to-world matrix, column-major.
    pub model: [f32; 16],
    /// Linear RGBA tint.
    pub color: [f32; 4],
}

/// Sprite instances for one frame, living in the frame arena.
///
/// Valid until the next [`Ecs::begin_frame`](cinder_core::Ecs::begin_frame);
/// reading it after that is a fatal stale-span error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteBatch {
    span: StackSpan,
    count: usize,
    view_projection: [f32; 16],
}

impl SpriteBatch {
    /// Number of instances.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether there is nothing to draw.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// View-projection of the active camera, or identity without one.
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_array(&self.view_projection)
    }

    /// The instances, borrowed from the frame arena.
    ///
    /// # Errors
    ///
    /// Returns an arena error if the span cannot be viewed as instances.
    pub fn instances<'a>(&self, ecs: &'a Ecs) -> EcsResult<&'a [SpriteInstance]> {
        Ok(ecs.frame_arena().slice::<SpriteInstance>(self.span)?)
    }
}

/// Packs every sprite's world matrix and color into the frame arena.
///
/// Call after [`systems_update`](crate::systems::systems_update).
///
/// # Errors
///
/// Returns an arena error if the frame arena is too small for the batch.
pub fn build_sprite_batch(ecs: &mut Ecs) -> EcsResult<SpriteBatch> {
    let (components, arena) = ecs.frame_parts_mut();
    let GameComponents {
        cameras, sprites, ..
    } = components;

    let view_projection = active_camera(cameras)
        .and_then(|camera| cameras.get(camera))
        .map_or(IDENTITY, |camera| camera.view_projection);

    let count = sprites.len();
    let span = arena.allocate_slice::<SpriteInstance>(count)?;
    let instances = arena.slice_mut::<SpriteInstance>(span)?;
    for (instance, (_, sprite)) in instances.iter_mut().zip(sprites.iter()) {
        *instance = SpriteInstance {
            model: sprite.world,
            color: sprite.color,
        };
    }

    Ok(SpriteBatch {
        span,
        count,
        view_projection,
    })
}
