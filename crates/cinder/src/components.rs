//! # Game Components
//!
//! Every component is `#[repr(C)]` plain `f32`/`u32` data so the renderer
//! can read it as bytes. Vectors, quaternions and matrices are stored as
//! arrays and converted to `glam` types inside the systems.
//!
//! Matrices are column-major.

use bytemuck::{Pod, Zeroable};
use cinder_core::{component_registry, Component};
use glam::{Mat4, Quat, Vec3};

/// Maximum live [`Transform`]s.
pub const MAX_TRANSFORMS: usize = 4096;

/// Maximum live [`Camera`]s and [`CameraController`]s.
pub const MAX_CAMERAS: usize = 4;

/// Maximum live [`Sprite`]s, and of the gameplay components that ride on them.
pub const MAX_SPRITES: usize = 2048;

/// Column-major 4x4 identity.
pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

component_registry! {
    /// Every component type the game stores, with its maximum live count.
    pub struct GameComponents {
        /// Placement of everything in the world.
        transforms: Transform => MAX_TRANSFORMS,
        /// View and projection state.
        cameras: Camera => MAX_CAMERAS,
        /// Free-look input and tuning.
        camera_controllers: CameraController => MAX_CAMERAS,
        /// Textured quads.
        sprites: Sprite => MAX_SPRITES,
        /// Constant rotation.
        spins: Spin => MAX_SPRITES,
        /// Countdown to self-destruction.
        lifetimes: Lifetime => MAX_SPRITES,
    }
}

/// Translation, rotation and scale, plus the derived local-to-world matrix.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// World-space position.
    pub translation: [f32; 3],
    /// Orientation quaternion, `[x, y, z, w]`.
    pub rotation: [f32; 4],
    /// Per-axis scale.
    pub scale: [f32; 3],
    /// Local-to-world matrix, written by the transform system.
    pub matrix: [f32; 16],
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: Quat::IDENTITY.to_array(),
            scale: [1.0; 3],
            matrix: IDENTITY,
        }
    }
}

impl Transform {
    /// Creates a transform at a position.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation: translation.to_array(),
            ..Self::default()
        }
    }

    /// Sets the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.to_array();
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale.to_array();
        self
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::from_array(self.translation)
    }

    /// Rotation as a normalized quaternion.
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_array(self.rotation).normalize()
    }

    /// Scale as a vector.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        Vec3::from_array(self.scale)
    }

    /// The stored local-to-world matrix.
    #[inline]
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.matrix)
    }
}

/// Perspective camera.
///
/// Position and orientation come from the [`Transform`] on the same entity.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Non-zero if this camera renders. The first active camera wins.
    pub active: u32,
    /// World-to-view matrix, written by the camera-matrix system.
    pub view: [f32; 16],
    /// View-to-clip matrix, written by the camera-matrix system.
    pub projection: [f32; 16],
    /// `projection * view`.
    pub view_projection: [f32; 16],
}

impl Component for Camera {
    const NAME: &'static str = "Camera";
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_3,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            active: 1,
            view: IDENTITY,
            projection: IDENTITY,
            view_projection: IDENTITY,
        }
    }
}

impl Camera {
    /// Whether this camera renders.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active != 0
    }

    /// The stored view-projection matrix.
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        Mat4::from_cols_array(&self.view_projection)
    }
}

/// Free-look controller.
///
/// The host writes `move_input` and `look_input` each frame; the
/// camera-control system consumes and zeroes them.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CameraController {
    /// Heading in radians around +Y.
    pub yaw: f32,
    /// Elevation in radians, clamped short of straight up/down.
    pub pitch: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per unit of look input.
    pub look_sensitivity: f32,
    /// Movement request in camera space: right, up, back.
    pub move_input: [f32; 3],
    /// Look request: yaw delta, pitch delta.
    pub look_input: [f32; 2],
}

impl Component for CameraController {
    const NAME: &'static str = "CameraController";
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            move_speed: 5.0,
            look_sensitivity: 0.002,
            move_input: [0.0; 3],
            look_input: [0.0; 2],
        }
    }
}

/// How a sprite is oriented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteMode {
    /// Uses the transform's rotation.
    Fixed = 0,
    /// Always faces the camera.
    Spherical = 1,
    /// Faces the camera but stays upright.
    Cylindrical = 2,
}

/// A colored quad.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Sprite {
    /// Quad width and height in world units, before transform scale.
    pub size: [f32; 2],
    /// Linear RGBA tint.
    pub color: [f32; 4],
    /// A [`SpriteMode`] discriminant.
    pub mode: u32,
    /// Quad-to-world matrix, written by the billboard system.
    pub world: [f32; 16],
}

impl Component for Sprite {
    const NAME: &'static str = "Sprite";
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            size: [1.0, 1.0],
            color: [1.0; 4],
            mode: SpriteMode::Spherical as u32,
            world: IDENTITY,
        }
    }
}

impl Sprite {
    /// Creates a sprite.
    #[must_use]
    pub fn new(size: [f32; 2], color: [f32; 4], mode: SpriteMode) -> Self {
        Self {
            size,
            color,
            mode: mode as u32,
            world: IDENTITY,
        }
    }

    /// The orientation mode. Unknown discriminants behave as `Fixed`.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> SpriteMode {
        match self.mode {
            1 => SpriteMode::Spherical,
            2 => SpriteMode::Cylindrical,
            _ => SpriteMode::Fixed,
        }
    }
}

/// Constant angular velocity.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Spin {
    /// Rotation axis, need not be normalized.
    pub axis: [f32; 3],
    /// Radians per second.
    pub speed: f32,
}

impl Component for Spin {
    const NAME: &'static str = "Spin";
}

impl Default for Spin {
    fn default() -> Self {
        Self {
            axis: [0.0, 1.0, 0.0],
            speed: 1.0,
        }
    }
}

/// Seconds until the entity is destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Lifetime {
    /// Remaining seconds.
    pub remaining: f32,
}

impl Component for Lifetime {
    const NAME: &'static str = "Lifetime";
}
