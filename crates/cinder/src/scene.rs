//! Demo scene setup.

use cinder_core::{EcsResult, Entity};
use glam::Vec3;
use tracing::debug;

use crate::components::{
    Camera, CameraController, GameComponents, Lifetime, Spin, Sprite, SpriteMode, Transform,
};
use crate::config::SceneConfig;
use crate::Ecs;

/// Sprites per grid row.
const GRID_WIDTH: usize = 32;

/// Distance between grid cells.
const GRID_SPACING: f32 = 1.5;

/// Spawns the free-look camera, placed to see the sprite grid.
///
/// # Errors
///
/// Returns an ECS error if the entity or component capacity is exhausted.
pub fn spawn_camera(ecs: &mut Ecs) -> EcsResult<Entity> {
    let camera = ecs.create_entity()?;
    ecs.add_component(
        camera,
        Transform::from_translation(Vec3::new(0.0, 4.0, 24.0)),
    )?;
    ecs.add_component(camera, Camera::default())?;
    ecs.add_component(camera, CameraController::default())?;
    Ok(camera)
}

/// Spawns sprite number `index` of the grid.
///
/// Modes cycle through spherical, cylindrical and fixed. Fixed sprites
/// spin. Every third sprite gets a lifetime unless lifetimes are disabled.
///
/// # Errors
///
/// Returns an ECS error if the entity or component capacity is exhausted.
#[allow(clippy::cast_precision_loss)]
pub fn spawn_sprite(ecs: &mut Ecs, index: usize, scene: &SceneConfig) -> EcsResult<Entity> {
    let column = (index % GRID_WIDTH) as f32 - GRID_WIDTH as f32 / 2.0;
    let row = (index / GRID_WIDTH) as f32;
    let position = Vec3::new(column * GRID_SPACING, 0.0, -row * GRID_SPACING);

    let mode = match index % 3 {
        0 => SpriteMode::Spherical,
        1 => SpriteMode::Cylindrical,
        _ => SpriteMode::Fixed,
    };
    let hue = (index % GRID_WIDTH) as f32 / GRID_WIDTH as f32;

    let entity = ecs.create_entity()?;
    ecs.add_component(entity, Transform::from_translation(position))?;
    ecs.add_component(entity, Sprite::new([1.0, 1.0], [hue, 0.5, 1.0 - hue, 1.0], mode))?;

    if mode == SpriteMode::Fixed {
        ecs.add_component(
            entity,
            Spin {
                axis: [0.0, 1.0, 0.0],
                speed: 1.0 + hue,
            },
        )?;
    }
    if index % 3 == 0 && scene.sprite_lifetime_seconds > 0.0 {
        // Stagger expiry so respawns spread over frames.
        let stagger = (index % 7) as f32 / 7.0;
        ecs.add_component(
            entity,
            Lifetime {
                remaining: scene.sprite_lifetime_seconds * (1.0 + stagger),
            },
        )?;
    }
    Ok(entity)
}

/// The sprite grid: one slot per configured sprite, remembering the entity
/// that currently fills it.
///
/// Refilling respawns a sprite into the slot it vanished from, so each
/// cell keeps its mode and lifetime however long the scene runs.
#[derive(Debug)]
pub struct SpriteGrid {
    slots: Box<[Entity]>,
}

impl SpriteGrid {
    /// Creates an empty grid with `scene.sprites` slots.
    #[must_use]
    pub fn new(scene: &SceneConfig) -> Self {
        Self {
            slots: vec![Entity::NULL; scene.sprites].into_boxed_slice(),
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks if the grid has no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the entity in `slot`, or [`Entity::NULL`] if it is empty or
    /// out of range.
    #[inline]
    #[must_use]
    pub fn slot(&self, slot: usize) -> Entity {
        self.slots.get(slot).copied().unwrap_or(Entity::NULL)
    }

    /// Spawns a sprite into every slot whose sprite is gone.
    ///
    /// Returns how many were spawned.
    ///
    /// # Errors
    ///
    /// Returns an ECS error if the entity or component capacity is exhausted.
    pub fn fill(&mut self, ecs: &mut Ecs, scene: &SceneConfig) -> EcsResult<usize> {
        // Forget vanished sprites first, so a recycled id is never mistaken
        // for a slot's previous occupant.
        for slot in self.slots.iter_mut() {
            if !(ecs.is_alive(*slot) && ecs.has_component::<Sprite>(*slot)) {
                *slot = Entity::NULL;
            }
        }

        let mut spawned = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_null() {
                *slot = spawn_sprite(ecs, index, scene)?;
                spawned += 1;
            }
        }
        if spawned > 0 {
            debug!(spawned, "sprite grid refilled");
        }
        Ok(spawned)
    }
}

/// Counts the sprites of each mode: spherical, cylindrical, fixed.
#[must_use]
pub fn sprite_modes(components: &GameComponents) -> [usize; 3] {
    let mut counts = [0; 3];
    for (_, sprite) in components.sprites.iter() {
        let slot = match sprite.mode() {
            SpriteMode::Spherical => 0,
            SpriteMode::Cylindrical => 1,
            SpriteMode::Fixed => 2,
        };
        counts[slot] += 1;
    }
    counts
}
