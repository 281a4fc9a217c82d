//! # ECS Manager
//!
//! The central container for all entities and components.
//! Pre-allocates all memory at creation time.
//!
//! ## Lifecycle
//!
//! ```text
//! Ecs::new ──► Active ──► reset() ──► Active ──► destroy(self)
//!                 ▲                      │
//!                 └──────────────────────┘
//! ```
//!
//! There is no uninitialized or destroyed value to misuse: an `Ecs` only
//! exists while active, and `destroy` consumes it.

use tracing::{debug, info, warn};

use super::component::Component;
use super::entity::{Entity, EntityRegistry};
use super::error::{EcsError, EcsResult};
use super::registry::{ComponentRegistry, Storage};
use super::sparse_set::SparseSet;
use crate::config::EcsConfig;
use crate::memory::StackAllocator;

/// The ECS manager - owns the entity registry, every component storage and
/// the per-frame scratch arena.
///
/// All memory is pre-allocated at creation. No allocations occur during
/// normal operation (create, destroy, attach, detach, query).
///
/// # Type Parameters
///
/// * `R` - The component registry declared with
///   [`component_registry!`](crate::component_registry)
pub struct Ecs<R: ComponentRegistry> {
    /// Entity id pool.
    entities: EntityRegistry,
    /// One sparse set per component type.
    components: R,
    /// Scratch memory, emptied at the start of every frame.
    frame_arena: StackAllocator,
    /// Frames begun since creation or the last reset.
    frame: u64,
    /// Number of resets performed.
    resets: u64,
}

impl<R: ComponentRegistry> Ecs<R> {
    /// Creates the ECS: the entity free-list, every component storage and
    /// the frame arena.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the config fails validation.
    pub fn new(config: &EcsConfig) -> EcsResult<Self> {
        config.validate()?;

        let ecs = Self {
            entities: EntityRegistry::new(config.max_entities),
            components: R::new(config.max_entities),
            frame_arena: StackAllocator::new(config.frame_arena_bytes)?,
            frame: 0,
            resets: 0,
        };

        info!(
            max_entities = config.max_entities,
            component_types = R::TYPE_COUNT,
            frame_arena_bytes = config.frame_arena_bytes,
            "ECS created"
        );
        Ok(ecs)
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the entity registry.
    #[inline]
    #[must_use]
    pub const fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Creates an entity.
    ///
    /// Ids start at 0 and ascend; a destroyed id is handed out again before
    /// any fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityCapacity`] if every id is in use.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let Some(entity) = self.entities.allocate() else {
            warn!(capacity = self.capacity(), "entity capacity exhausted");
            return Err(EcsError::EntityCapacity {
                capacity: self.capacity(),
            });
        };
        debug!(%entity, "entity created");
        Ok(entity)
    }

    /// Destroys an entity, detaching every component it still holds before
    /// its id is recycled.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] if the entity is not alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }

        let mut stripped = 0usize;
        self.components.for_each_storage_mut(&mut |storage| {
            if storage.remove_entity(entity) {
                stripped += 1;
            }
        });
        self.entities.release(entity);

        debug!(%entity, stripped, "entity destroyed");
        Ok(())
    }

    /// Returns the storage for component `T`.
    #[inline]
    #[must_use]
    pub fn storage<T: Component>(&self) -> &SparseSet<T>
    where
        R: Storage<T>,
    {
        self.components.storage()
    }

    /// Returns the storage for component `T` mutably.
    #[inline]
    pub fn storage_mut<T: Component>(&mut self) -> &mut SparseSet<T>
    where
        R: Storage<T>,
    {
        self.components.storage_mut()
    }

    /// Returns the registry, for borrowing several storages at once.
    #[inline]
    #[must_use]
    pub const fn components(&self) -> &R {
        &self.components
    }

    /// Returns the registry mutably, for borrowing several storages at once.
    #[inline]
    pub fn components_mut(&mut self) -> &mut R {
        &mut self.components
    }

    /// Attaches a component to a live entity.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`] if the entity is not alive
    /// - [`EcsError::DuplicateComponent`] if it already has a `T`
    /// - [`EcsError::ComponentCapacity`] if `T` is at its declared maximum
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()>
    where
        R: Storage<T>,
    {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        let result = self.components.storage_mut().insert(entity, component);
        if let Err(EcsError::ComponentCapacity { max_count, .. }) = &result {
            warn!(%entity, component = T::NAME, max_count, "component capacity exhausted");
        }
        result
    }

    /// Detaches a component from a live entity, returning it.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotAlive`] if the entity is not alive
    /// - [`EcsError::MissingComponent`] if it has no `T`
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T>
    where
        R: Storage<T>,
    {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::EntityNotAlive(entity));
        }
        self.components.storage_mut().remove(entity)
    }

    /// Gets an entity's component.
    #[inline]
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T>
    where
        R: Storage<T>,
    {
        self.components.storage().get(entity)
    }

    /// Gets an entity's component mutably.
    #[inline]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T>
    where
        R: Storage<T>,
    {
        self.components.storage_mut().get_mut(entity)
    }

    /// Checks if an entity has component `T`.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool
    where
        R: Storage<T>,
    {
        self.components.storage().contains(entity)
    }

    /// Reports `(component name, live count, declared maximum)` for every
    /// component type, in declaration order.
    pub fn component_usage(&self, mut report: impl FnMut(&'static str, usize, usize)) {
        self.components.for_each_storage(&mut |storage| {
            report(storage.type_name(), storage.len(), storage.max_count());
        });
    }

    /// Returns the frame scratch arena.
    #[inline]
    #[must_use]
    pub const fn frame_arena(&self) -> &StackAllocator {
        &self.frame_arena
    }

    /// Returns the frame scratch arena mutably.
    #[inline]
    pub fn frame_arena_mut(&mut self) -> &mut StackAllocator {
        &mut self.frame_arena
    }

    /// Borrows the registry and the frame arena at the same time, for
    /// systems that stage component data in scratch memory.
    #[inline]
    pub fn frame_parts_mut(&mut self) -> (&mut R, &mut StackAllocator) {
        (&mut self.components, &mut self.frame_arena)
    }

    /// Returns the number of frames begun since creation or the last reset.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Starts a new frame: empties the scratch arena and advances the frame
    /// counter.
    ///
    /// Spans handed out during the previous frame become invalid.
    ///
    /// # Returns
    ///
    /// The new frame number.
    pub fn begin_frame(&mut self) -> u64 {
        self.frame_arena.free_all(false);
        self.frame += 1;
        self.frame
    }

    /// Clears every storage and makes every entity id available again,
    /// without releasing or reallocating any memory.
    pub fn reset(&mut self) {
        let live = self.entities.live_count();
        self.components.for_each_storage_mut(&mut |storage| {
            debug!(
                component = storage.type_name(),
                cleared = storage.len(),
                max_count = storage.max_count(),
                "storage reset"
            );
            storage.clear();
        });
        self.entities.reset();
        self.frame_arena.free_all(false);
        self.frame = 0;
        self.resets += 1;
        info!(cleared_entities = live, resets = self.resets, "ECS reset");
    }

    /// Releases every storage, the entity registry and the frame arena.
    ///
    /// Consumes the manager, so no operation can follow.
    pub fn destroy(self) {
        let mut live_components = 0usize;
        self.component_usage(|component, len, max_count| {
            debug!(component, len, max_count, "storage at destroy");
            live_components += len;
        });
        info!(
            live_entities = self.entities.live_count(),
            live_components,
            resets = self.resets,
            "ECS destroyed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Pos {
        x: f32,
        y: f32,
    }

    impl Component for Pos {
        const NAME: &'static str = "Pos";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(C)]
    struct Team(u32);

    impl Component for Team {
        const NAME: &'static str = "Team";
    }

    crate::component_registry! {
        struct Components {
            positions: Pos => 2,
            teams: Team => 4,
        }
    }

    fn ecs(max_entities: usize) -> Ecs<Components> {
        Ecs::new(&EcsConfig::with_max_entities(max_entities)).unwrap()
    }

    #[test]
    fn test_ecs_creation() {
        let ecs = ecs(8);
        assert_eq!(ecs.capacity(), 8);
        assert_eq!(ecs.live_count(), 0);
        assert_eq!(ecs.frame(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let config = EcsConfig::with_max_entities(0);
        assert!(matches!(
            Ecs::<Components>::new(&config),
            Err(EcsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_entity_capacity_scenario() {
        let mut ecs = ecs(4);
        let ids: Vec<u32> = (0..4).map(|_| ecs.create_entity().unwrap().id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        assert_eq!(
            ecs.create_entity(),
            Err(EcsError::EntityCapacity { capacity: 4 })
        );

        ecs.destroy_entity(Entity::from_raw(1)).unwrap();
        assert_eq!(ecs.entities().available(), 1);
        assert_eq!(ecs.create_entity(), Ok(Entity::from_raw(1)));
    }

    #[test]
    fn test_component_usage_reports_every_type() {
        let mut ecs = ecs(8);
        let entity = ecs.create_entity().unwrap();
        ecs.add_component(entity, Team(1)).unwrap();

        let mut usage = Vec::new();
        ecs.component_usage(|name, len, max_count| usage.push((name, len, max_count)));
        assert_eq!(usage, vec![("Pos", 0, 2), ("Team", 1, 4)]);
    }

    #[test]
    fn test_component_add_remove() {
        let mut ecs = ecs(4);
        let entity = ecs.create_entity().unwrap();

        ecs.add_component(entity, Pos { x: 1.0, y: 2.0 }).unwrap();
        assert!(ecs.has_component::<Pos>(entity));
        assert_eq!(ecs.storage::<Pos>().len(), 1);

        ecs.get_component_mut::<Pos>(entity).unwrap().x = 5.0;
        assert_eq!(ecs.remove_component::<Pos>(entity), Ok(Pos { x: 5.0, y: 2.0 }));
        assert!(!ecs.has_component::<Pos>(entity));
        assert_eq!(ecs.storage::<Pos>().len(), 0);
    }

    #[test]
    fn test_swap_remove_scenario() {
        let mut ecs = ecs(4);
        let e0 = ecs.create_entity().unwrap();
        let e1 = ecs.create_entity().unwrap();
        ecs.add_component(e0, Pos { x: 0.0, y: 0.0 }).unwrap();
        ecs.add_component(e1, Pos { x: 1.0, y: 1.0 }).unwrap();

        let e2 = ecs.create_entity().unwrap();
        assert!(matches!(
            ecs.add_component(e2, Pos::default()),
            Err(EcsError::ComponentCapacity { max_count: 2, .. })
        ));

        ecs.remove_component::<Pos>(e0).unwrap();
        assert_eq!(ecs.storage::<Pos>().as_slice()[0].entity(), e1);
        assert_eq!(ecs.get_component::<Pos>(e1), Some(&Pos { x: 1.0, y: 1.0 }));
    }

    #[test]
    fn test_destroy_cascades_components() {
        let mut ecs = ecs(2);
        let entity = ecs.create_entity().unwrap();
        ecs.add_component(entity, Pos::default()).unwrap();
        ecs.add_component(entity, Team(3)).unwrap();

        ecs.destroy_entity(entity).unwrap();
        let reused = ecs.create_entity().unwrap();
        assert_eq!(reused, entity);
        assert!(!ecs.has_component::<Pos>(reused));
        assert!(!ecs.has_component::<Team>(reused));
        assert!(ecs.storage::<Team>().is_empty());
    }

    #[test]
    fn test_dead_entity_operations() {
        let mut ecs = ecs(2);
        let entity = ecs.create_entity().unwrap();
        ecs.destroy_entity(entity).unwrap();

        assert_eq!(ecs.destroy_entity(entity), Err(EcsError::EntityNotAlive(entity)));
        assert_eq!(
            ecs.add_component(entity, Team(1)),
            Err(EcsError::EntityNotAlive(entity))
        );
        assert_eq!(
            ecs.remove_component::<Team>(entity),
            Err(EcsError::EntityNotAlive(entity))
        );
        assert_eq!(
            ecs.destroy_entity(Entity::NULL),
            Err(EcsError::EntityNotAlive(Entity::NULL))
        );
    }

    #[test]
    fn test_reset_keeps_memory() {
        let mut ecs = ecs(4);
        for _ in 0..3 {
            let entity = ecs.create_entity().unwrap();
            ecs.add_component(entity, Team(7)).unwrap();
        }
        let teams_ptr = ecs.storage::<Team>().as_slice().as_ptr();
        let _ = ecs.begin_frame();

        ecs.reset();

        assert_eq!(ecs.live_count(), 0);
        assert_eq!(ecs.frame(), 0);
        assert!(ecs.storage::<Team>().is_empty());
        assert_eq!(ecs.create_entity(), Ok(Entity::from_raw(0)));
        ecs.add_component(Entity::from_raw(0), Team(1)).unwrap();
        assert_eq!(ecs.storage::<Team>().as_slice().as_ptr(), teams_ptr);
    }

    #[test]
    fn test_begin_frame_empties_arena() {
        let mut ecs = ecs(2);
        let _ = ecs.frame_arena_mut().allocate(128);
        assert_eq!(ecs.begin_frame(), 1);
        assert_eq!(ecs.frame_arena().used(), 0);
        assert_eq!(ecs.begin_frame(), 2);
    }

    #[test]
    fn test_split_borrows_through_registry() {
        let mut ecs = ecs(2);
        let entity = ecs.create_entity().unwrap();
        ecs.add_component(entity, Pos { x: 2.0, y: 0.0 }).unwrap();
        ecs.add_component(entity, Team(2)).unwrap();

        let Components { positions, teams } = ecs.components_mut();
        for (owner, pos) in positions.iter_mut() {
            pos.y = teams.get(owner).map_or(0.0, |team| team.0 as f32);
        }
        assert_eq!(ecs.get_component::<Pos>(entity), Some(&Pos { x: 2.0, y: 2.0 }));

        ecs.destroy();
    }
}
