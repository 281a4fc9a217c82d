//! # Entity Management
//!
//! Entities are bare `u32` keys. They carry no payload and are recycled
//! through a fixed free-list once destroyed.

use std::fmt;

/// Opaque entity identifier.
///
/// Unique among currently-live entities, reused after destruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Null/invalid entity.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates an entity from a raw id.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the id as an index into per-entity arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the null entity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("entity(null)")
        } else {
            write!(f, "entity({})", self.0)
        }
    }
}

/// Fixed-capacity pool of entity ids.
///
/// `free` is a stack of available ids: `free[..available]` are free, the top
/// of the stack is `free[available - 1]`. The array is seeded in descending
/// order so the first id handed out is 0.
pub struct EntityRegistry {
    /// Free-list storage, `capacity` slots.
    free: Box<[Entity]>,
    /// Number of ids currently available.
    available: usize,
    /// Liveness flag per id.
    alive: Box<[bool]>,
}

impl EntityRegistry {
    /// Creates a registry for `capacity` entities, all available.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or does not leave room for [`Entity::NULL`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity < u32::MAX as usize,
            "Capacity must leave u32::MAX free for the null entity"
        );

        let mut registry = Self {
            free: vec![Entity::NULL; capacity].into_boxed_slice(),
            available: 0,
            alive: vec![false; capacity].into_boxed_slice(),
        };
        registry.reset();
        registry
    }

    /// Returns the maximum number of entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.free.len()
    }

    /// Returns the number of ids that can still be handed out.
    #[inline]
    #[must_use]
    pub const fn available(&self) -> usize {
        self.available
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.capacity() - self.available
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Takes the next free id.
    ///
    /// This is a **O(1)** operation.
    ///
    /// # Returns
    ///
    /// The new entity, or `None` if every id is in use.
    #[inline]
    pub fn allocate(&mut self) -> Option<Entity> {
        if self.available == 0 {
            return None;
        }
        self.available -= 1;
        let entity = self.free[self.available];
        self.alive[entity.index()] = true;
        Some(entity)
    }

    /// Returns an id to the free-list.
    ///
    /// This is a **O(1)** operation. The id becomes the next one handed out.
    ///
    /// # Returns
    ///
    /// `true` if the entity was released, `false` if it was not alive.
    #[inline]
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.index()] = false;
        self.free[self.available] = entity;
        self.available += 1;
        true
    }

    /// Makes every id available again, without reallocating.
    // capacity < u32::MAX was checked in `new`
    #[allow(clippy::cast_possible_truncation)]
    pub fn reset(&mut self) {
        let capacity = self.capacity();
        for (slot, id) in self.free.iter_mut().zip((0..capacity).rev()) {
            *slot = Entity::from_raw(id as u32);
        }
        self.alive.fill(false);
        self.available = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_null() {
        assert!(Entity::NULL.is_null());
        assert!(Entity::default().is_null());
        assert!(!Entity::from_raw(0).is_null());
        assert_eq!(Entity::from_raw(7).to_string(), "entity(7)");
    }

    #[test]
    fn test_registry_hands_out_ascending_ids() {
        let mut registry = EntityRegistry::new(3);
        assert_eq!(registry.allocate(), Some(Entity::from_raw(0)));
        assert_eq!(registry.allocate(), Some(Entity::from_raw(1)));
        assert_eq!(registry.allocate(), Some(Entity::from_raw(2)));
        assert_eq!(registry.allocate(), None);
        assert_eq!(registry.live_count(), 3);
    }

    #[test]
    fn test_registry_recycles_last_released() {
        let mut registry = EntityRegistry::new(4);
        for _ in 0..4 {
            let _ = registry.allocate();
        }
        assert!(registry.release(Entity::from_raw(2)));
        assert!(!registry.release(Entity::from_raw(2)));
        assert_eq!(registry.allocate(), Some(Entity::from_raw(2)));
    }

    #[test]
    fn test_registry_reset() {
        let mut registry = EntityRegistry::new(2);
        let _ = registry.allocate();
        registry.reset();
        assert_eq!(registry.available(), 2);
        assert!(!registry.is_alive(Entity::from_raw(0)));
        assert_eq!(registry.allocate(), Some(Entity::from_raw(0)));
    }

    #[test]
    fn test_release_unknown_entity() {
        let mut registry = EntityRegistry::new(2);
        assert!(!registry.release(Entity::NULL));
        assert!(!registry.release(Entity::from_raw(5)));
    }
}
