//! # Sparse-Set Component Storage
//!
//! Pre-allocated, densely packed storage for one component type.
//!
//! ```text
//! sparse: [ 1 | - | 0 | - ]          entity id -> dense index
//! dense:  [ (e2, C) | (e0, C) ]      packed, no gaps
//! ```
//!
//! - Add, remove, lookup are O(1)
//! - Removal swaps the last element into the hole
//! - Iteration walks contiguous memory in dense order, which is NOT
//!   entity order and changes on removal

use super::component::Component;
use super::entity::Entity;
use super::error::{EcsError, EcsResult};
use crate::fatal::{fatal, FatalCode};

/// Sparse entry meaning "no component".
const ABSENT: u32 = u32::MAX;

/// One dense element: the component and the entity that owns it.
///
/// Read-only outside the storage; component values are written through
/// [`SparseSet::get_mut`] or [`SparseSet::iter_mut`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentData<T> {
    entity: Entity,
    component: T,
}

impl<T> ComponentData<T> {
    /// The owning entity.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    /// The component value.
    #[inline]
    #[must_use]
    pub const fn component(&self) -> &T {
        &self.component
    }
}

/// Sparse-set storage for a single component type.
///
/// This storage guarantees:
/// - Zero allocations after initialization (the dense array never grows
///   past the capacity reserved in [`new`](Self::new))
/// - O(1) add/remove/get by entity
/// - Cache-friendly iteration
///
/// # Type Parameters
///
/// * `T` - The component type to store
pub struct SparseSet<T: Component> {
    /// Entity id -> dense index, or `ABSENT`.
    sparse: Box<[u32]>,
    /// Live components, tightly packed.
    dense: Vec<ComponentData<T>>,
    /// Declared maximum live instances.
    max_count: usize,
}

impl<T: Component> SparseSet<T> {
    /// Creates storage for up to `max_count` components over the entity
    /// range `0..max_entities`.
    ///
    /// # Panics
    ///
    /// Panics if either bound is zero or `max_count` does not fit a `u32`.
    #[must_use]
    pub fn new(max_entities: usize, max_count: usize) -> Self {
        assert!(max_entities > 0, "Entity range must be greater than zero");
        assert!(max_count > 0, "Component capacity must be greater than zero");
        assert!(
            max_count < ABSENT as usize,
            "Component capacity must leave room for the absent marker"
        );

        Self {
            sparse: vec![ABSENT; max_entities].into_boxed_slice(),
            dense: Vec::with_capacity(max_count),
            max_count,
        }
    }

    /// Returns the number of live components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Checks if no entity has this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the declared maximum live instances.
    #[inline]
    #[must_use]
    pub const fn max_count(&self) -> usize {
        self.max_count
    }

    /// Returns the entity range this storage covers.
    #[inline]
    #[must_use]
    pub fn max_entities(&self) -> usize {
        self.sparse.len()
    }

    /// Returns the byte size of one dense element.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        std::mem::size_of::<ComponentData<T>>()
    }

    #[inline]
    fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity.index()) {
            Some(&index) if index != ABSENT => Some(index as usize),
            _ => None,
        }
    }

    /// Attaches a component to an entity.
    ///
    /// This is a **zero-allocation** operation.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityOutOfRange`] if the id is beyond the entity range
    /// - [`EcsError::DuplicateComponent`] if the entity already has one
    /// - [`EcsError::ComponentCapacity`] if `max_count` components are live
    pub fn insert(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        let Some(&slot) = self.sparse.get(entity.index()) else {
            return Err(EcsError::EntityOutOfRange {
                entity,
                max_entities: self.sparse.len(),
            });
        };
        if slot != ABSENT {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::NAME,
            });
        }
        if self.dense.len() >= self.max_count {
            return Err(EcsError::ComponentCapacity {
                component: T::NAME,
                max_count: self.max_count,
            });
        }

        // max_count < u32::MAX was checked in `new`
        #[allow(clippy::cast_possible_truncation)]
        let index = self.dense.len() as u32;
        self.dense.push(ComponentData { entity, component });
        self.sparse[entity.index()] = index;
        Ok(())
    }

    /// Detaches a component from an entity, returning it.
    ///
    /// The last dense element is swapped into the freed slot, so this is
    /// **O(1)** and never shifts the rest of the array.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if the entity has no component.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let Some(index) = self.dense_index(entity) else {
            return Err(EcsError::MissingComponent {
                entity,
                component: T::NAME,
            });
        };
        if self.dense[index].entity != entity {
            fatal(
                FatalCode::StorageCorrupted,
                &format!("{} slot {index} does not belong to {entity}", T::NAME),
            );
        }

        let removed = self.dense.swap_remove(index);
        if let Some(moved) = self.dense.get(index) {
            #[allow(clippy::cast_possible_truncation)]
            let index = index as u32;
            self.sparse[moved.entity.index()] = index;
        }
        self.sparse[entity.index()] = ABSENT;
        Ok(removed.component)
    }

    /// Gets an entity's component.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = self.dense_index(entity)?;
        Some(&self.dense[index].component)
    }

    /// Gets an entity's component mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = self.dense_index(entity)?;
        Some(&mut self.dense[index].component)
    }

    /// Checks if an entity has this component.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Returns the dense array.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[ComponentData<T>] {
        &self.dense
    }

    /// Iterates over `(entity, component)` in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().map(|data| (data.entity, &data.component))
    }

    /// Iterates mutably over `(entity, component)` in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense
            .iter_mut()
            .map(|data| (data.entity, &mut data.component))
    }

    /// Iterates over the entities that own a component, in dense order.
    #[inline]
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.dense.iter().map(|data| data.entity)
    }

    /// Removes every component without releasing memory.
    pub fn clear(&mut self) {
        for data in &self.dense {
            self.sparse[data.entity.index()] = ABSENT;
        }
        self.dense.clear();
    }
}

/// Type-erased view of a [`SparseSet`], for operations that touch every
/// component type regardless of `T`.
pub trait ErasedStorage {
    /// Component type name.
    fn type_name(&self) -> &'static str;

    /// Number of live components.
    fn len(&self) -> usize;

    /// Checks if no entity has this component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared maximum live instances.
    fn max_count(&self) -> usize;

    /// Removes the entity's component if present.
    ///
    /// Returns `true` if something was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Removes every component.
    fn clear(&mut self);
}

impl<T: Component> ErasedStorage for SparseSet<T> {
    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn max_count(&self) -> usize {
        self.max_count
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    fn clear(&mut self) {
        SparseSet::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Mass(f32);

    impl Component for Mass {
        const NAME: &'static str = "Mass";
    }

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    fn assert_consistent(set: &SparseSet<Mass>) {
        for (index, data) in set.as_slice().iter().enumerate() {
            assert_eq!(set.dense_index(data.entity()), Some(index));
        }
    }

    #[test]
    fn test_insert_get_remove() {
        let mut set = SparseSet::<Mass>::new(16, 4);
        set.insert(e(3), Mass(1.5)).unwrap();

        assert!(set.contains(e(3)));
        assert_eq!(set.get(e(3)), Some(&Mass(1.5)));
        assert_eq!(set.len(), 1);

        assert_eq!(set.remove(e(3)), Ok(Mass(1.5)));
        assert!(!set.contains(e(3)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_swap_remove_keeps_mapping() {
        let mut set = SparseSet::<Mass>::new(8, 2);
        set.insert(e(0), Mass(10.0)).unwrap();
        set.insert(e(1), Mass(20.0)).unwrap();

        set.remove(e(0)).unwrap();

        assert_eq!(set.as_slice()[0].entity(), e(1));
        assert_eq!(set.get(e(1)), Some(&Mass(20.0)));
        assert_consistent(&set);
    }

    #[test]
    fn test_remove_middle_of_many() {
        let mut set = SparseSet::<Mass>::new(32, 32);
        for id in 0..10 {
            set.insert(e(id), Mass(id as f32)).unwrap();
        }
        for id in [4, 0, 9, 5] {
            set.remove(e(id)).unwrap();
            assert_consistent(&set);
        }
        for id in [1, 2, 3, 6, 7, 8] {
            assert_eq!(set.get(e(id)), Some(&Mass(id as f32)));
        }
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_capacity_and_duplicate_errors() {
        let mut set = SparseSet::<Mass>::new(8, 1);
        set.insert(e(2), Mass(1.0)).unwrap();

        assert_eq!(
            set.insert(e(2), Mass(2.0)),
            Err(EcsError::DuplicateComponent { entity: e(2), component: "Mass" })
        );
        assert_eq!(
            set.insert(e(3), Mass(2.0)),
            Err(EcsError::ComponentCapacity { component: "Mass", max_count: 1 })
        );
        assert_eq!(
            set.insert(e(8), Mass(2.0)),
            Err(EcsError::EntityOutOfRange { entity: e(8), max_entities: 8 })
        );
        assert_eq!(set.get(e(2)), Some(&Mass(1.0)));
    }

    #[test]
    fn test_missing_component() {
        let mut set = SparseSet::<Mass>::new(4, 4);
        assert_eq!(
            set.remove(e(1)),
            Err(EcsError::MissingComponent { entity: e(1), component: "Mass" })
        );
        assert!(set.get(Entity::NULL).is_none());
    }

    #[test]
    fn test_dense_never_reallocates() {
        let mut set = SparseSet::<Mass>::new(64, 16);
        let before = set.as_slice().as_ptr();
        for id in 0..16 {
            set.insert(e(id), Mass::default()).unwrap();
        }
        assert_eq!(set.as_slice().as_ptr(), before);
    }

    #[test]
    fn test_iter_mut_and_clear() {
        let mut set = SparseSet::<Mass>::new(8, 8);
        set.insert(e(5), Mass(1.0)).unwrap();
        set.insert(e(6), Mass(2.0)).unwrap();

        for (_, mass) in set.iter_mut() {
            mass.0 *= 2.0;
        }
        assert_eq!(set.get(e(6)), Some(&Mass(4.0)));
        assert_eq!(set.entities().collect::<Vec<_>>(), vec![e(5), e(6)]);

        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(e(5)));
        set.insert(e(5), Mass(3.0)).unwrap();
        assert_eq!(set.get(e(5)), Some(&Mass(3.0)));
    }

    #[test]
    fn test_writes_through_iter_mut_keep_mapping() {
        let mut set = SparseSet::<Mass>::new(8, 4);
        set.insert(e(1), Mass(1.0)).unwrap();
        set.insert(e(5), Mass(5.0)).unwrap();
        set.insert(e(3), Mass(3.0)).unwrap();

        for (entity, mass) in set.iter_mut() {
            mass.0 = entity.id() as f32 * 10.0;
        }
        assert_consistent(&set);

        assert_eq!(set.remove(e(1)), Ok(Mass(10.0)));
        assert_consistent(&set);
        assert_eq!(set.get(e(5)), Some(&Mass(50.0)));
        assert_eq!(set.get(e(3)), Some(&Mass(30.0)));
        for data in set.as_slice() {
            assert_eq!(set.get(data.entity()), Some(data.component()));
        }
    }

    #[test]
    fn test_stride_matches_dense_element() {
        let set = SparseSet::<Mass>::new(4, 4);
        assert_eq!(set.stride(), std::mem::size_of::<ComponentData<Mass>>());
        assert_eq!(set.stride(), 8);
    }

    #[test]
    fn test_erased_remove() {
        let mut set = SparseSet::<Mass>::new(4, 4);
        set.insert(e(1), Mass(1.0)).unwrap();

        let erased: &mut dyn ErasedStorage = &mut set;
        assert_eq!(erased.type_name(), "Mass");
        assert_eq!(erased.max_count(), 4);
        assert_eq!(erased.len(), 1);
        assert!(erased.remove_entity(e(1)));
        assert!(!erased.remove_entity(e(1)));
        assert!(erased.is_empty());
    }
}
