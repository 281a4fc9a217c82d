//! # Component Registry
//!
//! The closed, compile-time set of component types. A game declares it
//! once with [`component_registry!`](crate::component_registry):
//!
//! ```rust
//! use bytemuck::{Pod, Zeroable};
//! use cinder_core::{component_registry, Component, EcsConfig, Ecs, Entity};
//!
//! #[derive(Clone, Copy, Default, Pod, Zeroable)]
//! #[repr(C)]
//! struct Health(f32);
//!
//! impl Component for Health {
//!     const NAME: &'static str = "Health";
//! }
//!
//! component_registry! {
//!     /// Everything the game stores.
//!     struct Components {
//!         /// Up to 256 health bars.
//!         health: Health => 256,
//!     }
//! }
//!
//! let mut ecs = Ecs::<Components>::new(&EcsConfig::default())?;
//! let player = ecs.create_entity()?;
//! ecs.add_component(player, Health(100.0))?;
//! assert!(ecs.has_component::<Health>(player));
//! # Ok::<(), cinder_core::EcsError>(())
//! ```

use super::component::Component;
use super::sparse_set::{ErasedStorage, SparseSet};

/// A struct holding one [`SparseSet`] per registered component type.
///
/// Implemented by [`component_registry!`](crate::component_registry).
pub trait ComponentRegistry: Sized + 'static {
    /// Number of registered component types.
    const TYPE_COUNT: usize;

    /// Builds every storage for the entity range `0..max_entities`, each
    /// sized by its declared maximum.
    fn new(max_entities: usize) -> Self;

    /// Visits every storage in declaration order.
    fn for_each_storage(&self, f: &mut dyn FnMut(&dyn ErasedStorage));

    /// Visits every storage mutably in declaration order.
    fn for_each_storage_mut(&mut self, f: &mut dyn FnMut(&mut dyn ErasedStorage));
}

/// Typed access to the storage of component `T` inside a registry.
pub trait Storage<T: Component> {
    /// Returns the storage for `T`.
    fn storage(&self) -> &SparseSet<T>;

    /// Returns the storage for `T` mutably.
    fn storage_mut(&mut self) -> &mut SparseSet<T>;
}

/// Declares the component registry struct.
///
/// Each entry is `field: Type => max_count`. The generated struct has one
/// public `SparseSet<Type>` field per entry and implements
/// [`ComponentRegistry`] plus [`Storage<Type>`](Storage) for every type.
/// Registering the same type twice is a compile error.
#[macro_export]
macro_rules! component_registry {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => $max:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::SparseSet<$ty>,
            )+
        }

        impl $crate::ComponentRegistry for $name {
            const TYPE_COUNT: usize = [$(stringify!($field)),+].len();

            fn new(max_entities: usize) -> Self {
                Self {
                    $($field: $crate::SparseSet::new(max_entities, $max),)+
                }
            }

            fn for_each_storage(&self, f: &mut dyn FnMut(&dyn $crate::ErasedStorage)) {
                $(f(&self.$field);)+
            }

            fn for_each_storage_mut(
                &mut self,
                f: &mut dyn FnMut(&mut dyn $crate::ErasedStorage),
            ) {
                $(f(&mut self.$field);)+
            }
        }

        $(
            impl $crate::Storage<$ty> for $name {
                #[inline]
                fn storage(&self) -> &$crate::SparseSet<$ty> {
                    &self.$field
                }

                #[inline]
                fn storage_mut(&mut self) -> &mut $crate::SparseSet<$ty> {
                    &mut self.$field
                }
            }
        )+
    };
}
