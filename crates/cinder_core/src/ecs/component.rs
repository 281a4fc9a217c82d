//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be Copy and have a fixed size for zero-allocation storage.

use bytemuck::{Pod, Zeroable};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Copy`: No heap allocations, bitwise copyable
/// - `Pod`: Plain old data, can be handed to the renderer as bytes
/// - `Zeroable`: Can be safely zeroed
/// - `Default`: Must have a default value
///
/// The set of component types and their maximum live counts is declared
/// once with [`component_registry!`](crate::component_registry).
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use cinder_core::Component;
///
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
/// }
/// ```
pub trait Component: Copy + Pod + Zeroable + Default + Send + Sync + 'static {
    /// Human-readable type name, used in errors and logs.
    const NAME: &'static str;
}
