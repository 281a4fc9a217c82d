//! # Memory Management
//!
//! Pre-sized arenas for zero-allocation frames.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. During a frame:
//! - No heap allocations
//! - No pointers handed out, only indices into the arena
//! - Predictable, flat latency

mod pool;
mod stack;

use thiserror::Error;

pub use pool::{PoolAllocator, PoolHandle};
pub use stack::{StackAllocator, StackMarker, StackSpan};

/// Recoverable arena errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A size or count parameter was zero.
    #[error("invalid arena parameters: {0}")]
    InvalidParameters(&'static str),

    /// The requested arena size does not fit in `usize`.
    #[error("arena size overflow: {block_size} x {block_count}")]
    SizeOverflow {
        /// Requested size of one block.
        block_size: usize,
        /// Requested number of blocks.
        block_count: usize,
    },

    /// Not enough room left in the arena.
    #[error("out of arena memory: requested {requested} bytes, {remaining} remaining")]
    OutOfMemory {
        /// Bytes requested (including alignment padding).
        requested: usize,
        /// Bytes left before the end of the buffer.
        remaining: usize,
    },

    /// A typed view over arena bytes could not be formed.
    #[error("arena cast failed: {0}")]
    Cast(String),
}

/// Result type for arena operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
