//! # Stack Allocator
//!
//! A LIFO bump allocator for transient allocations that are rolled back
//! to a marker or freed all at once.

use bytemuck::Pod;

use super::{MemoryError, MemoryResult};
use crate::fatal::{fatal, FatalCode};

/// A bump-cursor arena with marker-based rollback.
///
/// Allocations are fast (just bump a cursor) and are not tracked
/// individually; there is no per-allocation free. Memory is reclaimed by
/// rolling back to a [`StackMarker`] or by [`free_all`](Self::free_all).
///
/// Allocations are described by [`StackSpan`] values (offset, length,
/// epoch and rollback generation) rather than pointers. A span is rejected
/// on access once any part of it has been rolled back, even if the cursor
/// has since moved past it again, and once it predates a `free_all`.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. Use one arena per thread.
///
/// # Example
///
/// ```rust
/// use cinder_core::StackAllocator;
///
/// let mut arena = StackAllocator::new(1024)?;
///
/// let marker = arena.marker();
/// let scratch = arena.allocate_slice::<f32>(16)?;
/// arena.slice_mut::<f32>(scratch)?.fill(1.0);
///
/// // Roll back everything allocated after the marker
/// arena.free_to_marker(marker);
/// assert_eq!(arena.used(), 0);
/// # Ok::<(), cinder_core::MemoryError>(())
/// ```
pub struct StackAllocator {
    /// The backing storage.
    memory: Box<[u8]>,
    /// Current allocation offset.
    cursor: usize,
    /// Bumped on every `free_all`.
    epoch: u32,
    /// Bumped on every `free_to_marker`.
    generation: u64,
    /// Rollbacks of the current epoch, generation and offset both strictly
    /// increasing. A span is stale if a later rollback went below its end.
    rollbacks: Vec<Rollback>,
}

/// Initial room in the rollback record. Only rollbacks to ever higher
/// offsets within one epoch accumulate entries.
const ROLLBACK_RECORDS: usize = 32;

#[derive(Clone, Copy, Debug)]
struct Rollback {
    generation: u64,
    offset: usize,
}

/// A saved cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackMarker {
    offset: usize,
    epoch: u32,
}

impl StackMarker {
    /// Returns the cursor offset captured by this marker.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }
}

/// A region of a [`StackAllocator`], addressed by offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackSpan {
    offset: usize,
    len: usize,
    epoch: u32,
    generation: u64,
}

impl StackSpan {
    /// Byte offset of the region from the start of the arena.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Length of the region in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Whether the region is zero bytes long.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

impl StackAllocator {
    /// Creates a new zeroed arena of `total_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidParameters`] if `total_size` is zero.
    pub fn new(total_size: usize) -> MemoryResult<Self> {
        if total_size == 0 {
            return Err(MemoryError::InvalidParameters("stack size must be greater than zero"));
        }
        Ok(Self {
            memory: vec![0u8; total_size].into_boxed_slice(),
            cursor: 0,
            epoch: 0,
            generation: 0,
            rollbacks: Vec::with_capacity(ROLLBACK_RECORDS),
        })
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.memory.len()
    }

    /// Returns the current used space in bytes.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.cursor
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Bumps the cursor by `size` bytes.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the cursor would pass the end of the
    /// buffer. Use [`try_allocate`](Self::try_allocate) when running out of
    /// room is an expected outcome.
    #[inline]
    pub fn allocate(&mut self, size: usize) -> StackSpan {
        match self.try_allocate(size) {
            Ok(span) => span,
            Err(err) => fatal(FatalCode::StackOverflow, &err.to_string()),
        }
    }

    /// Bumps the cursor by `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfMemory`] if the arena is too small.
    #[inline]
    pub fn try_allocate(&mut self, size: usize) -> MemoryResult<StackSpan> {
        self.bump(size, 1)
    }

    /// Allocates room for `count` values of `T`, aligned for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::SizeOverflow`] if the byte size overflows and
    /// [`MemoryError::OutOfMemory`] if the arena is too small.
    pub fn allocate_slice<T: Pod>(&mut self, count: usize) -> MemoryResult<StackSpan> {
        let size = std::mem::size_of::<T>()
            .checked_mul(count)
            .ok_or(MemoryError::SizeOverflow {
                block_size: std::mem::size_of::<T>(),
                block_count: count,
            })?;
        self.bump(size, std::mem::align_of::<T>())
    }

    fn bump(&mut self, size: usize, align: usize) -> MemoryResult<StackSpan> {
        // Align the real address, not the offset, so typed views line up.
        let base = self.memory.as_ptr() as usize;
        let addr = base + self.cursor;
        let padding = addr.wrapping_neg() & (align - 1);
        let requested = padding.checked_add(size).ok_or(MemoryError::OutOfMemory {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;

        if requested > self.remaining() {
            return Err(MemoryError::OutOfMemory {
                requested,
                remaining: self.remaining(),
            });
        }

        let offset = self.cursor + padding;
        self.cursor += requested;
        Ok(StackSpan {
            offset,
            len: size,
            epoch: self.epoch,
            generation: self.generation,
        })
    }

    /// Captures the current cursor.
    #[inline]
    #[must_use]
    pub const fn marker(&self) -> StackMarker {
        StackMarker {
            offset: self.cursor,
            epoch: self.epoch,
        }
    }

    /// Rolls the cursor back to `marker`.
    ///
    /// Every span reaching past the marker becomes invalid for good.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the marker is ahead of the cursor or was
    /// taken before the last [`free_all`](Self::free_all).
    pub fn free_to_marker(&mut self, marker: StackMarker) {
        if marker.epoch != self.epoch || marker.offset > self.cursor {
            fatal(
                FatalCode::StackMarker,
                &format!(
                    "marker at {} (epoch {}) is not below cursor {} (epoch {})",
                    marker.offset, marker.epoch, self.cursor, self.epoch
                ),
            );
        }
        self.generation += 1;
        while self
            .rollbacks
            .last()
            .is_some_and(|last| last.offset >= marker.offset)
        {
            self.rollbacks.pop();
        }
        self.rollbacks.push(Rollback {
            generation: self.generation,
            offset: marker.offset,
        });
        self.cursor = marker.offset;
    }

    /// Resets the cursor to the start, invalidating every span and marker.
    ///
    /// # Arguments
    ///
    /// * `zero_memory` - Also zero the whole region, for arenas that may
    ///   have held sensitive data
    pub fn free_all(&mut self, zero_memory: bool) {
        if zero_memory {
            self.memory.fill(0);
        }
        self.cursor = 0;
        self.epoch = self.epoch.wrapping_add(1);
        self.rollbacks.clear();
    }

    /// Returns the bytes of a live span.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the span is stale.
    #[inline]
    #[must_use]
    pub fn bytes(&self, span: StackSpan) -> &[u8] {
        self.check(span);
        &self.memory[span.offset..span.offset + span.len]
    }

    /// Returns the bytes of a live span mutably.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the span is stale.
    #[inline]
    pub fn bytes_mut(&mut self, span: StackSpan) -> &mut [u8] {
        self.check(span);
        &mut self.memory[span.offset..span.offset + span.len]
    }

    /// Views a live span as a slice of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Cast`] if the span's size or alignment does
    /// not fit `T`.
    pub fn slice<T: Pod>(&self, span: StackSpan) -> MemoryResult<&[T]> {
        bytemuck::try_cast_slice(self.bytes(span)).map_err(|e| MemoryError::Cast(e.to_string()))
    }

    /// Views a live span as a mutable slice of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Cast`] if the span's size or alignment does
    /// not fit `T`.
    pub fn slice_mut<T: Pod>(&mut self, span: StackSpan) -> MemoryResult<&mut [T]> {
        bytemuck::try_cast_slice_mut(self.bytes_mut(span))
            .map_err(|e| MemoryError::Cast(e.to_string()))
    }

    /// Lowest offset rolled back to since `generation`, if any.
    fn rollback_floor(&self, generation: u64) -> Option<usize> {
        let first_later = self
            .rollbacks
            .partition_point(|rollback| rollback.generation <= generation);
        self.rollbacks.get(first_later).map(|rollback| rollback.offset)
    }

    fn check(&self, span: StackSpan) {
        let end = span.offset + span.len;
        if span.epoch != self.epoch || end > self.cursor {
            fatal(
                FatalCode::StackSpan,
                &format!(
                    "span {}..{} (epoch {}) is past cursor {} (epoch {})",
                    span.offset, end, span.epoch, self.cursor, self.epoch
                ),
            );
        }
        if let Some(floor) = self.rollback_floor(span.generation) {
            if floor < end {
                fatal(
                    FatalCode::StackSpan,
                    &format!(
                        "span {}..{} was rolled back to {} after it was allocated",
                        span.offset, end, floor
                    ),
                );
            }
        }
    }
}
