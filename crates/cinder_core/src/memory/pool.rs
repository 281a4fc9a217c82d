//! # Pool Allocator
//!
//! Fixed-size, fixed-count block pool for memory that is frequently
//! allocated and released.

use super::{MemoryError, MemoryResult};
use crate::fatal::{fatal, FatalCode};

/// A pool of equally sized byte blocks carved from one buffer.
///
/// Blocks are addressed by [`PoolHandle`], an index into the pool, so a
/// handle can never point into freed memory. The pool never grows:
/// [`allocate`](Self::allocate) returns `None` once every block is out.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread.
///
/// # Example
///
/// ```rust
/// use cinder_core::PoolAllocator;
///
/// let mut pool = PoolAllocator::new(64, 16)?;
///
/// // Allocate - O(1), no heap allocation
/// let handle = pool.allocate().expect("pool has room");
/// pool.block_mut(handle)[0] = 7;
///
/// // Release - O(1), no heap deallocation
/// pool.release(handle);
/// # Ok::<(), cinder_core::MemoryError>(())
/// ```
pub struct PoolAllocator {
    /// The backing buffer, `block_size * block_count` bytes.
    memory: Box<[u8]>,
    /// Free list - indices of available blocks, top of stack last.
    free_list: Vec<u32>,
    /// Per-block allocation flag, used to reject double release.
    allocated: Box<[bool]>,
    /// Size of one block in bytes.
    block_size: usize,
    /// Number of blocks.
    block_count: usize,
}

/// Handle to an allocated block in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Block index.
    index: u32,
}

impl PoolHandle {
    /// Returns the block index this handle refers to.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl PoolAllocator {
    /// Creates a new pool of `block_count` blocks of `block_size` bytes.
    ///
    /// All memory is pre-allocated and zeroed upfront.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::InvalidParameters`] if either parameter is zero
    /// or the count does not fit a `u32` index, and
    /// [`MemoryError::SizeOverflow`] if the total size overflows.
    pub fn new(block_size: usize, block_count: usize) -> MemoryResult<Self> {
        if block_size == 0 {
            return Err(MemoryError::InvalidParameters("block size must be greater than zero"));
        }
        if block_count == 0 {
            return Err(MemoryError::InvalidParameters("block count must be greater than zero"));
        }
        let count = u32::try_from(block_count)
            .map_err(|_| MemoryError::InvalidParameters("block count must fit in u32"))?;
        let total = block_size
            .checked_mul(block_count)
            .ok_or(MemoryError::SizeOverflow { block_size, block_count })?;

        Ok(Self {
            memory: vec![0u8; total].into_boxed_slice(),
            // Reversed so the first allocation hands out block 0.
            free_list: (0..count).rev().collect(),
            allocated: vec![false; block_count].into_boxed_slice(),
            block_size,
            block_count,
        })
    }

    /// Returns the size of one block in bytes.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the total number of blocks.
    #[inline]
    #[must_use]
    pub const fn block_count(&self) -> usize {
        self.block_count
    }

    /// Returns the number of blocks currently handed out.
    #[inline]
    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.block_count - self.free_list.len()
    }

    /// Returns the number of free blocks.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Takes one free block.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**.
    ///
    /// # Returns
    ///
    /// A handle to the block, or `None` if the pool is exhausted.
    #[inline]
    pub fn allocate(&mut self) -> Option<PoolHandle> {
        let index = self.free_list.pop()?;
        self.allocated[index as usize] = true;
        Some(PoolHandle { index })
    }

    /// Returns a block to the pool.
    ///
    /// This is a **O(1)** operation. The free list never exceeds its initial
    /// capacity, so the push does not allocate.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the handle is outside this pool or the block
    /// is not currently allocated.
    #[inline]
    pub fn release(&mut self, handle: PoolHandle) {
        self.check(handle, "release");
        self.allocated[handle.index()] = false;
        self.free_list.push(handle.index);
    }

    /// Returns the bytes of an allocated block.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the handle is not live in this pool.
    #[inline]
    #[must_use]
    pub fn block(&self, handle: PoolHandle) -> &[u8] {
        self.check(handle, "read");
        let start = handle.index() * self.block_size;
        &self.memory[start..start + self.block_size]
    }

    /// Returns the bytes of an allocated block mutably.
    ///
    /// # Panics
    ///
    /// Through the fatal hook if the handle is not live in this pool.
    #[inline]
    pub fn block_mut(&mut self, handle: PoolHandle) -> &mut [u8] {
        self.check(handle, "write");
        let start = handle.index() * self.block_size;
        &mut self.memory[start..start + self.block_size]
    }

    /// Returns every block to the pool.
    ///
    /// This is a **zero-heap-allocation** operation - memory is not freed.
    // block_count was checked to fit u32 in `new`
    #[allow(clippy::cast_possible_truncation)]
    pub fn clear(&mut self) {
        self.allocated.fill(false);
        self.free_list.clear();
        self.free_list.extend((0..self.block_count as u32).rev());
    }

    fn check(&self, handle: PoolHandle, op: &str) {
        let index = handle.index();
        if index >= self.block_count {
            fatal(
                FatalCode::PoolRelease,
                &format!("{op} of block {index} outside pool of {}", self.block_count),
            );
        }
        if !self.allocated[index] {
            fatal(
                FatalCode::PoolRelease,
                &format!("{op} of block {index} which is not allocated"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pool_rejects_zero_parameters() {
        assert!(matches!(PoolAllocator::new(0, 4), Err(MemoryError::InvalidParameters(_))));
        assert!(matches!(PoolAllocator::new(16, 0), Err(MemoryError::InvalidParameters(_))));
        assert!(matches!(
            PoolAllocator::new(usize::MAX, 2),
            Err(MemoryError::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_pool_allocate_release() {
        let mut pool = PoolAllocator::new(8, 10).unwrap();

        let h1 = pool.allocate().unwrap();
        assert_eq!(h1.index(), 0);
        assert_eq!(pool.allocated_count(), 1);

        pool.block_mut(h1).copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(pool.block(h1)[7], 8);

        pool.release(h1);
        assert_eq!(pool.allocated_count(), 0);
        assert_eq!(pool.free_count(), 10);
    }

    #[test]
    fn test_pool_full() {
        let mut pool = PoolAllocator::new(4, 2).unwrap();

        let _ = pool.allocate().unwrap();
        let _ = pool.allocate().unwrap();
        assert!(pool.allocate().is_none());
    }

    #[test]
    fn test_pool_blocks_never_overlap() {
        let mut pool = PoolAllocator::new(32, 16).unwrap();
        let handles: Vec<_> = (0..16).map(|_| pool.allocate().unwrap()).collect();

        let indices: HashSet<_> = handles.iter().map(|h| h.index()).collect();
        assert_eq!(indices.len(), 16);

        for (i, handle) in handles.iter().enumerate() {
            pool.block_mut(*handle).fill(i as u8);
        }
        for (i, handle) in handles.iter().enumerate() {
            assert!(pool.block(*handle).iter().all(|&b| b == i as u8));
        }
    }

    #[test]
    fn test_pool_reuse() {
        let mut pool = PoolAllocator::new(4, 1).unwrap();

        let h1 = pool.allocate().unwrap();
        pool.release(h1);

        let h2 = pool.allocate().unwrap();
        assert_eq!(h1.index(), h2.index()); // Same block reused
    }

    #[test]
    fn test_pool_clear() {
        let mut pool = PoolAllocator::new(4, 3).unwrap();
        let _ = pool.allocate();
        let _ = pool.allocate();
        pool.clear();
        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.allocate().unwrap().index(), 0);
    }

    #[test]
    #[should_panic(expected = "fatal error 100")]
    fn test_pool_double_release_is_fatal() {
        let mut pool = PoolAllocator::new(4, 2).unwrap();
        let h = pool.allocate().unwrap();
        pool.release(h);
        pool.release(h);
    }

    #[test]
    #[should_panic(expected = "outside pool")]
    fn test_pool_foreign_handle_is_fatal() {
        let mut big = PoolAllocator::new(4, 8).unwrap();
        let mut small = PoolAllocator::new(4, 2).unwrap();
        let mut last = big.allocate().unwrap();
        for _ in 0..7 {
            last = big.allocate().unwrap();
        }
        small.release(last);
    }
}
