use std::alloc::Layout;
use std::ptr::NonNull;

use crate::ArenaError;

/// Owned raw byte buffer backing an [`Arena`](crate::Arena).
///
/// Acquired from the global allocator in [`Block::new`] and returned to it
/// exactly once when the block is dropped. Contents start uninitialized.
#[derive(Debug)]
pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: Block is the unique owner of its allocation and exposes no shared
// interior state, so moving it to another thread is sound. It is not Sync:
// the arena hands out writable views from `&self`.
unsafe impl Send for Block {}

impl Block {
    /// Allocates a buffer with the given layout.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidSize`] for a zero-sized layout and
    /// [`ArenaError::OutOfMemory`] if the global allocator returns null.
    pub fn new(layout: Layout) -> Result<Self, ArenaError> {
        if layout.size() == 0 {
            return Err(ArenaError::InvalidSize {
                size: 0,
                align: layout.align(),
            });
        }
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { std::alloc::alloc(layout) };
        let ptr = NonNull::new(raw).ok_or_else(|| ArenaError::OutOfMemory {
            capacity: layout.size(),
        })?;
        Ok(Self { ptr, layout })
    }

    /// Returns the start of the buffer.
    #[must_use]
    pub const fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Returns the buffer size in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.layout.size()
    }

    /// Returns the alignment of the buffer start.
    #[must_use]
    pub const fn align(&self) -> usize {
        self.layout.align()
    }

    /// Overwrites `range` with zeroes.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not within the buffer.
    pub fn zero(&mut self, range: std::ops::Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "zero range {range:?} outside block of {} bytes",
            self.len(),
        );
        // SAFETY: range is within the allocation, and &mut self guarantees no
        // view into the buffer is alive.
        unsafe {
            self.ptr
                .add(range.start)
                .write_bytes(0, range.end - range.start);
        }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by `alloc` with exactly this layout and is
        // released only here.
        unsafe {
            std::alloc::dealloc(self.ptr.as_ptr(), self.layout);
        }
    }
}
