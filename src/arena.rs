use std::alloc::Layout;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::block::Block;
use crate::{ArenaConfig, ArenaError, ArenaState, Checkpoint, ResetPolicy};

/// Source of buffer identities; 0 is never handed out.
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Fixed-capacity bump arena over one contiguous byte buffer.
///
/// Allocation advances a cursor through the buffer; nothing is freed
/// individually. [`reset`](Arena::reset) rewinds the cursor for the whole
/// arena, [`destroy`](Arena::destroy) (or dropping the arena) releases the
/// buffer.
///
/// Allocating takes `&self`, so many views can be alive at once. Reset,
/// rollback, and destroy take `&mut self`, so every view has ended before its
/// bytes can be handed out again.
///
/// `Arena` is `Send` but not `Sync`: use one arena per thread, or move it
/// between threads, but never share it.
///
/// # Example
///
/// ```
/// use fixed_bump::Arena;
///
/// let mut arena = Arena::with_capacity(1024)?;
/// let numbers = arena.alloc_slice_fill(10, 0u32)?;
/// numbers[3] = 7;
/// assert_eq!(arena.offset(), 40);
///
/// arena.reset()?;
/// let text = arena.alloc_str("Hello, arena!")?;
/// assert_eq!(text, "Hello, arena!");
///
/// arena.destroy();
/// assert!(arena.alloc(1u8).is_err());
/// # Ok::<(), fixed_bump::ArenaError>(())
/// ```
#[derive(Debug)]
pub struct Arena {
    /// Backing buffer. `Some` exactly when `state` is `Initialized`.
    block: Option<Block>,
    /// Bytes consumed from the start of `block`.
    offset: Cell<usize>,
    /// Process-unique identity of `block`, fresh on every initialization.
    buffer_id: u64,
    state: ArenaState,
    /// Bumped on every reset, destroy, and initialization.
    epoch: u64,
    reset_policy: ResetPolicy,
}

impl Arena {
    /// Creates an uninitialized arena with no backing buffer.
    ///
    /// Call [`init`](Arena::init) before allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block: None,
            offset: Cell::new(0),
            buffer_id: 0,
            state: ArenaState::Uninitialized,
            epoch: 0,
            reset_policy: ResetPolicy::Retain,
        }
    }

    /// Creates an arena backed by a buffer of exactly `capacity` bytes.
    ///
    /// # Errors
    ///
    /// See [`init_with_config`](Arena::init_with_config).
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Creates an arena from `config`.
    ///
    /// # Errors
    ///
    /// See [`init_with_config`](Arena::init_with_config).
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        let mut arena = Self::new();
        arena.init_with_config(config)?;
        Ok(arena)
    }

    /// Acquires a buffer of `capacity` bytes with default settings.
    ///
    /// # Errors
    ///
    /// See [`init_with_config`](Arena::init_with_config).
    pub fn init(&mut self, capacity: usize) -> Result<(), ArenaError> {
        self.init_with_config(ArenaConfig::new(capacity))
    }

    /// Acquires the backing buffer described by `config` and sets the cursor
    /// to zero.
    ///
    /// Valid on an uninitialized or destroyed arena. On failure the arena
    /// keeps its previous state.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidState`] if the arena is already initialized.
    /// - [`ArenaError::InvalidSize`] / [`ArenaError::InvalidAlignment`] if the
    ///   config does not describe a valid buffer.
    /// - [`ArenaError::OutOfMemory`] if the global allocator cannot provide it.
    pub fn init_with_config(&mut self, config: ArenaConfig) -> Result<(), ArenaError> {
        if self.state.is_initialized() {
            return Err(ArenaError::InvalidState { state: self.state });
        }
        let block = config
            .validate()
            .and_then(Block::new)
            .inspect_err(|err| log::debug!("arena initialization failed: {err}"))?;
        log::debug!(
            "arena initialized: {} bytes, base align {}, reset policy {:?}",
            block.len(),
            block.align(),
            config.reset_policy,
        );

        self.block = Some(block);
        self.offset.set(0);
        self.buffer_id = NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed);
        self.state = ArenaState::Initialized;
        self.epoch = self.epoch.wrapping_add(1);
        self.reset_policy = config.reset_policy;
        Ok(())
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ArenaState {
        self.state
    }

    /// Returns `true` if the arena owns a buffer and can allocate.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Returns the buffer size in bytes, or 0 without a buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.block.as_ref().map_or(0, Block::len)
    }

    /// Returns the number of bytes consumed, including alignment padding.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset.get()
    }

    /// Returns the number of bytes between the cursor and the end of the
    /// buffer. Alignment padding may make less than this usable.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset()
    }

    /// Returns `true` if nothing has been allocated since the last reset.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offset() == 0
    }

    /// Returns the current epoch. It changes on every reset, destroy, and
    /// initialization.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the policy applied to released bytes.
    #[must_use]
    pub const fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    /// Reserves `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// The returned memory is uninitialized. It stays valid until the next
    /// reset, rollback past it, destroy, or drop of the arena; the pointer
    /// itself carries no lifetime, so keeping that contract is up to the
    /// caller.
    ///
    /// # Errors
    ///
    /// See [`alloc_uninit`](Arena::alloc_uninit).
    pub fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, ArenaError> {
        let ptr = self.bump(layout.size(), layout.align())?;
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    /// Reserves `size` uninitialized bytes whose start is aligned to `align`.
    ///
    /// The region is disjoint from every other view handed out since the last
    /// reset. A zero-sized request always succeeds on an initialized arena and
    /// does not move the cursor.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidState`] if the arena is not initialized.
    /// - [`ArenaError::InvalidAlignment`] if `align` is not a power of two.
    /// - [`ArenaError::InvalidSize`] if computing the end of the region
    ///   overflows.
    /// - [`ArenaError::OutOfSpace`] if the padded request does not fit.
    ///
    /// The cursor is unchanged on every error.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_uninit(
        &self,
        size: usize,
        align: usize,
    ) -> Result<&mut [MaybeUninit<u8>], ArenaError> {
        let ptr = self.bump(size, align)?;
        // SAFETY: `bump` returned `size` bytes inside the buffer that no other
        // view covers. MaybeUninit<u8> has no validity requirement.
        Ok(unsafe { std::slice::from_raw_parts_mut(ptr.cast::<MaybeUninit<u8>>().as_ptr(), size) })
    }

    /// Reserves `size` bytes aligned to `align` and fills them with zeroes.
    ///
    /// # Errors
    ///
    /// See [`alloc_uninit`](Arena::alloc_uninit).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_zeroed(&self, size: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        let ptr = self.bump(size, align)?;
        // SAFETY: `bump` returned `size` exclusive bytes inside the buffer,
        // which are initialized by the write before the slice is formed.
        unsafe {
            ptr.write_bytes(0, size);
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), size))
        }
    }

    /// Moves `value` into the arena.
    ///
    /// The arena never runs destructors, hence the `Copy` bound.
    ///
    /// # Errors
    ///
    /// See [`alloc_uninit`](Arena::alloc_uninit).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T: Copy>(&self, value: T) -> Result<&mut T, ArenaError> {
        let ptr = self.bump(size_of::<T>(), align_of::<T>())?.cast::<T>();
        // SAFETY: ptr is aligned for T and points at size_of::<T>() exclusive
        // bytes (or is a dangling aligned pointer for a zero-sized T).
        unsafe {
            ptr.write(value);
            Ok(&mut *ptr.as_ptr())
        }
    }

    /// Allocates a slice of `len` copies of `value`.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidSize`] if `len * size_of::<T>()` overflows,
    /// otherwise see [`alloc_uninit`](Arena::alloc_uninit).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_fill<T: Copy>(&self, len: usize, value: T) -> Result<&mut [T], ArenaError> {
        let ptr = self.bump_array::<T>(len)?;
        // SAFETY: ptr covers `len` aligned, exclusive slots of T; every slot is
        // written before the slice is formed.
        unsafe {
            for i in 0..len {
                ptr.add(i).write(value);
            }
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), len))
        }
    }

    /// Copies `src` into the arena.
    ///
    /// # Errors
    ///
    /// See [`alloc_uninit`](Arena::alloc_uninit).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> Result<&mut [T], ArenaError> {
        let ptr = self.bump_array::<T>(src.len())?;
        // SAFETY: ptr covers `src.len()` aligned, exclusive slots of T, which
        // cannot overlap `src` because they were just carved from the buffer.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
            Ok(std::slice::from_raw_parts_mut(ptr.as_ptr(), src.len()))
        }
    }

    /// Copies `src` into the arena.
    ///
    /// # Errors
    ///
    /// See [`alloc_uninit`](Arena::alloc_uninit).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_str(&self, src: &str) -> Result<&mut str, ArenaError> {
        let bytes = self.alloc_slice_copy(src.as_bytes())?;
        // SAFETY: bytes is a copy of a valid UTF-8 string.
        Ok(unsafe { std::str::from_utf8_unchecked_mut(bytes) })
    }

    /// Saves the current cursor position.
    ///
    /// Use with [`rollback`](Arena::rollback) to discard allocations made
    /// after this point.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidState`] if the arena is not initialized.
    pub fn checkpoint(&self) -> Result<Checkpoint, ArenaError> {
        self.block()?;
        Ok(Checkpoint::new(
            self.buffer_id,
            self.epoch,
            self.offset.get(),
        ))
    }

    /// Rewinds the cursor to `cp`, discarding every allocation made after it.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidState`] if the arena is not initialized.
    /// - [`ArenaError::StaleCheckpoint`] if `cp` was taken on another arena,
    ///   predates the current epoch, or lies beyond the cursor.
    pub fn rollback(&mut self, cp: Checkpoint) -> Result<(), ArenaError> {
        let current = self.offset.get();
        let block = self
            .block
            .as_mut()
            .ok_or(ArenaError::InvalidState { state: self.state })?;
        if cp.buffer() != self.buffer_id || cp.epoch() != self.epoch || cp.offset() > current {
            return Err(ArenaError::StaleCheckpoint {
                checkpoint_epoch: cp.epoch(),
                current_epoch: self.epoch,
            });
        }
        if self.reset_policy == ResetPolicy::Zero {
            block.zero(cp.offset()..current);
        }
        self.offset.set(cp.offset());
        log::trace!("arena rolled back from {current} to {} bytes", cp.offset());
        Ok(())
    }

    /// Rewinds the cursor to the start of the buffer.
    ///
    /// Under [`ResetPolicy::Retain`] the buffer contents are left as they
    /// are; under [`ResetPolicy::Zero`] the used prefix is zeroed. Existing
    /// checkpoints become stale. Resetting an empty arena only advances the
    /// epoch.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidState`] if the arena is not initialized.
    pub fn reset(&mut self) -> Result<(), ArenaError> {
        let used = self.offset.get();
        let block = self
            .block
            .as_mut()
            .ok_or(ArenaError::InvalidState { state: self.state })?;
        if self.reset_policy == ResetPolicy::Zero {
            block.zero(0..used);
        }
        self.offset.set(0);
        self.epoch = self.epoch.wrapping_add(1);
        log::trace!("arena reset: {used} bytes released");
        Ok(())
    }

    /// Releases the backing buffer and marks the arena destroyed.
    ///
    /// Capacity and offset read as 0 afterwards. Allocation, reset, and
    /// rollback fail with [`ArenaError::InvalidState`] until the arena is
    /// initialized again. Destroying an arena without a buffer is a no-op.
    ///
    /// Dropping the arena releases the buffer as well; calling this is only
    /// needed to release it early.
    pub fn destroy(&mut self) {
        if let Some(block) = self.block.take() {
            log::debug!("arena destroyed: {} bytes released", block.len());
            drop(block);
            self.offset.set(0);
            self.state = ArenaState::Destroyed;
            self.epoch = self.epoch.wrapping_add(1);
        }
    }

    fn block(&self) -> Result<&Block, ArenaError> {
        self.block
            .as_ref()
            .ok_or(ArenaError::InvalidState { state: self.state })
    }

    fn bump_array<T>(&self, len: usize) -> Result<NonNull<T>, ArenaError> {
        let layout = Layout::array::<T>(len).map_err(|_| ArenaError::InvalidSize {
            size: len.saturating_mul(size_of::<T>()),
            align: align_of::<T>(),
        })?;
        Ok(self.bump(layout.size(), layout.align())?.cast())
    }

    /// Carves `size` bytes aligned to `align` off the front of the free space.
    ///
    /// All cursor arithmetic is checked and nothing is committed until the
    /// region is known to fit.
    fn bump(&self, size: usize, align: usize) -> Result<NonNull<u8>, ArenaError> {
        let block = self.block()?;
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        if size == 0 {
            // SAFETY: align is a power of two, hence non-zero.
            return Ok(unsafe { NonNull::new_unchecked(std::ptr::without_provenance_mut(align)) });
        }

        let invalid = || ArenaError::InvalidSize { size, align };
        let offset = self.offset.get();
        let capacity = block.len();
        let base = block.as_ptr().addr().get();

        // Align the absolute address so requests above the buffer's own
        // alignment are honoured too.
        let cursor = base.checked_add(offset).ok_or_else(invalid)?;
        let aligned = cursor.checked_add(align - 1).ok_or_else(invalid)? & !(align - 1);
        let start = aligned - base;
        let end = start.checked_add(size).ok_or_else(invalid)?;

        if end > capacity {
            let remaining = capacity - offset;
            log::debug!(
                "arena out of space: requested {size} bytes (align {align}), {remaining} of {capacity} remaining"
            );
            return Err(ArenaError::OutOfSpace {
                requested: size,
                remaining,
            });
        }

        self.offset.set(end);
        // SAFETY: start < end <= capacity, so the offset stays inside the block.
        Ok(unsafe { block.as_ptr().add(start) })
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
