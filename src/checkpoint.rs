/// Saved cursor position for rollback.
///
/// Created by [`Arena::checkpoint`](crate::Arena::checkpoint). Rolling back to
/// a checkpoint discards every allocation made after it and keeps everything
/// before. A checkpoint only applies to the arena it was taken from and
/// within the epoch it was taken in: a reset, destroy, or re-initialization
/// makes it stale.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checkpoint {
    /// Identity of the buffer the checkpoint was taken on.
    buffer: u64,
    epoch: u64,
    offset: usize,
}

impl Checkpoint {
    pub(crate) const fn new(buffer: u64, epoch: u64, offset: usize) -> Self {
        Self {
            buffer,
            epoch,
            offset,
        }
    }

    pub(crate) const fn buffer(&self) -> u64 {
        self.buffer
    }

    /// Returns the saved cursor offset in bytes.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the arena epoch the checkpoint belongs to.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns `true` if the checkpoint was taken at an empty arena.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.offset == 0
    }
}

impl std::fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Checkpoint({}@{})", self.offset, self.epoch)
    }
}
