use std::error::Error;
use std::fmt;

use crate::ArenaState;

/// Errors reported by [`Arena`](crate::Arena) operations.
///
/// Every variant is recoverable: a failed call leaves the arena exactly as it
/// was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The backing buffer could not be acquired from the global allocator.
    OutOfMemory {
        /// Number of bytes requested for the buffer.
        capacity: usize,
    },
    /// The request does not fit in the space left after alignment padding.
    OutOfSpace {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left between the cursor and the end of the buffer.
        remaining: usize,
    },
    /// The operation is not valid in the arena's current lifecycle state.
    InvalidState {
        /// State the arena was in when the call was made.
        state: ArenaState,
    },
    /// The size cannot be represented: arithmetic overflow while computing the
    /// end of the region, a zero capacity, or a size no `Layout` accepts.
    InvalidSize {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
    /// The alignment is zero or not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// A [`Checkpoint`](crate::Checkpoint) taken before the last reset, or one
    /// that lies beyond the current cursor.
    StaleCheckpoint {
        /// Epoch recorded in the checkpoint.
        checkpoint_epoch: u64,
        /// Current epoch of the arena.
        current_epoch: u64,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { capacity } => {
                write!(f, "failed to acquire {capacity} bytes for arena buffer")
            }
            Self::OutOfSpace {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena out of space: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::InvalidState { state } => {
                write!(f, "arena is {state}")
            }
            Self::InvalidSize { size, align } => {
                write!(f, "invalid allocation size {size} with alignment {align}")
            }
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::StaleCheckpoint {
                checkpoint_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale checkpoint: epoch {checkpoint_epoch}, arena epoch {current_epoch}"
                )
            }
        }
    }
}

impl Error for ArenaError {}
