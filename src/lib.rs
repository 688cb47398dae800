//! Fixed-capacity bump-pointer arena.
//!
//! `fixed-bump` carves allocations sequentially out of one contiguous buffer
//! acquired up front. Nothing is freed individually: the whole arena is reset
//! at once, or destroyed to release the buffer.
//!
//! # Key properties
//!
//! - **One allocation**: the buffer is the only heap allocation; it never grows
//! - **Checked arithmetic**: alignment padding and region ends are computed
//!   with overflow checks before any pointer is formed
//! - **Recoverable errors**: running out of space or memory returns an
//!   [`ArenaError`], never aborts
//! - **Borrow-checked lifetimes**: views borrow the arena, and
//!   [`reset`](Arena::reset) / [`destroy`](Arena::destroy) need `&mut`, so no
//!   view survives the memory it points at
//! - **Uninitialized by default**: zero-fill is opt-in via
//!   [`Arena::alloc_zeroed`] or [`ResetPolicy::Zero`]
//!
//! # Example
//!
//! ```
//! use fixed_bump::{Arena, ArenaError, ArenaState};
//!
//! let mut arena = Arena::with_capacity(1024)?;
//! let header = arena.alloc_zeroed(40, 8)?;
//! header[0] = 0xff;
//! assert_eq!(arena.offset(), 40);
//!
//! let cp = arena.checkpoint()?;
//! let _scratch = arena.alloc_uninit(100, 1)?;
//! arena.rollback(cp)?; // scratch is discarded
//! assert_eq!(arena.offset(), 40);
//!
//! arena.reset()?;
//! assert_eq!(arena.offset(), 0);
//!
//! arena.destroy();
//! assert_eq!(arena.state(), ArenaState::Destroyed);
//! assert_eq!(
//!     arena.alloc_uninit(1, 1).unwrap_err(),
//!     ArenaError::InvalidState { state: ArenaState::Destroyed },
//! );
//! # Ok::<(), ArenaError>(())
//! ```

#![deny(missing_docs)]

mod arena;
mod block;
mod checkpoint;
mod config;
mod error;
mod state;

pub use arena::Arena;
pub use checkpoint::Checkpoint;
pub use config::{ArenaConfig, ResetPolicy};
pub use error::ArenaError;
pub use state::ArenaState;

#[cfg(test)]
mod tests;
