use std::alloc::Layout;

use crate::ArenaError;

/// What [`Arena::reset`](crate::Arena::reset) and
/// [`Arena::rollback`](crate::Arena::rollback) do with released bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResetPolicy {
    /// Only move the cursor. Stale bytes stay in the buffer.
    #[default]
    Retain,
    /// Overwrite released bytes with zeroes before moving the cursor.
    Zero,
}

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at initialization; immutable for the arena's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes. Must be non-zero.
    pub capacity: usize,

    /// Alignment of the start of the backing buffer.
    ///
    /// Default: 16. Must be a power of two. Requests with a larger alignment
    /// are still honoured by padding the cursor.
    pub base_align: usize,

    /// Handling of released bytes on reset and rollback.
    pub reset_policy: ResetPolicy,
}

impl ArenaConfig {
    /// Default alignment of the backing buffer.
    pub const DEFAULT_BASE_ALIGN: usize = 16;

    /// Creates a config for a buffer of `capacity` bytes with defaults for
    /// everything else.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            base_align: Self::DEFAULT_BASE_ALIGN,
            reset_policy: ResetPolicy::Retain,
        }
    }

    /// Sets the alignment of the backing buffer.
    #[must_use]
    pub const fn with_base_align(mut self, base_align: usize) -> Self {
        self.base_align = base_align;
        self
    }

    /// Sets the reset policy.
    #[must_use]
    pub const fn with_reset_policy(mut self, reset_policy: ResetPolicy) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    /// Checks the config and returns the layout of the backing buffer.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidAlignment`] if `base_align` is not a power of two.
    /// - [`ArenaError::InvalidSize`] if `capacity` is zero or too large for a
    ///   [`Layout`].
    pub fn validate(&self) -> Result<Layout, ArenaError> {
        if !self.base_align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment {
                align: self.base_align,
            });
        }
        let invalid = ArenaError::InvalidSize {
            size: self.capacity,
            align: self.base_align,
        };
        if self.capacity == 0 {
            return Err(invalid);
        }
        Layout::from_size_align(self.capacity, self.base_align).map_err(|_| invalid)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
