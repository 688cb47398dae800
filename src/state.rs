/// Lifecycle state of an [`Arena`](crate::Arena).
///
/// ```text
/// Uninitialized --init--> Initialized --destroy--> Destroyed
///                          ^      |                    |
///                          +------+ alloc/reset        |
///                          +--------------init---------+
/// ```
///
/// Allocation, reset, and rollback are only valid in
/// [`Initialized`](ArenaState::Initialized).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArenaState {
    /// No backing buffer has been acquired yet.
    Uninitialized,
    /// A backing buffer is owned and allocations can be served.
    Initialized,
    /// The backing buffer was released by [`Arena::destroy`](crate::Arena::destroy).
    Destroyed,
}

impl ArenaState {
    /// Returns `true` for [`ArenaState::Initialized`].
    #[must_use]
    pub const fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized)
    }
}

impl std::fmt::Display for ArenaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}
