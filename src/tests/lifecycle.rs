use super::*;

#[test]
fn new_arena_is_uninitialized() {
    let mut arena = Arena::new();
    assert_eq!(arena.state(), ArenaState::Uninitialized);
    assert!(!arena.is_initialized());
    assert_eq!(arena.capacity(), 0);
    assert_eq!(arena.remaining(), 0);

    let uninit = ArenaError::InvalidState {
        state: ArenaState::Uninitialized,
    };
    assert_eq!(arena.alloc_uninit(8, 1).unwrap_err(), uninit);
    assert_eq!(arena.alloc_uninit(0, 1).unwrap_err(), uninit);
    assert_eq!(arena.alloc(1u8).unwrap_err(), uninit);
    assert_eq!(arena.checkpoint().unwrap_err(), uninit);
    assert_eq!(arena.reset().unwrap_err(), uninit);
}

#[test]
fn default_is_uninitialized() {
    assert_eq!(Arena::default().state(), ArenaState::Uninitialized);
}

#[test]
fn init_after_new() {
    let mut arena = Arena::new();
    arena.init(256).unwrap();
    assert_eq!(arena.state(), ArenaState::Initialized);
    assert_eq!(arena.capacity(), 256);
    assert_eq!(arena.offset(), 0);
    arena.alloc_uninit(256, 1).unwrap();
}

#[test]
fn init_twice_is_invalid() {
    let mut arena = Arena::with_capacity(64).unwrap();
    arena.alloc_uninit(10, 1).unwrap();
    assert_eq!(
        arena.init(128).unwrap_err(),
        ArenaError::InvalidState {
            state: ArenaState::Initialized
        }
    );
    assert_eq!(arena.capacity(), 64);
    assert_eq!(arena.offset(), 10);
}

#[test]
fn invalid_capacity_keeps_state() {
    let mut arena = Arena::new();
    assert_eq!(
        arena.init(0).unwrap_err(),
        ArenaError::InvalidSize { size: 0, align: 16 }
    );
    assert_eq!(arena.state(), ArenaState::Uninitialized);

    assert_eq!(
        Arena::with_config(ArenaConfig::new(64).with_base_align(48)).unwrap_err(),
        ArenaError::InvalidAlignment { align: 48 }
    );
}

#[test]
#[cfg(target_pointer_width = "64")]
fn unsatisfiable_capacity_is_out_of_memory() {
    let capacity = isize::MAX.unsigned_abs() - 15;
    let mut arena = Arena::new();
    assert_eq!(
        arena.init(capacity).unwrap_err(),
        ArenaError::OutOfMemory { capacity }
    );
    assert_eq!(arena.state(), ArenaState::Uninitialized);

    // Still usable after a failed init.
    arena.init(32).unwrap();
    assert!(arena.is_initialized());
}

#[test]
fn destroy_releases_buffer() {
    let mut arena = Arena::with_capacity(1024).unwrap();
    arena.alloc_uninit(100, 1).unwrap();
    arena.destroy();

    assert_eq!(arena.state(), ArenaState::Destroyed);
    assert_eq!(arena.capacity(), 0);
    assert_eq!(arena.offset(), 0);
    assert_eq!(arena.remaining(), 0);
}

#[test]
fn use_after_destroy_is_invalid_state() {
    let mut arena = Arena::with_capacity(64).unwrap();
    let cp = arena.checkpoint().unwrap();
    arena.destroy();

    let destroyed = ArenaError::InvalidState {
        state: ArenaState::Destroyed,
    };
    assert_eq!(arena.alloc_uninit(1, 1).unwrap_err(), destroyed);
    assert_eq!(arena.alloc_zeroed(0, 1).unwrap_err(), destroyed);
    assert_eq!(arena.alloc_str("x").unwrap_err(), destroyed);
    assert_eq!(
        arena
            .allocate(std::alloc::Layout::new::<u64>())
            .unwrap_err(),
        destroyed
    );
    assert_eq!(arena.reset().unwrap_err(), destroyed);
    assert_eq!(arena.rollback(cp).unwrap_err(), destroyed);
    assert_eq!(arena.checkpoint().unwrap_err(), destroyed);
}

#[test]
fn destroy_is_idempotent() {
    let mut arena = Arena::with_capacity(64).unwrap();
    arena.destroy();
    let epoch = arena.epoch();
    arena.destroy();
    arena.destroy();
    assert_eq!(arena.state(), ArenaState::Destroyed);
    assert_eq!(arena.epoch(), epoch);
}

#[test]
fn destroy_uninitialized_is_noop() {
    let mut arena = Arena::new();
    arena.destroy();
    assert_eq!(arena.state(), ArenaState::Uninitialized);
}

#[test]
fn reinit_after_destroy() {
    let mut arena = Arena::with_capacity(64).unwrap();
    arena.alloc_uninit(64, 1).unwrap();
    arena.destroy();

    arena.init(128).unwrap();
    assert_eq!(arena.state(), ArenaState::Initialized);
    assert_eq!(arena.capacity(), 128);
    assert_eq!(arena.offset(), 0);
    arena.alloc_uninit(128, 1).unwrap();
}

#[test]
fn reset_is_idempotent() {
    let mut arena = Arena::with_capacity(64).unwrap();
    arena.reset().unwrap();
    assert_eq!(arena.offset(), 0);

    arena.alloc_uninit(30, 1).unwrap();
    arena.reset().unwrap();
    arena.reset().unwrap();
    arena.reset().unwrap();
    assert_eq!(arena.offset(), 0);
    assert_eq!(arena.capacity(), 64);
    assert_eq!(arena.remaining(), 64);
}

#[test]
fn reset_advances_epoch() {
    let mut arena = Arena::with_capacity(64).unwrap();
    let epoch = arena.epoch();
    arena.reset().unwrap();
    assert_eq!(arena.epoch(), epoch + 1);
}

#[test]
fn retain_policy_leaves_stale_bytes() {
    let mut arena = Arena::with_capacity(16).unwrap();
    assert_eq!(arena.reset_policy(), ResetPolicy::Retain);
    arena.alloc_slice_copy(&[1u8, 2, 3, 4]).unwrap();
    arena.reset().unwrap();

    let reused = arena.alloc_uninit(4, 1).unwrap();
    // SAFETY: the bytes were written before the reset and Retain keeps them.
    assert_eq!(unsafe { read_bytes(reused) }, vec![1, 2, 3, 4]);
}

#[test]
fn zero_policy_clears_on_reset() {
    let config = ArenaConfig::new(16).with_reset_policy(ResetPolicy::Zero);
    let mut arena = Arena::with_config(config).unwrap();
    assert_eq!(arena.reset_policy(), ResetPolicy::Zero);
    arena.alloc_slice_fill(16, 0xFFu8).unwrap();
    arena.reset().unwrap();

    let reused = arena.alloc_uninit(16, 1).unwrap();
    // SAFETY: Zero policy wrote every released byte.
    assert_eq!(unsafe { read_bytes(reused) }, vec![0; 16]);
}

#[test]
fn arena_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Arena>();

    let mut arena = Arena::with_capacity(64).unwrap();
    arena.alloc(7u64).unwrap();
    let handle = std::thread::spawn(move || {
        arena.reset().unwrap();
        arena.alloc(9u64).map(|v| *v)
    });
    assert_eq!(handle.join().unwrap(), Ok(9));
}

#[test]
fn drop_releases_buffer() {
    // Many short-lived arenas: each buffer is released on scope exit.
    for _ in 0..1000 {
        let arena = Arena::with_capacity(64 * 1024).unwrap();
        arena.alloc_zeroed(64 * 1024, 1).unwrap();
    }
}
