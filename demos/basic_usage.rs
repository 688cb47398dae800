//! Allocate a batch, reset, reuse, destroy.

use fixed_bump::{Arena, ArenaError};

fn main() -> Result<(), ArenaError> {
    let mut arena = Arena::with_capacity(1024)?;

    let numbers = arena.alloc_slice_fill(10, 0i32)?;
    for (i, n) in numbers.iter_mut().enumerate() {
        *n = i32::try_from(i).unwrap_or(i32::MAX);
    }
    println!("{numbers:?} ({} bytes used)", arena.offset());

    arena.reset()?;

    let text = arena.alloc_str("Hello, Arena Allocator!")?;
    println!("{text} ({} bytes used)", arena.offset());

    match arena.alloc_uninit(2048, 1) {
        Err(err @ ArenaError::OutOfSpace { .. }) => println!("expected failure: {err}"),
        other => println!("unexpected: {other:?}"),
    }

    arena.destroy();
    if let Err(err) = arena.alloc(0u8) {
        println!("after destroy: {err}");
    }
    Ok(())
}
