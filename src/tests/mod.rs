use std::mem::MaybeUninit;

use super::*;

/// Address range `[start, end)` covered by a view.
fn span<T>(view: &[T]) -> (usize, usize) {
    let start = view.as_ptr().addr();
    (start, start + size_of_val(view))
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn write_all(view: &mut [MaybeUninit<u8>], byte: u8) {
    for slot in view {
        slot.write(byte);
    }
}

/// Copies the bytes of a view.
///
/// # Safety
///
/// Every byte of `view` must be initialized.
unsafe fn read_bytes(view: &[MaybeUninit<u8>]) -> Vec<u8> {
    view.iter()
        .map(|byte| unsafe { byte.assume_init_read() })
        .collect()
}

mod lifecycle;
