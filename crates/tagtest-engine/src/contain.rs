//! Panic containment - run tested code so its panics become faults
//!
//! `contain` marks the current thread while tested code runs. Panic hooks
//! fire before unwinding reaches the catch, so they read the mark through
//! `is_panic_contained`.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

/// Run `f`, catching any panic it raises
pub(crate) fn contain<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    let previous = CONTAINING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINING.with(|flag| flag.set(previous));
    result
}

/// True while the current thread runs tested code under `contain`
///
/// Meant for panic hooks: a panic raised while this holds will be caught
/// and reported as an ERROR case.
pub fn is_panic_contained() -> bool {
    CONTAINING.with(Cell::get)
}
