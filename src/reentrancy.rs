//! Debug-only detection of strategy callbacks re-entering their table.
//!
//! `KeyEq` and `KeyHash` are user code called in the middle of a probe.
//! A strategy that reaches back into the same table (through a raw pointer
//! or shared cell) would see slot counters mid-update. Every public
//! `Table` method holds a `Busy` marker for its duration; in debug builds
//! a second marker taken while the first is alive panics. Release builds
//! keep only the `!Sync` marker.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    _unsync: PhantomData<Cell<()>>,
}

impl ReentryCheck {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _unsync: PhantomData,
        }
    }

    /// Mark the table busy until the returned marker drops. Unwinding out
    /// of a panicking strategy drops it too, so the table stays usable.
    #[inline]
    pub(crate) fn enter(&self) -> Busy<'_> {
        #[cfg(debug_assertions)]
        if self.busy.replace(true) {
            panic!("table re-entered from a key strategy during a probe");
        }
        Busy {
            #[cfg(debug_assertions)]
            check: self,
            _lt: PhantomData,
        }
    }
}

pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    check: &'a ReentryCheck,
    _lt: PhantomData<&'a ReentryCheck>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.check.busy.set(false);
    }
}
