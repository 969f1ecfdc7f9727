//! Busy flag catching strategies that call back into the set running them.
//!
//! Probing and placement hand values to the strategy while the table is
//! half-updated. Debug builds mark the set busy for the whole of each public
//! operation and panic on a nested entry, naming the operation that was
//! re-entered. Release builds keep no state.

use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

#[derive(Debug, Default)]
pub(crate) struct Busy {
    #[cfg(debug_assertions)]
    flag: Cell<bool>,
    #[cfg(not(debug_assertions))]
    _unsync: PhantomData<Cell<()>>,
}

impl Busy {
    /// Marks the set busy until the returned token drops.
    #[inline]
    pub(crate) fn hold(&self, op: &'static str) -> Held<'_> {
        #[cfg(debug_assertions)]
        {
            if self.flag.replace(true) {
                busy_panic(op);
            }
            Held { busy: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            Held { _busy: PhantomData }
        }
    }
}

#[cfg(debug_assertions)]
#[cold]
#[inline(never)]
fn busy_panic(op: &str) -> ! {
    panic!("ProbeSet::{op} re-entered from the set's own strategy")
}

pub(crate) struct Held<'a> {
    #[cfg(debug_assertions)]
    busy: &'a Busy,
    #[cfg(not(debug_assertions))]
    _busy: PhantomData<&'a Busy>,
}

#[cfg(debug_assertions)]
impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.busy.flag.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::Busy;

    #[test]
    fn released_on_drop() {
        let busy = Busy::default();
        drop(busy.hold("insert"));
        let _again = busy.hold("contains");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "ProbeSet::contains re-entered")]
    fn nested_hold_names_the_operation() {
        let busy = Busy::default();
        let _outer = busy.hold("insert");
        let _inner = busy.hold("contains");
    }

    /// A panic inside a held section must not leave the set marked busy.
    #[test]
    fn released_by_unwinding() {
        let busy = Busy::default();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = busy.hold("take");
            panic!("strategy failed");
        }));
        assert!(res.is_err());
        let _after = busy.hold("take");
    }
}
