//! Iteration over the occupied slots of a `ProbeSet`.
//!
//! Two flavours:
//! - `Iter`, a borrowing iterator; the borrow checker forbids mutation
//!   while it is alive.
//! - `Cursor`, a detached position token (`begin`/`next`/`end`). It carries
//!   the identity and generation of the set it was made from; using it on
//!   another set, or after any mutation of its own, is reported instead of
//!   yielding a misplaced value.

use crate::bucket::Bucket;
use crate::error::{Result, SetError};
use crate::probe_set::ProbeSet;
use core::iter::FusedIterator;

/// Position of an occupied slot, or the end position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    set: u64,
    index: usize,
    generation: u64,
}

impl Cursor {
    /// Slot index this cursor points at; `capacity()` for the end cursor.
    pub fn index(&self) -> usize {
        self.index
    }
}

fn first_occupied<V>(slots: &[Bucket<V>], from: usize) -> usize {
    slots
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, b)| matches!(b, Bucket::Occupied { .. }))
        .map_or(slots.len(), |(i, _)| i)
}

impl<V, S> ProbeSet<V, S> {
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots().iter(),
            remaining: self.len(),
        }
    }

    /// Cursor at the first occupied slot, or `end()` when empty.
    pub fn begin(&self) -> Cursor {
        Cursor {
            set: self.id(),
            index: first_occupied(self.slots(), 0),
            generation: self.generation(),
        }
    }

    /// One past the last slot.
    pub fn end(&self) -> Cursor {
        Cursor {
            set: self.id(),
            index: self.capacity(),
            generation: self.generation(),
        }
    }

    /// Cursor at the next occupied slot after `cursor`, or `end()`.
    ///
    /// Panics if `cursor` came from another set, or if the set was mutated
    /// since `cursor` was obtained.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        match self.try_next(cursor) {
            Ok(c) => c,
            Err(e) => panic!("ProbeSet::next: {e}"),
        }
    }

    pub fn try_next(&self, cursor: Cursor) -> Result<Cursor> {
        self.check(cursor)?;
        let from = cursor.index.saturating_add(1).min(self.capacity());
        Ok(Cursor {
            index: first_occupied(self.slots(), from),
            ..cursor
        })
    }

    /// Value under `cursor`; `None` at the end position.
    ///
    /// Panics under the same conditions as `next`.
    pub fn value_at(&self, cursor: Cursor) -> Option<&V> {
        match self.try_value_at(cursor) {
            Ok(v) => v,
            Err(e) => panic!("ProbeSet::value_at: {e}"),
        }
    }

    pub fn try_value_at(&self, cursor: Cursor) -> Result<Option<&V>> {
        self.check(cursor)?;
        Ok(self.slots().get(cursor.index).and_then(Bucket::value))
    }

    fn check(&self, cursor: Cursor) -> Result<()> {
        if cursor.set != self.id() {
            return Err(SetError::ForeignCursor);
        }
        if cursor.generation != self.generation() {
            return Err(SetError::StaleCursor {
                expected: self.generation(),
                found: cursor.generation,
            });
        }
        Ok(())
    }
}

/// Borrowing iterator over the values of a `ProbeSet`, in slot order.
pub struct Iter<'a, V> {
    it: core::slice::Iter<'a, Bucket<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for b in self.it.by_ref() {
            if let Some(v) = b.value() {
                self.remaining -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning iterator over the values of a `ProbeSet`.
pub struct IntoIter<V> {
    it: std::vec::IntoIter<Bucket<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        for b in self.it.by_ref() {
            if let Some(v) = b.into_value() {
                self.remaining -= 1;
                return Some(v);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

impl<'a, V, S> IntoIterator for &'a ProbeSet<V, S> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, S> IntoIterator for ProbeSet<V, S> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        let remaining = self.len();
        IntoIter {
            it: self.into_slots().into_vec().into_iter(),
            remaining,
        }
    }
}
