//! Linear probing with tombstones.
//!
//! The walk starts at `hash % capacity` and advances one slot at a time,
//! wrapping around, for at most `capacity` steps. It stops at the first
//! `Empty` slot or at the first occupied slot accepted by `eq`.

use crate::bucket::Bucket;

/// Outcome of one probe walk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Probe {
    /// Slot holding a matching value.
    pub(crate) found: Option<usize>,
    /// First tombstone seen before stopping.
    pub(crate) tombstone: Option<usize>,
    /// The `Empty` slot that ended the walk.
    pub(crate) empty: Option<usize>,
}

impl Probe {
    /// Where a value absent from the table lands: the first tombstone on
    /// its path, else the empty slot that ended the walk.
    #[inline]
    pub(crate) fn vacancy(&self) -> Option<usize> {
        self.tombstone.or(self.empty)
    }
}

#[inline]
pub(crate) fn home(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

/// Walks the probe sequence of `hash`. Only occupied slots whose stored
/// hash equals `hash` are offered to `eq`.
pub(crate) fn probe<V, F>(slots: &[Bucket<V>], hash: u64, mut eq: F) -> Probe
where
    F: FnMut(&V) -> bool,
{
    let capacity = slots.len();
    let mut out = Probe::default();
    if capacity == 0 {
        return out;
    }

    let mut index = home(hash, capacity);
    for _ in 0..capacity {
        match &slots[index] {
            Bucket::Empty => {
                out.empty = Some(index);
                return out;
            }
            Bucket::Tombstone => {
                if out.tombstone.is_none() {
                    out.tombstone = Some(index);
                }
            }
            Bucket::Occupied { hash: h, value } => {
                if *h == hash && eq(value) {
                    out.found = Some(index);
                    return out;
                }
            }
        }
        index += 1;
        if index == capacity {
            index = 0;
        }
    }
    out
}

/// Landing slot of a value known to be absent from a table without
/// tombstones. Used while rehashing, so no strategy code runs.
pub(crate) fn vacant_for<V>(slots: &[Bucket<V>], hash: u64) -> Option<usize> {
    probe(slots, hash, |_| false).vacancy()
}

/// Moves the value found at `found` back into the earlier tombstone at
/// `tombstone`, leaving a fresh tombstone behind. Returns the value's new
/// index.
pub(crate) fn compact<V>(slots: &mut [Bucket<V>], found: usize, tombstone: Option<usize>) -> usize {
    match tombstone {
        Some(t) => {
            debug_assert!(slots[t].is_tombstone());
            slots.swap(t, found);
            t
        }
        None => found,
    }
}
