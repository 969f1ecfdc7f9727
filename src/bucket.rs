//! Bucket storage: the fixed-capacity slot array a `ProbeSet` owns.

use crate::error::{Result, SetError};

/// One storage slot.
#[derive(Clone, Debug)]
pub(crate) enum Bucket<V> {
    Empty,
    Occupied { hash: u64, value: V },
    /// Deleted: still part of probe sequences, never matched.
    Tombstone,
}

impl<V> Bucket<V> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Bucket::Empty)
    }

    #[inline]
    pub(crate) fn is_tombstone(&self) -> bool {
        matches!(self, Bucket::Tombstone)
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        match self {
            Bucket::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_value(self) -> Option<V> {
        match self {
            Bucket::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Allocates `buckets` slots, all `Empty`.
///
/// Reports failure instead of aborting so `try_insert` can surface it.
pub(crate) fn allocate<V>(buckets: usize) -> Result<Box<[Bucket<V>]>> {
    let bytes = buckets
        .checked_mul(core::mem::size_of::<Bucket<V>>())
        .ok_or(SetError::CapacityOverflow)?;
    if bytes > isize::MAX as usize {
        return Err(SetError::CapacityOverflow);
    }

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(buckets)
        .map_err(|_| SetError::AllocFailed { buckets })?;
    slots.resize_with(buckets, || Bucket::Empty);
    Ok(slots.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_fills_with_empty() {
        let slots: Box<[Bucket<u32>]> = allocate(8).unwrap();
        assert_eq!(8, slots.len());
        assert!(slots.iter().all(Bucket::is_empty));
    }

    #[test]
    fn allocate_zero_is_fine() {
        let slots: Box<[Bucket<u64>]> = allocate(0).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn allocate_rejects_overflowing_sizes() {
        let res: Result<Box<[Bucket<u64>]>> = allocate(usize::MAX / 2);
        assert_eq!(Some(SetError::CapacityOverflow), res.err());
    }

    #[test]
    fn state_accessors() {
        let b: Bucket<i32> = Bucket::Occupied { hash: 1, value: 5 };
        assert_eq!(Some(&5), b.value());
        assert!(!b.is_empty());
        assert!(Bucket::<i32>::Tombstone.is_tombstone());
        assert_eq!(None, Bucket::<i32>::Tombstone.value());
    }
}
