//! ProbeSet: the open-addressing set and its mutation/query surface.

use crate::bucket::{self, Bucket};
use crate::error::{Result, SetError};
use crate::policy::{Resize, ResizePolicy};
use crate::probe;
use crate::reentrancy::Busy;
use crate::strategy::{DefaultStrategy, FnStrategy, SetStrategy};
use core::fmt;
use core::hash::Hash;
use core::mem;
use core::sync::atomic::{AtomicU64, Ordering};

/// Bucket array plus the counters describing it. Kept apart from the
/// strategy so table maintenance can run while a guard borrows the set.
#[derive(Clone)]
pub(crate) struct Table<V> {
    pub(crate) slots: Box<[Bucket<V>]>,
    pub(crate) elements: usize,
    pub(crate) tombstones: usize,
    /// Bumped by every mutation; cursors carry the value they were made at.
    pub(crate) generation: u64,
}

impl<V> Table<V> {
    fn new() -> Self {
        Self {
            slots: Box::default(),
            elements: 0,
            tombstones: 0,
            generation: 0,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Makes room for one more value: allocates on first use, forgets
    /// tombstones when nothing is live, grows or purges past the threshold.
    /// `requested` is consumed by the allocation.
    fn reserve_one(&mut self, policy: &ResizePolicy, requested: &mut usize) -> Result<()> {
        if self.slots.is_empty() {
            let capacity = policy
                .capacity_for(*requested)
                .ok_or(SetError::CapacityOverflow)?;
            self.slots = bucket::allocate(capacity)?;
            *requested = 0;
            self.tombstones = 0;
            self.bump();
            tracing::trace!(capacity, "allocated bucket array");
        } else if self.elements == 0 {
            if self.tombstones > 0 {
                self.slots.iter_mut().for_each(|b| *b = Bucket::Empty);
                self.tombstones = 0;
                self.bump();
            }
        } else if let Some(reason) =
            policy.before_insert(self.elements, self.tombstones, self.capacity())
        {
            let to = policy
                .target(self.elements, self.capacity(), reason)
                .ok_or(SetError::CapacityOverflow)?;
            self.rehash(to, reason)?;
        }
        Ok(())
    }

    /// Shrinks a sparse table back into the load band. A failed allocation
    /// leaves the table at its current size.
    fn shrink_if_sparse(&mut self, policy: &ResizePolicy) {
        let Some(reason) = policy.should_shrink(self.elements, self.capacity()) else {
            return;
        };
        if let Some(to) = policy.target(self.elements, self.capacity(), reason) {
            if let Err(error) = self.rehash(to, reason) {
                tracing::warn!(%error, capacity = self.capacity(), "shrink skipped");
            }
        }
    }

    /// Replaces the bucket array by one of `to` slots and re-places every
    /// live value by its stored hash. Tombstones do not survive.
    fn rehash(&mut self, to: usize, reason: Resize) -> Result<()> {
        debug_assert!(self.elements <= to);
        let fresh = bucket::allocate(to)?;
        let from = self.capacity();
        let dropped = self.tombstones;

        let old = mem::replace(&mut self.slots, fresh);
        for b in old.into_vec() {
            if let Bucket::Occupied { hash, value } = b {
                let at = probe::vacant_for(&self.slots, hash).unwrap_or_else(|| exhausted(to));
                self.slots[at] = Bucket::Occupied { hash, value };
            }
        }
        self.tombstones = 0;
        self.bump();

        tracing::trace!(
            from,
            to,
            elements = self.elements,
            dropped_tombstones = dropped,
            ?reason,
            "rehashed bucket array"
        );
        Ok(())
    }
}

/// Source of set identities; cursors remember the set they came from.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

#[cold]
#[inline(never)]
fn exhausted(capacity: usize) -> ! {
    panic!("probe sequence walked all {capacity} slots without finding a vacancy")
}

/// An open-addressing hash set with linear probing and tombstone deletion.
///
/// Storage is allocated on first insert and resized according to its
/// `ResizePolicy`. Values are placed and compared by the strategy `S`.
/// Iteration order is the physical slot order and may change after any
/// mutation.
pub struct ProbeSet<V, S = DefaultStrategy> {
    strategy: S,
    policy: ResizePolicy,
    /// Element count the next allocation should accommodate; reset once
    /// storage exists.
    requested: usize,
    id: u64,
    table: Table<V>,
    busy: Busy,
}

impl<V> ProbeSet<V>
where
    V: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_strategy(DefaultStrategy::default())
    }

    /// The first allocation will hold `capacity` values without growing.
    /// Storage is still allocated lazily. Until the first erase the reserved
    /// table may sit below the shrink threshold.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity, DefaultStrategy::default())
    }
}

impl<V, H, E> ProbeSet<V, FnStrategy<H, E>>
where
    H: Fn(&V) -> u64,
    E: Fn(&V, &V) -> bool,
{
    /// Builds a set from a plain hash function and equality function.
    pub fn from_fns(hash: H, equals: E) -> Self {
        Self::with_strategy(FnStrategy::new(hash, equals))
    }
}

impl<V, S> Default for ProbeSet<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_strategy(S::default())
    }
}

impl<V, S> ProbeSet<V, S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_capacity_and_strategy(0, strategy)
    }

    pub fn with_capacity_and_strategy(capacity: usize, strategy: S) -> Self {
        Self {
            strategy,
            policy: ResizePolicy::default(),
            requested: capacity,
            id: next_id(),
            table: Table::new(),
            busy: Busy::default(),
        }
    }

    /// Replaces the resize policy; it applies from the next mutation on.
    pub fn with_policy(mut self, policy: ResizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.table.elements
    }

    pub fn is_empty(&self) -> bool {
        self.table.elements == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones
    }

    /// `len / capacity`, or 0 without storage.
    pub fn load_factor(&self) -> f64 {
        match self.capacity() {
            0 => 0.0,
            c => self.len() as f64 / c as f64,
        }
    }

    /// Releases storage; the set behaves as freshly constructed afterwards.
    pub fn clear(&mut self) {
        if self.capacity() > 0 {
            tracing::debug!(
                capacity = self.capacity(),
                elements = self.len(),
                "releasing bucket array"
            );
        }
        let generation = self.table.generation;
        self.table = Table::new();
        self.table.generation = generation.wrapping_add(1);
    }

    pub(crate) fn slots(&self) -> &[Bucket<V>] {
        &self.table.slots
    }

    pub(crate) fn generation(&self) -> u64 {
        self.table.generation
    }

    /// Identity of this set, distinct from every other set including clones.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn into_slots(self) -> Box<[Bucket<V>]> {
        self.table.slots
    }

    /// Empty set sharing this set's strategy and policy.
    pub(crate) fn empty_like(&self) -> Self
    where
        S: Clone,
    {
        Self::with_strategy(self.strategy.clone()).with_policy(self.policy)
    }
}

impl<V, S> ProbeSet<V, S>
where
    S: SetStrategy<V>,
{
    /// Inserts `value`, returning whether it was absent. An equal value
    /// already present is overwritten and the count is unchanged.
    ///
    /// Panics if the bucket array cannot be allocated.
    pub fn insert(&mut self, value: V) -> bool {
        match self.try_insert(value) {
            Ok(added) => added,
            Err(e) => panic!("ProbeSet::insert: {e}"),
        }
    }

    pub fn try_insert(&mut self, value: V) -> Result<bool> {
        self.try_replace(value).map(|old| old.is_none())
    }

    /// Inserts `value`, returning the equal value it displaced, if any.
    pub fn replace(&mut self, value: V) -> Option<V> {
        match self.try_replace(value) {
            Ok(old) => old,
            Err(e) => panic!("ProbeSet::replace: {e}"),
        }
    }

    pub fn try_replace(&mut self, value: V) -> Result<Option<V>> {
        let _g = self.busy.hold("insert");
        self.table.reserve_one(&self.policy, &mut self.requested)?;

        let hash = self.strategy.hash(&value);
        let strategy = &self.strategy;
        let p = probe::probe(&self.table.slots, hash, |v| strategy.equals(v, &value));

        let table = &mut self.table;
        table.bump();
        let fresh = Bucket::Occupied { hash, value };
        match p.found {
            Some(found) => {
                // Pull the match back over the first tombstone on its path.
                let at = probe::compact(&mut table.slots, found, p.tombstone);
                Ok(mem::replace(&mut table.slots[at], fresh).into_value())
            }
            None => {
                let at = p
                    .vacancy()
                    .unwrap_or_else(|| exhausted(table.capacity()));
                if table.slots[at].is_tombstone() {
                    table.tombstones -= 1;
                }
                table.slots[at] = fresh;
                table.elements += 1;
                Ok(None)
            }
        }
    }

    /// Never mutates: no tombstone compaction happens on lookups.
    pub fn contains(&self, value: &V) -> bool {
        self.get(value).is_some()
    }

    /// The stored value equal to `value`.
    pub fn get(&self, value: &V) -> Option<&V> {
        let _g = self.busy.hold("contains");
        if self.table.elements == 0 {
            return None;
        }
        let hash = self.strategy.hash(value);
        let p = probe::probe(&self.table.slots, hash, |v| self.strategy.equals(v, value));
        p.found.and_then(|i| self.table.slots[i].value())
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove(&mut self, value: &V) -> bool {
        self.take(value).is_some()
    }

    /// Erases `value`; absent values are a no-op.
    ///
    /// Panics if the set is empty.
    pub fn erase(&mut self, value: &V) {
        assert!(!self.is_empty(), "ProbeSet::erase called on an empty set");
        self.take(value);
    }

    /// Removes and returns the stored value equal to `value`.
    ///
    /// May shrink the table, as many halvings as it takes to bring the load
    /// back above the shrink threshold.
    pub fn take(&mut self, value: &V) -> Option<V> {
        let _g = self.busy.hold("take");
        if self.table.elements == 0 {
            return None;
        }

        let hash = self.strategy.hash(value);
        let strategy = &self.strategy;
        let p = probe::probe(&self.table.slots, hash, |v| strategy.equals(v, value));

        let table = &mut self.table;
        let taken = p.found.and_then(|found| {
            let at = probe::compact(&mut table.slots, found, p.tombstone);
            table.elements -= 1;
            table.tombstones += 1;
            table.bump();
            mem::replace(&mut table.slots[at], Bucket::Tombstone).into_value()
        });

        table.shrink_if_sparse(&self.policy);
        taken
    }
}

impl<V, S> Clone for ProbeSet<V, S>
where
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            strategy: self.strategy.clone(),
            policy: self.policy,
            requested: self.requested,
            id: next_id(),
            table: self.table.clone(),
            busy: Busy::default(),
        }
    }
}

impl<V, S> fmt::Debug for ProbeSet<V, S>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<V, S> Extend<V> for ProbeSet<V, S>
where
    S: SetStrategy<V>,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<V, S> FromIterator<V> for ProbeSet<V, S>
where
    S: SetStrategy<V> + Default,
{
    /// Reserves for the iterator's lower bound, then gives back what
    /// duplicates left unused.
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity_and_strategy(iter.size_hint().0, S::default());
        set.extend(iter);
        set.requested = 0;
        set.table.shrink_if_sparse(&set.policy);
        set
    }
}
