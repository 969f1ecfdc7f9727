//! Set algebra over `ProbeSet`, written only in terms of iteration and the
//! public query/mutation surface.
//!
//! Results are fresh sets carrying the left operand's strategy and policy;
//! inputs are never mutated. Values are cloned out of the operand being
//! iterated.

use crate::probe_set::ProbeSet;
use crate::strategy::SetStrategy;

/// Whether every value of `a` is in `b`.
pub fn is_subset<V, S>(a: &ProbeSet<V, S>, b: &ProbeSet<V, S>) -> bool
where
    S: SetStrategy<V>,
{
    if a.len() > b.len() {
        return false;
    }
    a.iter().all(|v| b.contains(v))
}

/// Values of `a`, then values of `b` not equal to one of `a`'s.
pub fn union<V, S>(a: &ProbeSet<V, S>, b: &ProbeSet<V, S>) -> ProbeSet<V, S>
where
    V: Clone,
    S: SetStrategy<V> + Clone,
{
    let mut out = a.empty_like();
    for v in a.iter().chain(b.iter()) {
        out.insert(v.clone());
    }
    out
}

/// Values of `a` that are also in `b` (`a ∩ b`), taken from `a`.
pub fn intersection<V, S>(a: &ProbeSet<V, S>, b: &ProbeSet<V, S>) -> ProbeSet<V, S>
where
    V: Clone,
    S: SetStrategy<V> + Clone,
{
    let mut out = a.empty_like();
    for v in a.iter().filter(|v| b.contains(v)) {
        out.insert(v.clone());
    }
    out
}

/// Values of `a` not in `b` (`a \ b`).
pub fn difference<V, S>(a: &ProbeSet<V, S>, b: &ProbeSet<V, S>) -> ProbeSet<V, S>
where
    V: Clone,
    S: SetStrategy<V> + Clone,
{
    let mut out = a.empty_like();
    for v in a.iter().filter(|v| !b.contains(v)) {
        out.insert(v.clone());
    }
    out
}

impl<V, S> ProbeSet<V, S>
where
    S: SetStrategy<V>,
{
    pub fn is_subset(&self, other: &Self) -> bool {
        is_subset(self, other)
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        is_subset(other, self)
    }
}

impl<V, S> ProbeSet<V, S>
where
    V: Clone,
    S: SetStrategy<V> + Clone,
{
    pub fn union(&self, other: &Self) -> Self {
        union(self, other)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        intersection(self, other)
    }

    /// `self \ other`.
    pub fn difference(&self, other: &Self) -> Self {
        difference(self, other)
    }
}

impl<V, S> PartialEq for ProbeSet<V, S>
where
    S: SetStrategy<V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && is_subset(self, other)
    }
}

impl<V, S> Eq for ProbeSet<V, S> where S: SetStrategy<V> {}
