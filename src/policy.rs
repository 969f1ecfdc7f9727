//! Resize policy: the load-factor band a `ProbeSet` keeps itself in.

use crate::error::PolicyError;

/// Why a resize was requested.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Resize {
    /// Live elements reached the grow threshold: double.
    Grow,
    /// Live elements fell to the shrink threshold: halve until back in the
    /// band or at the minimum.
    Shrink,
    /// Live elements plus tombstones reached the grow threshold: rehash at
    /// the same capacity to drop the tombstones.
    Purge,
}

/// Load-factor thresholds and minimum capacity.
///
/// A set grows (×2) when `elements / capacity >= grow_at`, and shrinks (×½,
/// repeatedly) when `elements / capacity <= shrink_at` while above
/// `min_capacity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizePolicy {
    grow_at: f64,
    shrink_at: f64,
    min_capacity: usize,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            grow_at: 0.75,
            shrink_at: 0.10,
            min_capacity: 8,
        }
    }
}

impl ResizePolicy {
    pub fn new(grow_at: f64, shrink_at: f64, min_capacity: usize) -> Result<Self, PolicyError> {
        if !(grow_at > 0.0 && grow_at < 1.0) {
            return Err(PolicyError::GrowOutOfRange(grow_at));
        }
        if !(shrink_at > 0.0 && shrink_at < 1.0) {
            return Err(PolicyError::ShrinkOutOfRange(shrink_at));
        }
        // Halving must not land at or above `grow_at`, doubling must not land
        // at or below `shrink_at`.
        if shrink_at * 2.0 >= grow_at {
            return Err(PolicyError::BandTooNarrow { grow_at, shrink_at });
        }
        if min_capacity == 0 {
            return Err(PolicyError::ZeroMinimum);
        }
        Ok(Self {
            grow_at,
            shrink_at,
            min_capacity,
        })
    }

    pub fn grow_at(&self) -> f64 {
        self.grow_at
    }

    pub fn shrink_at(&self) -> f64 {
        self.shrink_at
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Smallest capacity reachable from `min_capacity` by doubling that
    /// holds `elements` below the grow threshold.
    pub(crate) fn capacity_for(&self, elements: usize) -> Option<usize> {
        let mut cap = self.min_capacity;
        while ratio(elements, cap) >= self.grow_at {
            cap = cap.checked_mul(2)?;
        }
        Some(cap)
    }

    /// Checked before placing a new value.
    pub(crate) fn before_insert(
        &self,
        elements: usize,
        tombstones: usize,
        capacity: usize,
    ) -> Option<Resize> {
        if ratio(elements, capacity) >= self.grow_at {
            Some(Resize::Grow)
        } else if ratio(elements + tombstones, capacity) >= self.grow_at {
            Some(Resize::Purge)
        } else {
            None
        }
    }

    /// Checked after a value was erased, and after bulk construction.
    pub(crate) fn should_shrink(&self, elements: usize, capacity: usize) -> Option<Resize> {
        if capacity > self.min_capacity && ratio(elements, capacity) <= self.shrink_at {
            Some(Resize::Shrink)
        } else {
            None
        }
    }

    /// Capacity to rehash into. A shrink lands on the largest halving whose
    /// load is above `shrink_at`; since `2 * shrink_at < grow_at` that load is
    /// also below `grow_at`.
    pub(crate) fn target(&self, elements: usize, capacity: usize, resize: Resize) -> Option<usize> {
        match resize {
            Resize::Grow => capacity.checked_mul(2),
            Resize::Shrink => {
                let mut to = capacity;
                while to > self.min_capacity && ratio(elements, to) <= self.shrink_at {
                    to = (to / 2).max(self.min_capacity);
                }
                Some(to)
            }
            Resize::Purge => Some(capacity),
        }
    }
}

#[inline]
fn ratio(elements: usize, capacity: usize) -> f64 {
    elements as f64 / capacity as f64
}
