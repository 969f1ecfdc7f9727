//! Error types of the crate.
//!
//! Fallible operations come in pairs: a `try_xxx` version returning a
//! `Result`, and a convenience `xxx` version which panics on `Err`.
//! Caller misuse (erasing from an empty set, stepping a stale or foreign
//! cursor) is a precondition violation and panics in the convenience
//! version.

/// Failure of a set operation.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetError {
    /// The requested number of buckets cannot be represented.
    #[error("bucket count overflows the address space")]
    CapacityOverflow,
    /// The allocator could not provide the bucket array.
    #[error("failed to allocate {buckets} buckets")]
    AllocFailed { buckets: usize },
    /// A cursor was used after the set it points into was mutated.
    #[error("cursor from generation {found} used on set at generation {expected}")]
    StaleCursor { expected: u64, found: u64 },
    /// A cursor was used on a set other than the one that produced it.
    #[error("cursor belongs to another set")]
    ForeignCursor,
}

/// Invalid `ResizePolicy` parameters.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq)]
pub enum PolicyError {
    #[error("grow threshold {0} must lie in (0, 1)")]
    GrowOutOfRange(f64),
    #[error("shrink threshold {0} must lie in (0, 1)")]
    ShrinkOutOfRange(f64),
    #[error("shrink threshold {shrink_at} must be below half the grow threshold {grow_at}")]
    BandTooNarrow { grow_at: f64, shrink_at: f64 },
    #[error("minimum capacity must be at least 1")]
    ZeroMinimum,
}

pub type Result<T> = core::result::Result<T, SetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_generations() {
        let e = SetError::StaleCursor {
            expected: 3,
            found: 1,
        };
        assert_eq!(
            "cursor from generation 1 used on set at generation 3",
            e.to_string()
        );
    }

    #[test]
    fn policy_error_display() {
        let e = PolicyError::BandTooNarrow {
            grow_at: 0.5,
            shrink_at: 0.3,
        };
        assert!(e.to_string().contains("0.3"));
    }
}
