//! probeset: an open-addressing hash set with linear probing, tombstone
//! deletion, load-factor-driven resizing and a small set-algebra layer.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one generic set type whose hashing and equality are pluggable,
//!   with every piece small enough to reason about on its own.
//! - Layers (leaves first):
//!   - `strategy`: the `SetStrategy` trait (hash + equals) and the stock
//!     strategies: djb2 value hash, aHash via hashbrown, string content,
//!     closure pairs.
//!   - `bucket`: the slot array (`Empty | Occupied | Tombstone`).
//!   - `probe`: the linear probe walk and tombstone compaction.
//!   - `policy`: `ResizePolicy`, the load-factor band and minimum capacity.
//!   - `ProbeSet`: insert/erase/contains/clear on top of the three above.
//!   - `cursor`: borrowing `Iter` and `Cursor`s stamped with their set's
//!     identity and generation.
//!   - `algebra`: union, intersection, difference, subset.
//!
//! Constraints
//! - Single-threaded: no internal synchronization. A set may be moved to
//!   another thread and shared behind a lock, but is not `Sync` itself.
//! - Storage is allocated lazily on the first insert and released by
//!   `clear`.
//! - Each bucket stores the value's hash; rehashing never calls the
//!   strategy.
//! - Load factor stays within `(shrink_at, grow_at]` after every mutation,
//!   except at minimum capacity and in a `with_capacity` reservation not yet
//!   erased from. A shrink halves as often as needed to get back in band.
//!
//! Lookups and mutation
//! - `contains`/`get` take `&self` and never mutate. Tombstone compaction
//!   (moving a found value back over the first tombstone on its probe path)
//!   happens on the mutating paths only: re-inserting a present value and
//!   removing one.
//! - Inserting an equal value overwrites the stored one and keeps `len`.
//! - `erase` on an empty set panics; `remove`/`take` are the non-panicking
//!   forms.
//!
//! Failure model
//! - Allocation failure is surfaced by `try_insert`/`try_replace`;
//!   `insert`/`replace` panic on it. A shrink whose allocation fails is
//!   skipped.
//! - A probe walk that finds no vacancy means the resize contract was
//!   broken and panics.
//! - Stale cursors, and cursors from another set, are reported by
//!   `try_next`/`try_value_at` and panic in `next`/`value_at`.
//!
//! Reentrancy
//! - Every operation that runs strategy code marks the set busy; a
//!   strategy calling back into the set it belongs to panics in debug
//!   builds.

pub mod algebra;
mod bucket;
pub mod cursor;
pub mod error;
pub mod policy;
mod probe;
mod probe_set;
mod probe_set_proptest;
mod reentrancy;
pub mod strategy;

// Public surface
pub use cursor::{Cursor, IntoIter, Iter};
pub use error::{PolicyError, SetError};
pub use policy::ResizePolicy;
pub use probe_set::ProbeSet;
pub use strategy::{
    DefaultStrategy, Djb2Builder, Djb2Hasher, FnStrategy, HardenedStrategy, HashEq, SetStrategy,
    StrContent,
};
