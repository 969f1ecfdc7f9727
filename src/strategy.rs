//! Hash/equality strategies: the pluggable pair of functions a `ProbeSet`
//! uses to place and compare its values.
//!
//! A strategy must be pure and deterministic for the lifetime of the set it
//! is installed in. Two values that compare equal must hash equally.

use core::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

/// Maps a value to a 64-bit hash and tests two values for equality.
pub trait SetStrategy<V> {
    fn hash(&self, value: &V) -> u64;
    fn equals(&self, a: &V, b: &V) -> bool;
}

const DJB2_SEED: u64 = 5381;

/// Bernstein's djb2 over a byte slice (`h = h * 33 + byte`).
///
/// Zero bytes are hashed like any other byte, so scalars whose
/// representation contains zeros still spread.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(b as u64)
    })
}

/// `Hasher` feeding every written byte through djb2.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = (self.state << 5)
                .wrapping_add(self.state)
                .wrapping_add(b as u64);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

pub type Djb2Builder = BuildHasherDefault<Djb2Hasher>;

/// Strategy for any `Hash + Eq` value: hashes through a `BuildHasher`,
/// compares with `==`.
#[derive(Clone, Debug, Default)]
pub struct HashEq<B = Djb2Builder> {
    build: B,
}

impl<B> HashEq<B> {
    pub fn with_builder(build: B) -> Self {
        Self { build }
    }
}

impl<V, B> SetStrategy<V> for HashEq<B>
where
    V: Hash + Eq,
    B: BuildHasher,
{
    #[inline]
    fn hash(&self, value: &V) -> u64 {
        self.build.hash_one(value)
    }

    #[inline]
    fn equals(&self, a: &V, b: &V) -> bool {
        a == b
    }
}

/// Value hash over the `Hash` representation with djb2.
pub type DefaultStrategy = HashEq<Djb2Builder>;

/// Value hash backed by hashbrown's default (aHash) builder; use it when
/// values may be attacker-chosen.
pub type HardenedStrategy = HashEq<hashbrown::hash_map::DefaultHashBuilder>;

/// Content hash for string-like values: djb2 over exactly the UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrContent;

impl<V> SetStrategy<V> for StrContent
where
    V: AsRef<str>,
{
    #[inline]
    fn hash(&self, value: &V) -> u64 {
        djb2(value.as_ref().as_bytes())
    }

    #[inline]
    fn equals(&self, a: &V, b: &V) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Strategy assembled from a hash function and an equality function.
#[derive(Clone, Copy)]
pub struct FnStrategy<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnStrategy<H, E> {
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<H, E> core::fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnStrategy")
    }
}

impl<V, H, E> SetStrategy<V> for FnStrategy<H, E>
where
    H: Fn(&V) -> u64,
    E: Fn(&V, &V) -> bool,
{
    #[inline]
    fn hash(&self, value: &V) -> u64 {
        (self.hash)(value)
    }

    #[inline]
    fn equals(&self, a: &V, b: &V) -> bool {
        (self.equals)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn djb2_of_empty_is_seed() {
        assert_eq!(DJB2_SEED, djb2(b""));
    }

    #[test]
    fn djb2_known_values() {
        // 5381 * 33 + 'a'
        assert_eq!(177_670, djb2(b"a"));
        assert_eq!(177_670 * 33 + b'b' as u64, djb2(b"ab"));
    }

    #[test]
    fn djb2_distinguishes_zero_bytes() {
        assert_ne!(djb2(&[0]), djb2(&[0, 0]));
    }

    #[test]
    fn hasher_agrees_with_slice_function() {
        let mut h = Djb2Hasher::default();
        h.write(b"hello");
        assert_eq!(djb2(b"hello"), h.finish());
    }

    #[test]
    fn default_strategy_is_deterministic() {
        let s = DefaultStrategy::default();
        assert_eq!(s.hash(&42u32), s.hash(&42u32));
        assert_ne!(s.hash(&1u32), s.hash(&2u32));
        assert!(s.equals(&7u32, &7u32));
        assert!(!s.equals(&7u32, &8u32));
    }

    #[test]
    fn hardened_strategy_is_stable_per_instance() {
        let s = HardenedStrategy::default();
        assert_eq!(s.hash(&"abc"), s.hash(&"abc"));
    }

    #[test]
    fn str_content_ignores_container_type() {
        let s = StrContent;
        let owned = String::from("key");
        assert_eq!(s.hash(&owned), SetStrategy::<&str>::hash(&s, &"key"));
        assert_eq!(djb2(b"key"), s.hash(&owned));
        assert!(s.equals(&owned, &String::from("key")));
    }

    #[test]
    fn fn_strategy_forwards_to_closures() {
        let s = FnStrategy::new(|v: &i32| (*v as u64) % 3, |a: &i32, b: &i32| a == b);
        assert_eq!(1, s.hash(&4));
        assert!(s.equals(&4, &4));
        assert!(!s.equals(&4, &1));
    }
}
