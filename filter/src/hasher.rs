//! Hash strategies mapping items to bit indices.
//!
//! A [Hasher] maps an arbitrary byte sequence to a `u64`. Filters reduce that value to a bit
//! index with [index]. None of the provided strategies are cryptographically secure: an
//! adversary choosing inputs can force collisions.

use core::{hash::Hasher as _, num::NonZeroUsize};
use twox_hash::XxHash64;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A pure function from bytes to an unsigned integer.
///
/// Implemented for any `Fn(&[u8]) -> u64`, so plain functions and closures can be used as
/// strategies:
///
/// ```
/// use stagebloom_filter::{BloomFilter, Hasher};
/// use stagebloom_utils::NZUsize;
///
/// fn first_byte(item: &[u8]) -> u64 {
///     item.first().copied().unwrap_or_default() as u64
/// }
///
/// assert_eq!(first_byte.hash(b"abc"), 97);
///
/// let mut filter = BloomFilter::new(NZUsize!(256), first_byte);
/// filter.insert(b"abc");
/// assert!(filter.contains(b"axe"));
/// ```
pub trait Hasher {
    /// Hash `item`.
    ///
    /// Must be deterministic: the same `item` always yields the same value.
    fn hash(&self, item: &[u8]) -> u64;
}

impl<F: Fn(&[u8]) -> u64> Hasher for F {
    fn hash(&self, item: &[u8]) -> u64 {
        self(item)
    }
}

/// Seeded 64-bit [xxHash](https://xxhash.com).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xx64 {
    seed: u64,
}

impl Xx64 {
    /// Creates a hasher with the given seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Hasher for Xx64 {
    fn hash(&self, item: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(item);
        hasher.finish()
    }
}

/// Seeded 64-bit [FNV-1a](https://en.wikipedia.org/wiki/Fowler%E2%80%93Noll%E2%80%93Vo_hash_function).
///
/// The seed is mixed into the offset basis, so a seed of 0 is plain FNV-1a.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fnv1a {
    seed: u64,
}

impl Fnv1a {
    /// Creates a hasher with the given seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Returns the seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl Hasher for Fnv1a {
    fn hash(&self, item: &[u8]) -> u64 {
        let mut hash = FNV_OFFSET_BASIS ^ self.seed;
        for &byte in item {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

/// Returns the default ordered pair of hash functions: [Xx64] then [Fnv1a], both unseeded.
pub fn default_hashers() -> Vec<Box<dyn Hasher>> {
    vec![Box::new(Xx64::default()), Box::new(Fnv1a::default())]
}

/// Reduces `hash` to a bit index in `[0, bits)`.
///
/// Equivalent to `hash % bits`. When `bits` is a power of two the cheaper `hash & (bits - 1)` is
/// used instead.
#[inline]
pub fn index(hash: u64, bits: NonZeroUsize) -> usize {
    let bits = bits.get() as u64;
    if bits.is_power_of_two() {
        (hash & (bits - 1)) as usize
    } else {
        (hash % bits) as usize
    }
}
