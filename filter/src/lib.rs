//! Approximate set membership on top of a staged bitmap.
//!
//! # Overview
//!
//! Two [Bloom Filter](https://en.wikipedia.org/wiki/Bloom_filter) variants are provided, both
//! backed by a single [stagebloom_utils::BitMap]:
//!
//! - [BloomFilter]: one hash function.
//! - [MultiBloomFilter]: an ordered list of hash functions fixed at construction.
//!
//! Hash functions are swappable strategy values implementing [Hasher]. Any
//! `Fn(&[u8]) -> u64` qualifies, and [Xx64] and [Fnv1a] are provided as seeded,
//! non-cryptographic defaults.
//!
//! # Example
//!
//! ```
//! use stagebloom_filter::MultiBloomFilter;
//! use stagebloom_utils::NZUsize;
//!
//! let mut filter = MultiBloomFilter::with_defaults(NZUsize!(100));
//! filter.insert(b"hello");
//! filter.insert(b"world");
//!
//! assert!(filter.contains(b"hello"));
//! assert!(filter.contains(b"world"));
//! assert!(!filter.contains(b"foo"));
//! assert_eq!(filter.len(), 100);
//! assert_eq!(filter.hashers(), 2);
//! ```

pub mod bloomfilter;
pub use bloomfilter::{BloomFilter, MultiBloomFilter};
mod error;
pub use error::Error;
pub mod hasher;
pub use hasher::{default_hashers, Fnv1a, Hasher, Xx64};
