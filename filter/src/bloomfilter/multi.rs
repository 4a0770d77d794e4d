use crate::{
    hasher::{default_hashers, index, Hasher},
    Error,
};
use core::{fmt, num::NonZeroUsize};
use stagebloom_utils::BitMap;
use tracing::{debug, trace, warn};

/// A bloom filter using an ordered list of hash functions.
///
/// Each hash function contributes one bit position per item. [MultiBloomFilter::insert]
/// publishes the positions one at a time, in order, and [MultiBloomFilter::contains] stops at
/// the first position that is not set.
///
/// The list is fixed at construction and must not be empty. A single hash function is accepted
/// but [BloomFilter](crate::BloomFilter) is the better fit for that case.
pub struct MultiBloomFilter {
    mask: BitMap,
    size: NonZeroUsize,
    hashers: Box<[Box<dyn Hasher>]>,
}

impl MultiBloomFilter {
    /// Creates an empty filter of `bits` bits that positions items with each of `hashers`.
    ///
    /// Returns [Error::NoHashers] if `hashers` is empty.
    pub fn new(bits: NonZeroUsize, hashers: Vec<Box<dyn Hasher>>) -> Result<Self, Error> {
        match hashers.len() {
            0 => return Err(Error::NoHashers),
            1 => warn!("multi-hash bloom filter created with a single hash function"),
            _ => {}
        }
        Ok(Self::build(bits, hashers))
    }

    /// Creates an empty filter of `bits` bits using [default_hashers].
    pub fn with_defaults(bits: NonZeroUsize) -> Self {
        Self::build(bits, default_hashers())
    }

    fn build(bits: NonZeroUsize, hashers: Vec<Box<dyn Hasher>>) -> Self {
        debug!(
            bits = bits.get(),
            hashers = hashers.len(),
            "created multi-hash bloom filter"
        );
        Self {
            mask: BitMap::new(bits.get()),
            size: bits,
            hashers: hashers.into_boxed_slice(),
        }
    }

    /// Inserts an item into the [MultiBloomFilter].
    pub fn insert(&mut self, item: &[u8]) {
        for hasher in self.hashers.iter() {
            let index = index(hasher.hash(item), self.size);
            trace!(index, "inserting item");
            self.mask.prepare();
            self.mask.set(index);
            self.mask.commit();
        }
    }

    /// Checks if an item is possibly in the [MultiBloomFilter].
    ///
    /// Returns `true` if the item is probably in the set, and `false` if it is definitely not.
    pub fn contains(&self, item: &[u8]) -> bool {
        self.hashers
            .iter()
            .all(|hasher| self.mask.get(index(hasher.hash(item), self.size)))
    }

    /// Returns the number of bits in the filter.
    pub fn len(&self) -> usize {
        self.size.get()
    }

    /// Always `false`: a filter holds at least one bit.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the number of hash functions.
    pub fn hashers(&self) -> usize {
        self.hashers.len()
    }

    /// Returns the underlying bitmap.
    pub fn bits(&self) -> &BitMap {
        &self.mask
    }

    /// Estimates the current false positive probability.
    ///
    /// This approximates the false positive rate as `f^k` where `f` is the fill ratio
    /// (proportion of bits set to 1) and `k` is the number of hash functions.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        super::estimated_false_positive_rate(&self.mask, self.hashers.len())
    }

    /// Estimates the number of distinct items that have been inserted.
    pub fn estimated_count(&self) -> f64 {
        super::estimated_count(&self.mask, self.hashers.len())
    }
}

impl fmt::Debug for MultiBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiBloomFilter")
            .field("bits", &self.size)
            .field("hashers", &self.hashers.len())
            .field("set", &self.mask.count_set_bits())
            .finish()
    }
}
