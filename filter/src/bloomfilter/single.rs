use crate::hasher::{index, Hasher, Xx64};
use core::{fmt, num::NonZeroUsize};
use stagebloom_utils::BitMap;
use tracing::{debug, trace};

/// A bloom filter using a single hash function.
///
/// The hasher defaults to [Xx64].
///
/// ```
/// use stagebloom_filter::{BloomFilter, Xx64};
/// use stagebloom_utils::NZUsize;
///
/// let mut filter = BloomFilter::new(NZUsize!(100), Xx64::default());
/// filter.insert(b"hello");
/// assert!(filter.contains(b"hello"));
/// assert!(!filter.contains(b"foo"));
/// ```
#[derive(Clone)]
pub struct BloomFilter<H: Hasher = Xx64> {
    mask: BitMap,
    size: NonZeroUsize,
    hasher: H,
}

impl<H: Hasher> BloomFilter<H> {
    /// Creates an empty filter of `bits` bits that positions items with `hasher`.
    pub fn new(bits: NonZeroUsize, hasher: H) -> Self {
        debug!(bits = bits.get(), "created bloom filter");
        Self {
            mask: BitMap::new(bits.get()),
            size: bits,
            hasher,
        }
    }

    /// Returns the bit position of `item`.
    fn index(&self, item: &[u8]) -> usize {
        index(self.hasher.hash(item), self.size)
    }

    /// Inserts an item into the [BloomFilter].
    pub fn insert(&mut self, item: &[u8]) {
        let index = self.index(item);
        trace!(index, "inserting item");
        self.mask.prepare();
        self.mask.set(index);
        self.mask.commit();
    }

    /// Checks if an item is possibly in the [BloomFilter].
    ///
    /// Returns `true` if the item is probably in the set, and `false` if it is definitely not.
    pub fn contains(&self, item: &[u8]) -> bool {
        self.mask.get(self.index(item))
    }

    /// Returns the number of bits in the filter.
    pub fn len(&self) -> usize {
        self.size.get()
    }

    /// Always `false`: a filter holds at least one bit.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the underlying bitmap.
    pub fn bits(&self) -> &BitMap {
        &self.mask
    }

    /// Returns the hash function.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Estimates the current false positive probability (the fraction of bits set).
    pub fn estimated_false_positive_rate(&self) -> f64 {
        super::estimated_false_positive_rate(&self.mask, 1)
    }

    /// Estimates the number of distinct items that have been inserted.
    pub fn estimated_count(&self) -> f64 {
        super::estimated_count(&self.mask, 1)
    }
}

impl<H: Hasher> fmt::Debug for BloomFilter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("bits", &self.size)
            .field("set", &self.mask.count_set_bits())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Fnv1a;
    use stagebloom_macros::test_traced;
    use stagebloom_utils::NZUsize;

    fn constant(_: &[u8]) -> u64 {
        42
    }

    #[test_traced]
    fn test_insert_and_contains() {
        let mut bf = BloomFilter::new(NZUsize!(100), Xx64::default());
        bf.insert(b"hello");
        bf.insert(b"world");

        assert!(bf.contains(b"hello"));
        assert!(bf.contains(b"world"));
        assert!(!bf.contains(b"foo"));
        assert_eq!(bf.len(), 100);
        assert!(!bf.is_empty());

        // One bit per item
        assert_eq!(bf.bits().iter_ones().collect::<Vec<_>>(), vec![59, 71]);
    }

    #[test]
    fn test_power_of_two() {
        let mut bf = BloomFilter::new(NZUsize!(128), Fnv1a::default());
        bf.insert(b"hello");
        bf.insert(b"world");

        assert!(bf.contains(b"hello"));
        assert!(bf.contains(b"world"));
        assert!(!bf.contains(b"foo"));
        assert_eq!(bf.bits().iter_ones().collect::<Vec<_>>(), vec![11, 115]);
    }

    #[test]
    fn test_empty() {
        let bf = BloomFilter::new(NZUsize!(100), Xx64::default());
        assert!(!bf.contains(b"anything"));
        assert!(!bf.contains(b""));
        assert_eq!(bf.estimated_count(), 0.0);
        assert_eq!(bf.estimated_false_positive_rate(), 0.0);
    }

    #[test]
    fn test_single_bit() {
        let mut bf = BloomFilter::new(NZUsize!(1), Xx64::default());
        assert!(!bf.contains(b"a"));
        bf.insert(b"a");

        // Every item maps to the only bit
        assert!(bf.contains(b"a"));
        assert!(bf.contains(b"b"));
        assert_eq!(bf.estimated_false_positive_rate(), 1.0);
        assert_eq!(bf.estimated_count(), f64::INFINITY);
    }

    #[test]
    fn test_insert_preserves_previous() {
        let mut bf = BloomFilter::new(NZUsize!(1000), Xx64::default());
        for i in 0..200usize {
            bf.insert(&i.to_be_bytes());
            for j in 0..=i {
                assert!(bf.contains(&j.to_be_bytes()));
            }
        }
        assert!(!bf.bits().is_dirty());
    }

    #[test]
    fn test_custom_hasher() {
        let mut bf = BloomFilter::new(NZUsize!(10), constant);
        bf.insert(b"x");
        assert_eq!(bf.bits().iter_ones().collect::<Vec<_>>(), vec![2]);
        assert!(bf.contains(b"anything"));
        assert_eq!(bf.hasher().hash(b""), 42);
    }

    #[test]
    fn test_statistics() {
        let mut bf = BloomFilter::new(NZUsize!(1024), Xx64::default());
        for i in 0..100usize {
            bf.insert(&i.to_be_bytes());
        }

        let set = bf.bits().count_set_bits();
        assert!(set <= 100);
        assert_eq!(bf.estimated_false_positive_rate(), set as f64 / 1024.0);

        let estimated = bf.estimated_count();
        assert!(estimated > 75.0 && estimated < 125.0);
    }

    #[test]
    fn test_debug() {
        let mut bf = BloomFilter::new(NZUsize!(10), constant);
        bf.insert(b"x");
        assert_eq!(format!("{bf:?}"), "BloomFilter { bits: 10, set: 1 }");
    }
}
