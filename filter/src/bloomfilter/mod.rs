//! [Bloom Filters](https://en.wikipedia.org/wiki/Bloom_filter) backed by a staged
//! [BitMap](stagebloom_utils::BitMap).
//!
//! Every hash position is published with its own `prepare(); set(index); commit()` cycle on the
//! underlying bitmap. Readers therefore never observe a half-applied position, and a filter never
//! clears a bit: once [BloomFilter::insert] (or [MultiBloomFilter::insert]) returns, the item
//! is reported by `contains` for the lifetime of the filter. False positives are possible.
//!
//! Neither filter supports removal.

mod multi;
pub use multi::MultiBloomFilter;
mod single;
pub use single::BloomFilter;

use stagebloom_utils::BitMap;

/// Estimates the false positive probability as `f^k`, where `f` is the fraction of bits set and
/// `k` is the number of hash functions.
fn estimated_false_positive_rate(bits: &BitMap, hashers: usize) -> f64 {
    let fill_ratio = bits.count_set_bits() as f64 / bits.len() as f64;
    fill_ratio.powi(hashers as i32)
}

/// Estimates the number of distinct items inserted with `n = -(m/k) * ln(1 - x/m)`, where `m` is
/// the number of bits, `k` the number of hash functions and `x` the number of bits set.
///
/// Returns infinity once every bit is set.
fn estimated_count(bits: &BitMap, hashers: usize) -> f64 {
    let m = bits.len() as f64;
    let x = bits.count_set_bits() as f64;
    let k = hashers as f64;
    if x >= m {
        return f64::INFINITY;
    }
    -(m / k) * (1.0 - x / m).ln()
}
