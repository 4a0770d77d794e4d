//! Leverage common functionality across the stagebloom primitives.

pub mod bitmap;
pub use bitmap::BitMap;

/// A macro to create a `NonZeroUsize` from a value, panicking if the value is zero.
///
/// In const contexts a zero value is rejected at compile time.
///
/// ```
/// use stagebloom_utils::NZUsize;
/// use std::num::NonZeroUsize;
///
/// const BITS: NonZeroUsize = NZUsize!(1024);
/// assert_eq!(BITS.get(), 1024);
/// ```
#[macro_export]
macro_rules! NZUsize {
    ($val:expr) => {
        match ::core::num::NonZeroUsize::new($val) {
            Some(value) => value,
            None => panic!("value must be non-zero"),
        }
    };
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    #[test]
    fn test_nz_usize() {
        const BITS: NonZeroUsize = NZUsize!(100);
        assert_eq!(BITS.get(), 100);
        assert_eq!(NZUsize!(1).get(), 1);
    }

    #[test]
    #[should_panic(expected = "value must be non-zero")]
    fn test_nz_usize_zero() {
        let zero = 0;
        NZUsize!(zero);
    }
}
