//! A fixed-capacity bitmap with staged (prepare/commit) writes.
//!
//! The bitmap owns two equally sized buffers of [u8] blocks:
//!
//! - `committed`: the state observed by every reader ([BitMap::get], [BitMap::count_set_bits],
//!   [BitMap::iter_ones], ...).
//! - `staged`: pending mutations, written by [BitMap::set], [BitMap::clear] and friends.
//!
//! Writes only become visible once [BitMap::commit] copies `staged` over `committed` (and then
//! zeroes `staged`). Because `staged` is zeroed by every commit, a new batch of writes that must
//! preserve the committed state has to start with [BitMap::prepare], which seeds `staged` from
//! `committed`. Skipping it means the next commit publishes whatever `staged` holds, which is
//! usually all zeroes.
//!
//! If the length of the bitmap is not a multiple of 8, the last block contains bits that are not
//! part of the bitmap. An invariant of the implementation is that these bits are always 0, in both
//! buffers.
//!
//! Out-of-range indices are never an error: writes are ignored and reads return `false`.
//!
//! # Examples
//!
//! ## Staged writes
//!
//! ```
//! use stagebloom_utils::bitmap::BitMap;
//!
//! let mut bitmap = BitMap::new(16);
//! bitmap.prepare();
//! bitmap.set(3);
//!
//! // Not visible until committed
//! assert!(!bitmap.get(3));
//! assert!(bitmap.is_dirty());
//!
//! bitmap.commit();
//! assert!(bitmap.get(3));
//! assert!(!bitmap.is_dirty());
//! ```
//!
//! ## Forgetting to prepare
//!
//! ```
//! use stagebloom_utils::bitmap::BitMap;
//!
//! let mut bitmap = BitMap::new(16);
//! bitmap.apply(|staged| staged.set(1));
//! assert!(bitmap.get(1));
//!
//! // `staged` was zeroed by the last commit, so bit 1 is lost
//! bitmap.set(2);
//! bitmap.commit();
//! assert!(!bitmap.get(1));
//! assert!(bitmap.get(2));
//! ```
//!
//! # Bitwise Algebra
//!
//! [BitMap::set_and], [BitMap::set_or], [BitMap::set_xor], [BitMap::set_not] and
//! [BitMap::set_and_not] operate on the committed buffers of both bitmaps and write the result
//! straight into `self`'s committed buffer. They are visible immediately and do not touch the
//! staged buffer. Bitmaps of different lengths are left unchanged.
//!
//! # Concurrency
//!
//! The bitmap has no internal synchronization. A `prepare() .. commit()` sequence is a single
//! logical transaction and must not interleave with another one on the same instance.

use core::{
    fmt::{self, Formatter, Write as _},
    iter::FusedIterator,
};

/// Type alias for the underlying block type.
type Block = u8;

/// Number of bits in a [Block].
const BITS_PER_BLOCK: usize = Block::BITS as usize;

/// Empty block of bits (all bits set to 0).
const EMPTY_BLOCK: Block = 0;

/// Full block of bits (all bits set to 1).
const FULL_BLOCK: Block = Block::MAX;

/// A fixed-capacity bitmap whose writes are staged until committed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitMap {
    /// Bits visible to readers. Reflects exactly the last [BitMap::commit].
    committed: Vec<Block>,

    /// Pending mutations, published by the next [BitMap::commit].
    staged: Vec<Block>,

    /// The total number of bits.
    num_bits: usize,
}

impl BitMap {
    /// Creates a new bitmap holding `size` bits, all committed and staged bits set to 0.
    ///
    /// A `size` of 0 yields an empty bitmap for which every read returns `false`.
    #[inline]
    pub fn new(size: usize) -> Self {
        let num_blocks = Self::num_blocks(size);
        Self {
            committed: vec![EMPTY_BLOCK; num_blocks],
            staged: vec![EMPTY_BLOCK; num_blocks],
            num_bits: size,
        }
    }

    /// Returns the number of bits in the bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// Returns true if the bitmap holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Returns the number of bytes backing each buffer (`ceil(len / 8)`).
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.committed.len()
    }

    /// Returns the committed buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.committed
    }

    // ---------- Stage/Commit ----------

    /// Seeds the staged buffer from the committed buffer.
    ///
    /// Any uncommitted staged writes are discarded. Call this before a batch of writes that
    /// should preserve the committed state.
    #[inline]
    pub fn prepare(&mut self) {
        self.staged.copy_from_slice(&self.committed);
    }

    /// Publishes the staged buffer and then zeroes it.
    ///
    /// After this call every read observes the staged state, as a single step.
    #[inline]
    pub fn commit(&mut self) {
        self.committed.copy_from_slice(&self.staged);
        self.staged.fill(EMPTY_BLOCK);
    }

    /// Zeroes the staged buffer without publishing it.
    #[inline]
    pub fn abort(&mut self) {
        self.staged.fill(EMPTY_BLOCK);
    }

    /// Runs `f` as a single batch: [BitMap::prepare], `f`, then [BitMap::commit].
    ///
    /// ```
    /// use stagebloom_utils::bitmap::BitMap;
    ///
    /// let mut bitmap = BitMap::new(8);
    /// bitmap.apply(|staged| {
    ///     staged.set(0);
    ///     staged.set(7);
    /// });
    /// bitmap.apply(|staged| staged.clear(0));
    /// assert!(!bitmap.get(0));
    /// assert!(bitmap.get(7));
    /// ```
    pub fn apply<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.prepare();
        f(self);
        self.commit();
    }

    /// Returns true if any bit of the staged buffer is 1.
    ///
    /// This reports pending 1-bits, not a difference from the committed buffer: a staged
    /// [BitMap::clear] leaves a 0, which cannot be told apart from an untouched bit, and a
    /// [BitMap::prepare] over a non-empty bitmap makes the bitmap dirty without any write.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.staged.iter().any(|&block| block != EMPTY_BLOCK)
    }

    // ---------- Staged Writes ----------

    /// Stages the bit at `index` to 1. Ignored if `index >= len()`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        if index >= self.num_bits {
            return;
        }
        let (block, mask) = Self::locate(index);
        self.staged[block] |= mask;
    }

    /// Stages the bit at `index` to 0. Ignored if `index >= len()`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        if index >= self.num_bits {
            return;
        }
        let (block, mask) = Self::locate(index);
        self.staged[block] &= !mask;
    }

    /// Stages every bit in `[start, end]` (inclusive) to 1.
    ///
    /// The whole range is ignored if `start > end` or `end >= len()`.
    pub fn set_range(&mut self, start: usize, end: usize) {
        if !self.is_valid_range(start, end) {
            return;
        }
        for index in start..=end {
            self.set(index);
        }
    }

    /// Stages every bit in `[start, end]` (inclusive) to 0.
    ///
    /// The whole range is ignored if `start > end` or `end >= len()`.
    pub fn clear_range(&mut self, start: usize, end: usize) {
        if !self.is_valid_range(start, end) {
            return;
        }
        for index in start..=end {
            self.clear(index);
        }
    }

    /// Stages every bit to 1.
    #[inline]
    pub fn set_all(&mut self) {
        self.staged.fill(FULL_BLOCK);
        Self::clear_trailing_bits(&mut self.staged, self.num_bits);
    }

    /// Stages every bit to 0.
    #[inline]
    pub fn clear_all(&mut self) {
        self.staged.fill(EMPTY_BLOCK);
    }

    // ---------- Reads ----------

    /// Returns the committed value of the bit at `index` (`false` if `index >= len()`).
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.num_bits {
            return false;
        }
        let (block, mask) = Self::locate(index);
        self.committed[block] & mask != 0
    }

    /// Returns the staged value of the bit at `index` (`false` if `index >= len()`).
    #[inline]
    pub fn staged_get(&self, index: usize) -> bool {
        if index >= self.num_bits {
            return false;
        }
        let (block, mask) = Self::locate(index);
        self.staged[block] & mask != 0
    }

    /// Returns the number of committed bits set to 1.
    #[inline]
    pub fn count_set_bits(&self) -> usize {
        self.committed
            .iter()
            .map(|block| block.count_ones() as usize)
            .sum()
    }

    /// Returns the number of committed bits set to 0.
    #[inline]
    pub fn count_clear_bits(&self) -> usize {
        self.num_bits - self.count_set_bits()
    }

    /// Creates an iterator over the committed bits.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bitmap: self,
            pos: 0,
        }
    }

    /// Creates an iterator over the indices of committed bits set to 1, in ascending order.
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes {
            blocks: &self.committed,
            block: 0,
            current: self.committed.first().copied().unwrap_or(EMPTY_BLOCK),
        }
    }

    // ---------- Bitwise Algebra ----------

    /// Committed bits become `self & other`.
    pub fn set_and(&mut self, other: &BitMap) {
        self.binary_op(other, |a, b| a & b);
    }

    /// Committed bits become `self | other`.
    pub fn set_or(&mut self, other: &BitMap) {
        self.binary_op(other, |a, b| a | b);
    }

    /// Committed bits become `self ^ other`.
    pub fn set_xor(&mut self, other: &BitMap) {
        self.binary_op(other, |a, b| a ^ b);
    }

    /// Committed bits become `!other`.
    pub fn set_not(&mut self, other: &BitMap) {
        self.binary_op(other, |_, b| !b);
    }

    /// Committed bits become `self & !other`.
    pub fn set_and_not(&mut self, other: &BitMap) {
        self.binary_op(other, |a, b| a & !b);
    }

    // ---------- Helper Functions ----------

    /// Calculates the number of blocks needed to store `num_bits`.
    #[inline(always)]
    fn num_blocks(num_bits: usize) -> usize {
        num_bits.div_ceil(BITS_PER_BLOCK)
    }

    /// Returns the block holding `index` and the mask selecting it within that block.
    #[inline(always)]
    fn locate(index: usize) -> (usize, Block) {
        (index / BITS_PER_BLOCK, 1 << (index % BITS_PER_BLOCK))
    }

    #[inline(always)]
    fn is_valid_range(&self, start: usize, end: usize) -> bool {
        start <= end && end < self.num_bits
    }

    /// Applies `op` block-by-block to the committed buffers. Skipped if the lengths differ.
    #[inline]
    fn binary_op<F: Fn(Block, Block) -> Block>(&mut self, other: &BitMap, op: F) {
        if self.num_bits != other.num_bits {
            return;
        }
        for (a, b) in self.committed.iter_mut().zip(other.committed.iter()) {
            *a = op(*a, *b);
        }
        Self::clear_trailing_bits(&mut self.committed, self.num_bits);
    }

    /// Clears any bits in `blocks` beyond the last valid bit.
    #[inline]
    fn clear_trailing_bits(blocks: &mut [Block], num_bits: usize) {
        let used = num_bits % BITS_PER_BLOCK;
        if used == 0 {
            return;
        }
        if let Some(last) = blocks.last_mut() {
            *last &= FULL_BLOCK >> (BITS_PER_BLOCK - used);
        }
    }
}

// ---------- Debug ----------

/// Renders a buffer as a string of `0`/`1`, eliding the middle of large buffers.
struct Bits<'a> {
    blocks: &'a [Block],
    num_bits: usize,
}

impl Bits<'_> {
    fn bit(&self, index: usize) -> char {
        let (block, mask) = BitMap::locate(index);
        if self.blocks[block] & mask != 0 {
            '1'
        } else {
            '0'
        }
    }
}

impl fmt::Debug for Bits<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // For very large bitmaps, only show a preview
        const MAX_DISPLAY: usize = 64;
        const HALF_DISPLAY: usize = MAX_DISPLAY / 2;

        if self.num_bits <= MAX_DISPLAY {
            for i in 0..self.num_bits {
                f.write_char(self.bit(i))?;
            }
            return Ok(());
        }
        for i in 0..HALF_DISPLAY {
            f.write_char(self.bit(i))?;
        }
        f.write_str("...")?;
        for i in (self.num_bits - HALF_DISPLAY)..self.num_bits {
            f.write_char(self.bit(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitMap")
            .field("len", &self.num_bits)
            .field(
                "committed",
                &Bits {
                    blocks: &self.committed,
                    num_bits: self.num_bits,
                },
            )
            .field(
                "staged",
                &Bits {
                    blocks: &self.staged,
                    num_bits: self.num_bits,
                },
            )
            .finish()
    }
}

// ---------- Iterators ----------

/// Iterator over the committed bits of a [BitMap].
pub struct Iter<'a> {
    /// Reference to the BitMap being iterated over
    bitmap: &'a BitMap,

    /// Current position in the BitMap (0-indexed)
    pos: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.bitmap.len() {
            return None;
        }
        let bit = self.bitmap.get(self.pos);
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bitmap.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

/// Iterator over the indices of committed bits set to 1.
pub struct IterOnes<'a> {
    blocks: &'a [Block],

    /// Index of the block `current` was loaded from.
    block: usize,

    /// Bits of the current block not yet yielded.
    current: Block,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != EMPTY_BLOCK {
                let offset = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.block * BITS_PER_BLOCK + offset);
            }
            self.block += 1;
            self.current = *self.blocks.get(self.block)?;
        }
    }
}

impl FusedIterator for IterOnes<'_> {}
