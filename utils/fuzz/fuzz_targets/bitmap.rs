#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stagebloom_utils::BitMap;

const MAX_SIZE: usize = 4096;

#[derive(Arbitrary, Debug)]
enum Operation {
    Prepare,
    Commit,
    Abort,
    Set(usize),
    Clear(usize),
    SetRange(usize, usize),
    ClearRange(usize, usize),
    SetAll,
    ClearAll,
    And(Vec<bool>),
    Or(Vec<bool>),
    Xor(Vec<bool>),
    Not(Vec<bool>),
    AndNot(Vec<bool>),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    size: u16,
    ops: Vec<Operation>,
}

/// Reference model: two plain vectors of bits.
struct Model {
    committed: Vec<bool>,
    staged: Vec<bool>,
}

impl Model {
    fn range(&mut self, start: usize, end: usize, value: bool) {
        if start <= end && end < self.staged.len() {
            self.staged[start..=end].fill(value);
        }
    }

    fn binary_op(&mut self, other: &[bool], op: fn(bool, bool) -> bool) {
        if other.len() != self.committed.len() {
            return;
        }
        for (a, &b) in self.committed.iter_mut().zip(other) {
            *a = op(*a, b);
        }
    }
}

fn bitmap_from(bools: &[bool]) -> BitMap {
    let mut bitmap = BitMap::new(bools.len());
    bitmap.apply(|staged| {
        for (i, &b) in bools.iter().enumerate() {
            if b {
                staged.set(i);
            }
        }
    });
    bitmap
}

fn fuzz(input: FuzzInput) {
    let size = input.size as usize % (MAX_SIZE + 1);
    let mut bitmap = BitMap::new(size);
    let mut model = Model {
        committed: vec![false; size],
        staged: vec![false; size],
    };

    for op in input.ops {
        match op {
            Operation::Prepare => {
                bitmap.prepare();
                model.staged.clone_from(&model.committed);
            }
            Operation::Commit => {
                bitmap.commit();
                model.committed.clone_from(&model.staged);
                model.staged.fill(false);
            }
            Operation::Abort => {
                bitmap.abort();
                model.staged.fill(false);
            }
            Operation::Set(index) => {
                bitmap.set(index);
                if let Some(bit) = model.staged.get_mut(index) {
                    *bit = true;
                }
            }
            Operation::Clear(index) => {
                bitmap.clear(index);
                if let Some(bit) = model.staged.get_mut(index) {
                    *bit = false;
                }
            }
            Operation::SetRange(start, end) => {
                bitmap.set_range(start, end);
                model.range(start, end, true);
            }
            Operation::ClearRange(start, end) => {
                bitmap.clear_range(start, end);
                model.range(start, end, false);
            }
            Operation::SetAll => {
                bitmap.set_all();
                model.staged.fill(true);
            }
            Operation::ClearAll => {
                bitmap.clear_all();
                model.staged.fill(false);
            }
            Operation::And(bools) => {
                bitmap.set_and(&bitmap_from(&bools));
                model.binary_op(&bools, |a, b| a && b);
            }
            Operation::Or(bools) => {
                bitmap.set_or(&bitmap_from(&bools));
                model.binary_op(&bools, |a, b| a || b);
            }
            Operation::Xor(bools) => {
                bitmap.set_xor(&bitmap_from(&bools));
                model.binary_op(&bools, |a, b| a ^ b);
            }
            Operation::Not(bools) => {
                bitmap.set_not(&bitmap_from(&bools));
                model.binary_op(&bools, |_, b| !b);
            }
            Operation::AndNot(bools) => {
                bitmap.set_and_not(&bitmap_from(&bools));
                model.binary_op(&bools, |a, b| a && !b);
            }
        }

        // Compare against the model
        assert_eq!(bitmap.len(), size);
        for i in 0..size {
            assert_eq!(bitmap.get(i), model.committed[i], "committed bit {i}");
            assert_eq!(bitmap.staged_get(i), model.staged[i], "staged bit {i}");
        }
        assert!(!bitmap.get(size));
        let ones = model.committed.iter().filter(|&&b| b).count();
        assert_eq!(bitmap.count_set_bits(), ones);
        assert_eq!(bitmap.count_clear_bits(), size - ones);
        assert_eq!(bitmap.is_dirty(), model.staged.iter().any(|&b| b));
        assert_eq!(bitmap.iter_ones().count(), ones);
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
