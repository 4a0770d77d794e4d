use criterion::{criterion_group, BatchSize, Criterion};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use stagebloom_filter::{BloomFilter, MultiBloomFilter, Xx64};
use std::num::NonZeroUsize;

const ITEM_SIZES: [usize; 3] = [32, 2048, 4096];
const NUM_ITEMS: usize = 10000;
const BITS: [usize; 2] = [1 << 16, 100_000];

fn benchmark_insert(c: &mut Criterion) {
    for item_size in ITEM_SIZES {
        // Pre-generate items to insert
        let mut rng = StdRng::seed_from_u64(42);
        let items: Vec<Vec<u8>> = (0..NUM_ITEMS)
            .map(|_| {
                let mut item = vec![0u8; item_size];
                rng.fill_bytes(&mut item);
                item
            })
            .collect();

        for bits in BITS {
            let bits = NonZeroUsize::new(bits).unwrap();
            c.bench_function(
                &format!(
                    "{}/variant=single item_size={item_size} bits={bits}",
                    module_path!()
                ),
                |b| {
                    let mut idx = 0;
                    b.iter_batched(
                        || BloomFilter::new(bits, Xx64::default()),
                        |mut bf| {
                            bf.insert(&items[idx]);
                            idx = (idx + 1) % items.len();
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
            c.bench_function(
                &format!(
                    "{}/variant=multi item_size={item_size} bits={bits}",
                    module_path!()
                ),
                |b| {
                    let mut idx = 0;
                    b.iter_batched(
                        || MultiBloomFilter::with_defaults(bits),
                        |mut bf| {
                            bf.insert(&items[idx]);
                            idx = (idx + 1) % items.len();
                        },
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }
}

criterion_group!(benches, benchmark_insert);
