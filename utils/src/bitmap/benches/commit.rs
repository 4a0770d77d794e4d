use criterion::{criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use stagebloom_utils::BitMap;
use std::hint::black_box;

/// Number of bits staged per batch.
const BATCH: usize = 64;

fn bench_commit(c: &mut Criterion) {
    for size in [1 << 10, 1 << 14, 1 << 18] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let indices: Vec<usize> = (0..BATCH).map(|_| rng.gen_range(0..size)).collect();
        let mut bitmap = BitMap::new(size);
        c.bench_function(
            &format!("{}/fn=prepare_set_commit size={size} batch={BATCH}", module_path!()),
            |b| {
                b.iter(|| {
                    bitmap.prepare();
                    for &index in &indices {
                        bitmap.set(black_box(index));
                    }
                    bitmap.commit();
                });
            },
        );
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_commit,
}
