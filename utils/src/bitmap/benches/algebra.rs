use criterion::{criterion_group, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use stagebloom_utils::BitMap;
use std::hint::black_box;

fn random_bitmap(rng: &mut StdRng, size: usize) -> BitMap {
    let mut bitmap = BitMap::new(size);
    bitmap.apply(|staged| {
        for i in 0..size {
            if rng.gen::<bool>() {
                staged.set(i);
            }
        }
    });
    bitmap
}

fn bench_algebra(c: &mut Criterion) {
    for size in [1 << 10, 1 << 14, 1 << 18] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let a = random_bitmap(&mut rng, size);
        let b = random_bitmap(&mut rng, size);
        let ops: [(&str, fn(&mut BitMap, &BitMap)); 5] = [
            ("and", BitMap::set_and),
            ("or", BitMap::set_or),
            ("xor", BitMap::set_xor),
            ("not", BitMap::set_not),
            ("and_not", BitMap::set_and_not),
        ];
        for (name, op) in ops {
            c.bench_function(
                &format!("{}/op={name} size={size}", module_path!()),
                |bencher| {
                    bencher.iter_batched(
                        || a.clone(),
                        |mut a| op(&mut a, black_box(&b)),
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_algebra,
}
