use criterion::criterion_main;

mod insert;

criterion_main!(contains::benches, insert::benches);
