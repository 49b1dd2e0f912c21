use criterion::criterion_main;

mod get;
mod utils;

criterion_main!(get::benches, init::benches);
