use super::utils::{create_store, destroy_store, FILE_SIZES};
use criterion::{black_box, criterion_group, Criterion};
use roster_storage::{
    access::{init, Config, Kind},
    record::Student,
};

/// Number of lookups per iteration.
const LOOKUPS: u64 = 100;

fn bench_get(c: &mut Criterion) {
    for size in FILE_SIZES {
        let store = create_store(size);
        for kind in [Kind::Linear, Kind::Indexed] {
            let access = init::<Student>(kind, store.clone(), Config::default()).unwrap();

            // Look up the last key written, the worst case for a linear scan
            let key = size - 1;
            c.bench_function(
                &format!("{}/kind={:?} size={} lookups={}", module_path!(), kind, size, LOOKUPS),
                |b| {
                    b.iter(|| {
                        for _ in 0..LOOKUPS {
                            black_box(access.get_record(key).unwrap());
                        }
                    })
                },
            );
        }
        destroy_store(store);
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_get
}
