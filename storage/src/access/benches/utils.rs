//! Helpers shared by the access benchmarks.

use chrono::NaiveDate;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use roster_storage::{
    access::{Access, Linear},
    file::{Config, Store},
    record::{Record, Student},
};
use std::{env, fs};

/// Number of records in each benchmarked file.
pub const FILE_SIZES: [u64; 3] = [500, 1_000, 5_000];

/// Create a file holding `size` students with keys `0..size` (appended in random order).
///
/// The caller is responsible for removing the file.
pub fn create_store(size: u64) -> Store {
    let path = env::temp_dir().join(format!(
        "access_bench_{}_{}.txt",
        size,
        rand::random::<u64>()
    ));
    let store = Store::create(Config::new(path), Student::schema()).unwrap();

    let mut keys: Vec<u64> = (0..size).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(0));
    let mut linear = Linear::<Student>::init(store.clone());
    let birthday_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    for record_id in keys {
        let student = Student {
            record_id,
            first_name: "Bench".to_string(),
            last_name: format!("Student{}", record_id % 10),
            birthday_date,
        };
        linear.add_record(&student).unwrap();
    }
    store
}

/// Remove the file backing `store`.
pub fn destroy_store(store: Store) {
    fs::remove_file(&store.config().path).unwrap();
}
