//! Add and look up records by primary key.
//!
//! Two implementations of [Access] share a [crate::file::Store] and its [crate::record::Codec]:
//!
//! - [Linear] scans every line of the file on each lookup (`O(n)`). It keeps no state beyond the
//!   store and is the reference for what a lookup should return.
//! - [Indexed] scans the file once at [Indexed::init] to build an in-memory map from primary key
//!   to the offset of its line. Lookups are then a map access plus a single positioned read
//!   (`O(1)`), and inserts are an append plus a map update.
//!
//! Which one to use is a deployment decision (see [Kind] and [init]).
//!
//! # Index Rebuild
//!
//! The index of [Indexed] is never persisted. It is rebuilt from scratch every time the store is
//! opened, which doubles as an integrity check of the file: if two lines share a primary key,
//! [Indexed::init] fails with [Error::DuplicateRecordId].
//!
//! # Key Ceiling
//!
//! Keys are used directly as slot positions, so memory grows with the largest key rather than the
//! number of records. Keys above [Config::max_key] are rejected with [Error::KeyTooLarge] before
//! anything is allocated or written.

mod index;
mod indexed;
mod linear;

pub use index::Index;
pub use indexed::Indexed;
pub use linear::Linear;

use crate::{
    file::Store,
    record::{PrimaryKey, Record},
};
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use thiserror::Error;

/// Largest key accepted by [Indexed] when none is configured.
pub const DEFAULT_MAX_KEY: PrimaryKey = (1 << 24) - 1;

/// Errors that can occur when adding or getting records.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file error: {0}")]
    File(#[from] crate::file::Error),
    #[error("record error: {0}")]
    Record(#[from] crate::record::Error),
    #[error("invalid record at offset {0}: {1}")]
    InvalidRecord(u64, crate::record::Error),
    #[error("duplicate record id: {0}")]
    DuplicateRecordId(PrimaryKey),
    #[error("record not found: {0}")]
    RecordNotFound(PrimaryKey),
    #[error("key too large: {0} > {1}")]
    KeyTooLarge(PrimaryKey, PrimaryKey),
    #[error("index desynchronized: key {0} at offset {1}")]
    Desynchronized(PrimaryKey, u64),
}

/// Configuration for [Indexed].
#[derive(Clone, Debug)]
pub struct Config {
    /// Largest primary key that may be indexed.
    pub max_key: PrimaryKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_key: DEFAULT_MAX_KEY,
        }
    }
}

/// Implementation of [Access] to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Linear,
    Indexed,
}

/// Interface for adding and getting records of type `R`.
pub trait Access<R: Record> {
    /// Persist `record`.
    fn add_record(&mut self, record: &R) -> Result<(), Error>;

    /// Get the record with primary key `key`.
    ///
    /// Returns [Error::RecordNotFound] if no such record exists.
    fn get_record(&self, key: PrimaryKey) -> Result<R, Error>;

    /// Register metrics with `registry`.
    fn register(&self, registry: &mut Registry);
}

/// Initialize the [Access] implementation selected by `kind` over `store`.
///
/// `cfg` only applies to [Kind::Indexed].
pub fn init<R: Record + 'static>(
    kind: Kind,
    store: Store,
    cfg: Config,
) -> Result<Box<dyn Access<R>>, Error> {
    Ok(match kind {
        Kind::Linear => Box::new(Linear::init(store)),
        Kind::Indexed => Box::new(Indexed::init(store, cfg)?),
    })
}

/// Counters shared by both implementations.
#[derive(Clone, Debug, Default)]
struct Metrics {
    puts: Counter,
    rejected: Counter,
    gets: Counter,
    misses: Counter,
}

impl Metrics {
    fn register(&self, registry: &mut Registry) {
        registry.register("puts", "Number of records added", self.puts.clone());
        registry.register(
            "rejected",
            "Number of records refused for their key",
            self.rejected.clone(),
        );
        registry.register("gets", "Number of lookups performed", self.gets.clone());
        registry.register(
            "misses",
            "Number of lookups that found no record",
            self.misses.clone(),
        );
    }
}
