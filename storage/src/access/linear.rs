use super::{Access, Error, Metrics};
use crate::{
    file::Store,
    record::{Codec, PrimaryKey, Record},
};
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use tracing::debug;

/// [Access] that scans the whole file on every lookup.
///
/// Lookups return the first line holding the requested key. Inserts are not checked for
/// duplicates.
pub struct Linear<R: Record> {
    store: Store,
    codec: Codec<R>,

    // Metrics
    metrics: Metrics,
    scanned: Counter,
}

impl<R: Record> Linear<R> {
    /// Initialize a new [Linear] instance over `store`.
    pub fn init(store: Store) -> Self {
        let codec = store.codec();
        Self {
            store,
            codec,
            metrics: Metrics::default(),
            scanned: Counter::default(),
        }
    }

    /// The underlying [Store].
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl<R: Record> Access<R> for Linear<R> {
    fn add_record(&mut self, record: &R) -> Result<(), Error> {
        let line = self.codec.encode(record)?;
        let offset = self.store.append(&line)?;
        self.metrics.puts.inc();
        debug!(key = record.key(), offset, "appended record");
        Ok(())
    }

    fn get_record(&self, key: PrimaryKey) -> Result<R, Error> {
        self.metrics.gets.inc();
        for item in self.store.scan()? {
            let (line, offset) = item?;
            self.scanned.inc();
            let record = self
                .codec
                .decode(&line)
                .map_err(|err| Error::InvalidRecord(offset, err))?;
            if record.key() == key {
                return Ok(record);
            }
        }
        self.metrics.misses.inc();
        Err(Error::RecordNotFound(key))
    }

    fn register(&self, registry: &mut Registry) {
        self.metrics.register(registry);
        registry.register(
            "scanned",
            "Number of lines decoded by lookups",
            self.scanned.clone(),
        );
    }
}
