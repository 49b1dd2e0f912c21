use super::{Access, Config, Error, Index, Metrics};
use crate::{
    file::Store,
    record::{Codec, PrimaryKey, Record},
};
use prometheus_client::{metrics::gauge::Gauge, registry::Registry};
use std::time::Instant;
use tracing::{debug, warn};

/// [Access] that resolves lookups through an in-memory [Index].
pub struct Indexed<R: Record> {
    store: Store,
    codec: Codec<R>,
    index: Index,

    // Metrics
    metrics: Metrics,
    capacity: Gauge,
}

impl<R: Record> Indexed<R> {
    /// Initialize a new [Indexed] instance over `store`.
    ///
    /// The [Index] is populated during this call by scanning every line of the store. Fails if
    /// any line cannot be decoded, if two lines share a primary key, or if a key exceeds
    /// [Config::max_key].
    pub fn init(store: Store, cfg: Config) -> Result<Self, Error> {
        let codec = store.codec::<R>();
        let mut index = Index::new(cfg.max_key);

        // Rebuild the index from the file
        debug!(path = %store.config().path.display(), "rebuilding index");
        let start = Instant::now();
        for item in store.scan()? {
            let (line, offset) = item?;
            let record = codec
                .decode(&line)
                .map_err(|err| Error::InvalidRecord(offset, err))?;
            let key = record.key();
            if let Err(err) = index.insert(key, offset) {
                warn!(key, offset, ?err, "failed to index record");
                return Err(err);
            }
        }
        debug!(
            items = index.len(),
            capacity = index.capacity(),
            elapsed = ?start.elapsed(),
            "rebuilt index"
        );

        // Initialize metrics
        let capacity = Gauge::default();
        capacity.set(index.capacity() as i64);

        Ok(Self {
            store,
            codec,
            index,
            metrics: Metrics::default(),
            capacity,
        })
    }

    /// The underlying [Store].
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Offset of the line holding `key`, if indexed.
    pub fn offset(&self, key: PrimaryKey) -> Option<u64> {
        self.index.get(key)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no records are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of slots allocated by the index.
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }
}

impl<R: Record> Access<R> for Indexed<R> {
    fn add_record(&mut self, record: &R) -> Result<(), Error> {
        let key = record.key();
        let line = self.codec.encode(record)?;

        // Validate the key before touching the file
        if let Err(err) = self.index.reserve(key) {
            self.metrics.rejected.inc();
            warn!(key, ?err, "rejected record");
            return Err(err);
        }
        self.capacity.set(self.index.capacity() as i64);

        // Append and index
        let offset = self.store.append(&line)?;
        self.index.insert(key, offset)?;
        self.metrics.puts.inc();
        debug!(key, offset, "appended record");
        Ok(())
    }

    fn get_record(&self, key: PrimaryKey) -> Result<R, Error> {
        self.metrics.gets.inc();
        let Some(offset) = self.index.get(key) else {
            self.metrics.misses.inc();
            return Err(Error::RecordNotFound(key));
        };

        // The line must decode to the requested key, otherwise the file changed beneath us
        let line = self.store.read_at(offset)?;
        let record = match self.codec.decode(&line) {
            Ok(record) => record,
            Err(err) => {
                warn!(key, offset, ?err, "indexed line is not a valid record");
                return Err(Error::Desynchronized(key, offset));
            }
        };
        if record.key() != key {
            warn!(key, offset, found = record.key(), "indexed line holds another key");
            return Err(Error::Desynchronized(key, offset));
        }
        Ok(record)
    }

    fn register(&self, registry: &mut Registry) {
        self.metrics.register(registry);
        registry.register(
            "capacity",
            "Number of slots allocated by the index",
            self.capacity.clone(),
        );
    }
}
