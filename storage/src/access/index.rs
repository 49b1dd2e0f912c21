use super::Error;
use crate::record::PrimaryKey;
use tracing::debug;

/// Marker held by slots without a record.
const EMPTY: u64 = u64::MAX;

/// Map from primary key to the offset of the line holding it.
///
/// Keys are used directly as slot positions. Each slot is a bare offset (8 bytes), with
/// `u64::MAX` marking slots without a record.
#[derive(Debug)]
pub struct Index {
    slots: Vec<u64>,
    max_key: PrimaryKey,
    items: usize,
}

impl Index {
    /// Create an empty [Index] accepting keys up to (and including) `max_key`.
    pub fn new(max_key: PrimaryKey) -> Self {
        Self {
            slots: Vec::new(),
            max_key,
            items: 0,
        }
    }

    /// Number of slots allocated.
    ///
    /// Capacity only ever grows.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of keys with an offset.
    pub fn len(&self) -> usize {
        self.items
    }

    /// Whether no key has an offset.
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Get the offset stored for `key`, if any.
    pub fn get(&self, key: PrimaryKey) -> Option<u64> {
        let slot = usize::try_from(key).ok()?;
        self.slots.get(slot).copied().filter(|offset| *offset != EMPTY)
    }

    /// Ensure there is an empty slot for `key`.
    ///
    /// Grows the index whenever `key >= capacity`, adding twice the number of slots needed to
    /// reach `key` (capped at `max_key + 1`). Fails if `key` exceeds `max_key` or already has an
    /// offset. The index is not modified on failure.
    pub fn reserve(&mut self, key: PrimaryKey) -> Result<(), Error> {
        if key > self.max_key {
            return Err(Error::KeyTooLarge(key, self.max_key));
        }
        let slot = usize::try_from(key).map_err(|_| Error::KeyTooLarge(key, self.max_key))?;

        // Grow to cover the slot
        let old = self.slots.len();
        if slot >= old {
            let ceiling = usize::try_from(self.max_key)
                .map_or(usize::MAX, |max_key| max_key.saturating_add(1));
            let needed = slot - old + 1;
            let new = old.saturating_add(needed.saturating_mul(2)).min(ceiling);
            self.slots.resize(new, EMPTY);
            debug!(old, new, key, "grew index");
        }

        // Reject duplicates
        if self.slots[slot] != EMPTY {
            return Err(Error::DuplicateRecordId(key));
        }
        Ok(())
    }

    /// Store `offset` for `key`, growing the index as needed.
    ///
    /// Fails (without modification) under the same conditions as [Index::reserve]. `offset`
    /// must be less than `u64::MAX`.
    pub fn insert(&mut self, key: PrimaryKey, offset: u64) -> Result<(), Error> {
        debug_assert_ne!(offset, EMPTY);
        self.reserve(key)?;
        let slot = usize::try_from(key).map_err(|_| Error::KeyTooLarge(key, self.max_key))?;
        self.slots[slot] = offset;
        self.items += 1;
        Ok(())
    }
}
