// In-memory ledger table backed by a record store.
use shared::models::{ReadingRecord, RecordId};

use super::csv_store::{CsvRecordStore, RecordStore};
use crate::error::{EngineError, EngineResult};

/// Owns the ordered collection of readings. Mutations only touch memory
/// until `flush` writes the whole table back through the store.
pub struct Ledger<S: RecordStore = CsvRecordStore> {
    store: S,
    records: Vec<ReadingRecord>,
    dirty: bool,
}

impl<S: RecordStore> Ledger<S> {
    /// Initializes the backing file if needed and loads it.
    pub fn open(store: S) -> EngineResult<Self> {
        store.ensure_initialized()?;
        let records = store.load()?;
        Ok(Ledger { store, records, dirty: false })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &[ReadingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &ReadingRecord)> + Clone {
        self.records.iter().enumerate().map(|(idx, record)| (RecordId::from_index(idx), record))
    }

    pub fn get(&self, id: RecordId) -> EngineResult<&ReadingRecord> {
        self.records.get(id.index()).ok_or(EngineError::NotFound(id))
    }

    pub fn append(&mut self, record: ReadingRecord) -> RecordId {
        self.records.push(record);
        self.dirty = true;
        RecordId::from_index(self.records.len() - 1)
    }

    /// Swaps in `record` at `id` and hands back what was there.
    pub fn replace(&mut self, id: RecordId, record: ReadingRecord) -> EngineResult<ReadingRecord> {
        let slot = self.records.get_mut(id.index()).ok_or(EngineError::NotFound(id))?;
        let old = std::mem::replace(slot, record);
        self.dirty = true;
        Ok(old)
    }

    pub fn remove(&mut self, id: RecordId) -> EngineResult<ReadingRecord> {
        if id.index() >= self.records.len() {
            return Err(EngineError::NotFound(id));
        }
        let removed = self.records.remove(id.index());
        self.dirty = true;
        Ok(removed)
    }

    /// Mutable access to every record at once, for maintenance passes.
    pub fn records_mut(&mut self) -> &mut [ReadingRecord] {
        self.dirty = true;
        &mut self.records
    }

    pub fn flush(&mut self) -> EngineResult<()> {
        self.store.save(&self.records)?;
        self.dirty = false;
        Ok(())
    }

    /// Runs `change` and flushes. If either fails, the in-memory table is put
    /// back the way it was, so memory keeps matching what is on disk.
    pub fn commit<T, F>(&mut self, change: F) -> EngineResult<T>
    where
        F: FnOnce(&mut Self) -> EngineResult<T>,
    {
        let snapshot = self.records.clone();
        let was_dirty = self.dirty;
        let outcome = change(&mut *self).and_then(|value| self.flush().map(|()| value));
        if outcome.is_err() {
            self.records = snapshot;
            self.dirty = was_dirty;
        }
        outcome
    }
}
