// Handler for deleting a reading.
use shared::models::{ReadingRecord, RecordId};

use crate::data::{Ledger, RecordStore};
use crate::error::EngineResult;

pub fn handle_delete_reading<S: RecordStore>(id: RecordId, ledger: &mut Ledger<S>) -> EngineResult<ReadingRecord> {
    let removed = ledger.commit(|l| l.remove(id))?;
    tracing::debug!(record = %id, utility = %removed.utility, date = %removed.date, "Reading deleted");
    Ok(removed)
}
