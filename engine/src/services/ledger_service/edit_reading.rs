// Handler for editing an existing reading.
//
// Only the edited record is recomputed. Later readings that were measured
// against it keep their values; `recompute` brings them back in line.
// Editing an older reading measures it against the newest peer of its
// utility, not against its date predecessor.
use shared::models::ReadingRecord;
use shared::utils;

use crate::billing::BillingCalculator;
use crate::data::{Ledger, RecordStore};
use crate::error::EngineResult;
use crate::services::{EditReadingRequest, LedgerEntry};

pub fn handle_edit_reading<S: RecordStore>(
    request: EditReadingRequest,
    ledger: &mut Ledger<S>,
    calculator: &BillingCalculator,
) -> EngineResult<LedgerEntry> {
    let existing = ledger.get(request.id)?;

    let utility = existing.utility.clone();
    let date = request.date.unwrap_or(existing.date);
    let current_value = request.current_value.unwrap_or(existing.current_value);
    let rate = request.rate.unwrap_or(existing.rate);

    let peers = ledger.iter().filter(|(id, _)| *id != request.id);
    let billing = calculator.calculate(&utility, current_value, rate, peers)?;

    let record = ReadingRecord::new(utility, date, current_value, rate, billing, utils::now_timestamp());
    ledger.commit(|l| l.replace(request.id, record.clone()))?;

    tracing::debug!(
        record = %request.id,
        consumption = billing.consumption,
        bill_amount = billing.bill_amount,
        "Reading edited"
    );
    Ok(LedgerEntry { id: request.id, record })
}
