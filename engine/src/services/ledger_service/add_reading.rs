// Handler for adding a new reading.
use shared::models::ReadingRecord;
use shared::utils;

use crate::billing::BillingCalculator;
use crate::data::{Ledger, RecordStore};
use crate::error::EngineResult;
use crate::services::{AddReadingRequest, LedgerEntry};

pub fn handle_add_reading<S: RecordStore>(
    request: AddReadingRequest,
    ledger: &mut Ledger<S>,
    calculator: &BillingCalculator,
) -> EngineResult<LedgerEntry> {
    // Validation happens inside calculate, before the ledger is touched.
    let billing = calculator.calculate(&request.utility, request.current_value, request.rate, ledger.iter())?;

    let record = ReadingRecord::new(
        request.utility,
        request.date,
        request.current_value,
        request.rate,
        billing,
        utils::now_timestamp(),
    );

    let id = ledger.commit(|l| Ok(l.append(record.clone())))?;
    tracing::debug!(
        record = %id,
        previous_value = billing.previous_value,
        consumption = billing.consumption,
        bill_amount = billing.bill_amount,
        "Reading added"
    );
    Ok(LedgerEntry { id, record })
}
