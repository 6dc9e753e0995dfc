// Handler for listing readings in table order.
use shared::models::Utility;

use crate::data::{Ledger, RecordStore};
use crate::services::LedgerEntry;

pub fn handle_list_readings<S: RecordStore>(utility: Option<&Utility>, ledger: &Ledger<S>) -> Vec<LedgerEntry> {
    ledger
        .iter()
        .filter(|(_, record)| utility.map_or(true, |u| &record.utility == u))
        .map(|(id, record)| LedgerEntry { id, record: record.clone() })
        .collect()
}
