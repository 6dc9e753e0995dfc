// Re-derives every record from its predecessor in date order.
//
// Edits and deletes never cascade, so a record that was measured against an
// edited or removed reading keeps its stale previous value until this runs.
use chrono::NaiveDateTime;
use shared::models::{Billing, ReadingRecord, RecordId, Utility};
use std::collections::BTreeMap;

use super::{derive, previous_value_of};

/// Walks each utility's records ordered by (date, row) and rewrites
/// previous value, consumption and bill so every record follows the one
/// before it; the first record of a utility is measured against 0.
/// Changed records get `touched_at` as their last-modified time.
/// Returns how many records changed.
pub fn rebuild_chains(records: &mut [ReadingRecord], touched_at: NaiveDateTime) -> usize {
    let mut by_utility: BTreeMap<Utility, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        by_utility.entry(record.utility.clone()).or_default().push(idx);
    }

    let mut changed = 0;
    for (utility, mut indices) in by_utility {
        indices.sort_by_key(|&idx| (records[idx].date, idx));

        let mut previous_value = 0.0;
        for idx in indices {
            let record = &mut records[idx];
            let billing = derive(previous_value, record.current_value, record.rate);
            if !same_billing(&record.billing(), &billing) {
                record.apply_billing(billing);
                record.last_modified = touched_at;
                changed += 1;
            }
            previous_value = previous_value_of(RecordId::from_index(idx), record);
        }
        tracing::debug!(utility = %utility, "Rebuilt reading chain");
    }
    changed
}

fn same_billing(a: &Billing, b: &Billing) -> bool {
    same(a.previous_value, b.previous_value) && same(a.consumption, b.consumption) && same(a.bill_amount, b.bill_amount)
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
