// Handler for per-utility totals.
use shared::models::{ReadingRecord, RecordId, Utility};

use crate::billing::latest_reading;
use crate::config::UtilityCatalog;
use crate::data::{Ledger, RecordStore};
use crate::services::UtilitySummary;

/// One summary per configured utility, in catalog order, followed by any
/// utility that only appears in the ledger file.
pub fn handle_summary<S: RecordStore>(ledger: &Ledger<S>, catalog: &UtilityCatalog) -> Vec<UtilitySummary> {
    let mut utilities: Vec<Utility> = catalog.utilities().collect();
    for (_, record) in ledger.iter() {
        if !utilities.contains(&record.utility) {
            utilities.push(record.utility.clone());
        }
    }

    utilities
        .into_iter()
        .map(|utility| {
            let unit = catalog.get(&utility).map(|e| e.unit.clone()).unwrap_or_default();
            summarize(utility, unit, ledger.iter())
        })
        .collect()
}

fn summarize<'a, I>(utility: Utility, unit: String, records: I) -> UtilitySummary
where
    I: Iterator<Item = (RecordId, &'a ReadingRecord)> + Clone,
{
    let mine = records.filter(|(_, r)| r.utility == utility);

    let mut readings = 0;
    let mut total_consumption = 0.0;
    let mut total_bill = 0.0;
    for (_, record) in mine.clone() {
        readings += 1;
        // Cells left empty in a hand-edited file are not counted.
        if record.consumption.is_finite() {
            total_consumption += record.consumption;
        }
        if record.bill_amount.is_finite() {
            total_bill += record.bill_amount;
        }
    }

    let latest = latest_reading(&utility, mine);
    UtilitySummary {
        latest_date: latest.map(|(_, r)| r.date),
        latest_value: latest.map(|(_, r)| r.current_value),
        utility,
        unit,
        readings,
        total_consumption,
        total_bill,
    }
}
