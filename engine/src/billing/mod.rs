// Consumption and bill derivation for meter readings.
pub mod chain;

use shared::models::{Billing, ReadingRecord, RecordId, Utility};

use crate::config::UtilityCatalog;
use crate::error::{EngineError, EngineResult};

pub use chain::rebuild_chains;

/// Derives previous value, consumption and bill for a proposed reading
/// against a snapshot of existing records. Holds no state of its own
/// besides the catalog used to recognise utilities.
#[derive(Debug, Clone)]
pub struct BillingCalculator {
    catalog: UtilityCatalog,
}

impl BillingCalculator {
    pub fn new(catalog: UtilityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &UtilityCatalog {
        &self.catalog
    }

    pub fn validate(&self, utility: &Utility, current_value: f64, rate: f64) -> EngineResult<()> {
        if !self.catalog.contains(utility) {
            return Err(EngineError::invalid_input(format!("unknown utility '{}'", utility)));
        }
        if !current_value.is_finite() || current_value < 0.0 {
            return Err(EngineError::invalid_input(format!(
                "current value must be a non-negative number, got {}",
                current_value
            )));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::invalid_input(format!("rate must be a positive number, got {}", rate)));
        }
        Ok(())
    }

    /// `peers` is the candidate set for the previous reading; callers editing a
    /// record leave that record out.
    pub fn calculate<'a, I>(&self, utility: &Utility, current_value: f64, rate: f64, peers: I) -> EngineResult<Billing>
    where
        I: IntoIterator<Item = (RecordId, &'a ReadingRecord)>,
    {
        self.validate(utility, current_value, rate)?;

        let previous_value = latest_reading(utility, peers).map_or(0.0, |(id, record)| previous_value_of(id, record));
        Ok(derive(previous_value, current_value, rate))
    }
}

/// Most recent reading of `utility`: latest date, ties going to the later row.
pub fn latest_reading<'a, I>(utility: &Utility, records: I) -> Option<(RecordId, &'a ReadingRecord)>
where
    I: IntoIterator<Item = (RecordId, &'a ReadingRecord)>,
{
    records
        .into_iter()
        .filter(|(_, record)| &record.utility == utility)
        .max_by_key(|(id, record)| (record.date, *id))
}

/// The reading a successor is measured against. Non-numeric values count as 0.
pub(crate) fn previous_value_of(id: RecordId, record: &ReadingRecord) -> f64 {
    if record.current_value.is_finite() {
        record.current_value
    } else {
        tracing::warn!(record = %id, utility = %record.utility, "Prior reading is not a number, using 0");
        0.0
    }
}

pub fn derive(previous_value: f64, current_value: f64, rate: f64) -> Billing {
    let consumption = current_value - previous_value;
    Billing {
        previous_value,
        consumption,
        bill_amount: consumption * rate,
    }
}
