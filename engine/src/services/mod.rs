// Request and response types for the ledger service, plus the service itself.
use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{ReadingRecord, RecordId, Utility};

pub mod ledger_service;

pub use ledger_service::LedgerService;

#[derive(Debug, Clone)]
pub struct AddReadingRequest {
    pub utility: Utility,
    pub date: NaiveDate,
    pub current_value: f64,
    pub rate: f64,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone)]
pub struct EditReadingRequest {
    pub id: RecordId,
    pub date: Option<NaiveDate>,
    pub current_value: Option<f64>,
    pub rate: Option<f64>,
}

/// A record together with its current row id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: RecordId,
    #[serde(flatten)]
    pub record: ReadingRecord,
}

/// Totals for one utility across the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilitySummary {
    pub utility: Utility,
    /// Empty for utilities found in the file but no longer configured.
    pub unit: String,
    pub readings: usize,
    pub latest_date: Option<NaiveDate>,
    pub latest_value: Option<f64>,
    pub total_consumption: f64,
    pub total_bill: f64,
}
