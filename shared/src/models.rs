use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A billable service category (gas, electricity, water, ...).
///
/// Kept as an open string id: the set of known utilities comes from the
/// engine's configured catalog, not from this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Utility(String);

impl Utility {
    pub fn new(name: impl Into<String>) -> Self {
        Utility(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Utility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Utility {
    fn from(name: &str) -> Self {
        Utility::new(name)
    }
}

impl From<String> for Utility {
    fn from(name: String) -> Self {
        Utility(name)
    }
}

/// 1-based row position of a record in the ledger table.
///
/// The position doubles as the insertion sequence number: a higher id was
/// appended later. Removing a record shifts every id after it down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(usize);

impl RecordId {
    /// Returns `None` for 0, which never addresses a row.
    pub fn new(position: usize) -> Option<Self> {
        (position > 0).then_some(RecordId(position))
    }

    pub fn from_index(index: usize) -> Self {
        RecordId(index + 1)
    }

    pub fn index(self) -> usize {
        self.0 - 1
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Derived figures for one reading: what it is compared against and what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub previous_value: f64,
    pub consumption: f64,
    pub bill_amount: f64,
}

/// One meter dictation as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub utility: Utility,
    pub date: NaiveDate,
    pub previous_value: f64,
    pub current_value: f64,
    pub consumption: f64,
    pub rate: f64,
    pub bill_amount: f64,
    pub last_modified: NaiveDateTime,
}

impl ReadingRecord {
    pub fn new(
        utility: Utility,
        date: NaiveDate,
        current_value: f64,
        rate: f64,
        billing: Billing,
        last_modified: NaiveDateTime,
    ) -> Self {
        ReadingRecord {
            utility,
            date,
            previous_value: billing.previous_value,
            current_value,
            consumption: billing.consumption,
            rate,
            bill_amount: billing.bill_amount,
            last_modified,
        }
    }

    pub fn billing(&self) -> Billing {
        Billing {
            previous_value: self.previous_value,
            consumption: self.consumption,
            bill_amount: self.bill_amount,
        }
    }

    pub fn apply_billing(&mut self, billing: Billing) {
        self.previous_value = billing.previous_value;
        self.consumption = billing.consumption;
        self.bill_amount = billing.bill_amount;
    }
}
