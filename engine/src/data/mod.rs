// Persistence layer: the CSV-backed record store and the in-memory ledger on top of it.
pub mod csv_store;
pub mod ledger;

pub use csv_store::{CsvRecordStore, RecordStore};
pub use ledger::Ledger;
