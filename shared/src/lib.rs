// Domain models and text formats shared by the ledger engine and its front ends.
pub mod models;
pub mod utils;

pub use models::{Billing, ReadingRecord, RecordId, Utility};
