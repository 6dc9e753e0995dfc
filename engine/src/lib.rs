// Engine library root: record store, billing, ledger service and configuration.

pub mod billing;
pub mod config;
pub mod data;
pub mod error;
pub mod observability;
pub mod services;

pub use error::{EngineError, EngineResult};
pub use services::LedgerService;
