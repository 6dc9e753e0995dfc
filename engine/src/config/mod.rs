// Engine configuration: settings file loading and the utility catalog.
pub mod catalog;
pub mod settings;

pub use catalog::UtilityCatalog;
pub use settings::{EngineSettings, UtilitySettings};
