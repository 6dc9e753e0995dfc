use shared::Utility;

use super::settings::UtilitySettings;

/// The set of utilities readings may be recorded for, in configured order.
#[derive(Debug, Clone)]
pub struct UtilityCatalog {
    entries: Vec<UtilitySettings>,
}

impl UtilityCatalog {
    pub fn new(entries: Vec<UtilitySettings>) -> Self {
        UtilityCatalog { entries }
    }

    pub fn get(&self, utility: &Utility) -> Option<&UtilitySettings> {
        self.entries.iter().find(|e| e.name == utility.as_str())
    }

    pub fn contains(&self, utility: &Utility) -> bool {
        self.get(utility).is_some()
    }

    pub fn utilities(&self) -> impl Iterator<Item = Utility> + '_ {
        self.entries.iter().map(|e| Utility::new(e.name.clone()))
    }
}
