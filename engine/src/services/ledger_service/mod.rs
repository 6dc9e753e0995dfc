// engine/src/services/ledger_service/mod.rs
// The LedgerService struct and its request methods. Each request is handled
// in its own sibling module; this file wires them to the ledger and calculator.

use shared::models::{ReadingRecord, RecordId, Utility};

use super::{AddReadingRequest, EditReadingRequest, LedgerEntry, UtilitySummary};
use crate::billing::BillingCalculator;
use crate::config::EngineSettings;
use crate::data::{CsvRecordStore, Ledger, RecordStore};
use crate::error::EngineResult;

pub mod add_reading;
pub mod delete_reading;
pub mod edit_reading;
pub mod list_readings;
pub mod recompute;
pub mod summary;

pub struct LedgerService<S: RecordStore = CsvRecordStore> {
    ledger: Ledger<S>,
    calculator: BillingCalculator,
}

impl LedgerService<CsvRecordStore> {
    /// Opens the CSV ledger named by the settings, creating it if absent.
    pub fn open(settings: &EngineSettings) -> EngineResult<Self> {
        let store = CsvRecordStore::new(settings.data_file.clone());
        let ledger = Ledger::open(store)?;
        tracing::info!(
            path = %settings.data_file.display(),
            records = ledger.len(),
            "Opened ledger"
        );
        Ok(Self::new(ledger, BillingCalculator::new(settings.catalog())))
    }
}

impl<S: RecordStore> LedgerService<S> {
    pub fn new(ledger: Ledger<S>, calculator: BillingCalculator) -> Self {
        LedgerService { ledger, calculator }
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn calculator(&self) -> &BillingCalculator {
        &self.calculator
    }

    pub fn add(&mut self, request: AddReadingRequest) -> EngineResult<LedgerEntry> {
        tracing::info!(
            utility = %request.utility,
            date = %request.date,
            current_value = request.current_value,
            rate = request.rate,
            "Adding reading"
        );
        add_reading::handle_add_reading(request, &mut self.ledger, &self.calculator)
    }

    pub fn edit(&mut self, request: EditReadingRequest) -> EngineResult<LedgerEntry> {
        tracing::info!(
            record = %request.id,
            date = ?request.date,
            current_value = ?request.current_value,
            rate = ?request.rate,
            "Editing reading"
        );
        edit_reading::handle_edit_reading(request, &mut self.ledger, &self.calculator)
    }

    pub fn delete(&mut self, id: RecordId) -> EngineResult<ReadingRecord> {
        tracing::info!(record = %id, "Deleting reading");
        delete_reading::handle_delete_reading(id, &mut self.ledger)
    }

    pub fn list(&self, utility: Option<&Utility>) -> Vec<LedgerEntry> {
        list_readings::handle_list_readings(utility, &self.ledger)
    }

    pub fn recompute_all(&mut self) -> EngineResult<usize> {
        tracing::info!(records = self.ledger.len(), "Recomputing all reading chains");
        recompute::handle_recompute_all(&mut self.ledger)
    }

    pub fn summary(&self) -> Vec<UtilitySummary> {
        summary::handle_summary(&self.ledger, self.calculator.catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ledger::tests::MemoryStore;
    use crate::error::EngineError;
    use shared::utils::parse_date;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_service() -> LedgerService<MemoryStore> {
        let ledger = Ledger::open(MemoryStore::default()).unwrap();
        LedgerService::new(ledger, BillingCalculator::new(EngineSettings::default().catalog()))
    }

    fn add(utility: &str, date: &str, current_value: f64, rate: f64) -> AddReadingRequest {
        AddReadingRequest {
            utility: Utility::from(utility),
            date: parse_date(date).unwrap(),
            current_value,
            rate,
        }
    }

    fn id(n: usize) -> RecordId {
        RecordId::new(n).unwrap()
    }

    fn assert_consistent(record: &ReadingRecord) {
        assert_eq!(record.consumption, record.current_value - record.previous_value);
        assert_eq!(record.bill_amount, record.consumption * record.rate);
    }

    #[test]
    fn test_gas_scenario_add_then_edit() {
        let mut service = create_test_service();

        let first = service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        assert_eq!(first.id, id(1));
        assert_eq!(first.record.previous_value, 0.0);
        assert_eq!(first.record.consumption, 100.0);
        assert_eq!(first.record.bill_amount, 5000.0);

        let second = service.add(add("MVM Gas", "2024-02-29", 150.0, 50.0)).unwrap();
        assert_eq!(second.record.previous_value, 100.0);
        assert_eq!(second.record.consumption, 50.0);
        assert_eq!(second.record.bill_amount, 2500.0);

        let edited = service
            .edit(EditReadingRequest { id: id(2), date: None, current_value: Some(160.0), rate: None })
            .unwrap();
        assert_eq!(edited.record.previous_value, 100.0);
        assert_eq!(edited.record.consumption, 60.0);
        assert_eq!(edited.record.bill_amount, 3000.0);
        assert_eq!(edited.record.date, second.record.date);

        let listed = service.list(None);
        assert_eq!(listed[0], first, "first record is unaffected by the edit");
        assert_eq!(listed[1], edited);
        listed.iter().for_each(|e| assert_consistent(&e.record));

        assert_eq!(service.ledger().store().saved.borrow().len(), 2);
    }

    #[test]
    fn test_utilities_have_independent_histories() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        let power = service.add(add("MVM Electricity", "2024-02-29", 4200.0, 0.5)).unwrap();
        assert_eq!(power.record.previous_value, 0.0);
        assert_eq!(power.record.bill_amount, 2100.0);
    }

    #[test]
    fn test_rejected_add_leaves_store_unchanged() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        let saves = service.ledger().store().saves.get();

        for bad in [
            add("MVM Gas", "2024-02-29", -1.0, 50.0),
            add("MVM Gas", "2024-02-29", 150.0, 0.0),
            add("Steam", "2024-02-29", 150.0, 50.0),
        ] {
            let err = service.add(bad).unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput(_)));
        }
        assert_eq!(service.ledger().len(), 1);
        assert_eq!(service.ledger().store().saves.get(), saves);
    }

    #[test]
    fn test_edit_validates_and_reports_missing_record() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();

        let err = service
            .edit(EditReadingRequest { id: id(5), date: None, current_value: Some(1.0), rate: None })
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = service
            .edit(EditReadingRequest { id: id(1), date: None, current_value: None, rate: Some(-3.0) })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(service.list(None)[0].record.rate, 50.0);
    }

    #[test]
    fn test_edit_does_not_use_itself_as_previous() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        let edited = service
            .edit(EditReadingRequest {
                id: id(1),
                date: Some(parse_date("2024-01-30").unwrap()),
                current_value: Some(120.0),
                rate: Some(10.0),
            })
            .unwrap();
        assert_eq!(edited.record.previous_value, 0.0);
        assert_eq!(edited.record.consumption, 120.0);
        assert_eq!(edited.record.bill_amount, 1200.0);
        assert_eq!(edited.record.date, parse_date("2024-01-30").unwrap());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        service.add(add("MVM Electricity", "2024-01-31", 900.0, 1.0)).unwrap();
        service.add(add("MVM Gas", "2024-02-29", 150.0, 50.0)).unwrap();
        let before = service.list(None);

        let removed = service.delete(id(2)).unwrap();
        assert_eq!(removed, before[1].record);

        let after = service.list(None);
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].record, before[0].record);
        assert_eq!(after[1].record, before[2].record);
        assert_eq!(after[1].id, id(2));

        assert!(matches!(service.delete(id(3)), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        service.ledger().store().fail_writes.set(true);

        let err = service.add(add("MVM Gas", "2024-02-29", 150.0, 50.0)).unwrap_err();
        assert!(matches!(err, EngineError::StorageWrite { .. }));
        assert!(service.delete(id(1)).is_err());
        assert_eq!(service.list(None).len(), 1);
        assert_eq!(service.ledger().store().saved.borrow().len(), 1);
    }

    #[test]
    fn test_recompute_repairs_chain_after_edit() {
        let mut service = create_test_service();
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        service.add(add("MVM Gas", "2024-02-29", 150.0, 50.0)).unwrap();
        service
            .edit(EditReadingRequest { id: id(1), date: None, current_value: Some(110.0), rate: None })
            .unwrap();
        // The January reading is measured against the newest peer (February),
        // and February still points at the old January value.
        let listed = service.list(None);
        assert_eq!(listed[0].record.previous_value, 150.0);
        assert_eq!(listed[0].record.consumption, -40.0);
        assert_eq!(listed[1].record.previous_value, 100.0);

        assert_eq!(service.recompute_all().unwrap(), 2);
        let listed = service.list(None);
        let first = &listed[0].record;
        assert_eq!(first.previous_value, 0.0);
        assert_eq!(first.consumption, 110.0);
        assert_eq!(first.bill_amount, 5500.0);
        let second = &listed[1].record;
        assert_eq!(second.previous_value, 110.0);
        assert_eq!(second.consumption, 40.0);
        assert_eq!(second.bill_amount, 2000.0);

        assert_eq!(service.recompute_all().unwrap(), 0);
    }

    #[test]
    fn test_csv_backed_service_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let settings = EngineSettings {
            data_file: dir.path().join("utility_data.csv"),
            ..EngineSettings::default()
        };

        let mut service = LedgerService::open(&settings).unwrap();
        assert!(settings.data_file.exists());
        service.add(add("MVM Gas", "2024-01-31", 100.0, 50.0)).unwrap();
        service.add(add("MVM Gas", "2024-02-29", 150.0, 50.0)).unwrap();
        let written = fs::read(&settings.data_file).unwrap();
        let listed = service.list(None);
        drop(service);

        let reopened = LedgerService::open(&settings).unwrap();
        assert_eq!(reopened.list(None), listed);
        assert_eq!(fs::read(&settings.data_file).unwrap(), written);
    }
}
