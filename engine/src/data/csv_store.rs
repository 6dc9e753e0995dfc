// Flat-file persistence of the ledger table.
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use shared::models::{ReadingRecord, Utility};
use shared::utils;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{EngineError, EngineResult};

/// Canonical column order. Reading looks columns up by name; writing always uses this order.
pub const HEADER: [&str; 8] = [
    "Utility",
    "Date",
    "Previous Value",
    "Current Value",
    "Consumption",
    "Rate",
    "Bill Amount",
    "Last Modified",
];

const UTILITY: usize = 0;
const DATE: usize = 1;
const PREVIOUS_VALUE: usize = 2;
const CURRENT_VALUE: usize = 3;
const CONSUMPTION: usize = 4;
const RATE: usize = 5;
const BILL_AMOUNT: usize = 6;
const LAST_MODIFIED: usize = 7;

/// Whole-table persistence for reading records.
pub trait RecordStore {
    /// Reads every record. A missing backing file is an empty table.
    fn load(&self) -> EngineResult<Vec<ReadingRecord>>;

    /// Replaces the whole persisted table with `records`.
    fn save(&self, records: &[ReadingRecord]) -> EngineResult<()>;

    /// Creates the backing file with just the header. Never truncates an existing file.
    fn ensure_initialized(&self) -> EngineResult<()>;
}

pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn read_error(&self, err: csv::Error) -> EngineError {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => EngineError::StorageRead { path: self.path.clone(), source },
            _ => EngineError::csv_format(&self.path, message),
        }
    }

    fn write_error(&self, source: io::Error) -> EngineError {
        EngineError::StorageWrite { path: self.path.clone(), source }
    }

    fn csv_write_error(&self, err: csv::Error) -> EngineError {
        let message = err.to_string();
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            _ => io::Error::new(io::ErrorKind::Other, message),
        };
        self.write_error(source)
    }

    fn column_positions(&self, headers: &StringRecord) -> EngineResult<[usize; 8]> {
        let mut positions = [0usize; 8];
        for (slot, name) in HEADER.iter().enumerate() {
            positions[slot] = headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| EngineError::csv_format(&self.path, format!("missing column '{}' in header", name)))?;
        }
        Ok(positions)
    }

    fn parse_row(record: &StringRecord, positions: &[usize; 8]) -> anyhow::Result<ReadingRecord> {
        let field = |slot: usize| record.get(positions[slot]).unwrap_or("");

        let utility = field(UTILITY);
        if utility.is_empty() {
            anyhow::bail!("empty 'Utility' field");
        }

        Ok(ReadingRecord {
            utility: Utility::new(utility),
            date: utils::parse_date(field(DATE))?,
            previous_value: utils::parse_decimal(field(PREVIOUS_VALUE))?,
            current_value: utils::parse_decimal(field(CURRENT_VALUE))?,
            consumption: utils::parse_decimal(field(CONSUMPTION))?,
            rate: utils::parse_decimal(field(RATE))?,
            bill_amount: utils::parse_decimal(field(BILL_AMOUNT))?,
            last_modified: utils::parse_timestamp(field(LAST_MODIFIED))?,
        })
    }

    fn to_row(record: &ReadingRecord) -> [String; 8] {
        [
            record.utility.to_string(),
            utils::format_date(record.date),
            utils::format_decimal(record.previous_value),
            utils::format_decimal(record.current_value),
            utils::format_decimal(record.consumption),
            utils::format_decimal(record.rate),
            utils::format_decimal(record.bill_amount),
            utils::format_timestamp(record.last_modified),
        ]
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> EngineResult<Vec<ReadingRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Ledger file absent, starting with an empty table");
                return Ok(Vec::new());
            }
            Err(source) => return Err(EngineError::StorageRead { path: self.path.clone(), source }),
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers().map_err(|e| self.read_error(e))?.clone();
        if headers.iter().all(|h| h.is_empty()) {
            // Zero-byte file: nothing was ever written, not even the header.
            return Ok(Vec::new());
        }
        let positions = self.column_positions(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| self.read_error(e))?;
            let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
            let record = Self::parse_row(&row, &positions)
                .map_err(|e| EngineError::csv_format(&self.path, format!("line {}: {}", line, e)))?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded ledger");
        Ok(records)
    }

    fn save(&self, records: &[ReadingRecord]) -> EngineResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        // Write next to the target, then rename over it, so a crash never leaves half a table.
        let tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        let mut wtr = WriterBuilder::new().from_writer(tmp);
        wtr.write_record(HEADER).map_err(|e| self.csv_write_error(e))?;
        for record in records {
            wtr.write_record(Self::to_row(record)).map_err(|e| self.csv_write_error(e))?;
        }
        let tmp = wtr.into_inner().map_err(|e| self.write_error(e.into_error()))?;
        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Saved ledger");
        Ok(())
    }

    fn ensure_initialized(&self) -> EngineResult<()> {
        fs::create_dir_all(self.parent_dir()).map_err(|e| self.write_error(e))?;

        let file = match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(self.write_error(e)),
        };

        let mut wtr = WriterBuilder::new().from_writer(file);
        wtr.write_record(HEADER).map_err(|e| self.csv_write_error(e))?;
        wtr.flush().map_err(|e| self.write_error(e))?;

        tracing::info!(path = %self.path.display(), "Created ledger file");
        Ok(())
    }
}
