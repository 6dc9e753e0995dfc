// Plain-text tables for the command line.
use shared::utils;

use engine::config::UtilitySettings;
use engine::services::{LedgerEntry, UtilitySummary};

fn amount(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.2}", value)
    }
}

pub fn readings_table(entries: &[LedgerEntry], currency: &str) -> String {
    let bill_header = format!("Bill ({})", currency);
    let mut out = format!(
        "{:>4}  {:<18} {:<10} {:>12} {:>12} {:>12} {:>10} {:>14}  {}\n",
        "#", "Utility", "Date", "Previous", "Current", "Consumption", "Rate", bill_header, "Last Modified"
    );
    for entry in entries {
        let r = &entry.record;
        out.push_str(&format!(
            "{:>4}  {:<18} {:<10} {:>12} {:>12} {:>12} {:>10} {:>14}  {}\n",
            entry.id.get(),
            r.utility.as_str(),
            utils::format_date(r.date),
            amount(r.previous_value),
            amount(r.current_value),
            amount(r.consumption),
            amount(r.rate),
            amount(r.bill_amount),
            utils::format_timestamp(r.last_modified),
        ));
    }
    if entries.is_empty() {
        out.push_str("(no readings)\n");
    }
    out
}

pub fn summary_table(summaries: &[UtilitySummary], currency: &str) -> String {
    let mut out = format!(
        "{:<18} {:>8} {:<10} {:>12} {:>14} {:>14}\n",
        "Utility", "Readings", "Latest", "Reading", "Consumption", format!("Bill ({})", currency)
    );
    for s in summaries {
        let consumption = if s.unit.is_empty() {
            amount(s.total_consumption)
        } else {
            format!("{} {}", amount(s.total_consumption), s.unit)
        };
        out.push_str(&format!(
            "{:<18} {:>8} {:<10} {:>12} {:>14} {:>14}\n",
            s.utility.as_str(),
            s.readings,
            s.latest_date.map(utils::format_date).unwrap_or_else(|| "-".to_string()),
            s.latest_value.map(amount).unwrap_or_else(|| "-".to_string()),
            consumption,
            amount(s.total_bill),
        ));
    }
    out
}

pub fn utilities_table(utilities: &[UtilitySettings], currency: &str) -> String {
    let mut out = format!("{:<18} {:<6} {:>12}\n", "Utility", "Unit", format!("Rate ({})", currency));
    for u in utilities {
        out.push_str(&format!("{:<18} {:<6} {:>12}\n", u.name, u.unit, amount(u.default_rate)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::billing::derive;
    use shared::models::{ReadingRecord, RecordId, Utility};

    #[test]
    fn test_readings_table_lists_every_row() {
        let date = utils::parse_date("2024-01-31").unwrap();
        let record = ReadingRecord::new(
            Utility::from("MVM Gas"),
            date,
            100.0,
            50.0,
            derive(0.0, 100.0, 50.0),
            date.and_hms_opt(9, 15, 0).unwrap(),
        );
        let table = readings_table(&[LedgerEntry { id: RecordId::from_index(0), record }], "HUF");
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Bill (HUF)"));
        assert!(lines[1].contains("MVM Gas"));
        assert!(lines[1].contains("5000.00"));
        assert!(lines[1].ends_with("2024-01-31 09:15:00"));
    }

    #[test]
    fn test_empty_table_says_so() {
        assert!(readings_table(&[], "HUF").contains("(no readings)"));
    }
}
