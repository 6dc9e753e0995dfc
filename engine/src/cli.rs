use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::models::RecordId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "utility-ledger", version, about = "Record utility meter readings and compute bills")]
pub struct Cli {
    /// Settings file (JSON). Built-in defaults are used when absent.
    #[arg(short, long, env = "UTILITY_LEDGER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Ledger CSV file, overriding the configured one
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the ledger file if it does not exist yet
    Init,

    /// Record a new meter reading
    Add {
        /// Utility name as configured, e.g. "MVM Gas"
        #[arg(short, long)]
        utility: String,

        /// Meter reading
        #[arg(long, allow_negative_numbers = true)]
        value: f64,

        /// Reading date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Price per unit, defaults to the utility's configured rate
        #[arg(short, long, allow_negative_numbers = true)]
        rate: Option<f64>,
    },

    /// Change the date, value or rate of a reading
    Edit {
        /// Row number as shown by `list`
        #[arg(value_parser = parse_record_id)]
        id: RecordId,

        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        #[arg(long, allow_negative_numbers = true)]
        value: Option<f64>,

        #[arg(short, long, allow_negative_numbers = true)]
        rate: Option<f64>,
    },

    /// Remove a reading
    Delete {
        /// Row number as shown by `list`
        #[arg(value_parser = parse_record_id)]
        id: RecordId,
    },

    /// Show recorded readings
    List {
        /// Only show readings of this utility
        #[arg(short, long)]
        utility: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Per-utility totals
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Re-derive every reading from its predecessor in date order
    Recompute,

    /// Show the configured utilities
    Utilities,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    shared::utils::parse_date(s).map_err(|e| e.to_string())
}

fn parse_record_id(s: &str) -> Result<RecordId, String> {
    let position: usize = s.trim_start_matches('#').parse().map_err(|e| format!("invalid row number '{}': {}", s, e))?;
    RecordId::new(position).ok_or_else(|| "row numbers start at 1".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_with_defaults() {
        let cli = Cli::try_parse_from(["utility-ledger", "add", "-u", "MVM Gas", "--value", "150"]).unwrap();
        match cli.command {
            Commands::Add { utility, value, date, rate } => {
                assert_eq!(utility, "MVM Gas");
                assert_eq!(value, 150.0);
                assert!(date.is_none());
                assert!(rate.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_edit_parses_row_and_date() {
        let cli = Cli::try_parse_from([
            "utility-ledger", "--data", "/tmp/meters.csv", "edit", "#2", "--date", "2024-02-29", "--value", "160",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/meters.csv")));
        match cli.command {
            Commands::Edit { id, date, value, rate } => {
                assert_eq!(id.get(), 2);
                assert_eq!(date, shared::utils::parse_date("2024-02-29").ok());
                assert_eq!(value, Some(160.0));
                assert!(rate.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["utility-ledger", "delete", "0"]).is_err());
        assert!(Cli::try_parse_from(["utility-ledger", "add", "-u", "MVM Gas", "--value", "1", "--date", "31/01/2024"]).is_err());
        assert!(Cli::try_parse_from(["utility-ledger"]).is_err());
    }

    #[test]
    fn test_negative_value_reaches_validation() {
        let cli = Cli::try_parse_from(["utility-ledger", "add", "-u", "MVM Gas", "--value", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { value, .. } if value == -5.0));
    }
}
