// utility-ledger entry point
use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use shared::models::Utility;
use shared::utils;

use engine::config::EngineSettings;
use engine::observability::init_tracing;
use engine::services::{AddReadingRequest, EditReadingRequest};
use engine::{EngineError, LedgerService};

mod cli;
mod render;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_status_for(&err))
        }
    }
}

/// 2 when the operator's input was rejected, 1 for everything else.
fn exit_status_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EngineError>() {
        Some(engine_err) if engine_err.is_user_error() => 2,
        _ => 1,
    }
}

fn run(args: Cli) -> Result<()> {
    let mut settings = EngineSettings::load_or_default(args.config.as_deref())?;
    if let Some(data) = args.data {
        settings.data_file = data;
    }
    tracing::debug!(data_file = %settings.data_file.display(), "Using ledger file");

    match args.command {
        Commands::Utilities => {
            print!("{}", render::utilities_table(&settings.utilities, &settings.currency));
        }
        Commands::Init => {
            LedgerService::open(&settings)?;
            println!("Ledger ready at {}", settings.data_file.display());
        }
        Commands::Add { utility, value, date, rate } => {
            let mut service = LedgerService::open(&settings)?;
            let utility = Utility::from(utility);
            let rate = rate.unwrap_or_else(|| {
                service
                    .calculator()
                    .catalog()
                    .get(&utility)
                    .map_or(engine::config::settings::DEFAULT_RATE, |u| u.default_rate)
            });
            let entry = service
                .add(AddReadingRequest {
                    utility,
                    date: date.unwrap_or_else(utils::today),
                    current_value: value,
                    rate,
                })
                .context("Failed to add reading")?;
            println!("Added reading {}", entry.id);
            print!("{}", render::readings_table(&[entry], &settings.currency));
        }
        Commands::Edit { id, date, value, rate } => {
            let mut service = LedgerService::open(&settings)?;
            let entry = service
                .edit(EditReadingRequest { id, date, current_value: value, rate })
                .context("Failed to edit reading")?;
            println!("Edited reading {}", entry.id);
            print!("{}", render::readings_table(&[entry], &settings.currency));
        }
        Commands::Delete { id } => {
            let mut service = LedgerService::open(&settings)?;
            let removed = service.delete(id).context("Failed to delete reading")?;
            println!(
                "Deleted reading {} ({}, {})",
                id,
                removed.utility,
                utils::format_date(removed.date)
            );
        }
        Commands::List { utility, json } => {
            let service = LedgerService::open(&settings)?;
            let filter = utility.map(Utility::from);
            let entries = service.list(filter.as_ref());
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", render::readings_table(&entries, &settings.currency));
            }
        }
        Commands::Summary { json } => {
            let service = LedgerService::open(&settings)?;
            let summaries = service.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print!("{}", render::summary_table(&summaries, &settings.currency));
            }
        }
        Commands::Recompute => {
            let mut service = LedgerService::open(&settings)?;
            let changed = service.recompute_all().context("Failed to recompute readings")?;
            println!("Recomputed {} of {} readings", changed, service.ledger().len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RecordId;

    #[test]
    fn test_rejected_input_exits_with_two() {
        let not_found = anyhow::Error::new(EngineError::NotFound(RecordId::from_index(4)))
            .context("Failed to delete reading");
        assert_eq!(exit_status_for(&not_found), 2);

        let invalid = anyhow::Error::new(EngineError::invalid_input("rate must be a positive number"));
        assert_eq!(exit_status_for(&invalid), 2);
    }

    #[test]
    fn test_storage_failures_exit_with_one() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let write = anyhow::Error::new(EngineError::StorageWrite {
            path: "utility_data.csv".into(),
            source: io,
        });
        assert_eq!(exit_status_for(&write), 1);
        assert_eq!(exit_status_for(&anyhow::anyhow!("bad settings")), 1);
    }
}
