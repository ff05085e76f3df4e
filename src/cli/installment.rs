//! Installment CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::format_installment_list;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::services::{InstallmentService, NewInstallment};

use super::{parse_amount, parse_month};

/// Installment subcommands
#[derive(Subcommand)]
pub enum InstallmentCommands {
    /// Register a purchase split into monthly installments
    Add {
        /// Description
        description: String,
        /// Total purchase amount
        total: String,
        /// Number of installments
        count: u32,
        /// Card name
        card: String,
        /// Purchase date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List installment plans
    List,
    /// Charge the next installment of every plan
    Roll {
        /// Month to roll (YYYY-MM); only the current month is rolled
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle an installment command
pub fn handle_installment_command(
    ledger: &mut Ledger,
    cmd: InstallmentCommands,
) -> LedgerResult<()> {
    let symbol = ledger.settings().currency_symbol.clone();
    let current = ledger.current_month();
    let mut service = InstallmentService::new(ledger);

    match cmd {
        InstallmentCommands::Add {
            description,
            total,
            count,
            card,
            date,
        } => {
            let purchase_date = date
                .map(|d| {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
                        LedgerError::Validation(format!(
                            "Invalid date format: '{}'. Use YYYY-MM-DD",
                            d
                        ))
                    })
                })
                .transpose()?;

            let plan = service.add_installment(NewInstallment {
                description,
                total_amount: parse_amount(&total)?,
                installment_count: count,
                card_name: card,
                purchase_date,
            })?;

            println!("Created installment: {}", plan.description);
            println!(
                "  {} x {} on {}",
                plan.installment_count,
                plan.installment_value.format_with_symbol(&symbol),
                plan.card_name
            );
            println!(
                "  First charge: {}",
                plan.current_charge().format_with_symbol(&symbol)
            );
        }

        InstallmentCommands::List => {
            print!("{}", format_installment_list(service.installments(), &symbol));
        }

        InstallmentCommands::Roll { month } => {
            let month = parse_month(month.as_deref(), current)?;
            let summary = service.roll_month(month)?;
            if !summary.ran {
                println!("Only the current month ({}) can be rolled.", current);
                return Ok(());
            }
            println!("Rolled {}", month);
            println!("  Advanced:  {}", summary.advanced);
            println!("  Completed: {}", summary.completed);
            if summary.orphaned > 0 {
                println!("  Skipped (card deleted): {}", summary.orphaned);
            }
        }
    }

    Ok(())
}
