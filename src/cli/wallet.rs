//! Wallet CLI commands
//!
//! Implements CLI commands for income, outflows and the transaction history.

use clap::Subcommand;

use crate::display::format_history;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::models::GENERAL_BANK;
use crate::services::WalletService;

use super::parse_amount;

/// Wallet subcommands
#[derive(Subcommand)]
pub enum WalletCommands {
    /// Show the wallet balance
    Balance,
    /// Record money coming in
    Income {
        /// Amount (e.g., "1500" or "45.90")
        amount: String,
        /// Description
        description: String,
        /// Bank receiving the money
        #[arg(short, long, default_value = GENERAL_BANK)]
        bank: String,
    },
    /// Record money going out
    #[command(alias = "spend")]
    Outflow {
        /// Amount (e.g., "1500" or "45.90")
        amount: String,
        /// Description
        description: String,
        /// Bank the money leaves from
        #[arg(short, long, default_value = GENERAL_BANK)]
        bank: String,
    },
    /// List the transaction history
    History {
        /// Only show the last N transactions
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Change a past transaction
    Edit {
        /// Transaction number (from `wallet history`)
        index: usize,
        /// New amount
        amount: String,
        /// New description
        description: String,
        /// New bank
        #[arg(short, long, default_value = GENERAL_BANK)]
        bank: String,
    },
    /// Delete a transaction and recompute balances
    Delete {
        /// Transaction number (from `wallet history`)
        index: usize,
    },
    /// Clear the history and zero every balance
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a wallet command
pub fn handle_wallet_command(ledger: &mut Ledger, cmd: WalletCommands) -> LedgerResult<()> {
    let symbol = ledger.settings().currency_symbol.clone();
    let timestamp_format = ledger.settings().timestamp_format.clone();
    let mut service = WalletService::new(ledger);

    match cmd {
        WalletCommands::Balance => {
            println!("Balance: {}", service.balance().format_with_symbol(&symbol));
        }

        WalletCommands::Income {
            amount,
            description,
            bank,
        } => {
            let txn = service.add_income(parse_amount(&amount)?, &description, &bank)?;
            println!(
                "Recorded income of {} to {}",
                txn.amount.format_with_symbol(&symbol),
                txn.bank
            );
            println!("Balance: {}", service.balance().format_with_symbol(&symbol));
        }

        WalletCommands::Outflow {
            amount,
            description,
            bank,
        } => {
            let txn = service.add_outflow(parse_amount(&amount)?, &description, &bank)?;
            println!(
                "Recorded outflow of {} from {}",
                txn.amount.format_with_symbol(&symbol),
                txn.bank
            );
            println!("Balance: {}", service.balance().format_with_symbol(&symbol));
        }

        WalletCommands::History { limit } => {
            let history = service.history();
            let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
            if skip > 0 {
                println!("(showing the last {} of {})", history.len() - skip, history.len());
            }
            print!(
                "{}",
                format_history(&history[skip..], skip, &symbol, &timestamp_format)
            );
        }

        WalletCommands::Edit {
            index,
            amount,
            description,
            bank,
        } => {
            let txn = service.edit_transaction(index, parse_amount(&amount)?, &description, &bank)?;
            println!("Updated transaction #{}: {} {}", index, txn.description, txn.amount);
            println!("Balance: {}", service.balance().format_with_symbol(&symbol));
        }

        WalletCommands::Delete { index } => {
            let txn = service.delete_transaction(index)?;
            println!("Deleted transaction #{}: {}", index, txn.description);
            println!("Balance: {}", service.balance().format_with_symbol(&symbol));
        }

        WalletCommands::Reset { force } => {
            if !force {
                println!(
                    "This clears {} transaction(s) and zeroes every bank.",
                    service.history().len()
                );
                println!("To proceed, run again with --force flag:");
                println!("  wallet wallet reset --force");
                return Ok(());
            }
            service.reset_wallet()?;
            println!("Wallet reset.");
        }
    }

    Ok(())
}
