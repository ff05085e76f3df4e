//! Bank CLI commands

use clap::Subcommand;

use crate::display::format_bank_list;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::services::WalletService;

/// Bank subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// List banks and their balances
    List,
    /// Add a bank
    Add {
        /// Bank name
        name: String,
    },
    /// Show a bank's balance
    Balance {
        /// Bank name
        name: String,
    },
    /// Delete a bank; its transactions move to the general bank
    Delete {
        /// Bank name
        name: String,
    },
}

/// Handle a bank command
pub fn handle_bank_command(ledger: &mut Ledger, cmd: BankCommands) -> LedgerResult<()> {
    let symbol = ledger.settings().currency_symbol.clone();
    let mut service = WalletService::new(ledger);

    match cmd {
        BankCommands::List => {
            print!(
                "{}",
                format_bank_list(service.wallet(), &symbol)
            );
        }

        BankCommands::Add { name } => {
            if service.add_bank(&name)? {
                println!("Added bank: {}", name.trim());
            } else {
                println!("Bank '{}' already exists.", name.trim());
            }
        }

        BankCommands::Balance { name } => {
            println!(
                "{}: {}",
                name,
                service.bank_balance(&name).format_with_symbol(&symbol)
            );
        }

        BankCommands::Delete { name } => {
            let moved = service.delete_bank(&name)?;
            println!("Deleted bank: {}", name);
            if moved > 0 {
                println!("  {} transaction(s) moved to the general bank", moved);
            }
        }
    }

    Ok(())
}
