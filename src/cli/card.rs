//! Card CLI commands
//!
//! Cards are addressed by their number in `card list`.

use clap::Subcommand;

use crate::display::{format_card_details, format_card_list};
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::services::{CardEdit, CardService};

use super::{parse_amount, parse_month};

/// Card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a credit card
    Add {
        /// Card name
        name: String,
        /// Credit limit
        limit: String,
        /// Day of month the invoice is due
        #[arg(short, long, default_value = "10")]
        due: String,
    },
    /// List cards
    List,
    /// Show card details
    Show {
        /// Card number (from `card list`)
        card: usize,
    },
    /// Set the outstanding usage; increases are added to the month's invoice
    SetUsed {
        /// Card number (from `card list`)
        card: usize,
        /// New used amount
        amount: String,
        /// Invoice month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Refresh the card's invoice in a month
    Sync {
        /// Card number (from `card list`)
        card: usize,
        /// Invoice month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Pay the card's outstanding usage from the wallet
    Pay {
        /// Card number (from `card list`)
        card: usize,
    },
    /// Change a card
    Edit {
        /// Card number (from `card list`)
        card: usize,
        /// New limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New due day
        #[arg(short, long)]
        due: Option<String>,
        /// Manually set the displayed available amount
        #[arg(short, long, allow_hyphen_values = true)]
        available: Option<String>,
    },
    /// Delete a card and its invoices
    Delete {
        /// Card number (from `card list`)
        card: usize,
    },
}

/// Handle a card command
pub fn handle_card_command(ledger: &mut Ledger, cmd: CardCommands) -> LedgerResult<()> {
    let symbol = ledger.settings().currency_symbol.clone();
    let current = ledger.current_month();
    let mut service = CardService::new(ledger);

    match cmd {
        CardCommands::Add { name, limit, due } => {
            let card = service.add_card(&name, parse_amount(&limit)?, &due)?;
            println!("Created card: {}", card.name);
            println!("  Limit: {}", card.limit.format_with_symbol(&symbol));
            println!("  Due day: {}", card.due_day);
            println!("  ID: {}", card.id);
        }

        CardCommands::List => {
            print!(
                "{}",
                format_card_list(service.cards(), &service.totals(), &symbol)
            );
        }

        CardCommands::Show { card } => {
            print!("{}", format_card_details(service.card(card)?, &symbol));
        }

        CardCommands::SetUsed {
            card,
            amount,
            month,
        } => {
            let month = parse_month(month.as_deref(), current)?;
            service.set_used(card, parse_amount(&amount)?, month)?;
            let updated = service.card(card)?;
            println!(
                "{}: used {}, available {}",
                updated.name,
                updated.used.format_with_symbol(&symbol),
                updated.calculated_available().format_with_symbol(&symbol)
            );
        }

        CardCommands::Sync { card, month } => {
            let month = parse_month(month.as_deref(), current)?;
            service.sync_invoice(card, month)?;
            println!("Synced invoice of {} for {}", service.card(card)?.name, month);
        }

        CardCommands::Pay { card } => {
            let paid = service.pay_invoice(card)?;
            let name = &service.card(card)?.name;
            if paid.is_zero() {
                println!("Nothing to pay on {}.", name);
            } else {
                println!("Paid {} on {}", paid.format_with_symbol(&symbol), name);
            }
        }

        CardCommands::Edit {
            card,
            limit,
            due,
            available,
        } => {
            let edit = CardEdit {
                limit: limit.as_deref().map(parse_amount).transpose()?,
                due_day: due,
                override_available: available.as_deref().map(parse_amount).transpose()?,
            };
            if edit.is_empty() {
                println!("No changes specified. Use --limit, --due or --available.");
                return Ok(());
            }
            service.edit(card, edit)?;
            println!("Updated card: {}", service.card(card)?.name);
        }

        CardCommands::Delete { card } => {
            let removed = service.delete_card(card)?;
            println!("Deleted card: {}", removed.name);
        }
    }

    Ok(())
}
