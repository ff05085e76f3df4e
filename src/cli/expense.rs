//! Expense CLI commands
//!
//! Expenses are addressed by month and by their number in `expense list`.

use clap::Subcommand;

use crate::display::format_expense_list;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::services::{ExpenseService, NewExpense};

use super::{parse_amount, parse_month};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List a month's expenses
    List {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Add an expense
    Add {
        /// Description
        description: String,
        /// Amount
        amount: String,
        /// Day of month the expense is due
        #[arg(short, long, default_value = "")]
        due: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Repeat the expense in the following months
        #[arg(short, long)]
        recurring: bool,
        /// Last month of the recurrence (YYYY-MM)
        #[arg(short, long, requires = "recurring")]
        until: Option<String>,
    },
    /// Mark an expense paid or unpaid
    #[command(alias = "pay")]
    Toggle {
        /// Expense number (from `expense list`)
        index: usize,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Change an expense
    Edit {
        /// Expense number (from `expense list`)
        index: usize,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New due day
        #[arg(long)]
        due: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an expense from its month
    Delete {
        /// Expense number (from `expense list`)
        index: usize,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List months that have expenses
    Months,
}

/// Handle an expense command
pub fn handle_expense_command(ledger: &mut Ledger, cmd: ExpenseCommands) -> LedgerResult<()> {
    let symbol = ledger.settings().currency_symbol.clone();
    let current = ledger.current_month();
    let mut service = ExpenseService::new(ledger);

    match cmd {
        ExpenseCommands::List { month } => {
            let month = parse_month(month.as_deref(), current)?;
            let summary = service.month_summary(month);
            print!(
                "{}",
                format_expense_list(month, service.month_expenses(month), &summary, &symbol)
            );
        }

        ExpenseCommands::Add {
            description,
            amount,
            due,
            month,
            recurring,
            until,
        } => {
            let month = parse_month(month.as_deref(), current)?;
            let mut input = NewExpense::once(month, description, parse_amount(&amount)?, due);
            if recurring {
                let end = until
                    .as_deref()
                    .map(|s| parse_month(Some(s), current))
                    .transpose()?;
                input = input.recurring(end);
            }

            let written = service.add_expense(input)?;
            match (written.first(), written.last()) {
                (Some(first), Some(last)) if written.len() > 1 => {
                    println!(
                        "Added expense to {} month(s), {} to {}",
                        written.len(),
                        first,
                        last
                    );
                }
                _ => println!("Added expense to {}", month),
            }
        }

        ExpenseCommands::Toggle { index, month } => {
            let month = parse_month(month.as_deref(), current)?;
            let paid = service.toggle_paid(month, index)?;
            let expense = &service.month_expenses(month)[index];
            let status = if paid { "paid" } else { "unpaid" };
            println!("Marked {} as {}", expense.description, status);
        }

        ExpenseCommands::Edit {
            index,
            month,
            amount,
            due,
            description,
        } => {
            if amount.is_none() && due.is_none() && description.is_none() {
                println!("No changes specified. Use --amount, --due or --description.");
                return Ok(());
            }
            let month = parse_month(month.as_deref(), current)?;
            if let Some(amount) = amount {
                service.update_amount(month, index, parse_amount(&amount)?)?;
            }
            if let Some(due) = due {
                service.update_due_day(month, index, &due)?;
            }
            if let Some(description) = description {
                service.update_description(month, index, &description)?;
            }
            println!(
                "Updated expense: {}",
                service.month_expenses(month)[index].description
            );
        }

        ExpenseCommands::Delete { index, month } => {
            let month = parse_month(month.as_deref(), current)?;
            let removed = service.delete_expense(month, index)?;
            println!("Deleted expense: {}", removed.description);
        }

        ExpenseCommands::Months => {
            let months = service.months();
            if months.is_empty() {
                println!("No months found.");
            }
            for month in months {
                let summary = service.month_summary(month);
                println!(
                    "{}  {:>3} expense(s)  {:>14}",
                    month,
                    summary.count,
                    summary.total.format_with_symbol(&symbol)
                );
            }
        }
    }

    Ok(())
}
