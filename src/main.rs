use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wallet_ledger::cli::{
    handle_bank_command, handle_card_command, handle_expense_command, handle_installment_command,
    handle_wallet_command, BankCommands, CardCommands, ExpenseCommands, InstallmentCommands,
    WalletCommands,
};
use wallet_ledger::config::{LedgerPaths, Settings};
use wallet_ledger::ledger::Ledger;
use wallet_ledger::services::CardService;

/// Environment variable holding the log filter (e.g. "wallet_ledger=debug")
const LOG_ENV: &str = "WALLET_LEDGER_LOG";

#[derive(Parser)]
#[command(
    name = "wallet",
    version,
    about = "Terminal personal finance tracker",
    long_about = "wallet-ledger keeps a wallet with per-bank balances, credit cards \
                  with their monthly invoices, installment purchases and monthly \
                  expenses consistent with each other, stored in a single JSON file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income, outflows and transaction history
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Bank management commands
    #[command(subcommand)]
    Bank(BankCommands),

    /// Credit card management commands
    #[command(subcommand)]
    Card(CardCommands),

    /// Installment purchase commands
    #[command(subcommand, alias = "inst")]
    Installment(InstallmentCommands),

    /// Monthly expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Overview of wallet, cards and the current month
    Summary,

    /// Create the data directory, settings and an empty ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut ledger = Ledger::open(&paths, settings.clone())?;

    match cli.command {
        Some(Commands::Wallet(cmd)) => handle_wallet_command(&mut ledger, cmd)?,
        Some(Commands::Bank(cmd)) => handle_bank_command(&mut ledger, cmd)?,
        Some(Commands::Card(cmd)) => handle_card_command(&mut ledger, cmd)?,
        Some(Commands::Installment(cmd)) => handle_installment_command(&mut ledger, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&mut ledger, cmd)?,
        Some(Commands::Summary) => print_summary(&mut ledger),
        Some(Commands::Init) => {
            println!("Initializing wallet-ledger at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            if !ledger.store().exists() {
                ledger.save()?;
            }
            println!("Initialization complete!");
            println!();
            println!("Settings: {}", paths.settings_file().display());
            println!("Ledger:   {}", paths.snapshot_file().display());
            println!();
            println!("Run 'wallet wallet income <amount> <description>' to get started.");
        }
        Some(Commands::Config) => {
            println!("wallet-ledger Configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Ledger file:    {}", paths.snapshot_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Timestamp format:   {}", settings.timestamp_format);
            println!(
                "  Recurrence horizon: {} month(s)",
                settings.recurrence_horizon_months
            );
            println!("  Enforce card limit: {}", settings.enforce_card_limit);
        }
        None => {
            println!("wallet-ledger - Terminal personal finance tracker");
            println!();
            println!("Run 'wallet --help' for usage information.");
            println!("Run 'wallet summary' for an overview.");
        }
    }

    Ok(())
}

fn print_summary(ledger: &mut Ledger) {
    let symbol = ledger.settings().currency_symbol.clone();
    let month = ledger.current_month();
    let state = ledger.state();
    let expenses = state.expenses.summary(month);

    println!("Wallet");
    println!(
        "  Balance:      {}",
        state.wallet.balance.format_with_symbol(&symbol)
    );
    println!("  Banks:        {}", state.wallet.banks.len());
    println!("  Transactions: {}", state.wallet.history.len());
    println!();
    println!("Expenses {}", month);
    println!("  Total:  {}", expenses.total.format_with_symbol(&symbol));
    println!("  Paid:   {}", expenses.paid.format_with_symbol(&symbol));
    println!("  To pay: {}", expenses.pending.format_with_symbol(&symbol));
    println!();
    println!("Installments: {}", state.installments.len());

    let card_count = state.cards.len();
    let totals = CardService::new(ledger).totals();
    println!();
    println!("Cards: {}", card_count);
    println!("  Limit:     {}", totals.limit.format_with_symbol(&symbol));
    println!("  Used:      {}", totals.used.format_with_symbol(&symbol));
    println!(
        "  Available: {}",
        totals.available.format_with_symbol(&symbol)
    );
}
