use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "wallet";

fn wallet(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("WALLET_LEDGER_DATA_DIR", data_dir.path());
    cmd.env_remove("WALLET_LEDGER_LOG");
    cmd
}

fn run(data_dir: &TempDir, args: &[&str]) {
    wallet(data_dir).args(args).assert().success();
}

#[test]
fn init_creates_settings_and_ledger() {
    let data_dir = TempDir::new().unwrap();

    wallet(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("finance_data.json").exists());
}

#[test]
fn income_and_outflow_update_balance() {
    let data_dir = TempDir::new().unwrap();

    run(&data_dir, &["wallet", "income", "1000", "Salary", "--bank", "Itau"]);

    wallet(&data_dir)
        .args(["wallet", "outflow", "1500", "Rent"])
        .assert()
        .failure()
        .stderr(contains("Insufficient funds"));

    wallet(&data_dir)
        .args(["wallet", "outflow", "500", "Rent"])
        .assert()
        .success()
        .stdout(contains("R$ 500.00"));

    wallet(&data_dir)
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(contains("Itau").and(contains("WALLET")));
}

#[test]
fn oversized_amounts_are_rejected() {
    let data_dir = TempDir::new().unwrap();

    wallet(&data_dir)
        .args(["wallet", "income", "100000000000000000", "x"])
        .assert()
        .failure()
        .stderr(contains("Amount out of range"));

    run(&data_dir, &["wallet", "income", "92233720368547758", "jackpot"]);
    wallet(&data_dir)
        .args(["wallet", "income", "1", "one more"])
        .assert()
        .failure()
        .stderr(contains("Amount out of range"));

    wallet(&data_dir)
        .args(["wallet", "balance"])
        .assert()
        .success()
        .stdout(contains("R$ 92233720368547758.00"));
}

#[test]
fn card_edit_with_bad_argument_changes_nothing() {
    let data_dir = TempDir::new().unwrap();

    run(&data_dir, &["card", "add", "Visa", "2000"]);

    wallet(&data_dir)
        .args(["card", "edit", "0", "--limit", "5000", "--available", "abc"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));

    wallet(&data_dir)
        .args(["card", "show", "0"])
        .assert()
        .success()
        .stdout(contains("Limit:     R$ 2000.00"));

    wallet(&data_dir)
        .args(["card", "edit", "0", "--limit", "5000", "--due", "20"])
        .assert()
        .success();

    wallet(&data_dir)
        .args(["card", "show", "0"])
        .assert()
        .success()
        .stdout(contains("Limit:     R$ 5000.00").and(contains("Due day:   20")));
}

#[test]
fn card_invoice_is_paid_from_wallet() {
    let data_dir = TempDir::new().unwrap();

    run(&data_dir, &["wallet", "income", "1000", "Salary"]);
    run(&data_dir, &["card", "add", "Visa", "2000", "--due", "10"]);
    run(&data_dir, &["card", "set-used", "0", "300"]);

    wallet(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("Invoice Visa"));

    wallet(&data_dir)
        .args(["card", "pay", "0"])
        .assert()
        .success()
        .stdout(contains("Paid R$ 300.00 on Visa"));

    wallet(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("Invoice Visa").not());

    wallet(&data_dir)
        .args(["wallet", "balance"])
        .assert()
        .success()
        .stdout(contains("R$ 700.00"));
}

#[test]
fn installment_rolls_until_complete() {
    let data_dir = TempDir::new().unwrap();

    run(&data_dir, &["card", "add", "CardA", "5000"]);
    wallet(&data_dir)
        .args(["installment", "add", "TV", "1200", "3", "CardA"])
        .assert()
        .success()
        .stdout(contains("3 x R$ 400.00"));

    run(&data_dir, &["installment", "roll"]);
    run(&data_dir, &["installment", "roll"]);
    wallet(&data_dir)
        .args(["installment", "roll"])
        .assert()
        .success()
        .stdout(contains("Completed: 1"));

    wallet(&data_dir)
        .args(["installment", "list"])
        .assert()
        .success()
        .stdout(contains("No installments found"));
}

#[test]
fn unknown_card_installment_fails() {
    let data_dir = TempDir::new().unwrap();

    wallet(&data_dir)
        .args(["installment", "add", "TV", "1200", "3", "Nope"])
        .assert()
        .failure()
        .stderr(contains("Card not found"));
}

#[test]
fn paying_expense_debits_wallet() {
    let data_dir = TempDir::new().unwrap();

    run(&data_dir, &["wallet", "income", "100", "Gift"]);
    run(&data_dir, &["expense", "add", "Water", "60", "--due", "12"]);

    wallet(&data_dir)
        .args(["expense", "toggle", "0"])
        .assert()
        .success()
        .stdout(contains("Marked Water as paid"));

    wallet(&data_dir)
        .args(["wallet", "balance"])
        .assert()
        .success()
        .stdout(contains("R$ 40.00"));
}

#[test]
fn corrupt_snapshot_starts_empty() {
    let data_dir = TempDir::new().unwrap();
    let data = data_dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("finance_data.json"), "{ not json").unwrap();

    wallet(&data_dir)
        .args(["wallet", "balance"])
        .assert()
        .success()
        .stdout(contains("R$ 0.00"));

    let preserved = std::fs::read_dir(&data)
        .unwrap()
        .filter_map(Result::ok)
        .any(|e| e.file_name().to_string_lossy().contains("unreadable"));
    assert!(preserved);
}
