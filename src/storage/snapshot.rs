//! Snapshot decoding and the snapshot store
//!
//! The whole ledger is one JSON document with four sections: `wallet`,
//! `cards`, `expenses` and `installments`. Loading is lenient: older layouts are
//! absorbed and individual records that cannot be read are skipped with a
//! warning instead of failing the whole load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::LedgerResult;
use crate::models::card::{invoice_card_name, LEGACY_INVOICE_PREFIX};
use crate::models::{
    invoice_description, Bank, CardId, CreditCard, ExpenseBook, Installment, LedgerState, Money,
    MonthKey, MonthlyExpense, Transaction, Wallet, GENERAL_BANK,
};

use super::file_io::{preserve_unreadable, read_json_value, write_json_atomic};

/// Card as found on disk; `id` and `override_available` are optional in older files
#[derive(Debug, Deserialize)]
struct CardRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    limit: Money,
    #[serde(default)]
    used: Money,
    #[serde(default, alias = "due_date")]
    due_day: String,
    #[serde(default)]
    override_available: Option<Money>,
}

impl From<CardRecord> for CreditCard {
    fn from(record: CardRecord) -> Self {
        let override_available = record
            .override_available
            .unwrap_or(record.limit - record.used);
        Self {
            id: record
                .id
                .filter(|id| !id.trim().is_empty())
                .map(CardId::from_string)
                .unwrap_or_default(),
            name: record.name,
            limit: record.limit,
            used: record.used,
            due_day: record.due_day,
            override_available,
        }
    }
}

/// Turn a raw JSON document into ledger state
///
/// Never fails: anything that cannot be understood is dropped with a warning.
pub fn decode(document: &Value) -> LedgerState {
    let empty = Map::new();
    let root = document.as_object().unwrap_or_else(|| {
        warn!("snapshot root is not an object, starting from an empty ledger");
        &empty
    });

    let wallet = decode_wallet(root.get("wallet"));
    let cards = decode_cards(root.get("cards"));
    let mut expenses = decode_expenses(root.get("expenses"));
    let mut installments: Vec<Installment> = decode_list(root.get("installments"), "installment");

    link_invoices(&mut expenses, &cards);
    link_installments(&mut installments, &cards);

    LedgerState {
        wallet,
        cards,
        expenses,
        installments,
    }
}

fn decode_record<T: DeserializeOwned>(value: &Value, kind: &str) -> Option<T> {
    match T::deserialize(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(kind, error = %e, "skipping unreadable record");
            None
        }
    }
}

fn decode_list<T: DeserializeOwned>(value: Option<&Value>, kind: &str) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| decode_record(item, kind))
            .collect(),
        Some(_) => {
            warn!(kind, "expected a list, ignoring section");
            Vec::new()
        }
    }
}

fn decode_wallet(value: Option<&Value>) -> Wallet {
    let Some(section) = value.and_then(Value::as_object) else {
        return Wallet::default();
    };

    let balance = match section.get("balance") {
        Some(v) => decode_record::<Money>(v, "wallet balance").unwrap_or_default(),
        None => Money::zero(),
    };

    let history: Vec<Transaction> = decode_list(section.get("history"), "transaction");

    let mut banks: Vec<Bank> = match section.get("banks") {
        Some(v) if !v.is_null() => decode_list(Some(v), "bank"),
        _ => {
            debug!("snapshot has no banks, assigning balance to {}", GENERAL_BANK);
            vec![Bank {
                name: GENERAL_BANK.to_string(),
                balance,
            }]
        }
    };

    let mut seen = std::collections::HashSet::new();
    banks.retain(|b| seen.insert(b.name.clone()));

    let mut wallet = Wallet {
        balance,
        history,
        banks,
    };
    wallet.ensure_general();
    wallet
}

fn decode_cards(value: Option<&Value>) -> Vec<CreditCard> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(_)) => decode_list::<CardRecord>(value, "card")
            .into_iter()
            .map(CreditCard::from)
            .collect(),
        Some(Value::Object(months)) => fold_monthly_cards(months),
        Some(_) => {
            warn!("cards section has an unknown shape, ignoring it");
            Vec::new()
        }
    }
}

/// Fold the legacy per-month card layout into one card per name
///
/// Months are visited in key order and the first occurrence of a name wins.
fn fold_monthly_cards(months: &Map<String, Value>) -> Vec<CreditCard> {
    let mut ordered: Vec<(&String, &Value)> = months.iter().collect();
    ordered.sort_by(|a, b| a.0.cmp(b.0));

    let mut cards: Vec<CreditCard> = Vec::new();
    for (month, list) in ordered {
        for record in decode_list::<CardRecord>(Some(list), "card") {
            if cards.iter().any(|c| c.name == record.name) {
                continue;
            }
            debug!(%month, name = %record.name, "migrating monthly card");
            cards.push(record.into());
        }
    }

    info!(count = cards.len(), "migrated cards from the monthly layout");
    cards
}

fn decode_expenses(value: Option<&Value>) -> ExpenseBook {
    let Some(section) = value.and_then(Value::as_object) else {
        return ExpenseBook::default();
    };

    let mut months = BTreeMap::new();
    for (key, list) in section {
        let month = match MonthKey::parse(key) {
            Ok(month) => month,
            Err(e) => {
                warn!(key = %key, error = %e, "skipping expenses under an invalid month");
                continue;
            }
        };

        let mut expenses: Vec<MonthlyExpense> = decode_list(Some(list), "expense");
        for expense in &mut expenses {
            let renamed = expense
                .description
                .strip_prefix(LEGACY_INVOICE_PREFIX)
                .map(invoice_description);
            if let Some(renamed) = renamed {
                expense.description = renamed;
            }
        }
        months
            .entry(month)
            .or_insert_with(Vec::new)
            .extend(expenses);
    }

    ExpenseBook::from_months(months)
}

/// Attach card ids to invoices that only carry the card name
fn link_invoices(expenses: &mut ExpenseBook, cards: &[CreditCard]) {
    for expense in expenses.iter_mut() {
        if expense.card_id.is_some() {
            continue;
        }
        if let Some(card) = invoice_card_name(&expense.description)
            .and_then(|name| cards.iter().find(|c| c.name == name))
        {
            expense.card_id = Some(card.id.clone());
        }
    }
}

fn link_installments(installments: &mut [Installment], cards: &[CreditCard]) {
    for plan in installments.iter_mut().filter(|p| p.card_id.is_none()) {
        if let Some(card) = cards.iter().find(|c| c.name == plan.card_name) {
            plan.card_id = Some(card.id.clone());
        }
    }
}

/// Loads and saves the single snapshot document
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the ledger state
    ///
    /// A missing file yields an empty ledger with `current_month` seeded. An
    /// unreadable file is copied aside and also yields an empty ledger.
    pub fn load(&self, now: NaiveDateTime) -> LedgerState {
        let current_month = MonthKey::from_date(now.date());

        match read_json_value(&self.path) {
            Ok(Some(document)) => {
                let state = decode(&document);
                debug!(
                    path = %self.path.display(),
                    transactions = state.wallet.history.len(),
                    cards = state.cards.len(),
                    installments = state.installments.len(),
                    "snapshot loaded"
                );
                state
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                LedgerState::empty(current_month)
            }
            Err(e) => {
                warn!(error = %e, "snapshot unreadable, starting from an empty ledger");
                let stamp = now.format("%Y%m%d-%H%M%S").to_string();
                match preserve_unreadable(&self.path, &stamp) {
                    Ok(copy) => warn!(copy = %copy.display(), "kept a copy of the unreadable snapshot"),
                    Err(e) => warn!(error = %e, "could not keep a copy of the unreadable snapshot"),
                }
                LedgerState::empty(current_month)
            }
        }
    }

    /// Persist the full ledger state atomically
    pub fn save(&self, state: &LedgerState) -> LedgerResult<()> {
        write_json_atomic(&self.path, state)?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn may() -> MonthKey {
        MonthKey::parse("2024-05").unwrap()
    }

    #[test]
    fn test_missing_file_gives_seeded_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("finance_data.json"));

        let state = store.load(now());
        assert_eq!(state, LedgerState::empty(may()));
        assert!(state.wallet.has_bank(GENERAL_BANK));
    }

    #[test]
    fn test_corrupt_file_gives_empty_state_and_keeps_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("finance_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let state = SnapshotStore::new(path).load(now());
        assert_eq!(state, LedgerState::empty(may()));
        assert!(temp_dir
            .path()
            .join("finance_data.json.unreadable-20240510-090000")
            .exists());
    }

    #[test]
    fn test_save_then_load_preserves_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("data").join("finance_data.json"));

        let mut state = LedgerState::empty(may());
        state.wallet.record(Transaction::at(
            now(),
            TransactionKind::Income,
            Money::from_cents(123456),
            "salary",
            "Itau",
        ))
        .unwrap();
        let mut card = CreditCard::new("Visa", Money::from_units(2000), "10");
        card.used = Money::from_cents(30050);
        state.expenses.upsert_invoice(&card, may());
        state.installments.push(Installment::new(
            "TV",
            Money::from_units(1200),
            3,
            &card,
            now().date(),
        ));
        state.cards.push(card);

        store.save(&state).unwrap();
        assert_eq!(store.load(now()), state);
    }

    #[test]
    fn test_current_layout_fields() {
        let mut state = LedgerState::empty(may());
        state.cards.push(CreditCard::new("Visa", Money::from_units(100), "5"));
        let json = serde_json::to_value(&state).unwrap();

        assert!(json["wallet"]["balance"].is_number());
        assert!(json["wallet"]["history"].is_array());
        assert_eq!(json["wallet"]["banks"][0]["name"], GENERAL_BANK);
        assert_eq!(json["cards"][0]["due_day"], "5");
        assert_eq!(json["cards"][0]["override_available"], 100.0);
        assert!(json["expenses"]["2024-05"].is_array());
        assert!(json["installments"].is_array());
    }

    #[test]
    fn test_legacy_monthly_cards_are_folded() {
        let document = json!({
            "wallet": {"balance": 250.0, "history": []},
            "cards": {
                "2024-04": [
                    {"name": "Nubank", "limit": 1000.0, "used": 200.0, "due_date": "10"}
                ],
                "2024-05": [
                    {"name": "Nubank", "limit": 5000.0, "used": 0.0, "due_date": "12"},
                    {"name": "Inter", "limit": 800.0, "used": 100.0, "due_date": "3"}
                ]
            },
            "expenses": {
                "2024-04": [{"description": "Fatura Nubank", "amount": 200.0, "due_date": "10", "paid": false}]
            }
        });

        let state = decode(&document);

        assert_eq!(state.cards.len(), 2);
        let nubank = &state.cards[0];
        assert_eq!(nubank.name, "Nubank");
        assert_eq!(nubank.limit, Money::from_units(1000));
        assert_eq!(nubank.due_day, "10");
        assert_eq!(nubank.override_available, Money::from_units(800));
        assert!(!nubank.id.as_str().is_empty());

        let april = MonthKey::parse("2024-04").unwrap();
        let invoice = &state.expenses.month(april)[0];
        assert_eq!(invoice.description, "Invoice Nubank");
        assert_eq!(invoice.card_id, Some(nubank.id.clone()));
    }

    #[test]
    fn test_missing_banks_default_to_general_with_balance() {
        let document = json!({"wallet": {"balance": 321.5, "history": []}});
        let state = decode(&document);

        assert_eq!(state.wallet.balance, Money::from_cents(32150));
        assert_eq!(state.wallet.banks.len(), 1);
        assert_eq!(state.wallet.bank_balance(GENERAL_BANK), Money::from_cents(32150));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let document = json!({
            "wallet": {
                "balance": 10.0,
                "history": [
                    {"date": "01/05/2024 10:00", "type": "Entrada", "amount": 10.0, "description": "ok"},
                    {"date": "yesterday", "type": "Entrada", "amount": 5.0, "description": "bad date"}
                ],
                "banks": [{"name": "Geral", "balance": 10.0}, {"balance": 3.0}]
            },
            "cards": [{"limit": 100.0}, {"id": "c1", "name": "Visa", "limit": 100.0, "used": 0.0, "due_day": "1"}],
            "expenses": {
                "not-a-month": [],
                "2024-05": [{"amount": 1.0}, {"description": "Rent", "amount": 900.0}]
            },
            "installments": [{"description": "broken"}]
        });

        let state = decode(&document);
        assert_eq!(state.wallet.history.len(), 1);
        assert_eq!(state.wallet.banks.len(), 1);
        assert_eq!(state.cards.len(), 1);
        assert_eq!(state.cards[0].id, CardId::from_string("c1"));
        assert_eq!(state.expenses.months().count(), 1);
        assert_eq!(state.expenses.month(may()).len(), 1);
        assert!(state.installments.is_empty());
    }

    #[test]
    fn test_installment_linked_by_card_name() {
        let document = json!({
            "cards": [{"id": "c1", "name": "CardA", "limit": 5000.0, "used": 400.0, "due_day": "10"}],
            "installments": [{
                "description": "TV", "total_amount": 1200.0, "installment_count": 3,
                "current_installment": 1, "installment_value": 400.0,
                "purchase_date": "2024-05-01", "card_name": "CardA"
            }]
        });

        let state = decode(&document);
        assert_eq!(
            state.installments[0].card_id,
            Some(CardId::from_string("c1"))
        );
    }

    #[test]
    fn test_non_object_root_is_empty() {
        let state = decode(&json!([1, 2, 3]));
        assert_eq!(state, LedgerState::default());
    }
}
