//! Display formatting for terminal output
//!
//! Plain-text tables for wallet history, banks, cards, expenses and
//! installment plans. Amounts are printed with the configured currency symbol.

pub mod card;
pub mod expense;
pub mod installment;
pub mod wallet;

pub use card::{format_card_details, format_card_list};
pub use expense::format_expense_list;
pub use installment::format_installment_list;
pub use wallet::{format_bank_list, format_history};

/// Shorten text to `max_len` characters, ending with "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Width of the widest value, never below the header width
pub(crate) fn column_width<'a, I>(values: I, header: &str) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
