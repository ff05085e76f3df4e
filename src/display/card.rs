//! Card display formatting

use crate::models::CreditCard;
use crate::services::CardTotals;

use super::column_width;

/// Format cards as a numbered table with totals
///
/// Cards may share a name, so each row also carries the short card id.
pub fn format_card_list(cards: &[CreditCard], totals: &CardTotals, symbol: &str) -> String {
    if cards.is_empty() {
        return "No cards found.\n".to_string();
    }

    let name_width = column_width(cards.iter().map(|c| c.name.as_str()), "Card");

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<name_width$}  {:<13}  {:>14}  {:>14}  {:>14}  {:>4}\n",
        "#",
        "Card",
        "ID",
        "Limit",
        "Used",
        "Available",
        "Due",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:->3}  {:-<name_width$}  {:-<13}  {:->14}  {:->14}  {:->14}  {:->4}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (index, card) in cards.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<13}  {:>14}  {:>14}  {:>14}  {:>4}\n",
            index,
            card.name,
            card.id.short(),
            card.limit.format_with_symbol(symbol),
            card.used.format_with_symbol(symbol),
            card.calculated_available().format_with_symbol(symbol),
            card.due_day,
            name_width = name_width,
        ));
    }

    output.push_str(&format!(
        "{:>3}  {:<name_width$}  {:<13}  {:>14}  {:>14}  {:>14}\n",
        "",
        "TOTAL",
        "",
        totals.limit.format_with_symbol(symbol),
        totals.used.format_with_symbol(symbol),
        totals.available.format_with_symbol(symbol),
        name_width = name_width,
    ));

    output
}

/// Format a single card's details
pub fn format_card_details(card: &CreditCard, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card.name));
    output.push_str(&format!("  ID:        {}\n", card.id));
    output.push_str(&format!("  Limit:     {}\n", card.limit.format_with_symbol(symbol)));
    output.push_str(&format!("  Used:      {}\n", card.used.format_with_symbol(symbol)));
    output.push_str(&format!(
        "  Available: {}\n",
        card.calculated_available().format_with_symbol(symbol)
    ));
    if card.override_available != card.calculated_available() {
        output.push_str(&format!(
            "  Available (manual): {}\n",
            card.override_available.format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!("  Due day:   {}\n", card.due_day));

    output
}
