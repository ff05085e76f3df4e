//! Installment display formatting

use crate::models::Installment;

use super::truncate;

/// Format installment plans with progress and what is left to charge
pub fn format_installment_list(installments: &[Installment], symbol: &str) -> String {
    if installments.is_empty() {
        return "No installments found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:24}  {:16}  {:>7}  {:>14}  {:>14}  {:10}\n",
        "#", "Description", "Card", "Paid", "Per month", "Remaining", "Purchased"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for (index, plan) in installments.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}  {:24}  {:16}  {:>7}  {:>14}  {:>14}  {:10}\n",
            index,
            truncate(&plan.description, 24),
            truncate(&plan.card_name, 16),
            format!("{}/{}", plan.current_installment, plan.installment_count),
            plan.installment_value.format_with_symbol(symbol),
            plan.remaining_amount().format_with_symbol(symbol),
            plan.purchase_date.format("%Y-%m-%d").to_string()
        ));
    }

    output
}
