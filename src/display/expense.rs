//! Expense display formatting

use crate::models::{MonthKey, MonthSummary, MonthlyExpense};

use super::truncate;

/// Format a month's expenses with paid/pending totals
pub fn format_expense_list(
    month: MonthKey,
    expenses: &[MonthlyExpense],
    summary: &MonthSummary,
    symbol: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("Expenses for {}\n\n", month));

    if expenses.is_empty() {
        output.push_str("No expenses found.\n");
        return output;
    }

    output.push_str(&format!(
        "{:>3}  {:4}  {:30}  {:>14}  {:>4}  {}\n",
        "#", "Paid", "Description", "Amount", "Due", "Notes"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for (index, expense) in expenses.iter().enumerate() {
        let paid = if expense.paid { "[x]" } else { "[ ]" };
        let notes = match (expense.is_invoice(), expense.recurrence_end) {
            (true, _) => "card invoice".to_string(),
            (false, Some(end)) if expense.recurring => format!("recurring until {}", end),
            _ => String::new(),
        };
        output.push_str(&format!(
            "{:>3}  {:4}  {:30}  {:>14}  {:>4}  {}\n",
            index,
            paid,
            truncate(&expense.description, 30),
            expense.amount.format_with_symbol(symbol),
            expense.due_day,
            notes
        ));
    }

    output.push_str(&"-".repeat(72));
    output.push('\n');
    output.push_str(&format!(
        "Total: {}   Paid: {}   To pay: {}\n",
        summary.total.format_with_symbol(symbol),
        summary.paid.format_with_symbol(symbol),
        summary.pending.format_with_symbol(symbol)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_expense_list() {
        let month = MonthKey::parse("2024-05").unwrap();
        let mut rent = MonthlyExpense::new("Rent", Money::from_units(800), "5");
        rent.paid = true;
        let water = MonthlyExpense::new("Water", Money::from_units(60), "12");
        let summary = MonthSummary {
            total: Money::from_units(860),
            paid: Money::from_units(800),
            pending: Money::from_units(60),
            count: 2,
        };

        let formatted = format_expense_list(month, &[rent, water], &summary, "R$");

        assert!(formatted.contains("Expenses for 2024-05"));
        assert!(formatted.contains("[x]"));
        assert!(formatted.contains("To pay: R$ 60.00"));
    }

    #[test]
    fn test_format_empty_month() {
        let month = MonthKey::parse("2024-05").unwrap();
        let formatted = format_expense_list(month, &[], &MonthSummary::default(), "R$");
        assert!(formatted.contains("No expenses found"));
    }
}
