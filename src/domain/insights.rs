use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::{Category, Cents, Transaction};

/// Magnitude spent (or earned, for Income) per category, in declaration order.
pub type CategoryTotals = BTreeMap<Category, Cents>;

/// Sum the absolute amounts of every transaction per category.
/// All nine categories are present; categories without transactions are 0.
pub fn category_totals(transactions: &[Transaction]) -> CategoryTotals {
    let mut totals: CategoryTotals = Category::ALL.into_iter().map(|c| (c, 0)).collect();

    for transaction in transactions {
        *totals.entry(transaction.category).or_insert(0) += transaction.magnitude();
    }

    totals
}

/// The non-income category with the largest total.
/// Only categories with at least one transaction compete; on an exact tie the
/// category declared first wins. Returns `None` when there is no expense.
pub fn top_expense_category(transactions: &[Transaction]) -> Option<(Category, Cents)> {
    let totals = category_totals(transactions);

    let mut top: Option<(Category, Cents)> = None;
    for category in Category::ALL.into_iter().filter(|c| !c.is_income()) {
        if !transactions.iter().any(|t| t.category == category) {
            continue;
        }
        let total = totals.get(&category).copied().unwrap_or(0);
        match top {
            Some((_, best)) if best >= total => {}
            _ => top = Some((category, total)),
        }
    }

    top
}

/// Sum of all Income amounts.
pub fn total_income(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum()
}

/// Savings as a percentage of recorded income.
/// `savings` is the running total, so the rate can exceed what the visible
/// history alone would justify. Returns 0 when there is no income.
pub fn savings_rate(savings: Cents, transactions: &[Transaction]) -> f64 {
    let income = total_income(transactions);
    if income == 0 {
        return 0.0;
    }
    (savings as f64 / income as f64) * 100.0
}

/// Total outflow dated in the same calendar month (and year) as `today`.
pub fn monthly_spending(transactions: &[Transaction], today: NaiveDate) -> Cents {
    transactions
        .iter()
        .filter(|t| t.is_outflow())
        .filter(|t| t.date.year() == today.year() && t.date.month() == today.month())
        .map(|t| t.magnitude())
        .sum()
}
