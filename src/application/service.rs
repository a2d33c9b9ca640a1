use chrono::{NaiveDate, Utc};

use crate::domain::{Category, Cents, Ledger, LedgerStatus, LedgerSummary, Transaction, total_income};

use super::{AppError, CategoryReport, CategorySummary, InsightsReport, LedgerSnapshot, TopExpense};

/// Application service providing high-level operations over one ledger.
/// This is the primary interface for any client (CLI session, export, tests).
/// It owns the ledger outright; there is no shared or global instance.
pub struct LedgerService {
    ledger: Ledger,
}

impl LedgerService {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn empty() -> Self {
        Self::new(Ledger::new())
    }

    pub fn with_demo_data() -> Self {
        Self::new(Ledger::with_demo_data())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ========================
    // Mutations
    // ========================

    /// Record a transaction from raw user input.
    /// The category is matched case-insensitively.
    pub fn add_transaction(
        &mut self,
        name: &str,
        amount: &str,
        category: &str,
    ) -> Result<Transaction, AppError> {
        let category: Category = category
            .parse()
            .map_err(|_| AppError::UnknownCategory(category.trim().to_string()))?;
        Ok(self.ledger.add(name, amount, category)?)
    }

    /// Drop every transaction and zero all totals.
    pub fn clear_all(&mut self) {
        self.ledger.clear();
    }

    // ========================
    // Queries
    // ========================

    pub fn summary(&self) -> LedgerSummary {
        self.ledger.summary()
    }

    pub fn status(&self) -> LedgerStatus {
        self.ledger.status()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn recent(&self, limit: usize) -> &[Transaction] {
        self.ledger.recent(limit)
    }

    pub fn transactions_by_category(&self) -> Vec<(Category, Vec<&Transaction>)> {
        self.ledger.by_category()
    }

    /// Totals, counts and expense shares for all nine categories.
    pub fn category_report(&self) -> CategoryReport {
        let transactions = self.ledger.transactions();
        let totals = self.ledger.category_totals();
        let total_expense: Cents = totals
            .iter()
            .filter(|(c, _)| !c.is_income())
            .map(|(_, total)| total)
            .sum();

        let categories = totals
            .into_iter()
            .map(|(category, total)| {
                let count = transactions.iter().filter(|t| t.category == category).count();
                let percentage = if category.is_income() || total_expense == 0 {
                    0.0
                } else {
                    (total as f64 / total_expense as f64) * 100.0
                };
                CategorySummary {
                    category,
                    total,
                    count,
                    percentage,
                }
            })
            .collect();

        CategoryReport {
            categories,
            total_expense,
            total_income: total_income(transactions),
        }
    }

    /// Derived insights as of today (UTC).
    pub fn insights(&self) -> InsightsReport {
        self.insights_at(Utc::now().date_naive())
    }

    pub fn insights_at(&self, today: NaiveDate) -> InsightsReport {
        InsightsReport {
            as_of: today,
            top_expense: self
                .ledger
                .top_expense_category()
                .map(|(category, total)| TopExpense { category, total }),
            monthly_spending: self.ledger.monthly_spending_at(today),
            savings_rate: self.ledger.savings_rate(),
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            summary: self.ledger.summary(),
            transactions: self.ledger.transactions().to_vec(),
        }
    }
}
