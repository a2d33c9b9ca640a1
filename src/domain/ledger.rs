use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::insights;
use super::{
    Category, CategoryTotals, Cents, ParseCentsError, Transaction, format_cents, parse_cents,
};

/// Share of every income event moved to savings, in percent.
pub const AUTO_SAVE_PERCENT: Cents = 20;

/// Running totals. They are updated incrementally on every `add` and are
/// never recomputed from the transaction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub balance: Cents,
    pub expenses: Cents,
    pub savings: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStatus {
    Populated,
    Empty,
}

/// The in-memory ledger: running totals plus a most-recent-first audit log.
///
/// The log is only reachable through shared references, so the totals and the
/// log cannot drift apart from outside.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    summary: LedgerSummary,
    /// Sum of income amounts; bounds every aggregate derived from the log
    income: Cents,
    transactions: Vec<Transaction>,
    next_sequence: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger seeded with the demonstration transactions. Totals are
    /// derived from the seed, not set independently.
    pub fn with_demo_data() -> Self {
        Self::from_history(demo_transactions()).unwrap_or_default()
    }

    /// Build a ledger from an existing most-recent-first transaction list.
    /// Transactions are replayed oldest first so every total is derived;
    /// amounts are re-signed from their category. Fails if a total would
    /// leave the `Cents` range.
    pub fn from_history(transactions: Vec<Transaction>) -> Result<Self, InvalidEntry> {
        let mut ledger = Self::new();
        for transaction in transactions.into_iter().rev() {
            let input = format_cents(transaction.amount);
            ledger
                .record(transaction)
                .map_err(|reason| InvalidEntry::InvalidAmount { input, reason })?;
        }
        Ok(ledger)
    }

    /// Record a manually entered transaction dated today (UTC).
    ///
    /// `amount` is an unsigned magnitude; any sign the user typed is dropped
    /// and replaced by the category's sign. On rejection nothing changes.
    pub fn add(
        &mut self,
        name: &str,
        amount: &str,
        category: Category,
    ) -> Result<Transaction, InvalidEntry> {
        self.add_on(name, amount, category, Utc::now().date_naive())
    }

    fn add_on(
        &mut self,
        name: &str,
        amount: &str,
        category: Category,
        date: NaiveDate,
    ) -> Result<Transaction, InvalidEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InvalidEntry::EmptyName);
        }

        let magnitude = parse_cents(amount)
            .map_err(|reason| InvalidEntry::InvalidAmount {
                input: amount.to_string(),
                reason,
            })?
            .abs();

        let recorded = self
            .record(Transaction::new(name, magnitude, category, date))
            .map_err(|reason| InvalidEntry::InvalidAmount {
                input: amount.to_string(),
                reason,
            })?;
        Ok(recorded.clone())
    }

    /// Apply a transaction to the totals and prepend it to the log.
    /// Nothing changes if any total would overflow.
    fn record(&mut self, mut transaction: Transaction) -> Result<&Transaction, ParseCentsError> {
        let magnitude = transaction
            .amount
            .checked_abs()
            .ok_or(ParseCentsError::OutOfRange)?;
        transaction.amount = transaction.category.signed(magnitude);

        let (summary, income) = self
            .totals_after(&transaction)
            .ok_or(ParseCentsError::OutOfRange)?;
        self.summary = summary;
        self.income = income;

        self.next_sequence += 1;
        transaction.sequence = self.next_sequence;
        self.transactions.insert(0, transaction);
        Ok(&self.transactions[0])
    }

    fn totals_after(&self, transaction: &Transaction) -> Option<(LedgerSummary, Cents)> {
        let amount = transaction.amount;
        let mut summary = self.summary;
        let mut income = self.income;

        summary.balance = summary.balance.checked_add(amount)?;
        if transaction.is_income() {
            summary.savings = summary.savings.checked_add(auto_save(amount))?;
            income = income.checked_add(amount)?;
        } else {
            summary.expenses = summary.expenses.checked_sub(amount)?;
        }

        Some((summary, income))
    }

    /// Reset totals and drop every transaction.
    /// Sequence numbers keep counting so they are never reused in a process.
    pub fn clear(&mut self) {
        let next_sequence = self.next_sequence;
        *self = Self {
            next_sequence,
            ..Self::default()
        };
    }

    pub fn summary(&self) -> LedgerSummary {
        self.summary
    }

    pub fn balance(&self) -> Cents {
        self.summary.balance
    }

    pub fn expenses(&self) -> Cents {
        self.summary.expenses
    }

    pub fn savings(&self) -> Cents {
        self.summary.savings
    }

    /// All transactions, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The `limit` most recent transactions.
    pub fn recent(&self, limit: usize) -> &[Transaction] {
        &self.transactions[..limit.min(self.transactions.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn status(&self) -> LedgerStatus {
        if self.is_empty() {
            LedgerStatus::Empty
        } else {
            LedgerStatus::Populated
        }
    }

    /// Transactions grouped by category in declaration order. Categories
    /// without transactions are skipped; each group stays most-recent-first.
    pub fn by_category(&self) -> Vec<(Category, Vec<&Transaction>)> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let group: Vec<&Transaction> = self
                    .transactions
                    .iter()
                    .filter(|t| t.category == category)
                    .collect();
                (!group.is_empty()).then_some((category, group))
            })
            .collect()
    }

    pub fn category_totals(&self) -> CategoryTotals {
        insights::category_totals(&self.transactions)
    }

    pub fn top_expense_category(&self) -> Option<(Category, Cents)> {
        insights::top_expense_category(&self.transactions)
    }

    pub fn savings_rate(&self) -> f64 {
        insights::savings_rate(self.summary.savings, &self.transactions)
    }

    /// Outflow in the current calendar month (UTC).
    pub fn monthly_spending(&self) -> Cents {
        self.monthly_spending_at(Utc::now().date_naive())
    }

    pub fn monthly_spending_at(&self, today: NaiveDate) -> Cents {
        insights::monthly_spending(&self.transactions, today)
    }
}

/// The share of a non-negative income moved to savings, truncated to the cent.
/// Split into whole units and remainder so it cannot overflow.
fn auto_save(amount: Cents) -> Cents {
    amount / 100 * AUTO_SAVE_PERCENT + amount % 100 * AUTO_SAVE_PERCENT / 100
}

/// The demonstration data a fresh dashboard starts with, most recent first.
pub fn demo_transactions() -> Vec<Transaction> {
    let seed: [(&str, Cents, Category, u32); 8] = [
        ("Grocery Shopping", 525000, Category::Food, 10),
        ("Salary Deposit", 8500000, Category::Income, 8),
        ("Netflix Subscription", 64900, Category::Entertainment, 7),
        ("Petrol", 280000, Category::Transport, 6),
        ("Electricity Bill", 350000, Category::Bills, 5),
        ("Health Insurance", 210000, Category::Health, 4),
        ("Online Course", 199900, Category::Education, 3),
        ("Shopping Mall", 450000, Category::Shopping, 2),
    ];

    seed.into_iter()
        .filter_map(|(name, cents, category, day)| {
            NaiveDate::from_ymd_opt(2024, 3, day)
                .map(|date| Transaction::new(name, cents, category, date))
        })
        .collect()
}

/// Why an entry was rejected. Rejections never mutate the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntry {
    EmptyName,
    InvalidAmount {
        input: String,
        reason: ParseCentsError,
    },
}

impl std::fmt::Display for InvalidEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidEntry::EmptyName => write!(f, "transaction name must not be empty"),
            InvalidEntry::InvalidAmount { input, reason } => {
                write!(f, "invalid amount '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for InvalidEntry {}
