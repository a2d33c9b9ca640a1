use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Cents, LedgerSummary, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    /// Sum of all non-income category totals
    pub total_expense: Cents,
    pub total_income: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: Cents,
    pub count: usize,
    /// Share of total expense; 0 for Income
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsReport {
    pub as_of: NaiveDate,
    pub top_expense: Option<TopExpense>,
    pub monthly_spending: Cents,
    pub savings_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopExpense {
    pub category: Category,
    pub total: Cents,
}

/// Everything the dashboard shows, in one serializable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: chrono::DateTime<Utc>,
    pub summary: LedgerSummary,
    pub transactions: Vec<Transaction>,
}
