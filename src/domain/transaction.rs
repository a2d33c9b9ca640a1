use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Cents};

pub type TransactionId = Uuid;

/// A single manually entered income or expense.
/// Transactions are immutable once recorded; the ledger only prepends new
/// ones or clears the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing insertion number, assigned by the ledger
    pub sequence: u64,
    /// Free-text label, never empty
    pub name: String,
    /// Signed amount: positive for income, negative for everything else
    pub amount: Cents,
    pub category: Category,
    /// Calendar date the transaction was entered
    pub date: NaiveDate,
}

impl Transaction {
    /// Create a transaction from an unsigned magnitude. The sign is derived
    /// from the category. Sequence number must be assigned by the ledger.
    pub fn new(
        name: impl Into<String>,
        magnitude: Cents,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            name: name.into(),
            amount: category.signed(magnitude),
            category,
            date,
        }
    }

    pub fn magnitude(&self) -> Cents {
        self.amount.abs()
    }

    pub fn is_income(&self) -> bool {
        self.category.is_income()
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0
    }
}
