use thiserror::Error;

use crate::domain::InvalidEntry;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid entry: {0}")]
    InvalidEntry(#[from] InvalidEntry),

    #[error("Unknown category '{0}'. Valid categories: Food, Transport, Entertainment, Shopping, Bills, Health, Education, Income, Other")]
    UnknownCategory(String),

    #[error("Invalid export type '{0}'. Valid types: transactions, categories, full")]
    UnknownExportType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True for entries the ledger refused. These are no-ops for the caller.
    pub fn is_rejected_entry(&self) -> bool {
        matches!(self, AppError::InvalidEntry(_) | AppError::UnknownCategory(_))
    }
}
