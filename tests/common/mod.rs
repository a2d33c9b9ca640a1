// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use budgetboard::application::LedgerService;
use budgetboard::cli::{SessionOptions, run_session};
use chrono::NaiveDate;

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Run a session script against `service`, returning stdout and the number
/// of commands executed
pub fn run_script(service: &mut LedgerService, script: &str) -> Result<(String, usize)> {
    let mut out = Vec::new();
    let executed = run_session(service, script.as_bytes(), &mut out, SessionOptions::default())?;
    Ok((String::from_utf8(out)?, executed))
}

/// Test fixture: typical month of entries
pub struct StandardEntries;

impl StandardEntries {
    /// One salary and a few expenses across categories
    pub fn record_month(service: &mut LedgerService) -> Result<()> {
        service.add_transaction("Salary", "50000", "Income")?;
        service.add_transaction("Rent", "15000", "Bills")?;
        service.add_transaction("Groceries", "4200.50", "Food")?;
        service.add_transaction("Metro card", "800", "Transport")?;
        Ok(())
    }
}
