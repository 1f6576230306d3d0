// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tally::application::LedgerService;
use tally::domain::{TransactionForm, TransactionInput};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a YYYY-MM-DD string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Form as a user would fill it in
pub fn form(name: &str, amount: &str, date: &str) -> TransactionForm {
    TransactionForm {
        name: name.into(),
        amount: amount.into(),
        date: date.into(),
    }
}

/// Already-validated input
pub fn input(name: &str, amount_cents: i64, date: &str) -> TransactionInput {
    TransactionInput {
        name: name.into(),
        amount_cents,
        date: parse_date(date),
    }
}
