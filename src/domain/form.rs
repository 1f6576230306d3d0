use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    date, format_cents, parse_cents, Cents, ParseCentsError, Transaction, MAX_AMOUNT_CENTS,
};

/// Raw field values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub name: String,
    pub amount: String,
    pub date: String,
}

/// Validated field values, safe to hand to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub name: String,
    pub amount_cents: Cents,
    pub date: NaiveDate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Amount must be a number, got '{0}'")]
    InvalidAmount(String),

    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    #[error("Amount must not exceed {}", format_cents(MAX_AMOUNT_CENTS))]
    AmountTooLarge,

    #[error("Date is required")]
    MissingDate,

    #[error("Date must be in YYYY-MM-DD format, got '{0}'")]
    InvalidDate(String),

    #[error("Rejected by the store: {0}")]
    Rejected(String),
}

impl TransactionForm {
    /// An empty form for a new entry, dated `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            date: date::format_day(today),
        }
    }

    /// A form pre-filled with an existing entry, for editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            name: transaction.name.clone(),
            amount: format_cents(transaction.amount_cents),
            date: date::format_day(transaction.date),
        }
    }

    pub fn validate(&self) -> Result<TransactionInput, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let amount_cents = parse_cents(&self.amount).map_err(|e| match e {
            ParseCentsError::Overflow => ValidationError::AmountTooLarge,
            ParseCentsError::InvalidFormat => {
                ValidationError::InvalidAmount(self.amount.trim().to_string())
            }
        })?;
        if amount_cents <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if amount_cents > MAX_AMOUNT_CENTS {
            return Err(ValidationError::AmountTooLarge);
        }

        let raw_date = self.date.trim();
        if raw_date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = date::parse_day(raw_date)
            .ok_or_else(|| ValidationError::InvalidDate(raw_date.to_string()))?;

        Ok(TransactionInput {
            name: name.to_string(),
            amount_cents,
            date,
        })
    }
}
