use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, TransactionInput};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, gifts)
    Income,
    /// Money going out (rent, groceries, bills)
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Human-facing label, used for list headers and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind '{}'", other)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored income or expense entry.
///
/// `id` and `created_at` are assigned by the store; the kind never changes
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub name: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// Calendar day the money moved, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

/// A record ready to be inserted: everything except the store-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub name: String,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, input: TransactionInput) -> Self {
        Self {
            name: input.name,
            amount_cents: input.amount_cents,
            date: input.date,
            kind,
        }
    }
}

/// Partial update of an existing transaction. `None` leaves the field as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub amount_cents: Option<Cents>,
    pub date: Option<NaiveDate>,
}

impl From<TransactionInput> for TransactionPatch {
    fn from(input: TransactionInput) -> Self {
        Self {
            name: Some(input.name),
            amount_cents: Some(input.amount_cents),
            date: Some(input.date),
        }
    }
}
