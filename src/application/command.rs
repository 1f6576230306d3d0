use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, DayBucket, Transaction, TransactionForm, TransactionId, TransactionKind};

/// A user intent coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reload both lists from the store.
    Refresh,
    Add {
        kind: TransactionKind,
        form: TransactionForm,
    },
    /// Change name, amount and date. The kind of an entry never changes.
    Edit {
        id: TransactionId,
        form: TransactionForm,
    },
    Delete {
        id: TransactionId,
        kind: TransactionKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Non-blocking message reporting the outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Everything the presentation layer needs to render, as plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerView {
    pub today: NaiveDate,
    pub net_worth: Cents,
    pub current_balance: Cents,
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    /// Entries from the trailing month only
    pub recent_incomes: Vec<Transaction>,
    pub recent_expenses: Vec<Transaction>,
    pub days: BTreeMap<NaiveDate, DayBucket>,
}

impl LedgerView {
    pub fn list(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.incomes,
            TransactionKind::Expense => &self.expenses,
        }
    }

    pub fn recent(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.recent_incomes,
            TransactionKind::Expense => &self.recent_expenses,
        }
    }
}
