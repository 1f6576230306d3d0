use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{date, Cents, Transaction, TransactionId, TransactionKind};

/// The client-side copy of the ledger: incomes and expenses held apart,
/// each sorted most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
}

impl LedgerState {
    pub fn new(mut incomes: Vec<Transaction>, mut expenses: Vec<Transaction>) -> Self {
        sort_by_date_desc(&mut incomes);
        sort_by_date_desc(&mut expenses);
        Self { incomes, expenses }
    }

    pub fn list(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.incomes,
            TransactionKind::Expense => &self.expenses,
        }
    }

    fn list_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Income => &mut self.incomes,
            TransactionKind::Expense => &mut self.expenses,
        }
    }

    /// All transactions, incomes first.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.incomes.iter().chain(self.expenses.iter())
    }

    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.expenses.is_empty()
    }

    pub fn find(&self, id: TransactionId) -> Option<&Transaction> {
        self.iter().find(|t| t.id == id)
    }

    /// Insert into the list for its kind, ahead of any older entries and
    /// any entries on the same day.
    pub fn insert(&mut self, transaction: Transaction) {
        let list = self.list_mut(transaction.kind);
        let at = list.partition_point(|t| t.date > transaction.date);
        list.insert(at, transaction);
    }

    /// Replace the entry with the same id in the list for its kind.
    /// Returns the previous value, or `None` (and changes nothing) if absent.
    pub fn replace(&mut self, transaction: Transaction) -> Option<Transaction> {
        let list = self.list_mut(transaction.kind);
        let index = list.iter().position(|t| t.id == transaction.id)?;

        if list[index].date == transaction.date {
            return Some(std::mem::replace(&mut list[index], transaction));
        }

        let previous = list.remove(index);
        self.insert(transaction);
        Some(previous)
    }

    /// Remove an entry from the list for `kind` only.
    pub fn remove(&mut self, id: TransactionId, kind: TransactionKind) -> Option<Transaction> {
        let list = self.list_mut(kind);
        let index = list.iter().position(|t| t.id == id)?;
        Some(list.remove(index))
    }
}

/// Sums are taken in `i128` and saturate at the `Cents` range.
fn wide_sum<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> i128 {
    transactions.map(|t| i128::from(t.amount_cents)).sum()
}

fn saturate(value: i128) -> Cents {
    Cents::try_from(value).unwrap_or(if value < 0 { Cents::MIN } else { Cents::MAX })
}

/// Sum of amounts.
pub fn total(transactions: &[Transaction]) -> Cents {
    saturate(wide_sum(transactions.iter()))
}

fn difference<'a>(
    incomes: impl Iterator<Item = &'a Transaction>,
    expenses: impl Iterator<Item = &'a Transaction>,
) -> Cents {
    saturate(wide_sum(incomes) - wide_sum(expenses))
}

/// All income minus all expense, regardless of date.
pub fn net_worth(state: &LedgerState) -> Cents {
    difference(state.incomes.iter(), state.expenses.iter())
}

/// Income minus expense over entries dated on or before `today`.
pub fn current_balance(state: &LedgerState, today: NaiveDate) -> Cents {
    difference(
        state.incomes.iter().filter(|t| t.date <= today),
        state.expenses.iter().filter(|t| t.date <= today),
    )
}

/// Transactions sharing one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
}

impl DayBucket {
    pub fn income_total(&self) -> Cents {
        total(&self.incomes)
    }

    pub fn expense_total(&self) -> Cents {
        total(&self.expenses)
    }

    pub fn net(&self) -> Cents {
        difference(self.incomes.iter(), self.expenses.iter())
    }

    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.expenses.is_empty()
    }
}

/// Partition every transaction under its own date.
pub fn bucket_by_day(state: &LedgerState) -> BTreeMap<NaiveDate, DayBucket> {
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for income in &state.incomes {
        days.entry(income.date).or_default().incomes.push(income.clone());
    }
    for expense in &state.expenses {
        days.entry(expense.date).or_default().expenses.push(expense.clone());
    }

    days
}

/// The bucket for a single day; empty if nothing happened that day.
pub fn transactions_on(state: &LedgerState, day: NaiveDate) -> DayBucket {
    DayBucket {
        incomes: state.incomes.iter().filter(|t| t.date == day).cloned().collect(),
        expenses: state.expenses.iter().filter(|t| t.date == day).cloned().collect(),
    }
}

/// Day buckets restricted to one calendar month. Empty for an invalid month.
pub fn month_buckets(state: &LedgerState, year: i32, month: u32) -> BTreeMap<NaiveDate, DayBucket> {
    let Some((first, last)) = date::month_bounds(year, month) else {
        return BTreeMap::new();
    };

    let mut days = bucket_by_day(state);
    days.retain(|day, _| *day >= first && *day <= last);
    days
}

/// Transactions dated within the trailing calendar month, `today` - 1 month inclusive.
pub fn recent(transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
    let cutoff = date::one_month_before(today);
    transactions
        .iter()
        .filter(|t| t.date >= cutoff)
        .cloned()
        .collect()
}

/// Most recent first. Same-day entries keep their relative order.
pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
