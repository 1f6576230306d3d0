use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{date, net_worth, Cents, LedgerState, Transaction};

/// Full ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub net_worth: Cents,
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
}

/// Exporter for converting the loaded ledger to various formats
pub struct Exporter<'a> {
    state: &'a LedgerState,
}

impl<'a> Exporter<'a> {
    pub fn new(state: &'a LedgerState) -> Self {
        Self { state }
    }

    /// Export all transactions to CSV, incomes first, each list most recent first.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "kind", "date", "name", "amount_cents", "created_at"])?;

        let mut count = 0;
        for transaction in self.state.iter() {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.kind.as_str().to_string(),
                date::format_day(transaction.date),
                transaction.name.clone(),
                transaction.amount_cents.to_string(),
                transaction.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the whole ledger as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            net_worth: net_worth(self.state),
            incomes: self.state.incomes.clone(),
            expenses: self.state.expenses.clone(),
        };

        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::TransactionKind;

    fn sample_state() -> LedgerState {
        let make = |kind, name: &str, amount, on: &str| Transaction {
            id: Uuid::new_v4(),
            name: name.to_string(),
            amount_cents: amount,
            date: date::parse_day(on).unwrap(),
            kind,
            created_at: Utc::now(),
        };
        LedgerState::new(
            vec![make(TransactionKind::Income, "Salary, January", 200000, "2025-01-01")],
            vec![make(TransactionKind::Expense, "Rent", 90000, "2025-01-05")],
        )
    }

    #[test]
    fn test_export_csv() {
        let state = sample_state();
        let mut buffer = Vec::new();

        let count = Exporter::new(&state)
            .export_transactions_csv(&mut buffer)
            .unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,kind,date,name,amount_cents,created_at");
        assert!(lines[1].contains(",income,2025-01-01,\"Salary, January\",200000,"));
        assert!(lines[2].contains(",expense,2025-01-05,Rent,90000,"));
    }

    #[test]
    fn test_export_json() {
        let state = sample_state();
        let mut buffer = Vec::new();

        let snapshot = Exporter::new(&state).export_json(&mut buffer).unwrap();
        assert_eq!(snapshot.net_worth, 110000);

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["net_worth"], 110000);
        assert_eq!(parsed["incomes"][0]["date"], "2025-01-01");
        assert_eq!(parsed["expenses"][0]["kind"], "expense");
    }
}
