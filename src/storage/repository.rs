use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    date, NewTransaction, Transaction, TransactionId, TransactionKind, TransactionPatch,
};

use super::{StoreError, TransactionStore, MIGRATION_001_INITIAL};

const COLUMNS: &str = "id, name, amount_cents, date, kind, created_at";

/// SQLite-backed transaction store.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let date_str: String = row.get("date");
        let kind_str: String = row.get("kind");
        let created_at_str: String = row.get("created_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            name: row.get("name"),
            amount_cents: row.get("amount_cents"),
            date: NaiveDate::parse_from_str(&date_str, date::DAY_FORMAT)
                .with_context(|| format!("Invalid date: {}", date_str))?,
            kind: kind_str
                .parse::<TransactionKind>()
                .map_err(|e: String| anyhow::anyhow!("Invalid transaction kind: {}", e))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

/// Constraint violations mean the record itself was refused; everything else
/// is a transport failure.
fn classify(err: sqlx::Error, action: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_check_violation()
            || db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
        {
            return StoreError::Rejected(db_err.message().to_string());
        }
    }
    StoreError::Transport(anyhow::Error::new(err).context(action))
}

impl TransactionStore for Repository {
    async fn fetch(&self, kind: TransactionKind) -> Result<Vec<Transaction>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions WHERE kind = ? ORDER BY date DESC, created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to list transactions"))?;

        tracing::debug!(kind = %kind, count = rows.len(), "fetched transactions");
        rows.iter()
            .map(Self::row_to_transaction)
            .collect::<Result<Vec<_>>>()
            .map_err(StoreError::from)
    }

    async fn insert(&self, record: &NewTransaction) -> Result<Transaction, StoreError> {
        let query = format!(
            "INSERT INTO transactions ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&record.name)
            .bind(record.amount_cents)
            .bind(date::format_day(record.date))
            .bind(record.kind.as_str())
            .bind(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to save transaction"))?;

        let transaction = Self::row_to_transaction(&row)?;
        tracing::debug!(id = %transaction.id, "inserted transaction");
        Ok(transaction)
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let query = format!(
            r#"
            UPDATE transactions
            SET name = COALESCE(?, name),
                amount_cents = COALESCE(?, amount_cents),
                date = COALESCE(?, date)
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(&patch.name)
            .bind(patch.amount_cents)
            .bind(patch.date.map(date::format_day))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to update transaction"))?
            .ok_or(StoreError::NotFound(id))?;

        let transaction = Self::row_to_transaction(&row)?;
        tracing::debug!(id = %transaction.id, "updated transaction");
        Ok(transaction)
    }

    async fn delete(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to delete transaction"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::debug!(id = %id, "deleted transaction");
        Ok(())
    }
}
