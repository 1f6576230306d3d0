//! The persistence seam.
//!
//! The application layer only talks to storage through [`TransactionStore`],
//! so any backend (the SQLite [`Repository`](super::Repository), a remote
//! service client, a test double) can sit behind it.

use std::future::Future;

use thiserror::Error;

use crate::domain::{NewTransaction, Transaction, TransactionId, TransactionKind, TransactionPatch};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// The backend refused the record (constraint violation).
    #[error("Record rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or answered with garbage.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Create/read/update/delete of transaction records.
///
/// Every call either completes with the stored row or fails without side
/// effects on the caller's state.
pub trait TransactionStore {
    /// Transactions of one kind, most recent date first.
    fn fetch(
        &self,
        kind: TransactionKind,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Store a new record; the store assigns `id` and `created_at`.
    fn insert(
        &self,
        record: &NewTransaction,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    /// Apply a partial update and return the row as stored.
    fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
