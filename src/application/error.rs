use thiserror::Error;

use crate::domain::{TransactionId, ValidationError};
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input, caught at the form boundary or refused by the store.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The id no longer exists in the store.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    #[error("Backend failure: {0:#}")]
    Transport(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Rejected(reason) => {
                AppError::Validation(ValidationError::Rejected(reason))
            }
            StoreError::Transport(source) => AppError::Transport(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        let id = Uuid::new_v4();
        assert!(matches!(
            AppError::from(StoreError::NotFound(id)),
            AppError::NotFound(found) if found == id
        ));
        assert!(matches!(
            AppError::from(StoreError::Rejected("CHECK constraint failed".into())),
            AppError::Validation(ValidationError::Rejected(_))
        ));
        assert!(matches!(
            AppError::from(StoreError::Transport(anyhow::anyhow!("connection reset"))),
            AppError::Transport(_)
        ));
    }

    #[test]
    fn test_transport_message_includes_context() {
        let err = AppError::Transport(
            anyhow::anyhow!("connection reset").context("Failed to list transactions"),
        );
        assert_eq!(
            err.to_string(),
            "Backend failure: Failed to list transactions: connection reset"
        );
    }
}
