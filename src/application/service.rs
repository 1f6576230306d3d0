use chrono::NaiveDate;

use crate::domain::{
    bucket_by_day, current_balance, net_worth, recent, LedgerState, NewTransaction, Transaction,
    TransactionId, TransactionInput, TransactionKind, TransactionPatch,
};
use crate::storage::{Repository, TransactionStore};

use super::{AppError, Command, LedgerView, Notification};

/// Application service: owns the store and the client-side ledger state.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Every mutation goes to the store first; local state only ever receives
/// the row the store sent back, and is left untouched when the call fails.
pub struct LedgerService<S = Repository> {
    store: S,
    state: LedgerState,
}

impl LedgerService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl<S: TransactionStore> LedgerService<S> {
    /// Create a service over `store` with an empty ledger; call [`refresh`](Self::refresh) to load it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: LedgerState::default(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reload incomes and expenses. Both must load for the state to change.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        tracing::debug!("fetching transactions");
        let incomes = self.store.fetch(TransactionKind::Income).await?;
        let expenses = self.store.fetch(TransactionKind::Expense).await?;

        tracing::info!(
            incomes = incomes.len(),
            expenses = expenses.len(),
            "loaded transactions"
        );
        self.state = LedgerState::new(incomes, expenses);
        Ok(())
    }

    /// Record a new income or expense.
    pub async fn add(
        &mut self,
        kind: TransactionKind,
        input: TransactionInput,
    ) -> Result<Transaction, AppError> {
        let record = NewTransaction::new(kind, input);
        tracing::debug!(?record, "adding transaction");

        let stored = self.store.insert(&record).await?;
        self.state.insert(stored.clone());

        tracing::info!(id = %stored.id, kind = %stored.kind, "added transaction");
        Ok(stored)
    }

    /// Change name, amount and date of an existing entry.
    pub async fn edit(
        &mut self,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<Transaction, AppError> {
        let patch = TransactionPatch::from(input);
        tracing::debug!(%id, ?patch, "editing transaction");

        let updated = self.store.update(id, &patch).await?;
        if self.state.replace(updated.clone()).is_none() {
            self.state.insert(updated.clone());
        }

        tracing::info!(%id, "updated transaction");
        Ok(updated)
    }

    /// Delete an entry and drop it from the `kind` list.
    pub async fn delete(&mut self, id: TransactionId, kind: TransactionKind) -> Result<(), AppError> {
        tracing::debug!(%id, %kind, "deleting transaction");

        self.store.delete(id).await?;
        self.state.remove(id, kind);

        tracing::info!(%id, "deleted transaction");
        Ok(())
    }

    /// Run a command and report its outcome. Never fails: errors become
    /// error notifications and leave the state as it was.
    pub async fn dispatch(&mut self, command: Command) -> Notification {
        match command {
            Command::Refresh => match self.refresh().await {
                Ok(()) => Notification::success("Transactions loaded"),
                Err(e) => failure("Failed to load transactions", e),
            },

            Command::Add { kind, form } => {
                let label = kind.label();
                let result = match form.validate() {
                    Ok(input) => self.add(kind, input).await,
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(_) => Notification::success(format!("{} added successfully", label)),
                    Err(e) => failure(&format!("Failed to add {}", label.to_lowercase()), e),
                }
            }

            Command::Edit { id, form } => {
                let result = match form.validate() {
                    Ok(input) => self.edit(id, input).await,
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(_) => Notification::success("Transaction updated successfully"),
                    Err(e) => failure("Failed to update transaction", e),
                }
            }

            Command::Delete { id, kind } => match self.delete(id, kind).await {
                Ok(()) => Notification::success("Transaction deleted successfully"),
                Err(e) => failure("Failed to delete transaction", e),
            },
        }
    }

    /// Derived values for rendering, recomputed from the current state on each call.
    pub fn view(&self, today: NaiveDate) -> LedgerView {
        LedgerView {
            today,
            net_worth: net_worth(&self.state),
            current_balance: current_balance(&self.state, today),
            incomes: self.state.incomes.clone(),
            expenses: self.state.expenses.clone(),
            recent_incomes: recent(self.state.list(TransactionKind::Income), today),
            recent_expenses: recent(self.state.list(TransactionKind::Expense), today),
            days: bucket_by_day(&self.state),
        }
    }
}

fn failure(action: &str, err: AppError) -> Notification {
    match &err {
        AppError::Validation(_) | AppError::NotFound(_) => {
            tracing::warn!(error = %err, "{}", action)
        }
        AppError::Transport(_) => tracing::error!(error = %err, "{}", action),
    }
    Notification::error(format!("{}: {}", action, err))
}
