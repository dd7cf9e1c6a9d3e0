//! Client side copy of the backend state.
//!
//! The [`Store`] never patches its data locally: every successful mutation is
//! followed by a full [`Store::load`], so the collection and the stats always
//! come from the same backend round-trip.
//!
//! Overlapping loads are tolerated. Each load takes a sequence number when it
//! is issued and its result is applied only if no later load got there first.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use api_types::{
    stats::Stats,
    transaction::{Transaction, TransactionId},
};
use tokio::sync::Mutex;

use crate::{
    Backend, Operation, StoreError, TransactionDraft, TransportError,
    views::{self, DerivedView, Filter},
};

type ResultStore<T> = Result<T, StoreError>;

/// Transactions and stats as of the last applied load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub stats: Stats,
}

impl Snapshot {
    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| &tx.id == id)
    }

    /// Balance as a percentage of income, see [`views::savings_rate`].
    pub fn savings_rate(&self) -> f64 {
        views::savings_rate(&self.stats)
    }

    pub fn view(&self, filter: &Filter) -> DerivedView<'_> {
        DerivedView::compute(self, filter)
    }
}

#[derive(Debug, Default)]
struct Synced {
    snapshot: Snapshot,
    /// Sequence number of the load that produced `snapshot`.
    applied: u64,
}

/// Asks the user before a destructive operation.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of [`Store::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    Cancelled,
}

pub struct Store<B> {
    backend: B,
    state: Mutex<Synced>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight counter even if the load future is dropped.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<B: Backend> Store<B> {
    /// Creates an empty store. Call [`Store::load`] before reading from it.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(Synced::default()),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `true` while at least one load is waiting for the backend.
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Copy of the current transactions and stats.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Fetches transactions and stats, replacing the local copy.
    ///
    /// On failure the previous copy is kept untouched.
    pub async fn load(&self) -> ResultStore<()> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::enter(&self.in_flight);
        tracing::debug!(seq, "loading transactions and stats");

        let (transactions, stats) =
            tokio::try_join!(self.backend.list_transactions(), self.backend.stats()).map_err(
                |err| {
                    tracing::warn!(seq, "load failed: {err}");
                    StoreError::transport(Operation::Load, err)
                },
            )?;

        let mut state = self.state.lock().await;
        if seq < state.applied {
            tracing::debug!(seq, applied = state.applied, "discarding stale load");
            return Ok(());
        }
        tracing::debug!(seq, count = transactions.len(), "load applied");
        state.applied = seq;
        state.snapshot = Snapshot {
            transactions,
            stats,
        };
        Ok(())
    }

    /// Validates `draft`, submits it and reloads.
    ///
    /// An invalid draft never reaches the backend.
    pub async fn create(&self, draft: &TransactionDraft) -> ResultStore<()> {
        let payload = draft.validate()?;
        self.backend
            .create_transaction(&payload)
            .await
            .map_err(|err| self.failed(Operation::Create, err))?;
        tracing::info!(
            "created {} of {} in {}",
            payload.kind,
            payload.amount,
            payload.category
        );
        self.load().await
    }

    /// Replaces transaction `id` with `draft` and reloads.
    pub async fn update(&self, id: &TransactionId, draft: &TransactionDraft) -> ResultStore<()> {
        let payload = draft.validate()?;
        self.backend
            .update_transaction(id, &payload)
            .await
            .map_err(|err| self.failed(Operation::Update, err))?;
        tracing::info!("updated transaction {id}");
        self.load().await
    }

    /// Deletes transaction `id` once `confirm` agrees, then reloads.
    pub async fn remove<C>(&self, id: &TransactionId, confirm: &C) -> ResultStore<Removal>
    where
        C: Confirm + ?Sized,
    {
        let prompt = self.removal_prompt(id).await;
        if !confirm.confirm(&prompt) {
            tracing::debug!("removal of {id} cancelled");
            return Ok(Removal::Cancelled);
        }

        self.backend
            .delete_transaction(id)
            .await
            .map_err(|err| self.failed(Operation::Remove, err))?;
        tracing::info!("deleted transaction {id}");
        self.load().await?;
        Ok(Removal::Deleted)
    }

    async fn removal_prompt(&self, id: &TransactionId) -> String {
        let state = self.state.lock().await;
        match state.snapshot.transaction(id) {
            Some(tx) => format!(
                "Delete \"{}\" ({} {} on {})?",
                tx.description, tx.kind, tx.amount, tx.date
            ),
            None => "Delete this transaction?".to_string(),
        }
    }

    fn failed(&self, operation: Operation, err: TransportError) -> StoreError {
        tracing::warn!("{operation} failed: {err}");
        StoreError::transport(operation, err)
    }
}
