use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::NaiveDate;
use engine::{
    Amount, Backend, Stats, Transaction, TransactionDraft, TransactionId, TransactionKind,
    TransactionPayload, TransportError,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn draft(kind: TransactionKind, amount: &str, category: &str, description: &str) -> TransactionDraft {
    TransactionDraft {
        kind,
        amount: amount.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        date: date(2024, 1, 1),
    }
}

/// Backend keeping its records in memory, the way the real service would.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<Transaction>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
    /// Delays applied to the next `list_transactions` calls, in order.
    delays: Mutex<VecDeque<Duration>>,
}

impl MemoryBackend {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn delay_next_list(&self, delay: Duration) {
        self.delays.lock().unwrap().push_back(delay);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn record(id: TransactionId, payload: &TransactionPayload) -> Transaction {
        Transaction {
            id,
            kind: payload.kind,
            amount: payload.amount,
            category: payload.category.clone(),
            description: payload.description.clone(),
            date: payload.date,
        }
    }

    fn not_found(id: &TransactionId) -> TransportError {
        TransportError::Status {
            status: 404,
            message: format!("transaction {id} not found"),
        }
    }
}

impl Backend for MemoryBackend {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let records = self.records.lock().unwrap().clone();
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }

    async fn stats(&self) -> Result<Stats, TransportError> {
        self.check()?;
        let records = self.records.lock().unwrap();
        let sum = |kind: TransactionKind| -> Amount {
            records
                .iter()
                .filter(|tx| tx.kind == kind)
                .map(|tx| tx.amount)
                .sum()
        };
        let total_income = sum(TransactionKind::Income);
        let total_expenses = sum(TransactionKind::Expense);
        Ok(Stats {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        })
    }

    async fn create_transaction(&self, payload: &TransactionPayload) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = Self::record(TransactionId::new(id.to_string()), payload);
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|tx| &tx.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        *slot = Self::record(id.clone(), payload);
        Ok(())
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), TransportError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|tx| &tx.id != id);
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
