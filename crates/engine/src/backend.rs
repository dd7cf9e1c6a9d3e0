//! Contract of the persistence backend.
//!
//! The store only talks to the backend through [`Backend`]. [`HttpBackend`]
//! is the real implementation; tests plug in an in-memory one.
//!
//! [`HttpBackend`]: crate::HttpBackend

use std::future::Future;

use api_types::{
    stats::Stats,
    transaction::{Transaction, TransactionId, TransactionPayload},
};

use crate::TransportError;

pub trait Backend: Send + Sync {
    /// `GET /transactions`
    fn list_transactions(
        &self,
    ) -> impl Future<Output = Result<Vec<Transaction>, TransportError>> + Send;

    /// `GET /stats`
    fn stats(&self) -> impl Future<Output = Result<Stats, TransportError>> + Send;

    /// `POST /transactions`
    fn create_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// `PUT /transactions/{id}`
    fn update_transaction(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// `DELETE /transactions/{id}`
    fn delete_transaction(
        &self,
        id: &TransactionId,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
