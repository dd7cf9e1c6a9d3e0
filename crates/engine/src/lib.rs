//! Core of the Pocketbook tracker.
//!
//! Two layers live here:
//!
//! - the [`Store`], the client side copy of the transactions and of the
//!   backend computed [`Stats`], kept in sync through a [`Backend`];
//! - the [`views`] functions, pure computations turning a [`Snapshot`] and a
//!   [`Filter`] into the filtered list, the expense breakdown and the savings
//!   rate.
//!
//! ```no_run
//! use engine::{Filter, HttpBackend, Store};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::builder()
//!     .base_url("http://localhost:5000/api")
//!     .build()?;
//! let store = Store::new(backend);
//! store.load().await?;
//!
//! let snapshot = store.snapshot().await;
//! let view = snapshot.view(&Filter::default());
//! println!("{} transactions", view.transactions.len());
//! # Ok(())
//! # }
//! ```

pub use api_types::{
    money::{Amount, AmountParseError},
    stats::Stats,
    transaction::{Transaction, TransactionId, TransactionKind, TransactionPayload},
};
pub use backend::Backend;
pub use draft::TransactionDraft;
pub use error::{Operation, StoreError, TransportError, ValidationError};
pub use http::{HttpBackend, HttpBackendBuilder};
pub use store::{Confirm, Removal, Snapshot, Store};
pub use views::{CategoryFilter, CategoryShare, DerivedView, Filter, KindFilter};

pub mod categories;
pub mod views;

mod backend;
mod draft;
mod error;
mod http;
mod store;
