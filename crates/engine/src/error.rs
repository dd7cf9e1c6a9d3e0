//! The module contains the errors the tracker core can return.
//!
//! The errors are:
//!
//! - [`ValidationError`] returned when a draft is incomplete; nothing is sent.
//! - [`TransportError`] returned when talking to the backend fails.
//! - [`StoreError`] wraps both, tagging transport failures with the
//!   [`Operation`] that was running.
use std::fmt;

use api_types::{money::AmountParseError, transaction::TransactionKind};
use thiserror::Error;

/// A draft failed local validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountParseError),
    #[error("amount can't be negative")]
    NegativeAmount,
    #[error("category is required")]
    MissingCategory,
    #[error("\"{category}\" is not an {kind} category")]
    UnknownCategory {
        kind: TransactionKind,
        category: String,
    },
    #[error("description is required")]
    MissingDescription,
}

impl ValidationError {
    /// `true` when a required field was left empty.
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            Self::MissingAmount | Self::MissingCategory | Self::MissingDescription
        )
    }
}

/// Anything that went wrong between the client and the backend.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

/// The store operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Remove,
}

impl Operation {
    /// Generic notice shown to the user when the operation fails.
    pub fn failure_notice(self) -> &'static str {
        match self {
            Self::Load => "Failed to fetch transactions",
            Self::Create | Self::Update => "Failed to save transaction",
            Self::Remove => "Failed to delete transaction",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },
}

impl StoreError {
    pub(crate) fn transport(operation: Operation, source: TransportError) -> Self {
        Self::Transport { operation, source }
    }

    /// Message meant for the user. Transport details stay in the logs.
    pub fn notice(&self) -> String {
        match self {
            Self::Validation(err) if err.is_missing_field() => {
                format!("Please fill all fields: {err}")
            }
            Self::Validation(err) => format!("Invalid transaction: {err}"),
            Self::Transport { operation, .. } => operation.failure_notice().to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
