//! Editable transaction drafts.
//!
//! A draft holds what the user typed, amount included, as text. It only
//! becomes a [`TransactionPayload`] once [`TransactionDraft::validate`]
//! accepts it.

use api_types::{
    money::Amount,
    transaction::{Transaction, TransactionKind, TransactionPayload},
};
use chrono::NaiveDate;

use crate::{ValidationError, categories};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// An empty expense dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: String::new(),
            category: String::new(),
            description: String::new(),
            date: today,
        }
    }

    /// Switches the transaction type.
    ///
    /// The category is cleared when it doesn't exist for the new type, so a
    /// draft never carries an expense category on an income or vice versa.
    pub fn set_kind(&mut self, kind: TransactionKind) {
        self.kind = kind;
        if !categories::is_valid(kind, self.category.trim()) {
            self.category.clear();
        }
    }

    /// Checks required fields and builds the request body.
    pub fn validate(&self) -> Result<TransactionPayload, ValidationError> {
        let amount = self.amount.trim();
        let category = self.category.trim();
        let description = self.description.trim();

        if amount.is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let amount: Amount = amount.parse()?;
        if amount.is_negative() {
            return Err(ValidationError::NegativeAmount);
        }
        if !categories::is_valid(self.kind, category) {
            return Err(ValidationError::UnknownCategory {
                kind: self.kind,
                category: category.to_string(),
            });
        }

        Ok(TransactionPayload {
            kind: self.kind,
            amount,
            category: category.to_string(),
            description: description.to_string(),
            date: self.date,
        })
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind,
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            description: tx.description.clone(),
            date: tx.date,
        }
    }
}
