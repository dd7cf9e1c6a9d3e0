//! Category vocabulary.
//!
//! Expense and income categories are fixed lists. Both contain the catch-all
//! [`OTHER`].

use api_types::transaction::TransactionKind;

pub const OTHER: &str = "Other";

pub const EXPENSE: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    OTHER,
];

pub const INCOME: &[&str] = &["Salary", "Freelance", "Investment", "Gift", OTHER];

/// Categories a transaction of `kind` may use.
pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Expense => EXPENSE,
        TransactionKind::Income => INCOME,
    }
}

/// Returns `true` if `category` belongs to the vocabulary of `kind`.
pub fn is_valid(kind: TransactionKind, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

/// Every known category, expenses first, without duplicates.
pub fn all_categories() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = Vec::with_capacity(EXPENSE.len() + INCOME.len());
    for category in EXPENSE.iter().chain(INCOME) {
        if !all.contains(category) {
            all.push(*category);
        }
    }
    all
}
