//! Read-only views derived from a [`Snapshot`].
//!
//! Nothing here touches the store: every function takes the transactions it
//! works on and returns fresh values, so views can be recomputed whenever the
//! snapshot or the filter changes.

use std::{collections::HashMap, str::FromStr};

use api_types::{
    money::Amount,
    stats::Stats,
    transaction::{Transaction, TransactionKind},
};

use crate::store::Snapshot;

const ALL: &str = "all";

/// Category selection of a [`Filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// `all` (any case) or empty selects everything, anything else is an exact
    /// category label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

/// Type selection of a [`Filter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl KindFilter {
    fn matches(self, kind: TransactionKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == kind,
        }
    }
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// What the user narrowed the transaction list down to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub category: CategoryFilter,
    pub kind: KindFilter,
    pub search: String,
}

impl Filter {
    /// `false` when the filter lets every transaction through.
    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All
            || self.kind != KindFilter::All
            || !self.search.is_empty()
    }

    /// Category AND type AND search. The search term is matched
    /// case-insensitively against the description or the category.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.category.matches(&tx.category)
            && self.kind.matches(tx.kind)
            && matches_search(tx, &self.search.to_lowercase())
    }
}

fn matches_search(tx: &Transaction, needle: &str) -> bool {
    needle.is_empty()
        || tx.description.to_lowercase().contains(needle)
        || tx.category.to_lowercase().contains(needle)
}

/// Transactions accepted by `filter`, in their original order.
pub fn filtered_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &Filter,
) -> Vec<&'a Transaction> {
    let needle = filter.search.to_lowercase();
    transactions
        .iter()
        .filter(|tx| filter.category.matches(&tx.category))
        .filter(|tx| filter.kind.matches(tx.kind))
        .filter(|tx| matches_search(tx, &needle))
        .collect()
}

/// Expense total of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: Amount,
    /// Share of the backend reported total expenses, in percent.
    pub percentage: f64,
}

/// Expenses grouped by category, largest total first.
///
/// Income is ignored. Categories with equal totals keep the order in which
/// they were first seen. Percentages are computed against `total_expenses`
/// as reported by the backend (1 when it is zero) and are not normalized.
pub fn category_breakdown(transactions: &[Transaction], total_expenses: Amount) -> Vec<CategoryShare> {
    let mut totals: Vec<(&str, Amount)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
    {
        match index.get(tx.category.as_str()) {
            Some(&i) => totals[i].1 = totals[i].1.saturating_add(tx.amount),
            None => {
                index.insert(tx.category.as_str(), totals.len());
                totals.push((tx.category.as_str(), tx.amount));
            }
        }
    }

    // stable: ties keep first-seen order
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let denominator = if total_expenses.is_zero() {
        1.0
    } else {
        total_expenses.as_f64()
    };

    totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category: category.to_string(),
            total,
            percentage: total.as_f64() * 100.0 / denominator,
        })
        .collect()
}

/// Balance as a percentage of total income, 0 without income.
pub fn savings_rate(stats: &Stats) -> f64 {
    if stats.total_income.is_positive() {
        stats.balance.as_f64() * 100.0 / stats.total_income.as_f64()
    } else {
        0.0
    }
}

/// Everything a screen needs, computed in one go from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a> {
    pub transactions: Vec<&'a Transaction>,
    pub breakdown: Vec<CategoryShare>,
    pub stats: Stats,
    pub savings_rate: f64,
}

impl<'a> DerivedView<'a> {
    pub fn compute(snapshot: &'a Snapshot, filter: &Filter) -> Self {
        Self {
            transactions: filtered_transactions(&snapshot.transactions, filter),
            breakdown: category_breakdown(&snapshot.transactions, snapshot.stats.total_expenses),
            stats: snapshot.stats,
            savings_rate: savings_rate(&snapshot.stats),
        }
    }
}
