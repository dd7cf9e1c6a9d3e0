use std::fmt::Write as _;

use chrono::Local;
use engine::{
    Confirm, Filter, HttpBackend, Removal, Snapshot, Store, Transaction, TransactionDraft,
    TransactionId, TransactionKind, categories,
    views::{CategoryShare, DerivedView},
};

use crate::{
    cli::{AddArgs, CategoriesArgs, Command, DeleteArgs, EditArgs, ListArgs},
    error::{AppError, Result},
    prompt,
    settings::Settings,
};

pub async fn run(command: Command, settings: &Settings) -> Result<()> {
    if let Command::Categories(args) = command {
        print!("{}", render_categories(&args));
        return Ok(());
    }

    let backend = HttpBackend::builder()
        .base_url(&settings.base_url)
        .timeout(settings.timeout())
        .build()?;
    let store = Store::new(backend);
    store.load().await?;

    match command {
        Command::List(args) => {
            let snapshot = store.snapshot().await;
            let view = snapshot.view(&filter(args));
            print!("{}", render_list(&view));
        }
        Command::Add(args) => {
            store.create(&add_draft(args)).await?;
            println!("Transaction saved.");
        }
        Command::Edit(args) => {
            let id = TransactionId::new(args.id.clone());
            let snapshot = store.snapshot().await;
            let current = snapshot
                .transaction(&id)
                .ok_or_else(|| AppError::NotFound(args.id.clone()))?;
            store.update(&id, &edit_draft(current, args)).await?;
            println!("Transaction updated.");
        }
        Command::Delete(DeleteArgs { id, yes }) => {
            let id = TransactionId::new(id);
            let ask = |question: &str| {
                prompt::confirm(question).unwrap_or_else(|err| {
                    tracing::warn!("confirmation prompt failed: {err}");
                    false
                })
            };
            let accept = |_: &str| true;
            let confirm: &dyn Confirm = if yes { &accept } else { &ask };
            match store.remove(&id, confirm).await? {
                Removal::Deleted => println!("Transaction deleted."),
                Removal::Cancelled => println!("Nothing deleted."),
            }
        }
        Command::Stats => print!("{}", render_stats(&store.snapshot().await)),
        Command::Breakdown => {
            let snapshot = store.snapshot().await;
            print!("{}", render_breakdown(&snapshot.view(&Filter::default()).breakdown));
        }
        Command::Categories(_) => {}
    }

    Ok(())
}

fn filter(args: ListArgs) -> Filter {
    Filter {
        category: args.category.parse().unwrap_or_default(),
        kind: args.kind,
        search: args.search,
    }
}

fn add_draft(args: AddArgs) -> TransactionDraft {
    let mut draft = TransactionDraft::new(args.date.unwrap_or_else(|| Local::now().date_naive()));
    draft.set_kind(args.kind);
    draft.amount = args.amount;
    draft.category = args.category;
    draft.description = args.description;
    draft
}

/// Starts from the stored record and replaces only what was given.
fn edit_draft(current: &Transaction, args: EditArgs) -> TransactionDraft {
    let mut draft = TransactionDraft::from(current);
    if let Some(kind) = args.kind {
        draft.set_kind(kind);
    }
    if let Some(amount) = args.amount {
        draft.amount = amount;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(date) = args.date {
        draft.date = date;
    }
    draft
}

fn signed(tx: &Transaction) -> String {
    match tx.kind {
        TransactionKind::Income => format!("+{}", tx.amount),
        TransactionKind::Expense => format!("-{}", tx.amount),
    }
}

fn render_list(view: &DerivedView<'_>) -> String {
    if view.transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut out = String::new();
    for tx in &view.transactions {
        let _ = writeln!(
            out,
            "{}  {:>12}  {:<13}  {}  [{}]",
            tx.date,
            signed(tx),
            tx.category,
            tx.description,
            tx.id
        );
    }
    out
}

fn render_stats(snapshot: &Snapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Total income:   {:>12}", stats.total_income);
    let _ = writeln!(out, "Total expenses: {:>12}", stats.total_expenses);
    let _ = writeln!(out, "Net balance:    {:>12}", stats.balance);
    let _ = writeln!(out, "Savings rate:   {:>11.1}%", snapshot.savings_rate());
    out
}

fn render_breakdown(breakdown: &[CategoryShare]) -> String {
    if breakdown.is_empty() {
        return "No expense data yet.\n".to_string();
    }

    let mut out = String::new();
    for share in breakdown {
        let _ = writeln!(
            out,
            "{:<13}  {:>12}  ({:.1}%)",
            share.category, share.total, share.percentage
        );
    }
    out
}

fn render_categories(args: &CategoriesArgs) -> String {
    let list = match args.kind {
        Some(kind) => categories::categories_for(kind).to_vec(),
        None => categories::all_categories(),
    };
    let mut out = list.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{Amount, Stats, TransactionKind, views::KindFilter};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn lunch() -> Transaction {
        Transaction {
            id: TransactionId::new("abc"),
            kind: TransactionKind::Expense,
            amount: Amount::new(1250),
            category: "Food".to_string(),
            description: "Lunch".to_string(),
            date: date(),
        }
    }

    fn edit_args() -> EditArgs {
        EditArgs {
            id: "abc".to_string(),
            kind: None,
            amount: None,
            category: None,
            description: None,
            date: None,
        }
    }

    #[test]
    fn edit_keeps_fields_not_given() {
        let draft = edit_draft(
            &lunch(),
            EditArgs {
                amount: Some("14".to_string()),
                ..edit_args()
            },
        );
        let payload = draft.validate().unwrap();
        assert_eq!(payload.amount, Amount::units(14));
        assert_eq!(payload.category, "Food");
        assert_eq!(payload.description, "Lunch");
    }

    #[test]
    fn edit_type_switch_requires_new_category() {
        let draft = edit_draft(
            &lunch(),
            EditArgs {
                kind: Some(TransactionKind::Income),
                ..edit_args()
            },
        );
        assert!(draft.category.is_empty());
        assert!(draft.validate().is_err());

        let draft = edit_draft(
            &lunch(),
            EditArgs {
                kind: Some(TransactionKind::Income),
                category: Some("Gift".to_string()),
                ..edit_args()
            },
        );
        assert_eq!(draft.validate().unwrap().kind, TransactionKind::Income);
    }

    #[test]
    fn add_defaults_to_given_date() {
        let draft = add_draft(AddArgs {
            kind: TransactionKind::Expense,
            amount: "3".to_string(),
            category: "Food".to_string(),
            description: "Coffee".to_string(),
            date: Some(date()),
        });
        assert_eq!(draft.date, date());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn list_filter_understands_all() {
        let filter = filter(ListArgs {
            category: "all".to_string(),
            kind: KindFilter::All,
            search: String::new(),
        });
        assert!(!filter.is_active());
    }

    #[test]
    fn list_shows_signed_amounts() {
        let snapshot = Snapshot {
            transactions: vec![lunch()],
            stats: Stats::default(),
        };
        let out = render_list(&snapshot.view(&Filter::default()));
        assert!(out.contains("-12.50"), "{out}");
        assert!(out.contains("[abc]"), "{out}");

        let empty = Snapshot::default();
        assert_eq!(render_list(&empty.view(&Filter::default())), "No transactions found.\n");
    }

    #[test]
    fn stats_show_one_decimal_savings_rate() {
        let snapshot = Snapshot {
            transactions: Vec::new(),
            stats: Stats {
                total_income: Amount::units(3),
                total_expenses: Amount::units(2),
                balance: Amount::units(1),
            },
        };
        let out = render_stats(&snapshot);
        assert!(out.contains("33.3%"), "{out}");
        assert!(out.contains("3.00"), "{out}");
    }

    #[test]
    fn breakdown_shows_percentages() {
        let out = render_breakdown(&[CategoryShare {
            category: "Food".to_string(),
            total: Amount::units(60),
            percentage: 60.0,
        }]);
        assert!(out.contains("60.00"), "{out}");
        assert!(out.contains("(60.0%)"), "{out}");
        assert_eq!(render_breakdown(&[]), "No expense data yet.\n");
    }

    #[test]
    fn categories_per_type() {
        let out = render_categories(&CategoriesArgs {
            kind: Some(TransactionKind::Income),
        });
        assert_eq!(out, "Salary\nFreelance\nInvestment\nGift\nOther\n");
    }
}
