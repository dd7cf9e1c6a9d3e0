use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{TransactionKind, views::KindFilter};

#[derive(Parser, Debug)]
#[command(name = "pocketbook")]
#[command(about = "Track income and expenses against a Pocketbook backend")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://localhost:5000/api).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List transactions, optionally filtered.
    List(ListArgs),
    /// Record a new transaction.
    Add(AddArgs),
    /// Change an existing transaction. Fields not given are kept.
    Edit(EditArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
    /// Show total income, expenses, balance and savings rate.
    Stats,
    /// Show expenses grouped by category.
    Breakdown,
    /// Show the categories available for a transaction type.
    Categories(CategoriesArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Exact category label, or "all".
    #[arg(long, default_value = "all")]
    pub category: String,
    /// income, expense or all.
    #[arg(long = "type", default_value = "all")]
    pub kind: KindFilter,
    /// Case-insensitive text matched against description and category.
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long = "type", default_value = "expense")]
    pub kind: TransactionKind,
    #[arg(long, default_value = "")]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// YYYY-MM-DD, defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    /// Switching type drops a category that doesn't exist for the new type.
    #[arg(long = "type")]
    pub kind: Option<TransactionKind>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,
    /// Don't ask for confirmation.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[arg(long = "type")]
    pub kind: Option<TransactionKind>,
}
