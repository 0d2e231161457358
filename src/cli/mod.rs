//! Command-line front end - argument parsing, input forms and handlers.
//!
//! Each subcommand mirrors one screen of the tracker: adding and editing expenses,
//! the expense history, budget management, the dashboard and UPI payments. Handlers
//! return the text to print so they can be exercised without a terminal.

/// Subcommand handlers (expense, category, report, payment)
pub mod commands;
/// Validation of raw user input
pub mod forms;

use crate::{config::settings::AppConfig, core::report::Granularity, errors::Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;

/// Shared state available to every command handler.
pub struct AppContext {
    /// Database connection for all storage operations
    pub database: DatabaseConnection,
    /// Loaded settings
    pub config: AppConfig,
    /// Date used for defaults such as "today" and "this month"
    pub today: NaiveDate,
}

impl AppContext {
    /// Creates a context from an open connection and loaded settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig, today: NaiveDate) -> Self {
        Self {
            database,
            config,
            today,
        }
    }
}

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "expense-tracker")]
#[command(about = "Track personal expenses, budgets and UPI payments")]
pub struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Path to the settings file.
    #[arg(long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands, one per screen.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense
    Add(AddArgs),
    /// Show expense history, optionally exporting it to CSV
    List(ListArgs),
    /// Change fields of an existing expense
    Edit(EditArgs),
    /// Delete an expense
    Delete {
        /// Expense id
        id: i64,
    },
    /// Manage categories and their budgets
    Category(CategoryArgs),
    /// Spending against budget per category, with optional charts
    Dashboard(DashboardArgs),
    /// Spending totals per day or month
    Trend(TrendArgs),
    /// Request, confirm and book UPI payments
    Pay(PayArgs),
}

/// Arguments of `add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Amount spent, greater than zero
    #[arg(long, allow_negative_numbers = true)]
    pub amount: String,
    /// Existing category name
    #[arg(long)]
    pub category: String,
    /// Defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
    /// Cash, "Credit Card", "Debit Card", UPI, "Bank Transfer" or Other
    #[arg(long)]
    pub method: Option<String>,
}

/// Arguments of `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Only show this category
    #[arg(long)]
    pub category: Option<String>,
    /// Write the listing to this CSV file instead of printing it
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Arguments of `edit`; only the given fields change.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Expense id
    pub id: i64,
    /// New amount
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<String>,
    /// New category name
    #[arg(long)]
    pub category: Option<String>,
    /// New date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Pass an empty string to clear the note
    #[arg(long)]
    pub note: Option<String>,
    /// New payment method
    #[arg(long)]
    pub method: Option<String>,
}

/// Arguments of `category`.
#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category action
    #[command(subcommand)]
    pub command: CategoryCommand,
}

/// Budget management actions.
#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories and budgets
    List,
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Monthly budget
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        budget: String,
    },
    /// Set a category's monthly budget
    Budget {
        /// Category name
        name: String,
        /// New monthly budget
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },
}

/// Arguments of `dashboard`.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Defaults to the first day of the current month
    #[arg(long)]
    pub from: Option<String>,
    /// Defaults to today
    #[arg(long)]
    pub to: Option<String>,
    /// Directory to write SVG charts into
    #[arg(long)]
    pub charts: Option<PathBuf>,
}

/// Bucket size for `trend`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendPeriod {
    /// One line per day
    Day,
    /// One line per month
    Month,
}

impl From<TrendPeriod> for Granularity {
    fn from(period: TrendPeriod) -> Self {
        match period {
            TrendPeriod::Day => Self::Day,
            TrendPeriod::Month => Self::Month,
        }
    }
}

/// Arguments of `trend`.
#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
    /// Group by day or month
    #[arg(long, value_enum, default_value_t = TrendPeriod::Month)]
    pub by: TrendPeriod,
}

/// Arguments of `pay`.
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Payment action
    #[command(subcommand)]
    pub command: PayCommand,
}

/// UPI payment actions.
#[derive(Subcommand, Debug)]
pub enum PayCommand {
    /// Create a payment request and print its UPI link
    Request {
        /// Amount to pay, greater than zero
        #[arg(long, allow_negative_numbers = true)]
        amount: String,
        /// Shown in the UPI app; defaults to "Expense Tracker Payment"
        #[arg(long)]
        description: Option<String>,
    },
    /// Check a payment, recording the outcome seen in the UPI app
    Status {
        /// Payment reference
        reference: String,
        /// The payment arrived
        #[arg(long, conflicts_with = "reject")]
        confirm: bool,
        /// The payment failed or was declined
        #[arg(long)]
        reject: bool,
    },
    /// Book a completed payment as an expense
    Book {
        /// Payment reference
        reference: String,
        /// Category to book the expense in
        #[arg(long)]
        category: String,
    },
    /// List all payment requests
    History,
}

/// Runs one command and returns the text to show the user.
pub async fn run(ctx: &AppContext, command: Command) -> Result<String> {
    match command {
        Command::Add(args) => commands::expense::add(ctx, args).await,
        Command::List(args) => commands::expense::list(ctx, args).await,
        Command::Edit(args) => commands::expense::edit(ctx, args).await,
        Command::Delete { id } => commands::expense::delete(ctx, id).await,
        Command::Category(args) => commands::category::run(ctx, args.command).await,
        Command::Dashboard(args) => commands::report::dashboard(ctx, args).await,
        Command::Trend(args) => commands::report::trend(ctx, args).await,
        Command::Pay(args) => commands::payment::run(ctx, args.command).await,
    }
}
