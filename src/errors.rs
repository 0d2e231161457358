//! Unified error types and result handling.
//!
//! Errors fall into three groups: validation errors raised before anything
//! reaches storage, storage errors from the `SQLite` database, and payment
//! integration errors which never touch stored expenses.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A form field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Amount is zero, negative or not a finite number.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Date is not a valid `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        input: String,
    },

    /// Payment method is not one of the known methods.
    #[error("Unknown payment method '{input}'")]
    UnknownPaymentMethod {
        /// The rejected input
        input: String,
    },

    /// The database file could not be opened or is not a database.
    #[error("Storage unavailable at {url}: {message}")]
    StorageUnavailable {
        /// Connection URL that was tried
        url: String,
        /// Underlying failure
        message: String,
    },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No expense with this id.
    #[error("Expense {id} not found")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// No category with this name or id.
    #[error("Category '{name}' not found")]
    CategoryNotFound {
        /// Requested category name (or id rendered as text)
        name: String,
    },

    /// A category with this name already exists.
    #[error("Category '{name}' already exists")]
    DuplicateCategory {
        /// The duplicated name
        name: String,
    },

    /// The payment gateway failed to answer.
    #[error("Payment error: {message}")]
    Payment {
        /// Gateway failure description
        message: String,
    },

    /// No payment with this reference.
    #[error("Payment {reference} not found")]
    PaymentNotFound {
        /// Requested payment reference
        reference: String,
    },

    /// The payment has not completed, so it cannot be booked.
    #[error("Payment {reference} is {status}, not completed")]
    PaymentNotSettled {
        /// Payment reference
        reference: String,
        /// Current status
        status: String,
    },

    /// The payment was already booked as an expense.
    #[error("Payment {reference} was already booked as expense {expense_id}")]
    PaymentAlreadyBooked {
        /// Payment reference
        reference: String,
        /// Expense created by the earlier booking
        expense_id: i64,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// File system failure (chart or export output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
