//! Core business logic - framework-agnostic expense, category, reporting and payment
//! operations. The front end only parses input and formats output; everything that
//! touches the database lives here.

/// Category listing, creation and budgets
pub mod category;
/// Expense records: add, list, update, delete
pub mod expense;
/// CSV export of expense listings
pub mod export;
/// UPI payment requests and booking
pub mod payment;
/// Aggregation by category and time period
pub mod report;
