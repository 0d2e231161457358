//! Command handlers organized by screen.

/// Budget management commands
pub mod category;
/// Expense entry, history and editing commands
pub mod expense;
/// UPI payment commands
pub mod payment;
/// Dashboard and trend commands
pub mod report;
