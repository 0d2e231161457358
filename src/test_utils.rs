//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        category,
        expense::{self, ExpenseRow, NewExpense},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized and no categories.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up a database with a single "Food" category (budget 100.0).
pub async fn setup_with_category() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    let food = category::create_category(&db, "Food", 100.0).await?;
    Ok((db, food))
}

/// Builds a calendar date, panicking on invalid input.
#[allow(clippy::unwrap_used)]
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Records a cash expense without a note in an existing category.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    category: &str,
    amount: f64,
    on: NaiveDate,
) -> Result<entities::expense::Model> {
    expense::add_expense(db, NewExpense::new(amount, category, on)).await
}

/// Builds an in-memory listing row without touching a database.
#[must_use]
pub fn expense_row(
    id: i64,
    category_id: i64,
    category: &str,
    amount: f64,
    on: NaiveDate,
) -> ExpenseRow {
    ExpenseRow {
        expense: entities::expense::Model {
            id,
            amount,
            category_id,
            date: on,
            note: None,
            payment_method: "Cash".to_string(),
            payment_reference: None,
            created_at: chrono::Utc::now(),
        },
        category: category.to_string(),
    }
}

/// Front-end context over a fresh database seeded with the default categories,
/// with "today" fixed to 2024-03-15.
pub async fn test_context() -> Result<crate::cli::AppContext> {
    let db = setup_test_db().await?;
    let config = crate::config::settings::AppConfig::default();
    crate::config::database::seed_categories(&db, &config.categories).await?;
    Ok(crate::cli::AppContext::new(db, config, date(2024, 3, 15)))
}
