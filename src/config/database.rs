//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent, which lets the
//! same database file be reopened on every run.

use crate::config::settings::CategoryConfig;
use crate::core::category::{get_category_by_name, validate_budget};
use crate::entities::{Category, Expense, UpiPayment, category};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Schema, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

/// Default database location, created on first use.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://expense_tracker.db?mode=rwc";

/// Establishes a connection to the `SQLite` database at `url`.
///
/// A file that cannot be opened is reported as [`Error::StorageUnavailable`] so the
/// front end can tell it apart from ordinary query failures.
#[instrument]
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(url)
        .await
        .map_err(|e| Error::StorageUnavailable {
            url: url.to_string(),
            message: e.to_string(),
        })
}

/// Creates all necessary database tables if they do not exist yet.
///
/// Categories are created before expenses so the foreign key has a target.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut category_table = schema.create_table_from_entity(Category);
    let mut expense_table = schema.create_table_from_entity(Expense);
    let mut payment_table = schema.create_table_from_entity(UpiPayment);

    category_table.if_not_exists();
    expense_table.if_not_exists();
    payment_table.if_not_exists();

    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&expense_table)).await?;
    db.execute(builder.build(&payment_table)).await?;

    Ok(())
}

/// Connects and makes sure the schema exists.
///
/// Schema creation is the first statement to touch the file, so a corrupt or
/// non-database file surfaces here and is reported as [`Error::StorageUnavailable`].
#[instrument]
pub async fn open(url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(url).await?;
    create_tables(&db)
        .await
        .map_err(|e| Error::StorageUnavailable {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    info!("Database ready");
    Ok(db)
}

/// Inserts every configured category whose name is not in the database yet.
///
/// Existing categories keep their budgets. Every configured budget is checked before
/// anything is written, and the inserts share one transaction, so a bad entry leaves
/// the database untouched. Returns the number of categories inserted.
pub async fn seed_categories(
    db: &DatabaseConnection,
    defaults: &[CategoryConfig],
) -> Result<usize> {
    for config in defaults {
        validate_budget(config.budget).map_err(|_| Error::Config {
            message: format!(
                "category '{}' has invalid budget {}",
                config.name.trim(),
                config.budget
            ),
        })?;
    }

    let txn = db.begin().await?;
    let mut inserted = 0;
    for config in defaults {
        let name = config.name.trim();
        if name.is_empty() || get_category_by_name(&txn, name).await?.is_some() {
            continue;
        }
        category::ActiveModel {
            name: Set(name.to_string()),
            budget: Set(config.budget),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }
    txn.commit().await?;

    if inserted > 0 {
        info!(inserted, "Seeded default categories");
    }
    Ok(inserted)
}
