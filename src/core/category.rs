//! Category business logic - Handles category listing, creation and budgets.
//!
//! Categories are looked up by name from the front end, so names are trimmed
//! and kept unique. Budgets must be finite and non-negative.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Retrieves all categories ordered alphabetically by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its exact (trimmed) name.
pub async fn get_category_by_name<C>(db: &C, name: &str) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by name, turning a miss into [`Error::CategoryNotFound`].
pub async fn require_category<C>(db: &C, name: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    get_category_by_name(db, name)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: name.trim().to_string(),
        })
}

/// Rejects budgets that are negative, NaN or infinite.
pub fn validate_budget(budget: f64) -> Result<()> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(Error::InvalidAmount { amount: budget });
    }
    Ok(())
}

/// Creates a new category with the given monthly budget.
///
/// The name is trimmed and must not be empty or already taken.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    budget: f64,
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "category",
            message: "name cannot be empty".to_string(),
        });
    }
    validate_budget(budget)?;

    if get_category_by_name(db, name).await?.is_some() {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }

    let created = category::ActiveModel {
        name: Set(name.to_string()),
        budget: Set(budget),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(category = %created.name, budget, "Created category");
    Ok(created)
}

/// Sets a new monthly budget for an existing category.
pub async fn update_category_budget(
    db: &DatabaseConnection,
    category_id: i64,
    budget: f64,
) -> Result<category::Model> {
    validate_budget(budget)?;

    let existing = get_category_by_id(db, category_id)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;

    let mut active: category::ActiveModel = existing.into();
    active.budget = Set(budget);
    let updated = active.update(db).await?;

    info!(category = %updated.name, budget, "Updated category budget");
    Ok(updated)
}
