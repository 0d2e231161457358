//! Category entity - Labels that expenses are grouped under.
//!
//! Each category carries a monthly budget that the dashboard compares
//! actual spending against.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Food", "Rent"), unique across categories
    #[sea_orm(unique)]
    pub name: String,
    /// Monthly budget for this category
    pub budget: f64,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
