//! Expense entity - A single logged expense.
//!
//! Each expense has an amount, a category, a calendar date, an optional note and
//! the payment method used. Expenses booked from a UPI payment keep the payment
//! reference in `payment_reference`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Amount spent, always positive
    pub amount: f64,
    /// ID of the category this expense is grouped under
    pub category_id: i64,
    /// Calendar date the expense happened on
    pub date: Date,
    /// Optional free-text note
    pub note: Option<String>,
    /// Payment method label: `"Cash"`, `"Credit Card"`, `"UPI"`, ...
    pub payment_method: String,
    /// UPI payment reference when the expense was booked from a payment
    pub payment_reference: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
