//! UPI payment entity - Payment requests created through the UPI shortcut.
//!
//! A payment starts `pending`, is resolved to `completed` or `failed` by the
//! payment gateway, and a completed payment can be booked as an expense.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// UPI payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "upi_payments")]
pub struct Model {
    /// Transaction reference sent to the payer's UPI app
    #[sea_orm(primary_key, auto_increment = false)]
    pub reference: String,
    /// Requested amount
    pub amount: f64,
    /// Transaction note
    pub description: String,
    /// `"pending"`, `"completed"` or `"failed"`
    pub status: String,
    /// Date the request was created
    pub date: Date,
    /// When the request was created
    pub created_at: DateTimeUtc,
}

/// UPI payments are not related to other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
