//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod expense;
pub mod upi_payment;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use upi_payment::{
    Column as UpiPaymentColumn, Entity as UpiPayment, Model as UpiPaymentModel,
};
