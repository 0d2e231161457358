//! Expense business logic - Handles all expense-related operations.
//!
//! This module provides functions for adding, listing, updating and deleting expense
//! records. Every write validates its input first: amounts must be finite and greater
//! than zero, and the category must exist. Invalid input is rejected before any query
//! is issued.

use crate::{
    entities::{Category, Expense, category, expense},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

/// How an expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    /// Cash
    #[default]
    Cash,
    /// Credit card
    CreditCard,
    /// Debit card
    DebitCard,
    /// UPI transfer
    Upi,
    /// Bank transfer
    BankTransfer,
    /// Anything else
    Other,
}

impl PaymentMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 6] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::Upi,
        Self::BankTransfer,
        Self::Other,
    ];

    /// The label stored in the database and shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
            Self::BankTransfer => "Bank Transfer",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    /// Accepts labels case-insensitively, ignoring spaces, dashes and underscores
    /// (`"credit card"`, `"credit-card"`, `"CreditCard"`).
    fn from_str(input: &str) -> Result<Self> {
        let key: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.label().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| Error::UnknownPaymentMethod {
                input: input.to_string(),
            })
    }
}

/// A validated-on-insert request to record an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Amount spent
    pub amount: f64,
    /// Category name
    pub category: String,
    /// Date of the expense
    pub date: NaiveDate,
    /// Optional note; blank notes are stored as `None`
    pub note: Option<String>,
    /// How it was paid
    pub payment_method: PaymentMethod,
}

impl NewExpense {
    /// Creates a cash expense without a note.
    #[must_use]
    pub fn new(amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.into(),
            date,
            note: None,
            payment_method: PaymentMethod::default(),
        }
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the payment method.
    #[must_use]
    pub const fn with_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Checks the fields that can be checked without the database.
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::Validation {
                field: "category",
                message: "category cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Partial update of an expense; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    /// New amount
    pub amount: Option<f64>,
    /// New category name
    pub category: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New note; `Some("")` clears the note
    pub note: Option<String>,
    /// New payment method
    pub payment_method: Option<PaymentMethod>,
}

/// Filters for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Earliest date to include
    pub from: Option<NaiveDate>,
    /// Latest date to include
    pub to: Option<NaiveDate>,
    /// Only expenses in this category
    pub category: Option<String>,
}

/// An expense joined with its category name, as shown in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    /// The expense record
    pub expense: expense::Model,
    /// Name of its category
    pub category: String,
}

/// Rejects amounts that are zero, negative, NaN or infinite.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Inserts an expense for an already-resolved category.
///
/// Shared by [`add_expense`] and payment booking, which runs inside a database transaction.
pub(crate) async fn insert_expense<C>(
    db: &C,
    category_id: i64,
    new: NewExpense,
    payment_reference: Option<String>,
) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    let model = expense::ActiveModel {
        amount: Set(new.amount),
        category_id: Set(category_id),
        date: Set(new.date),
        note: Set(normalize_note(new.note)),
        payment_method: Set(new.payment_method.label().to_string()),
        payment_reference: Set(payment_reference),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Records a new expense after validating it.
///
/// The insert is awaited to completion, so the record is durable once this returns.
pub async fn add_expense(db: &DatabaseConnection, new: NewExpense) -> Result<expense::Model> {
    new.validate()?;
    let category = crate::core::category::require_category(db, &new.category).await?;

    let created = insert_expense(db, category.id, new, None).await?;
    info!(
        expense_id = created.id,
        amount = created.amount,
        category = %category.name,
        "Added expense"
    );
    Ok(created)
}

/// Lists expenses matching `filter`, newest first.
///
/// Expenses on the same date are ordered by descending id, so the most recently
/// entered one comes first.
pub async fn list_expenses(
    db: &DatabaseConnection,
    filter: &ExpenseFilter,
) -> Result<Vec<ExpenseRow>> {
    let mut query = Expense::find();

    if let Some(from) = filter.from {
        query = query.filter(expense::Column::Date.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(expense::Column::Date.lte(to));
    }
    if let Some(name) = &filter.category {
        let category = crate::core::category::require_category(db, name).await?;
        query = query.filter(expense::Column::CategoryId.eq(category.id));
    }

    let rows = query
        .find_also_related(Category)
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?;

    debug!(count = rows.len(), "Listed expenses");
    Ok(rows
        .into_iter()
        .map(|(expense, category)| ExpenseRow {
            expense,
            category: category.map(|c: category::Model| c.name).unwrap_or_default(),
        })
        .collect())
}

/// Retrieves a specific expense by its unique ID.
pub async fn get_expense(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to an existing expense.
///
/// New values are validated before the database is queried.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    update: ExpenseUpdate,
) -> Result<expense::Model> {
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }

    let existing = get_expense(db, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let mut active: expense::ActiveModel = existing.into();
    if let Some(amount) = update.amount {
        active.amount = Set(amount);
    }
    if let Some(name) = update.category {
        let category = crate::core::category::require_category(db, &name).await?;
        active.category_id = Set(category.id);
    }
    if let Some(date) = update.date {
        active.date = Set(date);
    }
    if let Some(note) = update.note {
        active.note = Set(normalize_note(Some(note)));
    }
    if let Some(method) = update.payment_method {
        active.payment_method = Set(method.label().to_string());
    }

    let updated = active.update(db).await?;
    info!(expense_id, "Updated expense");
    Ok(updated)
}

/// Deletes an expense permanently.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }
    info!(expense_id, "Deleted expense");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "Credit Card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CreditCard
        );
        assert_eq!(
            "debit-card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::DebitCard
        );
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!(matches!(
            "cheque".parse::<PaymentMethod>(),
            Err(Error::UnknownPaymentMethod { .. })
        ));
    }

    #[test]
    fn test_payment_method_labels_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[tokio::test]
    async fn test_add_expense_validation() -> Result<()> {
        // No query results configured: validation must fail before any query runs
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = add_expense(&db, NewExpense::new(amount, "Food", date(2024, 1, 1))).await;
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }

        let result = add_expense(&db, NewExpense::new(10.0, "  ", date(2024, 1, 1))).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "category",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_expense(&db, NewExpense::new(10.0, "Nope", date(2024, 1, 1))).await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { .. }));
        assert!(list_expenses(&db, &ExpenseFilter::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_then_list_includes_record_once() -> Result<()> {
        let (db, food) = setup_with_category().await?;

        let created = add_expense(
            &db,
            NewExpense::new(42.5, "Food", date(2024, 3, 5))
                .with_note("Lunch")
                .with_method(PaymentMethod::DebitCard),
        )
        .await?;

        let rows = list_expenses(&db, &ExpenseFilter::default()).await?;
        let matching: Vec<&ExpenseRow> = rows.iter().filter(|r| r.expense.id == created.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].category, "Food");
        assert_eq!(matching[0].expense.category_id, food.id);
        assert_eq!(matching[0].expense.amount, 42.5);
        assert_eq!(matching[0].expense.note.as_deref(), Some("Lunch"));
        assert_eq!(matching[0].expense.payment_method, "Debit Card");
        assert_eq!(matching[0].expense.payment_reference, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_note_stored_as_none() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        let created = add_expense(
            &db,
            NewExpense::new(5.0, "Food", date(2024, 3, 5)).with_note("   "),
        )
        .await?;
        assert_eq!(created.note, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        let keep = create_test_expense(&db, "Food", 10.0, date(2024, 1, 1)).await?;
        let gone = create_test_expense(&db, "Food", 20.0, date(2024, 1, 2)).await?;

        delete_expense(&db, gone.id).await?;

        let ids: Vec<i64> = list_expenses(&db, &ExpenseFilter::default())
            .await?
            .into_iter()
            .map(|r| r.expense.id)
            .collect();
        assert_eq!(ids, vec![keep.id]);
        assert!(get_expense(&db, gone.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_expense(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ExpenseNotFound { id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_ordering_newest_first() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        let older = create_test_expense(&db, "Food", 1.0, date(2024, 1, 1)).await?;
        let newer = create_test_expense(&db, "Food", 2.0, date(2024, 2, 1)).await?;
        let same_day_later = create_test_expense(&db, "Food", 3.0, date(2024, 2, 1)).await?;

        let ids: Vec<i64> = list_expenses(&db, &ExpenseFilter::default())
            .await?
            .into_iter()
            .map(|r| r.expense.id)
            .collect();
        assert_eq!(ids, vec![same_day_later.id, newer.id, older.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        crate::core::category::create_category(&db, "Rent", 1000.0).await?;

        let jan = create_test_expense(&db, "Food", 1.0, date(2024, 1, 15)).await?;
        let feb = create_test_expense(&db, "Food", 2.0, date(2024, 2, 15)).await?;
        let rent = create_test_expense(&db, "Rent", 900.0, date(2024, 2, 1)).await?;

        let filter = ExpenseFilter {
            from: Some(date(2024, 2, 1)),
            to: Some(date(2024, 2, 29)),
            category: None,
        };
        let ids: Vec<i64> = list_expenses(&db, &filter)
            .await?
            .into_iter()
            .map(|r| r.expense.id)
            .collect();
        assert_eq!(ids, vec![feb.id, rent.id]);

        let filter = ExpenseFilter {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = list_expenses(&db, &filter)
            .await?
            .into_iter()
            .map(|r| r.expense.id)
            .collect();
        assert_eq!(ids, vec![feb.id, jan.id]);

        let filter = ExpenseFilter {
            to: Some(date(2024, 1, 15)),
            ..Default::default()
        };
        let rows = list_expenses(&db, &filter).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expense.id, jan.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_unknown_category_filter() -> Result<()> {
        let db = setup_test_db().await?;
        let filter = ExpenseFilter {
            category: Some("Ghost".to_string()),
            ..Default::default()
        };
        let result = list_expenses(&db, &filter).await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        let rent = crate::core::category::create_category(&db, "Rent", 1000.0).await?;
        let created = add_expense(
            &db,
            NewExpense::new(10.0, "Food", date(2024, 1, 1)).with_note("old"),
        )
        .await?;

        let updated = update_expense(
            &db,
            created.id,
            ExpenseUpdate {
                amount: Some(12.5),
                category: Some("Rent".to_string()),
                date: Some(date(2024, 1, 2)),
                note: Some(String::new()),
                payment_method: Some(PaymentMethod::Upi),
            },
        )
        .await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 12.5);
        assert_eq!(updated.category_id, rent.id);
        assert_eq!(updated.date, date(2024, 1, 2));
        assert_eq!(updated.note, None);
        assert_eq!(updated.payment_method, "UPI");
        assert_eq!(updated.created_at, created.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense_rejects_bad_amount_and_missing_id() -> Result<()> {
        let (db, _) = setup_with_category().await?;
        let created = create_test_expense(&db, "Food", 10.0, date(2024, 1, 1)).await?;

        let result = update_expense(
            &db,
            created.id,
            ExpenseUpdate {
                amount: Some(-1.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        assert_eq!(get_expense(&db, created.id).await?.unwrap().amount, 10.0);

        let result = update_expense(&db, 999, ExpenseUpdate::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ExpenseNotFound { id: 999 }
        ));
        Ok(())
    }
}
