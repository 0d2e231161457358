//! Input forms - turn raw command-line text into validated requests.
//!
//! Everything typed by the user passes through here before storage is touched:
//! amounts must parse as finite numbers greater than zero, dates must be real
//! `YYYY-MM-DD` calendar dates and payment methods must be known.

use crate::{
    core::expense::{ExpenseUpdate, NewExpense, PaymentMethod, validate_amount},
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Parses a positive amount such as `"250"` or `"12.50"`.
pub fn parse_amount(input: &str) -> Result<f64> {
    let amount: f64 = input.trim().parse().map_err(|_| Error::Validation {
        field: "amount",
        message: format!("'{input}' is not a number"),
    })?;
    validate_amount(amount)?;
    Ok(amount)
}

/// Parses a budget, which may be zero but not negative.
pub fn parse_budget(input: &str) -> Result<f64> {
    let budget: f64 = input.trim().parse().map_err(|_| Error::Validation {
        field: "budget",
        message: format!("'{input}' is not a number"),
    })?;
    if !budget.is_finite() || budget < 0.0 {
        return Err(Error::InvalidAmount { amount: budget });
    }
    Ok(budget)
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Parses an optional date; blank input counts as absent.
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

/// Raw fields of the "add expense" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    /// Amount as typed
    pub amount: String,
    /// Category name
    pub category: String,
    /// Date as typed; defaults to today when absent
    pub date: Option<String>,
    /// Optional note
    pub note: Option<String>,
    /// Payment method as typed; defaults to cash when absent
    pub method: Option<String>,
}

impl ExpenseForm {
    /// Validates every field and builds the request for storage.
    pub fn validate(&self, today: NaiveDate) -> Result<NewExpense> {
        let amount = parse_amount(&self.amount)?;
        let date = parse_optional_date(self.date.as_deref())?.unwrap_or(today);
        let payment_method = match &self.method {
            Some(method) => method.parse::<PaymentMethod>()?,
            None => PaymentMethod::default(),
        };

        let new = NewExpense {
            amount,
            category: self.category.trim().to_string(),
            date,
            note: self.note.clone(),
            payment_method,
        };
        new.validate()?;
        Ok(new)
    }
}

/// Raw fields of the "edit expense" form; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    /// New amount as typed
    pub amount: Option<String>,
    /// New category name
    pub category: Option<String>,
    /// New date as typed
    pub date: Option<String>,
    /// New note; empty clears it
    pub note: Option<String>,
    /// New payment method as typed
    pub method: Option<String>,
}

impl EditForm {
    /// Validates the provided fields. An edit that changes nothing is rejected.
    pub fn validate(&self) -> Result<ExpenseUpdate> {
        let update = ExpenseUpdate {
            amount: self.amount.as_deref().map(parse_amount).transpose()?,
            category: self.category.as_ref().map(|c| c.trim().to_string()),
            date: self.date.as_deref().map(parse_date).transpose()?,
            note: self.note.clone(),
            payment_method: self
                .method
                .as_deref()
                .map(str::parse::<PaymentMethod>)
                .transpose()?,
        };

        if update == ExpenseUpdate::default() {
            return Err(Error::Validation {
                field: "edit",
                message: "nothing to change".to_string(),
            });
        }
        if update.category.as_deref() == Some("") {
            return Err(Error::Validation {
                field: "category",
                message: "category cannot be empty".to_string(),
            });
        }
        Ok(update)
    }
}
