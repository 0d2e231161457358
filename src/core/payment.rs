//! UPI payment business logic.
//!
//! A payment request is stored as `pending` together with a `upi://pay` link the payer
//! opens in their UPI app. The payment gateway is an external collaborator behind
//! [`PaymentGateway`]; its answer moves the payment to `completed` or `failed`. A
//! completed payment can then be booked as an expense exactly once. Gateway failures
//! are reported as [`Error::Payment`] and never modify stored expenses.

use crate::{
    config::settings::UpiSettings,
    core::expense::{NewExpense, PaymentMethod, insert_expense, validate_amount},
    entities::{Expense, UpiPayment, expense, upi_payment},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{fmt, future::Future};
use tracing::{info, warn};

/// Note used when a payment request is created without a description.
pub const DEFAULT_DESCRIPTION: &str = "Expense Tracker Payment";

/// Lifecycle state of a UPI payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Waiting for the payer
    Pending,
    /// Money received
    Completed,
    /// Payer declined or the transfer failed
    Failed,
}

impl PaymentStatus {
    /// The value stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a stored status; unknown values are treated as pending.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External service that knows whether a payment went through.
pub trait PaymentGateway {
    /// Returns the current status of the payment with this reference.
    fn check_status(&self, reference: &str) -> impl Future<Output = Result<PaymentStatus>>;
}

/// Gateway backed by the user's own confirmation.
///
/// The user sees the transfer in their UPI app and tells the tracker whether it
/// went through; `None` means they have not seen it yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationGateway {
    confirmed: Option<bool>,
}

impl ConfirmationGateway {
    /// Creates a gateway that reports `confirmed` (`Some(true)` completed,
    /// `Some(false)` failed, `None` still pending).
    #[must_use]
    pub const fn new(confirmed: Option<bool>) -> Self {
        Self { confirmed }
    }
}

impl PaymentGateway for ConfirmationGateway {
    async fn check_status(&self, _reference: &str) -> Result<PaymentStatus> {
        Ok(match self.confirmed {
            Some(true) => PaymentStatus::Completed,
            Some(false) => PaymentStatus::Failed,
            None => PaymentStatus::Pending,
        })
    }
}

/// A freshly created payment request.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// The stored payment record
    pub payment: upi_payment::Model,
    /// Link to open or encode as a QR code
    pub uri: String,
}

/// Percent-encodes everything outside the URI unreserved set.
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'@') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Builds the `upi://pay` deep link for a payment.
#[must_use]
pub fn build_upi_uri(settings: &UpiSettings, reference: &str, amount: f64, note: &str) -> String {
    let params = [
        ("pa", settings.payee_address.as_str()),
        ("pn", settings.payee_name.as_str()),
        ("tr", reference),
        ("am", &format!("{amount:.2}")),
        ("cu", settings.currency.as_str()),
        ("tn", note),
    ];
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}={}", encode_component(value)))
        .collect();
    format!("upi://pay?{}", query.join("&"))
}

/// Creates and stores a pending payment request.
pub async fn create_payment_request(
    db: &DatabaseConnection,
    settings: &UpiSettings,
    amount: f64,
    description: Option<String>,
) -> Result<PaymentRequest> {
    validate_amount(amount)?;

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let reference = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now();

    let payment = upi_payment::ActiveModel {
        reference: Set(reference.clone()),
        amount: Set(amount),
        description: Set(description.clone()),
        status: Set(PaymentStatus::Pending.as_str().to_string()),
        date: Set(now.date_naive()),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(%reference, amount, "Created UPI payment request");
    Ok(PaymentRequest {
        uri: build_upi_uri(settings, &reference, amount, &description),
        payment,
    })
}

/// Retrieves a payment by reference, turning a miss into [`Error::PaymentNotFound`].
pub async fn get_payment<C>(db: &C, reference: &str) -> Result<upi_payment::Model>
where
    C: ConnectionTrait,
{
    UpiPayment::find_by_id(reference.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::PaymentNotFound {
            reference: reference.to_string(),
        })
}

/// Resolves a pending payment through the gateway and stores the new status.
///
/// Payments that already completed or failed are returned without asking the gateway.
pub async fn check_payment<G>(
    db: &DatabaseConnection,
    gateway: &G,
    reference: &str,
) -> Result<upi_payment::Model>
where
    G: PaymentGateway,
{
    let payment = get_payment(db, reference).await?;
    if PaymentStatus::from_stored(&payment.status) != PaymentStatus::Pending {
        return Ok(payment);
    }

    let status = gateway
        .check_status(reference)
        .await
        .inspect_err(|e| warn!(%reference, "Payment status check failed: {e}"))?;
    if status == PaymentStatus::Pending {
        return Ok(payment);
    }

    let mut active: upi_payment::ActiveModel = payment.into();
    active.status = Set(status.as_str().to_string());
    let updated = active.update(db).await?;

    info!(%reference, %status, "Payment status updated");
    Ok(updated)
}

/// Books a completed payment as a UPI expense in `category`.
///
/// Runs in a single database transaction so a payment can never be booked twice.
pub async fn book_payment(
    db: &DatabaseConnection,
    reference: &str,
    category: &str,
) -> Result<expense::Model> {
    let txn = db.begin().await?;

    let payment = get_payment(&txn, reference).await?;
    let status = PaymentStatus::from_stored(&payment.status);
    if status != PaymentStatus::Completed {
        return Err(Error::PaymentNotSettled {
            reference: reference.to_string(),
            status: status.to_string(),
        });
    }

    if let Some(existing) = Expense::find()
        .filter(expense::Column::PaymentReference.eq(reference))
        .one(&txn)
        .await?
    {
        return Err(Error::PaymentAlreadyBooked {
            reference: reference.to_string(),
            expense_id: existing.id,
        });
    }

    let category = crate::core::category::require_category(&txn, category).await?;
    let new = NewExpense::new(payment.amount, category.name.clone(), payment.date)
        .with_note(payment.description.clone())
        .with_method(PaymentMethod::Upi);
    let created = insert_expense(&txn, category.id, new, Some(reference.to_string())).await?;

    txn.commit().await?;

    info!(%reference, expense_id = created.id, "Booked UPI payment as expense");
    Ok(created)
}

/// Lists all payments, newest first.
pub async fn list_payments(db: &DatabaseConnection) -> Result<Vec<upi_payment::Model>> {
    UpiPayment::find()
        .order_by_desc(upi_payment::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
