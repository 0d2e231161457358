//! UPI payment commands - request, status, book and history.

use crate::{
    cli::{AppContext, PayCommand, forms::parse_amount},
    core::{
        payment::{self, ConfirmationGateway, PaymentStatus},
        report::format_amount,
    },
    entities::upi_payment,
    errors::Result,
};
use std::fmt::Write as _;

/// Renders the payment history as a table.
#[must_use]
pub fn format_payment_history(payments: &[upi_payment::Model], symbol: &str) -> String {
    if payments.is_empty() {
        return "No payment requests yet.".to_string();
    }

    let mut out = format!(
        "{:<36} {:<10} {:>12} {:<10} {}\n",
        "Reference", "Date", "Amount", "Status", "Description"
    );
    for p in payments {
        let _ = writeln!(
            out,
            "{:<36} {:<10} {:>12} {:<10} {}",
            p.reference,
            p.date.format("%Y-%m-%d"),
            format_amount(symbol, p.amount),
            p.status,
            p.description
        );
    }
    out.trim_end().to_string()
}

/// Runs a `pay` subcommand.
pub async fn run(ctx: &AppContext, command: PayCommand) -> Result<String> {
    let symbol = &ctx.config.currency_symbol;
    match command {
        PayCommand::Request {
            amount,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            let request =
                payment::create_payment_request(&ctx.database, &ctx.config.upi, amount, description)
                    .await?;
            Ok(format!(
                "✅ Payment request for {} created\nReference: {}\nPay with: {}\n\
                 After paying, run `pay status {} --confirm`",
                format_amount(symbol, request.payment.amount),
                request.payment.reference,
                request.uri,
                request.payment.reference
            ))
        }
        PayCommand::Status {
            reference,
            confirm,
            reject,
        } => {
            let confirmed = if confirm {
                Some(true)
            } else if reject {
                Some(false)
            } else {
                None
            };
            let gateway = ConfirmationGateway::new(confirmed);
            let updated = payment::check_payment(&ctx.database, &gateway, &reference).await?;
            let status = PaymentStatus::from_stored(&updated.status);
            Ok(match status {
                PaymentStatus::Completed => format!(
                    "✅ Payment {} completed. Book it with `pay book {} --category <name>`",
                    updated.reference, updated.reference
                ),
                PaymentStatus::Failed => format!("❌ Payment {} failed", updated.reference),
                PaymentStatus::Pending => {
                    format!("⏳ Payment {} is still pending", updated.reference)
                }
            })
        }
        PayCommand::Book {
            reference,
            category,
        } => {
            let created = payment::book_payment(&ctx.database, &reference, &category).await?;
            Ok(format!(
                "✅ Booked payment {} as expense #{}: {} in {}",
                reference,
                created.id,
                format_amount(symbol, created.amount),
                category.trim()
            ))
        }
        PayCommand::History => {
            let payments = payment::list_payments(&ctx.database).await?;
            Ok(format_payment_history(&payments, symbol))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::expense::{ExpenseFilter, list_expenses},
        errors::Error,
        test_utils::test_context,
    };

    fn reference_from(output: &str) -> String {
        output
            .lines()
            .find_map(|l| l.strip_prefix("Reference: "))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_request_prints_uri() -> Result<()> {
        let ctx = test_context().await?;
        let out = run(
            &ctx,
            PayCommand::Request {
                amount: "250.5".to_string(),
                description: Some("Dinner".to_string()),
            },
        )
        .await?;

        assert!(out.starts_with("✅ Payment request for ₹250.50 created"));
        let reference = reference_from(&out);
        assert!(out.contains(&format!(
            "upi://pay?pa=expensetracker@upi&pn=Expense%20Tracker&tr={reference}&am=250.50&cu=INR&tn=Dinner"
        )));
        Ok(())
    }

    #[tokio::test]
    async fn test_request_rejects_bad_amount() -> Result<()> {
        let ctx = test_context().await?;
        let result = run(
            &ctx,
            PayCommand::Request {
                amount: "0".to_string(),
                description: None,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        assert!(payment::list_payments(&ctx.database).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_full_payment_flow() -> Result<()> {
        let ctx = test_context().await?;
        let out = run(
            &ctx,
            PayCommand::Request {
                amount: "99".to_string(),
                description: None,
            },
        )
        .await?;
        let reference = reference_from(&out);

        let pending = run(
            &ctx,
            PayCommand::Status {
                reference: reference.clone(),
                confirm: false,
                reject: false,
            },
        )
        .await?;
        assert!(pending.contains("still pending"));

        let early = run(
            &ctx,
            PayCommand::Book {
                reference: reference.clone(),
                category: "Food".to_string(),
            },
        )
        .await;
        assert!(matches!(early.unwrap_err(), Error::PaymentNotSettled { .. }));

        let done = run(
            &ctx,
            PayCommand::Status {
                reference: reference.clone(),
                confirm: true,
                reject: false,
            },
        )
        .await?;
        assert!(done.contains("completed"));

        let booked = run(
            &ctx,
            PayCommand::Book {
                reference: reference.clone(),
                category: "Food".to_string(),
            },
        )
        .await?;
        assert!(booked.contains("₹99.00 in Food"));

        let rows = list_expenses(&ctx.database, &ExpenseFilter::default()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expense.payment_method, "UPI");
        assert_eq!(rows[0].expense.note.as_deref(), Some(payment::DEFAULT_DESCRIPTION));

        let again = run(
            &ctx,
            PayCommand::Book {
                reference,
                category: "Food".to_string(),
            },
        )
        .await;
        assert!(matches!(again.unwrap_err(), Error::PaymentAlreadyBooked { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_and_history() -> Result<()> {
        let ctx = test_context().await?;
        assert_eq!(
            run(&ctx, PayCommand::History).await?,
            "No payment requests yet."
        );

        let out = run(
            &ctx,
            PayCommand::Request {
                amount: "10".to_string(),
                description: Some("Taxi".to_string()),
            },
        )
        .await?;
        let reference = reference_from(&out);

        let failed = run(
            &ctx,
            PayCommand::Status {
                reference: reference.clone(),
                confirm: false,
                reject: true,
            },
        )
        .await?;
        assert_eq!(failed, format!("❌ Payment {reference} failed"));

        let history = run(&ctx, PayCommand::History).await?;
        let line = history.lines().nth(1).unwrap();
        assert!(line.starts_with(&reference));
        assert!(line.contains("failed"));
        assert!(line.contains("Taxi"));
        Ok(())
    }

    #[tokio::test]
    async fn test_status_unknown_reference() -> Result<()> {
        let ctx = test_context().await?;
        let result = run(
            &ctx,
            PayCommand::Status {
                reference: "missing".to_string(),
                confirm: true,
                reject: false,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::PaymentNotFound { .. }));
        Ok(())
    }
}
