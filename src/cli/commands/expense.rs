//! Expense commands - `add`, `list`, `edit` and `delete`.

use crate::{
    cli::{
        AddArgs, AppContext, EditArgs, ListArgs,
        forms::{EditForm, ExpenseForm, parse_optional_date},
    },
    core::{
        expense::{self, ExpenseFilter, ExpenseRow},
        export,
        report::format_amount,
    },
    errors::Result,
};
use std::fmt::Write as _;

/// Renders expense rows as a fixed-width table.
#[must_use]
pub fn format_expense_table(rows: &[ExpenseRow], symbol: &str) -> String {
    if rows.is_empty() {
        return "No expenses found.".to_string();
    }

    let mut out = format!(
        "{:<6} {:<10} {:<15} {:>12} {:<14} {}\n",
        "ID", "Date", "Category", "Amount", "Method", "Note"
    );
    for row in rows {
        let e = &row.expense;
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:<15} {:>12} {:<14} {}",
            e.id,
            e.date.format("%Y-%m-%d"),
            row.category,
            format_amount(symbol, e.amount),
            e.payment_method,
            e.note.as_deref().unwrap_or("")
        );
    }
    let total: f64 = rows.iter().map(|r| r.expense.amount).sum();
    let _ = write!(
        out,
        "{} expense(s), total {}",
        rows.len(),
        format_amount(symbol, total)
    );
    out
}

/// Validates the form and records the expense.
pub async fn add(ctx: &AppContext, args: AddArgs) -> Result<String> {
    let form = ExpenseForm {
        amount: args.amount,
        category: args.category,
        date: args.date,
        note: args.note,
        method: args.method,
    };
    let new = form.validate(ctx.today)?;
    let created = expense::add_expense(&ctx.database, new).await?;

    Ok(format!(
        "✅ Added expense #{}: {} on {} ({})",
        created.id,
        format_amount(&ctx.config.currency_symbol, created.amount),
        created.date.format("%Y-%m-%d"),
        created.payment_method
    ))
}

/// Lists expenses, or exports them to CSV when `--export` is given.
pub async fn list(ctx: &AppContext, args: ListArgs) -> Result<String> {
    let filter = ExpenseFilter {
        from: parse_optional_date(args.from.as_deref())?,
        to: parse_optional_date(args.to.as_deref())?,
        category: args.category.filter(|c| !c.trim().is_empty()),
    };
    let rows = expense::list_expenses(&ctx.database, &filter).await?;

    if let Some(path) = args.export {
        let path = if path.extension().is_some_and(|ext| ext == "csv") {
            path
        } else {
            path.with_extension("csv")
        };
        let file = std::fs::File::create(&path)?;
        let written = export::write_csv(&rows, file)?;
        return Ok(format!(
            "✅ Exported {written} expense(s) to {}",
            path.display()
        ));
    }

    Ok(format_expense_table(&rows, &ctx.config.currency_symbol))
}

/// Applies the provided field changes to an expense.
pub async fn edit(ctx: &AppContext, args: EditArgs) -> Result<String> {
    let form = EditForm {
        amount: args.amount,
        category: args.category,
        date: args.date,
        note: args.note,
        method: args.method,
    };
    let update = form.validate()?;
    let updated = expense::update_expense(&ctx.database, args.id, update).await?;

    Ok(format!(
        "✅ Updated expense #{}: {} on {}",
        updated.id,
        format_amount(&ctx.config.currency_symbol, updated.amount),
        updated.date.format("%Y-%m-%d")
    ))
}

/// Deletes an expense.
pub async fn delete(ctx: &AppContext, id: i64) -> Result<String> {
    expense::delete_expense(&ctx.database, id).await?;
    Ok(format!("✅ Deleted expense #{id}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        errors::Error,
        test_utils::{date, test_context},
    };

    fn add_args(amount: &str, category: &str, date: Option<&str>) -> AddArgs {
        AddArgs {
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.map(ToString::to_string),
            note: Some("note".to_string()),
            method: None,
        }
    }

    fn list_all() -> ListArgs {
        ListArgs {
            from: None,
            to: None,
            category: None,
            export: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() -> Result<()> {
        let ctx = test_context().await?;

        let message = add(&ctx, add_args("250", "Food", None)).await?;
        assert!(message.starts_with("✅ Added expense #1: ₹250.00 on 2024-03-15"));

        let table = list(&ctx, list_all()).await?;
        assert!(table.contains("Food"));
        assert!(table.contains("₹250.00"));
        assert!(table.ends_with("1 expense(s), total ₹250.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_invalid_input_never_reaches_storage() -> Result<()> {
        let ctx = test_context().await?;

        let result = add(&ctx, add_args("-4", "Food", None)).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let result = add(&ctx, add_args("4", "Food", Some("2024-02-31"))).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidDate { .. }));

        assert_eq!(list(&ctx, list_all()).await?, "No expenses found.");
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_and_delete() -> Result<()> {
        let ctx = test_context().await?;
        add(&ctx, add_args("10", "Food", Some("2024-03-01"))).await?;

        let message = edit(
            &ctx,
            EditArgs {
                id: 1,
                amount: Some("15".to_string()),
                category: Some("Rent".to_string()),
                date: None,
                note: None,
                method: None,
            },
        )
        .await?;
        assert_eq!(message, "✅ Updated expense #1: ₹15.00 on 2024-03-01");

        assert_eq!(delete(&ctx, 1).await?, "✅ Deleted expense #1");
        assert!(matches!(
            delete(&ctx, 1).await.unwrap_err(),
            Error::ExpenseNotFound { id: 1 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_export_csv() -> Result<()> {
        let ctx = test_context().await?;
        add(&ctx, add_args("10", "Food", Some("2024-03-01"))).await?;
        add(&ctx, add_args("20", "Rent", Some("2024-03-02"))).await?;

        let dir = tempfile::tempdir()?;
        let message = list(
            &ctx,
            ListArgs {
                from: None,
                to: None,
                category: Some("Food".to_string()),
                export: Some(dir.path().join("food")),
            },
        )
        .await?;

        let path = dir.path().join("food.csv");
        assert!(message.contains("Exported 1 expense(s)"));
        let contents = std::fs::read_to_string(path)?;
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("10.00,note,Food,2024-03-01,Cash"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_date_filter() -> Result<()> {
        let ctx = test_context().await?;
        add(&ctx, add_args("10", "Food", Some("2024-03-01"))).await?;
        add(&ctx, add_args("20", "Food", Some("2024-01-02"))).await?;

        let table = list(
            &ctx,
            ListArgs {
                from: Some("2024-02-01".to_string()),
                ..list_all()
            },
        )
        .await?;
        assert!(table.contains(&date(2024, 3, 1).format("%Y-%m-%d").to_string()));
        assert!(!table.contains("2024-01-02"));
        Ok(())
    }
}
