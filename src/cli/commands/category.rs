//! Budget management commands - list categories, add one, set a budget.

use crate::{
    cli::{AppContext, CategoryCommand, forms::parse_budget},
    core::{category, report::format_amount},
    errors::Result,
};
use std::fmt::Write as _;

/// Runs a `category` subcommand.
pub async fn run(ctx: &AppContext, command: CategoryCommand) -> Result<String> {
    let symbol = &ctx.config.currency_symbol;
    match command {
        CategoryCommand::List => {
            let categories = category::list_categories(&ctx.database).await?;
            if categories.is_empty() {
                return Ok("No categories yet.".to_string());
            }
            let mut out = format!("{:<6} {:<20} {:>14}\n", "ID", "Category", "Monthly Budget");
            for c in &categories {
                let _ = writeln!(
                    out,
                    "{:<6} {:<20} {:>14}",
                    c.id,
                    c.name,
                    format_amount(symbol, c.budget)
                );
            }
            Ok(out.trim_end().to_string())
        }
        CategoryCommand::Add { name, budget } => {
            let budget = parse_budget(&budget)?;
            let created = category::create_category(&ctx.database, &name, budget).await?;
            Ok(format!(
                "✅ Added category '{}' with budget {}",
                created.name,
                format_amount(symbol, created.budget)
            ))
        }
        CategoryCommand::Budget { name, amount } => {
            let budget = parse_budget(&amount)?;
            let existing = category::require_category(&ctx.database, &name).await?;
            let updated =
                category::update_category_budget(&ctx.database, existing.id, budget).await?;
            Ok(format!(
                "✅ Budget for '{}' set to {}",
                updated.name,
                format_amount(symbol, updated.budget)
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Error, test_utils::test_context};

    #[tokio::test]
    async fn test_list_seeded_categories() -> Result<()> {
        let ctx = test_context().await?;
        let out = run(&ctx, CategoryCommand::List).await?;
        assert!(out.contains("Rent"));
        assert!(out.contains("₹15000.00"));
        assert_eq!(out.lines().count(), 9);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_budget() -> Result<()> {
        let ctx = test_context().await?;

        let out = run(
            &ctx,
            CategoryCommand::Add {
                name: "Books".to_string(),
                budget: "300".to_string(),
            },
        )
        .await?;
        assert_eq!(out, "✅ Added category 'Books' with budget ₹300.00");

        let out = run(
            &ctx,
            CategoryCommand::Budget {
                name: "Books".to_string(),
                amount: "450.5".to_string(),
            },
        )
        .await?;
        assert_eq!(out, "✅ Budget for 'Books' set to ₹450.50");

        let dup = run(
            &ctx,
            CategoryCommand::Add {
                name: "Books".to_string(),
                budget: "0".to_string(),
            },
        )
        .await;
        assert!(matches!(dup.unwrap_err(), Error::DuplicateCategory { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_rejects_negative() -> Result<()> {
        let ctx = test_context().await?;
        let result = run(
            &ctx,
            CategoryCommand::Budget {
                name: "Food".to_string(),
                amount: "-1".to_string(),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }
}
