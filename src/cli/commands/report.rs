//! Reporting commands - the budget dashboard and spending trends.

use crate::{
    chart,
    cli::{AppContext, DashboardArgs, TrendArgs, forms::parse_optional_date},
    core::report::{
        self, BudgetSummary, DateRange, PeriodTotal, calculate_usage, format_amount,
        format_progress_bar, format_remaining,
    },
    errors::Result,
};
use std::fmt::Write as _;

/// Renders the budget summary table, ending with a TOTAL row.
#[must_use]
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    let mut out = format!(
        "{:<16} {:>12} {:>12} {:>12}  {}\n",
        "Category",
        format!("Spent ({symbol})"),
        "Budget",
        "Remaining",
        "Used"
    );
    for row in &summary.rows {
        let _ = writeln!(
            out,
            "{:<16} {:>12} {:>12} {:>12}  {}",
            row.category,
            format!("{:.2}", row.spent),
            format!("{:.2}", row.budget),
            format_remaining(row.remaining),
            format_progress_bar(calculate_usage(row.spent, row.budget), None)
        );
    }
    let _ = write!(
        out,
        "{:<16} {:>12} {:>12} {:>12}",
        "TOTAL",
        format!("{:.2}", summary.total_spent),
        format!("{:.2}", summary.total_budget),
        format_remaining(summary.total_remaining)
    );
    out
}

/// Renders period totals, one line per period.
#[must_use]
pub fn format_trend(totals: &[PeriodTotal], symbol: &str) -> String {
    if totals.is_empty() {
        return "No expenses in this period.".to_string();
    }
    totals
        .iter()
        .map(|t| {
            format!(
                "{:<10} {:>12}  ({} expense(s))",
                t.label,
                format_amount(symbol, t.total),
                t.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shows spending against budget for the range, defaulting to the current month,
/// and writes the charts when `--charts` is given.
pub async fn dashboard(ctx: &AppContext, args: DashboardArgs) -> Result<String> {
    let default = DateRange::current_month(ctx.today);
    let range = DateRange::new(
        parse_optional_date(args.from.as_deref())?.or(default.from),
        parse_optional_date(args.to.as_deref())?.or(default.to),
    );

    let summary = report::category_totals(&ctx.database, range).await?;
    let mut out = format!(
        "Expense Dashboard {} to {}\n{}",
        range.from.map(|d| d.to_string()).unwrap_or_default(),
        range.to.map(|d| d.to_string()).unwrap_or_default(),
        format_summary(&summary, &ctx.config.currency_symbol)
    );

    if let Some(dir) = args.charts {
        let written = chart::render_dashboard(&summary, &dir)?;
        for path in written {
            let _ = write!(out, "\n✅ Chart written to {}", path.display());
        }
    }
    Ok(out)
}

/// Shows spending totals per day or month.
pub async fn trend(ctx: &AppContext, args: TrendArgs) -> Result<String> {
    let range = DateRange::new(
        parse_optional_date(args.from.as_deref())?,
        parse_optional_date(args.to.as_deref())?,
    );
    let totals = report::period_totals(&ctx.database, range, args.by.into()).await?;
    Ok(format_trend(&totals, &ctx.config.currency_symbol))
}
