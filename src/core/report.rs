//! Report generation business logic.
//!
//! This module aggregates expenses into chart-ready summaries: totals per category
//! compared against each category's budget, and totals per day or month. The grouping
//! itself is done by pure functions so it can be tested without a database; the async
//! wrappers load the records and hand them over.

use crate::{
    core::{category::list_categories, expense::{ExpenseFilter, ExpenseRow, list_expenses}},
    entities::category,
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;
use std::collections::{BTreeMap, HashMap};

/// Inclusive date range; open on either side when a bound is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// From the first of `today`'s month up to `today`.
    #[must_use]
    pub fn current_month(today: NaiveDate) -> Self {
        Self {
            from: today.with_day(1),
            to: Some(today),
        }
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    fn to_filter(self) -> ExpenseFilter {
        ExpenseFilter {
            from: self.from,
            to: self.to,
            category: None,
        }
    }
}

/// Spending in one category against its budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Category name
    pub category: String,
    /// Total spent in the range
    pub spent: f64,
    /// Monthly budget
    pub budget: f64,
    /// `budget - spent`; negative when over budget
    pub remaining: f64,
}

/// Per-category rows plus totals across all categories.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    /// Range the summary covers
    pub range: DateRange,
    /// One row per category, highest spending first
    pub rows: Vec<CategorySummary>,
    /// Sum of `spent` over all rows
    pub total_spent: f64,
    /// Sum of `budget` over all rows
    pub total_budget: f64,
    /// `total_budget - total_spent`
    pub total_remaining: f64,
}

/// Size of the buckets used by [`period_totals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One bucket per calendar day
    Day,
    /// One bucket per calendar month
    Month,
}

/// Total spending in one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotal {
    /// First day of the period
    pub start: NaiveDate,
    /// Display label: `2024-03-05` for days, `2024-03` for months
    pub label: String,
    /// Total spent in the period
    pub total: f64,
    /// Number of expenses in the period
    pub count: usize,
}

/// Groups expenses by category and sums them against the category budgets.
///
/// Every category appears, including ones with no spending. Rows are ordered by
/// amount spent (highest first), ties broken by name.
#[must_use]
pub fn group_by_category(
    categories: &[category::Model],
    expenses: &[ExpenseRow],
    range: DateRange,
) -> BudgetSummary {
    let mut spent_by_category: HashMap<i64, f64> = HashMap::new();
    for row in expenses {
        if range.contains(row.expense.date) {
            *spent_by_category.entry(row.expense.category_id).or_default() += row.expense.amount;
        }
    }

    let mut rows: Vec<CategorySummary> = categories
        .iter()
        .map(|category| {
            let spent = spent_by_category.get(&category.id).copied().unwrap_or(0.0);
            CategorySummary {
                category: category.name.clone(),
                spent,
                budget: category.budget,
                remaining: category.budget - spent,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.spent
            .total_cmp(&a.spent)
            .then_with(|| a.category.cmp(&b.category))
    });

    let total_spent: f64 = rows.iter().map(|r| r.spent).sum();
    let total_budget: f64 = rows.iter().map(|r| r.budget).sum();

    BudgetSummary {
        range,
        rows,
        total_spent,
        total_budget,
        total_remaining: total_budget - total_spent,
    }
}

/// Groups expenses into day or month buckets, in chronological order.
///
/// Periods without any expense are omitted.
#[must_use]
pub fn group_by_period(expenses: &[ExpenseRow], granularity: Granularity) -> Vec<PeriodTotal> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for row in expenses {
        let date = row.expense.date;
        let start = match granularity {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
        };
        let bucket = buckets.entry(start).or_insert((0.0, 0));
        bucket.0 += row.expense.amount;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (total, count))| PeriodTotal {
            start,
            label: match granularity {
                Granularity::Day => start.format("%Y-%m-%d").to_string(),
                Granularity::Month => start.format("%Y-%m").to_string(),
            },
            total,
            count,
        })
        .collect()
}

/// Loads categories and expenses in `range` and builds the budget summary.
pub async fn category_totals(db: &DatabaseConnection, range: DateRange) -> Result<BudgetSummary> {
    let categories = list_categories(db).await?;
    let expenses = list_expenses(db, &range.to_filter()).await?;
    Ok(group_by_category(&categories, &expenses, range))
}

/// Loads expenses in `range` and totals them per period.
pub async fn period_totals(
    db: &DatabaseConnection,
    range: DateRange,
    granularity: Granularity,
) -> Result<Vec<PeriodTotal>> {
    let expenses = list_expenses(db, &range.to_filter()).await?;
    Ok(group_by_period(&expenses, granularity))
}

/// Calculates how much of a budget has been used, as a percentage.
///
/// - 0% = nothing spent
/// - 100% = budget fully spent
/// - above 100% = over budget
///
/// A zero budget reports 0%.
#[must_use]
pub fn calculate_usage(spent: f64, budget: f64) -> f64 {
    if budget == 0.0 {
        return 0.0;
    }

    (spent / budget) * 100.0
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats an amount with the currency symbol and two decimals, e.g. `₹1250.00`.
#[must_use]
pub fn format_amount(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// Formats a remaining budget; overspending is shown in parentheses, e.g. `(25.00)`.
#[must_use]
pub fn format_remaining(remaining: f64) -> String {
    if remaining >= 0.0 {
        format!("{remaining:.2}")
    } else {
        format!("({:.2})", remaining.abs())
    }
}
