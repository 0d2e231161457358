//! SVG chart rendering for the dashboard.
//!
//! Two charts are drawn from a [`BudgetSummary`]: a pie showing how spending is
//! distributed across categories, and grouped bars comparing each category's
//! budget with what was actually spent.

use crate::{
    core::report::{BudgetSummary, CategorySummary},
    errors::Result,
};
use std::{
    f64::consts::PI,
    path::{Path as FsPath, PathBuf},
};
use svg::{
    Document,
    node::{
        Text as TextNode,
        element::{Circle, Line, Path, Rectangle, Text, path::Data},
    },
};
use tracing::info;

const COLORS: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];
const BUDGET_COLOR: &str = "#4e79a7";
const SPENT_COLOR: &str = "#f28e2b";

/// File name of the distribution pie written by [`render_dashboard`].
pub const DISTRIBUTION_FILE: &str = "distribution.svg";
/// File name of the budget comparison written by [`render_dashboard`].
pub const BUDGET_FILE: &str = "budget_vs_actual.svg";

/// Escapes XML markup characters; text nodes are written to the file as-is.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn label(x: f64, y: f64, anchor: &str, content: impl AsRef<str>) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("text-anchor", anchor)
        .set("font-family", "sans-serif")
        .set("font-size", 14)
        .add(TextNode::new(escape(content.as_ref())))
}

fn title(width: f64, content: &str) -> Text {
    label(width / 2.0, 30.0, "middle", content).set("font-size", 20)
}

/// Point on a circle; angle 0 points up and grows clockwise.
fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Pie chart of spending per category, with percentage labels.
///
/// Categories with nothing spent are left out. When nothing at all was spent, the
/// chart only carries a "No expenses to display" message.
#[must_use]
pub fn distribution_pie(rows: &[CategorySummary]) -> Document {
    let (width, height) = (600.0, 500.0);
    let (cx, cy, radius) = (width / 2.0, 270.0, 180.0);

    let mut document = Document::new()
        .set("viewBox", (0, 0, 600, 500))
        .set("width", width)
        .set("height", height)
        .add(title(width, "Expense Distribution"));

    let slices: Vec<&CategorySummary> = rows.iter().filter(|r| r.spent > 0.0).collect();
    let total: f64 = slices.iter().map(|r| r.spent).sum();
    if slices.is_empty() || total <= 0.0 {
        return document.add(label(cx, cy, "middle", "No expenses to display"));
    }

    let mut start = 0.0;
    for (i, row) in slices.iter().enumerate() {
        let fraction = row.spent / total;
        let sweep = fraction * 2.0 * PI;
        let color = COLORS[i % COLORS.len()];

        if slices.len() == 1 {
            document = document.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", radius)
                    .set("fill", color),
            );
        } else {
            let (x1, y1) = polar(cx, cy, radius, start);
            let (x2, y2) = polar(cx, cy, radius, start + sweep);
            let large_arc = if sweep > PI { 1.0 } else { 0.0 };
            let data = Data::new()
                .move_to((cx, cy))
                .line_to((x1, y1))
                .elliptical_arc_to((radius, radius, 0.0, large_arc, 1.0, x2, y2))
                .close();
            document = document.add(
                Path::new()
                    .set("fill", color)
                    .set("stroke", "white")
                    .set("stroke-width", 1)
                    .set("d", data),
            );
        }

        let (lx, ly) = polar(cx, cy, radius * 1.15, start + sweep / 2.0);
        let anchor = if lx < cx { "end" } else { "start" };
        document = document.add(label(
            lx,
            ly,
            anchor,
            format!("{} {:.1}%", row.category, fraction * 100.0),
        ));
        start += sweep;
    }

    document
}

/// Grouped bar chart of budget against actual spending per category.
#[must_use]
pub fn budget_vs_actual(rows: &[CategorySummary]) -> Document {
    let (margin_left, margin_top, plot_height) = (60.0, 60.0, 300.0);
    let group_width = 80.0;
    let bar_width = 28.0;
    #[allow(clippy::cast_precision_loss)]
    let plot_width = (rows.len().max(1) as f64) * group_width;
    let width = margin_left + plot_width + 40.0;
    let height = margin_top + plot_height + 140.0;
    let baseline = margin_top + plot_height;

    let max_value = rows
        .iter()
        .flat_map(|r| [r.budget, r.spent])
        .fold(0.0_f64, f64::max);
    let scale = if max_value > 0.0 {
        plot_height / max_value
    } else {
        0.0
    };

    let mut document = Document::new()
        .set("viewBox", (0.0, 0.0, width, height))
        .set("width", width)
        .set("height", height)
        .add(title(width, "Budget vs Actual Spending"))
        .add(
            Line::new()
                .set("x1", margin_left)
                .set("x2", margin_left)
                .set("y1", margin_top)
                .set("y2", baseline)
                .set("stroke", "black")
                .set("stroke-width", 2),
        )
        .add(
            Line::new()
                .set("x1", margin_left)
                .set("x2", margin_left + plot_width)
                .set("y1", baseline)
                .set("y2", baseline)
                .set("stroke", "black")
                .set("stroke-width", 2),
        )
        .add(label(margin_left - 8.0, margin_top + 5.0, "end", format!("{max_value:.0}")))
        .add(label(margin_left - 8.0, baseline, "end", "0"));

    for (i, row) in rows.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let group_x = margin_left + (i as f64) * group_width + 10.0;
        for (offset, value, color) in [
            (0.0, row.budget, BUDGET_COLOR),
            (bar_width, row.spent, SPENT_COLOR),
        ] {
            let bar_height = value.max(0.0) * scale;
            document = document.add(
                Rectangle::new()
                    .set("x", group_x + offset)
                    .set("y", baseline - bar_height)
                    .set("width", bar_width)
                    .set("height", bar_height)
                    .set("fill", color),
            );
        }

        let (tx, ty) = (group_x + bar_width, baseline + 18.0);
        document = document.add(
            label(tx, ty, "end", &row.category)
                .set("transform", format!("rotate(-45 {tx} {ty})")),
        );
    }

    let legend_y = height - 30.0;
    for (i, (name, color)) in [("Budget", BUDGET_COLOR), ("Spent", SPENT_COLOR)]
        .into_iter()
        .enumerate()
    {
        #[allow(clippy::cast_precision_loss)]
        let x = margin_left + (i as f64) * 110.0;
        document = document
            .add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", legend_y - 12.0)
                    .set("width", 14)
                    .set("height", 14)
                    .set("fill", color),
            )
            .add(label(x + 20.0, legend_y, "start", name));
    }

    document
}

/// Writes both dashboard charts into `dir`, creating it if needed.
///
/// Returns the paths of the written files.
pub fn render_dashboard(summary: &BudgetSummary, dir: &FsPath) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let distribution = dir.join(DISTRIBUTION_FILE);
    svg::save(&distribution, &distribution_pie(&summary.rows))?;

    let budget = dir.join(BUDGET_FILE);
    svg::save(&budget, &budget_vs_actual(&summary.rows))?;

    info!(dir = %dir.display(), "Rendered dashboard charts");
    Ok(vec![distribution, budget])
}
