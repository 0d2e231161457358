//! CSV export of expense listings.

use crate::{core::expense::ExpenseRow, errors::Result};
use std::io::Write;

/// Column headers of the exported file.
pub const CSV_HEADER: [&str; 6] = [
    "ID",
    "Amount",
    "Description",
    "Category",
    "Date",
    "Payment Method",
];

/// Writes `rows` as CSV to `writer`, header first. Returns the number of data rows.
pub fn write_csv<W: Write>(rows: &[ExpenseRow], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for row in rows {
        let expense = &row.expense;
        csv_writer.write_record([
            expense.id.to_string(),
            format!("{:.2}", expense.amount),
            expense.note.clone().unwrap_or_default(),
            row.category.clone(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.payment_method.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(rows.len())
}
