use std::io;

use chrono_tz::Tz;
use csv::Writer;
use engine::Expense;
use serde::Serialize;
use spedilo_client::{AppError, Result};

#[derive(Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    date: String,
    category: &'a str,
    amount: String,
    description: &'a str,
}

/// Writes `rows` as CSV, dates as local calendar days in `tz`.
pub fn write_csv<W: io::Write>(out: W, rows: &[Expense], tz: Tz) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    for expense in rows {
        writer
            .serialize(ExportRow {
                id: expense.id.as_deref().unwrap_or_default(),
                date: expense.date.with_timezone(&tz).format("%Y-%m-%d").to_string(),
                category: expense.category.label(),
                amount: expense.amount.decimal(),
                description: expense.description.as_deref().unwrap_or_default(),
            })
            .map_err(|err| AppError::Terminal(format!("failed to serialize export row: {err}")))?;
    }
    writer.flush()?;
    Ok(())
}
