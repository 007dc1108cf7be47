//! Plain-text rendering of the dashboard table and the analytics charts.

use std::fmt::Write;

use chrono_tz::Tz;
use engine::{CategoryTotal, DayTotal, Expense, Money, MonthBucket, Period, Report};

const BAR_WIDTH: usize = 30;

/// Expense table, newest first.
pub fn expense_table(rows: &[Expense], tz: Tz) -> String {
    if rows.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut rows: Vec<&Expense> = rows.iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));

    let lines: Vec<[String; 5]> = rows
        .iter()
        .map(|expense| {
            [
                expense.date.with_timezone(&tz).format("%Y-%m-%d").to_string(),
                expense.category.label().to_string(),
                expense.amount.to_string(),
                expense.description.clone().unwrap_or_default(),
                expense.id.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let header = ["Date", "Category", "Amount", "Description", "Id"].map(str::to_string);
    let mut widths = header.clone().map(|h| h.chars().count());
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&lines) {
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                // Amounts are right aligned.
                if i == 2 {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Period cards followed by the count/total/average of the filtered rows.
pub fn summary(report: &Report) -> String {
    let mut out = String::new();
    for (period, total) in [
        (Period::Week, report.week),
        (Period::Month, report.month),
        (Period::Year, report.year),
    ] {
        let _ = writeln!(out, "{:<11} {total}", period.label());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Expenses    {}", report.summary.count);
    let _ = writeln!(out, "Total       {}", report.summary.total);
    let _ = writeln!(out, "Average     {}", report.summary.average);
    out
}

/// Stacked monthly totals, one line per month plus its category split.
pub fn monthly_chart(buckets: &[MonthBucket]) -> String {
    let max = buckets.iter().map(MonthBucket::total).max().unwrap_or_default();
    let mut out = String::new();
    for bucket in buckets {
        let total = bucket.total();
        let _ = writeln!(
            out,
            "{:<9} {:<width$} {}",
            bucket.label(),
            bar(total, max),
            total.compact(),
            width = BAR_WIDTH
        );
        let split: Vec<String> = bucket
            .totals
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(category, amount)| format!("{category} {}", amount.compact()))
            .collect();
        if !split.is_empty() {
            let _ = writeln!(out, "          {}", split.join(", "));
        }
    }
    out
}

/// Category breakdown with share of the total.
pub fn category_chart(totals: &[CategoryTotal]) -> String {
    let max = totals.first().map(|t| t.total).unwrap_or_default();
    let sum: Money = totals.iter().map(|t| t.total).sum();
    let label_width = totals
        .iter()
        .map(|t| t.category.label().chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for total in totals {
        let share = if sum.is_positive() {
            total.total.minor() as f64 * 100.0 / sum.minor() as f64
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "{:<label_width$} {:<width$} {} ({share:.1}%)",
            total.category.label(),
            bar(total.total, max),
            total.total.compact(),
            width = BAR_WIDTH
        );
    }
    out
}

pub fn daily_chart(days: &[DayTotal]) -> String {
    let max = days.iter().map(|d| d.total).max().unwrap_or_default();
    let mut out = String::new();
    for day in days {
        let _ = writeln!(
            out,
            "{} {:<width$} {}",
            day.day.format("%d %b %Y"),
            bar(day.total, max),
            day.total.compact(),
            width = BAR_WIDTH
        );
    }
    out
}

fn bar(value: Money, max: Money) -> String {
    if !value.is_positive() || !max.is_positive() {
        return String::new();
    }
    let len = ((value.minor() as f64 / max.minor() as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}
