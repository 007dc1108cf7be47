//! Time-bucketed and per-category totals feeding the charts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::{Category, Expense, Money, calendar::local_date};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month. Orders chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Short label such as `Jan 2024`.
    pub fn label(self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        format!("{name} {}", self.year)
    }
}

/// Per-category totals for one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub totals: BTreeMap<Category, Money>,
}

impl MonthBucket {
    pub fn label(&self) -> String {
        self.month.label()
    }

    pub fn total(&self) -> Money {
        self.totals.values().sum()
    }

    pub fn get(&self, category: &Category) -> Money {
        self.totals.get(category).copied().unwrap_or(Money::ZERO)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Money,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayTotal {
    pub day: NaiveDate,
    pub total: Money,
}

/// Buckets expenses by year-month, oldest first.
///
/// Every category seen anywhere in `expenses` is present in every bucket,
/// zero when the month has no expense for it, so chart series line up.
pub fn group_by_month(expenses: &[Expense], tz: Tz) -> Vec<MonthBucket> {
    let seen: BTreeSet<&Category> = expenses.iter().map(|e| &e.category).collect();
    let mut months: BTreeMap<YearMonth, BTreeMap<Category, Money>> = BTreeMap::new();

    for expense in expenses {
        let month = YearMonth::of(local_date(&expense.date, tz));
        let totals = months.entry(month).or_insert_with(|| {
            seen.iter()
                .map(|category| ((*category).clone(), Money::ZERO))
                .collect()
        });
        *totals.entry(expense.category.clone()).or_default() += expense.amount;
    }

    months
        .into_iter()
        .map(|(month, totals)| MonthBucket { month, totals })
        .collect()
}

/// Totals per category ignoring time, largest first.
///
/// Ties are ordered by label; categories totalling zero are dropped.
pub fn group_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&Category, Money> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(&expense.category).or_default() += expense.amount;
    }

    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .filter(|(_, total)| !total.is_zero())
        .map(|(category, total)| CategoryTotal {
            category: category.clone(),
            total,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });
    out
}

/// Totals per calendar day, oldest first.
pub fn group_by_day(expenses: &[Expense], tz: Tz) -> Vec<DayTotal> {
    let mut days: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for expense in expenses {
        *days.entry(local_date(&expense.date, tz)).or_default() += expense.amount;
    }
    days.into_iter()
        .map(|(day, total)| DayTotal { day, total })
        .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(expenses: &[Expense]) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::new();
    for expense in expenses {
        if !out.contains(&expense.category) {
            out.push(expense.category.clone());
        }
    }
    out
}
