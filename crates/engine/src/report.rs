use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    Category, Expense, Filter, Money,
    grouping::{
        CategoryTotal, DayTotal, MonthBucket, categories, group_by_category, group_by_day,
        group_by_month,
    },
    period::{Period, sum_by_period_at},
};

/// Count, total and average of a set of expenses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total: Money,
    /// Rounded to the nearest minor unit; zero for an empty set.
    pub average: Money,
}

impl Summary {
    pub fn of(expenses: &[Expense]) -> Self {
        let count = expenses.len();
        let total: Money = expenses.iter().map(|e| e.amount).sum();
        let average = if count == 0 {
            Money::ZERO
        } else {
            Money::new((total.minor() as f64 / count as f64).round() as i64)
        };
        Self {
            count,
            total,
            average,
        }
    }
}

/// Everything the dashboard and analytics views display, computed once from
/// an immutable snapshot of the expense list.
///
/// Period totals and the category list cover the whole list; the table rows,
/// the summary and the chart series cover the filtered rows only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub rows: Vec<Expense>,
    pub week: Money,
    pub month: Money,
    pub year: Money,
    pub summary: Summary,
    pub monthly: Vec<MonthBucket>,
    pub by_category: Vec<CategoryTotal>,
    pub daily: Vec<DayTotal>,
    pub categories: Vec<Category>,
}

impl Report {
    pub fn build(expenses: &[Expense], filter: &Filter, now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let rows = crate::filter(expenses, filter);
        Self {
            week: sum_by_period_at(expenses, Period::Week, now),
            month: sum_by_period_at(expenses, Period::Month, now),
            year: sum_by_period_at(expenses, Period::Year, now),
            summary: Summary::of(&rows),
            monthly: group_by_month(&rows, tz),
            by_category: group_by_category(&rows),
            daily: group_by_day(&rows, tz),
            categories: categories(expenses),
            rows,
        }
    }
}
