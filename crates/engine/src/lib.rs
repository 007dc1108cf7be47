//! Expense domain model and the pure aggregation functions behind the
//! dashboard and analytics views.
//!
//! Nothing in this crate performs I/O. Every function takes an immutable slice
//! of [`Expense`] and returns freshly computed data, so views can recompute
//! whenever their inputs change.

pub use category::Category;
pub use draft::ExpenseDraft;
pub use error::EngineError;
pub use expense::{Expense, NewExpense};
pub use filter::{CategoryFilter, DateRange, Filter, filter};
pub use grouping::{
    CategoryTotal, DayTotal, MonthBucket, YearMonth, categories, group_by_category, group_by_day,
    group_by_month,
};
pub use money::Money;
pub use period::{Period, TimePreset, sum_by_period, sum_by_period_at};
pub use report::{Report, Summary};

mod calendar;
mod category;
mod draft;
mod error;
mod expense;
mod filter;
mod grouping;
mod money;
mod period;
mod report;

type ResultEngine<T> = Result<T, EngineError>;
