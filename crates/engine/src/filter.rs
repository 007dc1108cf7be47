use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{Category, EngineError, Expense};

/// Category selector: everything, or one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Inclusive date range; a missing bound is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *instant >= from) && self.to.is_none_or(|to| *instant <= to)
    }
}

/// Filter criteria applied to the expense table and to the charts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub category: CategoryFilter,
    pub range: DateRange,
}

impl Filter {
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.matches(&expense.category) && self.range.contains(&expense.date)
    }
}

/// Returns the expenses matching `filter`, preserving input order.
pub fn filter(expenses: &[Expense], filter: &Filter) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| filter.matches(expense))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::Money;

    fn expense(category: Category, day: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Expense::new(category, Money::new(100), date).unwrap()
    }

    #[test]
    fn all_selector_parses_case_insensitively() {
        assert_eq!("ALL".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "food".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Food))
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let expenses = vec![
            expense(Category::Food, 4),
            expense(Category::Food, 5),
            expense(Category::Food, 10),
            expense(Category::Food, 11),
        ];
        let criteria = Filter {
            category: CategoryFilter::All,
            range: DateRange {
                from: Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()),
                to: Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()),
            },
        };
        let days: Vec<_> = filter(&expenses, &criteria)
            .iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(days, vec![expenses[1].date, expenses[2].date]);
    }

    #[test]
    fn open_bounds_keep_everything() {
        let expenses = vec![expense(Category::Food, 1), expense(Category::Travel, 2)];
        assert_eq!(filter(&expenses, &Filter::default()), expenses);
        assert!(filter(&[], &Filter::default()).is_empty());
    }

    #[test]
    fn category_and_range_combine() {
        let expenses = vec![expense(Category::Food, 1), expense(Category::Travel, 20)];
        let criteria = Filter {
            category: CategoryFilter::Only(Category::Travel),
            range: DateRange {
                from: None,
                to: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            },
        };
        assert!(filter(&expenses, &criteria).is_empty());
    }
}
