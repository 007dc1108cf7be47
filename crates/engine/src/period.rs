//! Totals over the calendar period containing "now", and the relative time
//! presets offered by the analytics view.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{
    EngineError, Expense, Money,
    calendar::{end_of_day, first_of_month, local_date, start_of_day},
    filter::DateRange,
};

/// Calendar period used by the dashboard totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    /// Sunday 00:00 to the following Sunday 00:00 (exclusive).
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
            Self::Year => "This Year",
            Self::All => "All Time",
        }
    }

    /// Whether `instant` falls in the period that contains `now`.
    pub fn contains(self, instant: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        let tz = now.timezone();
        let today = now.date_naive();
        match self {
            Self::Week => {
                let start_date =
                    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
                let start = start_of_day(tz, start_date);
                let end = start_of_day(tz, start_date + Duration::days(7));
                *instant >= start && *instant < end
            }
            Self::Month => {
                let date = local_date(instant, tz);
                date.year() == today.year() && date.month() == today.month()
            }
            Self::Year => local_date(instant, tz).year() == today.year(),
            Self::All => true,
        }
    }
}

/// Sums the expenses falling in the `period` containing the current instant,
/// with calendar fields read in `tz`.
pub fn sum_by_period(expenses: &[Expense], period: Period, tz: Tz) -> Money {
    sum_by_period_at(expenses, period, Utc::now().with_timezone(&tz))
}

/// Same as [`sum_by_period`] with an explicit "now".
pub fn sum_by_period_at(expenses: &[Expense], period: Period, now: DateTime<Tz>) -> Money {
    expenses
        .iter()
        .filter(|expense| period.contains(&expense.date, &now))
        .map(|expense| expense.amount)
        .sum()
}

/// Relative time window selectable in the analytics view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimePreset {
    #[default]
    All,
    /// The whole previous calendar month.
    LastMonth,
    /// From the first day of the month three months back.
    Last3Months,
    /// From the first day of the month six months back.
    Last6Months,
    /// From January 1st of the current year.
    ThisYear,
    /// Whole calendar days, both ends inclusive.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl TimePreset {
    /// Resolves the preset against `now`.
    pub fn range_at(self, now: DateTime<Tz>) -> DateRange {
        let tz = now.timezone();
        let this_month = first_of_month(now.date_naive());
        let months_back = |n: u32| {
            this_month
                .checked_sub_months(Months::new(n))
                .map(|date| start_of_day(tz, date))
        };

        match self {
            Self::All => DateRange::default(),
            Self::LastMonth => DateRange {
                from: months_back(1),
                to: Some(start_of_day(tz, this_month) - Duration::seconds(1)),
            },
            Self::Last3Months => DateRange {
                from: months_back(3),
                to: None,
            },
            Self::Last6Months => DateRange {
                from: months_back(6),
                to: None,
            },
            Self::ThisYear => DateRange {
                from: this_month.with_month(1).map(|date| start_of_day(tz, date)),
                to: None,
            },
            Self::Custom { from, to } => DateRange {
                from: from.map(|date| start_of_day(tz, date)),
                to: to.map(|date| end_of_day(tz, date)),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::LastMonth => "Last Month",
            Self::Last3Months => "Last 3 Months",
            Self::Last6Months => "Last 6 Months",
            Self::ThisYear => "This Year",
            Self::Custom { .. } => "Custom Range",
        }
    }
}

impl FromStr for TimePreset {
    type Err = EngineError;

    /// Parses the kebab-case names used on the command line. `Custom` has no
    /// name: it is built from explicit dates.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "last-month" => Ok(Self::LastMonth),
            "last-3-months" => Ok(Self::Last3Months),
            "last-6-months" => Ok(Self::Last6Months),
            "this-year" => Ok(Self::ThisYear),
            other => Err(EngineError::InvalidDate(format!("unknown range: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::Category;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn expense(amount: i64, date: DateTime<Utc>) -> Expense {
        Expense::new(Category::Food, Money::new(amount), date).unwrap()
    }

    // Wednesday.
    fn now() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap()
    }

    #[test]
    fn week_starts_on_sunday_and_spans_seven_days() {
        let expenses = vec![
            expense(1, at(2024, 3, 9, 23)),  // Saturday before
            expense(10, at(2024, 3, 10, 0)), // Sunday start
            expense(20, at(2024, 3, 16, 23)), // Saturday end
            expense(40, at(2024, 3, 17, 0)), // next Sunday
        ];
        assert_eq!(
            sum_by_period_at(&expenses, Period::Week, now()),
            Money::new(30)
        );
    }

    #[test]
    fn month_and_year_use_calendar_fields() {
        let expenses = vec![
            expense(100, at(2024, 3, 1, 0)),
            expense(200, at(2024, 2, 29, 23)),
            expense(400, at(2023, 3, 13, 12)),
        ];
        assert_eq!(
            sum_by_period_at(&expenses, Period::Month, now()),
            Money::new(100)
        );
        assert_eq!(
            sum_by_period_at(&expenses, Period::Year, now()),
            Money::new(300)
        );
        assert_eq!(
            sum_by_period_at(&expenses, Period::All, now()),
            Money::new(700)
        );
    }

    #[test]
    fn no_matches_sum_to_zero() {
        assert_eq!(sum_by_period_at(&[], Period::Week, now()), Money::ZERO);
    }

    #[test]
    fn last_month_covers_the_previous_calendar_month() {
        let range = TimePreset::LastMonth.range_at(now());
        assert_eq!(range.from, Some(at(2024, 2, 1, 0)));
        assert_eq!(
            range.to,
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn relative_presets_start_on_the_first_of_the_month() {
        assert_eq!(
            TimePreset::Last3Months.range_at(now()).from,
            Some(at(2023, 12, 1, 0))
        );
        assert_eq!(
            TimePreset::Last6Months.range_at(now()).from,
            Some(at(2023, 9, 1, 0))
        );
        assert_eq!(
            TimePreset::ThisYear.range_at(now()).from,
            Some(at(2024, 1, 1, 0))
        );
        assert_eq!(TimePreset::All.range_at(now()), DateRange::default());
    }

    #[test]
    fn custom_range_covers_whole_days() {
        let preset = TimePreset::Custom {
            from: NaiveDate::from_ymd_opt(2024, 1, 5),
            to: NaiveDate::from_ymd_opt(2024, 1, 20),
        };
        let range = preset.range_at(now());
        assert_eq!(range.from, Some(at(2024, 1, 5, 0)));
        assert_eq!(
            range.to,
            Some(Utc.with_ymd_and_hms(2024, 1, 20, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("last-3-months".parse::<TimePreset>(), Ok(TimePreset::Last3Months));
        assert!("yesterday".parse::<TimePreset>().is_err());
    }
}
