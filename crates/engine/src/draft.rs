use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{
    Category, EngineError, Expense, NewExpense, ResultEngine,
    calendar::{local_date, start_of_day},
    expense::{ensure_amount, normalize_description},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw add/update form input, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub category: String,
    pub amount: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
}

impl ExpenseDraft {
    /// Prefills the update form from an existing expense.
    pub fn from_expense(expense: &Expense, tz: Tz) -> Self {
        Self {
            category: expense.category.label().to_string(),
            amount: expense.amount.decimal(),
            date: local_date(&expense.date, tz).format(DATE_FORMAT).to_string(),
            description: expense.description.clone().unwrap_or_default(),
        }
    }

    /// Checks the draft and converts it into an expense ready to be sent.
    ///
    /// The date is taken at local midnight in `tz`. Nothing here talks to the
    /// server: a rejected draft never produces a request.
    pub fn validate(&self, tz: Tz) -> ResultEngine<NewExpense> {
        let category: Category = self.category.parse()?;
        let amount = self
            .amount
            .parse()
            .map_err(|_| EngineError::InvalidAmount("please enter a valid amount".to_string()))?;
        ensure_amount(amount)?;
        let day = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|err| EngineError::InvalidDate(format!("{}: {err}", self.date.trim())))?;

        Ok(NewExpense {
            category,
            amount,
            date: start_of_day(tz, day),
            description: normalize_description(self.description.clone()),
        })
    }
}
