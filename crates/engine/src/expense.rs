use chrono::{DateTime, Utc};

use crate::{Category, EngineError, Money, ResultEngine};

/// A single recorded spending transaction.
///
/// `id` is assigned by the server and is `None` until the expense has been
/// persisted. The amount is always strictly positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Option<String>,
    pub category: Category,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

impl Expense {
    /// Largest accepted amount for a single expense (₹1 000 000 000 000).
    ///
    /// Far above any real expense, and low enough that summing a list of
    /// them stays exact.
    pub const MAX_AMOUNT: Money = Money::new(100_000_000_000_000);

    /// Builds an expense, enforcing `0 < amount <= MAX_AMOUNT`.
    pub fn new(category: Category, amount: Money, date: DateTime<Utc>) -> ResultEngine<Self> {
        ensure_amount(amount)?;
        Ok(Self {
            id: None,
            category,
            amount,
            date,
            description: None,
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(description.into());
        self
    }

    /// The editable fields, without the server id.
    pub fn to_new(&self) -> NewExpense {
        NewExpense {
            category: self.category.clone(),
            amount: self.amount,
            date: self.date,
            description: self.description.clone(),
        }
    }
}

/// A validated expense that has not been sent to the server yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub category: Category,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> ResultEngine<()> {
        ensure_amount(self.amount)
    }
}

pub(crate) fn ensure_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    if amount > Expense::MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount exceeds {}",
            Expense::MAX_AMOUNT
        )));
    }
    Ok(())
}

pub(crate) fn normalize_description(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
