//! Mapping between the wire model and the engine's domain model.

use api_types::expense::{ExpensePayload, ExpenseView};
use engine::{Category, EngineError, Expense, Money, NewExpense};

/// Converts a server row, enforcing the domain invariants (known date,
/// non-empty category, `0 < amount <= Expense::MAX_AMOUNT`).
pub fn expense_from_view(view: ExpenseView) -> Result<Expense, EngineError> {
    let category: Category = view.category.parse()?;
    let amount = Money::from_major(view.amount)
        .ok_or_else(|| EngineError::InvalidAmount(format!("not a number: {}", view.amount)))?;

    let mut expense = Expense::new(category, amount, view.date)?;
    expense.id = view.id;
    if let Some(description) = view.description {
        expense = expense.with_description(description);
    }
    Ok(expense)
}

/// Converts server rows, dropping the ones that break an invariant.
pub fn expenses_from_views(views: Vec<ExpenseView>) -> Vec<Expense> {
    views
        .into_iter()
        .filter_map(|view| {
            let id = view.id.clone();
            match expense_from_view(view) {
                Ok(expense) => Some(expense),
                Err(err) => {
                    tracing::warn!(id = ?id, "skipping invalid expense from server: {err}");
                    None
                }
            }
        })
        .collect()
}

pub fn payload_from_new(expense: &NewExpense) -> ExpensePayload {
    ExpensePayload {
        category: expense.category.label().to_string(),
        amount: expense.amount.to_major(),
        date: expense.date,
        description: expense.description.clone(),
    }
}

/// Like [`payload_from_new`], but a missing description is sent as `""` so
/// the server clears the stored one.
pub fn payload_for_update(expense: &NewExpense) -> ExpensePayload {
    ExpensePayload {
        description: Some(expense.description.clone().unwrap_or_default()),
        ..payload_from_new(expense)
    }
}
