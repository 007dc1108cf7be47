use engine::{Expense, NewExpense};

use crate::{
    convert::{expenses_from_views, payload_for_update, payload_from_new},
    error::ClientError,
    http::ApiClient,
    session::SessionStore,
};

/// Local cache of the signed-in user's expenses.
///
/// Writes go to the server first and are followed by a full refetch; the
/// cache is never patched locally. A failed call leaves the last good list in
/// place and records a message in [`ExpenseStore::error`].
#[derive(Debug)]
pub struct ExpenseStore {
    api: ApiClient,
    items: Vec<Expense>,
    error: Option<String>,
}

impl ExpenseStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            error: None,
        }
    }

    pub fn items(&self) -> &[Expense] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.error = None;
    }

    /// Replaces the cache with the server's list.
    pub async fn list(&mut self, session: &SessionStore) -> Result<&[Expense], ClientError> {
        let token = token(session)?;
        self.error = None;
        let res = self.api.list_expenses(token).await;

        match res {
            Ok(views) => {
                self.items = expenses_from_views(views);
                Ok(&self.items)
            }
            Err(err) => Err(self.fail(err, "Failed to fetch expenses")),
        }
    }

    pub async fn create(
        &mut self,
        session: &SessionStore,
        expense: &NewExpense,
    ) -> Result<(), ClientError> {
        if let Err(err) = expense.validate() {
            return Err(self.fail(err.into(), "Failed to add expense"));
        }
        let token = token(session)?;
        let res = self
            .api
            .create_expense(token, &payload_from_new(expense))
            .await;
        if let Err(err) = res {
            return Err(self.fail(err, "Failed to add expense"));
        }
        self.list(session).await.map(|_| ())
    }

    /// Sends the edited fields of `expense`; it must carry a server id.
    pub async fn update(
        &mut self,
        session: &SessionStore,
        expense: &Expense,
    ) -> Result<(), ClientError> {
        let Some(id) = expense.id.as_deref() else {
            let err = ClientError::Validation("expense has no id".to_string());
            return Err(self.fail(err, "Failed to update expense"));
        };
        let edited = expense.to_new();
        if let Err(err) = edited.validate() {
            return Err(self.fail(err.into(), "Failed to update expense"));
        }
        let token = token(session)?;
        let res = self
            .api
            .update_expense(token, id, &payload_for_update(&edited))
            .await;
        if let Err(err) = res {
            return Err(self.fail(err, "Failed to update expense"));
        }
        self.list(session).await.map(|_| ())
    }

    pub async fn delete(&mut self, session: &SessionStore, id: &str) -> Result<(), ClientError> {
        let token = token(session)?;
        let res = self.api.delete_expense(token, id).await;
        if let Err(err) = res {
            return Err(self.fail(err, "Failed to delete expense"));
        }
        self.list(session).await.map(|_| ())
    }

    fn fail(&mut self, err: ClientError, fallback: &str) -> ClientError {
        let message = err.user_message(fallback);
        tracing::warn!("{message}");
        self.error = Some(message);
        err
    }
}

fn token(session: &SessionStore) -> Result<&str, ClientError> {
    session.token().ok_or(ClientError::Unauthorized)
}
