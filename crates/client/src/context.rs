use api_types::auth::{Credentials, UserInfo};
use chrono::Utc;
use chrono_tz::Tz;
use engine::{ExpenseDraft, Filter, Report};

use crate::{
    config::AppConfig,
    error::{ClientError, Result},
    expenses::ExpenseStore,
    http::ApiClient,
    session::{AuthStatus, SessionStore},
};

/// Screen the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    Analytics,
}

impl View {
    pub fn is_auth_page(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    pub fn requires_session(self) -> bool {
        !self.is_auth_page()
    }
}

/// Application-wide state, created at start-up and handed to the views.
///
/// Owns the session and the expense cache; both are only mutated through
/// the methods below.
#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    tz: Tz,
    session: SessionStore,
    expenses: ExpenseStore,
    view: View,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let api = ApiClient::new(&config.base_url, config.endpoints.clone())?;
        Ok(Self {
            session: SessionStore::new(api.clone(), &config.state_path),
            expenses: ExpenseStore::new(api),
            tz,
            config,
            view: View::Login,
        })
    }

    /// Restores the session and lands on the dashboard or the login view.
    pub async fn start(&mut self) -> AuthStatus {
        let status = self.session.init().await;
        self.view = match status {
            AuthStatus::Authenticated => View::Dashboard,
            AuthStatus::Pending | AuthStatus::Unauthenticated => View::Login,
        };
        status
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn expenses(&self) -> &ExpenseStore {
        &self.expenses
    }

    /// Moves to `view`, guarding the pages that need a session.
    ///
    /// While the session is still pending the current view is kept, so there
    /// is no flicker through the login page. Returns the view actually shown.
    pub fn navigate(&mut self, view: View) -> View {
        if view.requires_session() {
            match self.session.status() {
                AuthStatus::Authenticated => self.view = view,
                AuthStatus::Unauthenticated => self.view = View::Login,
                AuthStatus::Pending => {}
            }
        } else {
            self.view = view;
        }
        self.view
    }

    /// Applies the unauthorized rule to a failed call.
    ///
    /// A 401 clears the session and the cache and redirects to the login
    /// view, unless the user is already on an auth page or held no token.
    /// Returns the redirect target, if any.
    pub fn handle_error(&mut self, err: &ClientError) -> Option<View> {
        if !matches!(err, ClientError::Unauthorized)
            || self.view.is_auth_page()
            || self.session.token().is_none()
        {
            return None;
        }
        self.session.expire();
        self.expenses.clear();
        self.view = View::Login;
        Some(View::Login)
    }

    pub async fn login(&mut self, credentials: Credentials) -> std::result::Result<UserInfo, ClientError> {
        self.view = View::Login;
        let user = self.session.login(credentials).await?;
        self.view = View::Dashboard;
        Ok(user)
    }

    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.expenses.clear();
        self.view = View::Login;
    }

    pub async fn refresh(&mut self) -> std::result::Result<(), ClientError> {
        let res = self.expenses.list(&self.session).await.map(|_| ());
        self.observe(res)
    }

    /// Validates the form input locally, then creates the expense.
    pub async fn add_expense(&mut self, draft: &ExpenseDraft) -> std::result::Result<(), ClientError> {
        let expense = draft.validate(self.tz)?;
        let res = self.expenses.create(&self.session, &expense).await;
        self.observe(res)
    }

    /// Replaces the editable fields of the cached expense `id` with `draft`.
    pub async fn update_expense(
        &mut self,
        id: &str,
        draft: &ExpenseDraft,
    ) -> std::result::Result<(), ClientError> {
        let edited = draft.validate(self.tz)?;
        let expense = engine::Expense {
            id: Some(id.to_string()),
            category: edited.category,
            amount: edited.amount,
            date: edited.date,
            description: edited.description,
        };
        let res = self.expenses.update(&self.session, &expense).await;
        self.observe(res)
    }

    pub async fn delete_expense(&mut self, id: &str) -> std::result::Result<(), ClientError> {
        let res = self.expenses.delete(&self.session, id).await;
        self.observe(res)
    }

    /// Derived data for the current cache, evaluated at the current instant.
    pub fn report(&self, filter: &Filter) -> Report {
        Report::build(self.expenses.items(), filter, Utc::now().with_timezone(&self.tz))
    }

    fn observe(
        &mut self,
        res: std::result::Result<(), ClientError>,
    ) -> std::result::Result<(), ClientError> {
        if let Err(err) = &res
            && let Some(view) = self.handle_error(err)
        {
            tracing::info!(?view, "redirecting after unauthorized response");
        }
        res
    }
}
