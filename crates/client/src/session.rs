use std::path::PathBuf;

use api_types::auth::{Credentials, Registration, UserInfo};

use crate::{error::ClientError, http::ApiClient, storage::PersistedSession};

/// Authentication status as seen by the views.
///
/// `Pending` lasts from start-up until the persisted session has been checked
/// against the server; views must not redirect while it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Pending,
    Authenticated,
    Unauthenticated,
}

/// Current user identity and bearer token, persisted between runs.
#[derive(Debug)]
pub struct SessionStore {
    api: ApiClient,
    state_path: PathBuf,
    token: Option<String>,
    user: Option<UserInfo>,
    status: AuthStatus,
}

impl SessionStore {
    pub fn new(api: ApiClient, state_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            state_path: state_path.into(),
            token: None,
            user: None,
            status: AuthStatus::Pending,
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
    }

    pub fn current_user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Restores the persisted session and reconciles it with the server.
    ///
    /// A 401 from the "who am I" call drops the session. Any other failure
    /// keeps it when a user profile was persisted alongside the token.
    pub async fn init(&mut self) -> AuthStatus {
        let persisted = match PersistedSession::load(&self.state_path) {
            Ok(persisted) => persisted,
            Err(err) => {
                tracing::warn!("unreadable session file, starting logged out: {err}");
                PersistedSession::default()
            }
        };

        let Some(token) = persisted.token else {
            self.reset();
            return self.status;
        };
        self.token = Some(token.clone());
        self.user = persisted.user;
        self.status = AuthStatus::Pending;

        match self.api.me(&token).await {
            Ok(user) => {
                self.user = Some(user);
                self.status = AuthStatus::Authenticated;
                if let Err(err) = self.persist() {
                    tracing::warn!("failed to refresh session file: {err}");
                }
            }
            Err(ClientError::Unauthorized) => {
                tracing::info!("stored session rejected by server");
                self.clear();
            }
            Err(err) if self.user.is_some() => {
                tracing::warn!("could not verify session, using stored profile: {err}");
                self.status = AuthStatus::Authenticated;
            }
            Err(err) => {
                tracing::warn!("could not verify session: {err}");
                self.clear();
            }
        }

        self.status
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<UserInfo, ClientError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let res = self.api.login(&credentials).await.map_err(|err| match err {
            ClientError::Unauthorized => {
                ClientError::InvalidCredentials("invalid email or password".to_string())
            }
            ClientError::Validation(message) => ClientError::InvalidCredentials(message),
            other => other,
        })?;

        let token = res
            .token
            .ok_or_else(|| ClientError::Server("login response carried no token".to_string()))?;

        self.token = Some(token);
        self.user = Some(res.user.clone());
        self.status = AuthStatus::Authenticated;
        self.persist()?;
        tracing::info!(email = %res.user.email, "logged in");
        Ok(res.user)
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ClientError> {
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(ClientError::Validation(
                "name, email and password are required".to_string(),
            ));
        }
        self.api.register(registration).await
    }

    /// Always succeeds locally; a failing remote call is only logged.
    pub async fn logout(&mut self) {
        if let Some(token) = self.token.as_deref()
            && let Err(err) = self.api.logout(token).await
        {
            tracing::warn!("remote logout failed: {err}");
        }
        self.clear();
        tracing::info!("logged out");
    }

    /// Drops the session after the server rejected the token.
    pub fn expire(&mut self) {
        tracing::warn!("session expired");
        self.clear();
    }

    fn persist(&self) -> Result<(), ClientError> {
        PersistedSession {
            token: self.token.clone(),
            user: self.user.clone(),
        }
        .save(&self.state_path)
        .map_err(|err| ClientError::Storage(err.to_string()))
    }

    fn reset(&mut self) {
        self.token = None;
        self.user = None;
        self.status = AuthStatus::Unauthenticated;
    }

    fn clear(&mut self) {
        self.reset();
        if let Err(err) = PersistedSession::remove(&self.state_path) {
            tracing::warn!("failed to remove session file: {err}");
        }
    }
}
