use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the server on non-2xx responses.
///
/// Different deployments use different field names, so all of them are
/// accepted and the first present one wins.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.msg.or(self.error).or(self.message)
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Registration {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserInfo {
        pub name: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Absent when the server relies on a session cookie.
        pub token: Option<String>,
        pub user: UserInfo,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeResponse {
        pub user: UserInfo,
    }
}

pub mod expense {
    use super::*;

    /// An expense as stored by the server.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseView {
        #[serde(rename = "_id", alias = "id", default)]
        pub id: Option<String>,
        pub category: String,
        /// Decimal amount in major units (e.g. `12.5`).
        pub amount: f64,
        /// RFC3339 timestamp.
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub description: Option<String>,
    }

    /// Request body for creating or updating an expense.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpensePayload {
        pub category: String,
        pub amount: f64,
        pub date: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }
}
