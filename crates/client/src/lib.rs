//! Client side of the expense tracker: a typed wrapper over the remote REST
//! API, the session and expense stores built on it, and the application
//! context tying them together.

pub use context::{AppContext, View};
pub use error::{AppError, ClientError, Result};
pub use expenses::ExpenseStore;
pub use http::ApiClient;
pub use session::{AuthStatus, SessionStore};
pub use storage::PersistedSession;

pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod expenses;
pub mod http;
pub mod session;
pub mod storage;
