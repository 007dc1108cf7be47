use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/spedilo.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// IANA name; calendar days, months and weeks are read in this zone.
    pub timezone: String,
    /// JSON file holding the persisted token and user profile.
    pub state_path: String,
    pub log_level: String,
    pub endpoints: Endpoints,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            state_path: "config/spedilo_state.json".to_string(),
            log_level: "info".to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(self.timezone.trim())
            .map_err(|err| AppError::InvalidConfig(format!("timezone {}: {err}", self.timezone)))
    }
}

/// Paths of the remote endpoints, relative to `base_url`.
///
/// Deployments differ (`/expenses` vs `/api/expenses`), so every path can be
/// overridden from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub me: String,
    pub logout: String,
    pub expenses: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
            me: "/auth/me".to_string(),
            logout: "/auth/logout".to_string(),
            expenses: "/expenses".to_string(),
        }
    }
}

/// Command line overrides, flattened into the binary's arguments.
#[derive(Debug, Default, clap::Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override the session state file.
    #[arg(long, global = true)]
    pub state_path: Option<String>,
}

pub fn load(args: ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPEDILO").separator("__"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }

    settings.tz()?;
    Ok(settings)
}
