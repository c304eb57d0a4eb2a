use tracing::debug;

use crate::rtc::{RtcCredentials, DEFAULT_API_URL};
use crate::shared::AppError;

const ACCOUNT_ID_VAR: &str = "BW_ACCOUNT_ID";
const USERNAME_VAR: &str = "BW_USERNAME";
const PASSWORD_VAR: &str = "BW_PASSWORD";
const API_URL_VAR: &str = "BW_WEBRTC_API_URL";
const PORT_VAR: &str = "PORT";
const STATIC_DIR_VAR: &str = "STATIC_DIR";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

/// Process configuration read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: RtcCredentials,
    pub api_url: String,
    pub port: u16,
    pub static_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Empty values count as missing. Every missing required variable is
    /// reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let account_id = non_empty(ACCOUNT_ID_VAR);
        let username = non_empty(USERNAME_VAR);
        let password = non_empty(PASSWORD_VAR);

        let (account_id, username, password) = match (account_id, username, password) {
            (Some(account_id), Some(username), Some(password)) => (account_id, username, password),
            (account_id, username, password) => {
                let missing: Vec<&str> = [
                    (ACCOUNT_ID_VAR, account_id.is_none()),
                    (USERNAME_VAR, username.is_none()),
                    (PASSWORD_VAR, password.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, is_missing)| is_missing.then_some(key))
                .collect();

                return Err(AppError::Config(format!(
                    "please set the {} environment variables before running this app (missing: {})",
                    [ACCOUNT_ID_VAR, USERNAME_VAR, PASSWORD_VAR].join(", "),
                    missing.join(", ")
                )));
            }
        };

        let port = match non_empty(PORT_VAR) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("{} must be a port number, got '{}'", PORT_VAR, raw)))?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            credentials: RtcCredentials {
                account_id,
                username,
                password,
            },
            api_url: non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            port,
            static_dir: non_empty(STATIC_DIR_VAR).unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        };

        debug!(
            account_id = %config.credentials.account_id,
            api_url = %config.api_url,
            port = config.port,
            static_dir = %config.static_dir,
            "Loaded configuration"
        );

        Ok(config)
    }
}
