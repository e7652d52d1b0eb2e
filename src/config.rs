// Settings module: everything the program needs from its environment.
// The only required value is the API credential; the timeout and base URL
// have defaults and are rarely set.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Optional override of the service base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Optional HTTP timeout, in whole seconds.
pub const TIMEOUT_VAR: &str = "NAME_SENSEI_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// File name of the per-user settings file in the home directory.
const HOME_SETTINGS_FILE: &str = ".name-sensei.env";

/// Model identifier sent with every request.
pub const MODEL: &str = "gpt-4o-mini";
/// Low sampling temperature to keep answers factual and repeatable.
pub const TEMPERATURE: f64 = 0.3;

/// Settings resolved once at startup and owned by the client.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingCredential { var: API_KEY_VAR })?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Settings {
            api_key,
            base_url,
            timeout,
        })
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().map_err(|_| Error::InvalidSetting {
        key: TIMEOUT_VAR,
        reason: format!("expected a whole number of seconds, got {raw:?}"),
    })?;
    if secs == 0 {
        return Err(Error::InvalidSetting {
            key: TIMEOUT_VAR,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Populate the environment from local settings files, if present.
///
/// `.env` in the working directory is read first, then
/// `~/.name-sensei.env`. Variables that are already set win. Returns the
/// files that were loaded.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    let path = home_settings_path();
    if path.is_file() && dotenvy::from_path(&path).is_ok() {
        loaded.push(path);
    }
    loaded
}

/// Location of the per-user settings file.
fn home_settings_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(HOME_SETTINGS_FILE)
}
