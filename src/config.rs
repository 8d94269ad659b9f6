//! Application configuration.
//!
//! The base address and password come from the environment (`WG_EASY_URL`
//! and `PASSWORD`), with `.env` support handled in `main` via `dotenvy`.
//! Both values are required; a missing one is a fatal startup error raised
//! before any API use.

use thiserror::Error;

/// Environment variable carrying the wg-easy base address.
const ENV_BASE_URL: &str = "WG_EASY_URL";

/// Environment variable carrying the admin password.
const ENV_PASSWORD: &str = "PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing or empty {0} - set it in the environment or a .env file")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_PASSWORD).ok(),
        )
    }

    pub fn new(base_url: Option<String>, password: Option<String>) -> Result<Self, ConfigError> {
        let base_url = base_url
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let password = password
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ENV_PASSWORD))?;
        Ok(Self { base_url, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_values_required() {
        assert!(Config::new(Some("http://wg".into()), Some("pw".into())).is_ok());

        assert!(matches!(
            Config::new(None, Some("pw".into())),
            Err(ConfigError::Missing("WG_EASY_URL"))
        ));
        assert!(matches!(
            Config::new(Some("http://wg".into()), None),
            Err(ConfigError::Missing("PASSWORD"))
        ));
    }

    #[test]
    fn test_blank_values_rejected() {
        assert!(matches!(
            Config::new(Some("   ".into()), Some("pw".into())),
            Err(ConfigError::Missing("WG_EASY_URL"))
        ));
        assert!(matches!(
            Config::new(Some("http://wg".into()), Some("".into())),
            Err(ConfigError::Missing("PASSWORD"))
        ));
    }
}
