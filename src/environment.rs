use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;
use tokio::time::Duration;
use tracing::warn;

use crate::feed::{
    SiteIdentity, DEFAULT_USER_AGENT, FEED_REQUEST_TIMEOUT, OG_CONCURRENCY, OG_REQUEST_TIMEOUT,
};

pub const FEED_URL_VAR: &str = "READING_FEED_URL";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FEED_TTL_SECONDS: u64 = 3600;

/// Retrieves an environment variable, treating unset and blank values alike.
///
/// # Arguments
/// - `var`: The name of the environment variable.
///
/// # Returns
/// - `Option<String>`
pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Retrieves an environment variable or `default` when it is unset.
pub fn get_env_var_or(var: &str, default: &str) -> String {
    get_env_var(var).unwrap_or_else(|| default.to_string())
}

/// Retrieves and parses an environment variable, falling back to `default`
/// (with a warning) when the value does not parse.
pub fn get_env_var_parsed<T>(var: &str, default: T) -> T
where
    T: FromStr,
{
    match get_env_var(var) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default", raw, var);
            default
        }),
        None => default,
    }
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: Option<String>,
    pub port: u16,
    pub feed_ttl_seconds: u64,
    pub feed_timeout: Duration,
    pub og_timeout: Duration,
    pub og_concurrency: usize,
    pub user_agent: String,
    pub site: SiteIdentity,
}

impl Settings {
    pub fn from_env() -> Self {
        let site_defaults = SiteIdentity::default();

        Self {
            feed_url: get_env_var(FEED_URL_VAR),
            port: get_env_var_parsed("PORT", DEFAULT_PORT),
            feed_ttl_seconds: get_env_var_parsed("FEED_TTL_SECONDS", DEFAULT_FEED_TTL_SECONDS),
            feed_timeout: Duration::from_secs(get_env_var_parsed(
                "FEED_TIMEOUT_SECONDS",
                FEED_REQUEST_TIMEOUT.as_secs(),
            )),
            og_timeout: Duration::from_secs(get_env_var_parsed(
                "OG_TIMEOUT_SECONDS",
                OG_REQUEST_TIMEOUT.as_secs(),
            )),
            og_concurrency: get_env_var_parsed("OG_CONCURRENCY", OG_CONCURRENCY).max(1),
            user_agent: get_env_var_or("HTTP_USER_AGENT", DEFAULT_USER_AGENT),
            site: SiteIdentity {
                title: get_env_var_or("SITE_TITLE", &site_defaults.title),
                link: get_env_var_or("SITE_URL", &site_defaults.link),
                description: get_env_var_or("SITE_DESCRIPTION", &site_defaults.description),
                author_name: get_env_var_or("SITE_AUTHOR_NAME", &site_defaults.author_name),
                author_email: get_env_var_or("SITE_AUTHOR_EMAIL", &site_defaults.author_email),
                language: get_env_var_or("SITE_LANGUAGE", &site_defaults.language),
            },
        }
    }

    /// The configured feed URL, required by every command that fetches.
    pub fn require_feed_url(&self) -> Result<&str> {
        self.feed_url
            .as_deref()
            .ok_or_else(|| anyhow!("{} environment variable is required", FEED_URL_VAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_var_parsed() {
        env::set_var("READING_FEED_TEST_NUMBER", "42");
        env::set_var("READING_FEED_TEST_BAD_NUMBER", "forty-two");
        env::set_var("READING_FEED_TEST_BLANK", "   ");

        assert_eq!(get_env_var_parsed("READING_FEED_TEST_NUMBER", 1u16), 42);
        assert_eq!(get_env_var_parsed("READING_FEED_TEST_BAD_NUMBER", 7u16), 7);
        assert_eq!(get_env_var("READING_FEED_TEST_BLANK"), None);
        assert_eq!(get_env_var_or("READING_FEED_TEST_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn test_require_feed_url() {
        let mut settings = Settings::from_env();
        settings.feed_url = None;
        assert!(settings.require_feed_url().is_err());

        settings.feed_url = Some("https://feeds.example/liked.json".into());
        assert_eq!(
            settings.require_feed_url().unwrap(),
            "https://feeds.example/liked.json"
        );
    }
}
