//! Client configuration.

use std::env;

use crate::error::{ApiError, Result};

pub const PRODUCTION_BASE_URL: &str = "https://api.invisiblecollector.com";

pub const API_TOKEN_ENV: &str = "IC_API_TOKEN";
pub const BASE_URL_ENV: &str = "IC_BASE_URL";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: String,
}

impl ClientConfig {
    pub fn new(api_token: impl Into<String>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    pub fn production(api_token: impl Into<String>) -> Self {
        Self::new(api_token, PRODUCTION_BASE_URL)
    }

    /// Read `IC_API_TOKEN` (required) and `IC_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let token = env::var(API_TOKEN_ENV)
            .map_err(|_| ApiError::Config(format!("{API_TOKEN_ENV} is not set")))?;
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| PRODUCTION_BASE_URL.to_string());
        Ok(Self::new(token, &base_url))
    }
}

// The token never appears in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("t", "http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn production_url_by_default() {
        assert_eq!(ClientConfig::production("t").base_url, PRODUCTION_BASE_URL);
    }

    // Only test in the crate that touches these variables.
    #[test]
    fn from_env_requires_token_and_reads_base_url() {
        env::remove_var(API_TOKEN_ENV);
        env::remove_var(BASE_URL_ENV);
        assert!(matches!(ClientConfig::from_env(), Err(ApiError::Config(_))));

        env::set_var(API_TOKEN_ENV, "env-token");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.api_token, "env-token");

        env::set_var(BASE_URL_ENV, "http://localhost:3000/");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");

        env::remove_var(API_TOKEN_ENV);
        env::remove_var(BASE_URL_ENV);
    }

    #[test]
    fn debug_hides_token() {
        let rendered = format!("{:?}", ClientConfig::new("secret-token", "http://x"));
        assert!(!rendered.contains("secret-token"));
    }
}
