//! Service endpoints and timeout, loaded from the environment.

use std::env;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::client::DEFAULT_TIMEOUT;

/// Base URLs of the auxiliary services and the shared per-call timeout.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// SENTIMENT_SERVICE_URL
    pub sentiment_url: String,
    /// CONTACTS_SERVICE_URL
    pub contacts_url: String,
    /// STYLE_SERVICE_URL
    pub style_url: String,
    /// SERVICE_TIMEOUT_MS
    pub timeout: Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            sentiment_url: "http://localhost:3001".to_string(),
            contacts_url: "http://localhost:3002".to_string(),
            style_url: "http://localhost:3003".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServicesConfig {
    /// Load from environment variables; unset values fall back to [`Default`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let timeout = match env::var("SERVICE_TIMEOUT_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => bail!("SERVICE_TIMEOUT_MS must be greater than zero"),
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => bail!("SERVICE_TIMEOUT_MS is not a number: {}", raw),
            },
            Err(_) => defaults.timeout,
        };
        let config = Self {
            sentiment_url: env::var("SENTIMENT_SERVICE_URL").unwrap_or(defaults.sentiment_url),
            contacts_url: env::var("CONTACTS_SERVICE_URL").unwrap_or(defaults.contacts_url),
            style_url: env::var("STYLE_SERVICE_URL").unwrap_or(defaults.style_url),
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Every service URL must parse.
    pub fn validate(&self) -> Result<()> {
        for (var, url) in [
            ("SENTIMENT_SERVICE_URL", &self.sentiment_url),
            ("CONTACTS_SERVICE_URL", &self.contacts_url),
            ("STYLE_SERVICE_URL", &self.style_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                bail!("{} is not a valid URL: {}", var, url);
            }
        }
        Ok(())
    }
}
