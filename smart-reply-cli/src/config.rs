//! Application config assembled from the environment.

use std::env;

use anyhow::{Context, Result};
use llm_client::EnvLlmConfig;
use service_client::ServicesConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/smart-reply.log";
pub const DEFAULT_STYLE_SAMPLES_FILE: &str = "data/style-samples.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    /// `None` when OPENAI_API_KEY is unset.
    pub llm: Option<EnvLlmConfig>,
    /// RELAY_URL; when set, generation goes through the HTTP relay.
    pub relay_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// CONTACTS_FILE, JSON array of contacts for local matching.
    pub contacts_file: Option<String>,
    /// STYLE_SAMPLES_FILE, where `--local` style samples are kept between runs.
    pub style_samples_file: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let services = ServicesConfig::from_env().context("Invalid service configuration")?;
        Ok(Self {
            services,
            llm: EnvLlmConfig::try_from_env(),
            relay_url: non_empty_var("RELAY_URL"),
            log_file: non_empty_var("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            contacts_file: non_empty_var("CONTACTS_FILE"),
            style_samples_file: non_empty_var("STYLE_SAMPLES_FILE")
                .unwrap_or_else(|| DEFAULT_STYLE_SAMPLES_FILE.to_string()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "RELAY_URL",
        "LOG_FILE",
        "CONTACTS_FILE",
        "STYLE_SAMPLES_FILE",
        "OPENAI_API_KEY",
        "SERVICE_TIMEOUT_MS",
        "SENTIMENT_SERVICE_URL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert!(config.relay_url.is_none());
        assert!(config.llm.is_none());
        assert!(config.contacts_file.is_none());
        assert_eq!(config.style_samples_file, DEFAULT_STYLE_SAMPLES_FILE);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("RELAY_URL", "http://relay:8080");
        env::set_var("LOG_FILE", "/tmp/sr.log");
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("STYLE_SAMPLES_FILE", "/tmp/samples.json");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.style_samples_file, "/tmp/samples.json");
        assert_eq!(config.relay_url.as_deref(), Some("http://relay:8080"));
        assert_eq!(config.log_file, "/tmp/sr.log");
        assert!(config.llm.is_some());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_relay_url_is_unset() {
        clear_env();
        env::set_var("RELAY_URL", "  ");
        assert!(AppConfig::from_env().unwrap().relay_url.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_service_config_fails() {
        clear_env();
        env::set_var("SERVICE_TIMEOUT_MS", "soon");
        assert!(AppConfig::from_env().is_err());
        clear_env();
    }
}
