//! Environment-driven configuration
//!
//! Values come from the process environment, usually populated from a `.env`
//! file by `dotenvy` before [`Config::from_env`] is called.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

/// Default completion model
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
/// Default persona storage directory
pub const DEFAULT_PROFILES_DIR: &str = "profiles";
/// Default socket path for the persona service
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/persona-service.sock";
/// Default env_logger filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the completion service. Only the builder and the service need it.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub profiles_dir: PathBuf,
    pub socket_path: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            profiles_dir: get("PROFILES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILES_DIR)),
            socket_path: get("PERSONA_SOCKET")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH)),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set (add it to the environment or .env)"))
    }

    /// Export the API key where the openai crate looks for it.
    ///
    /// The crate reads credentials from env vars, not from our config, so both
    /// OPENAI_API_KEY and OPENAI_KEY are set for compatibility.
    pub fn export_openai_credentials(&self) -> Result<()> {
        let key = self.api_key()?;
        env::set_var("OPENAI_API_KEY", key);
        env::set_var("OPENAI_KEY", key);
        Ok(())
    }

    /// Initialise env_logger with this config's level as the default filter.
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&self.log_level))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.profiles_dir, PathBuf::from("profiles"));
        assert_eq!(config.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
        assert_eq!(config.log_level, "info");
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("PROFILES_DIR", "/var/lib/personas"),
            ("PERSONA_SOCKET", "/run/persona.sock"),
            ("LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.api_key().unwrap(), "sk-test");
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.profiles_dir, PathBuf::from("/var/lib/personas"));
        assert_eq!(config.socket_path, PathBuf::from("/run/persona.sock"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_MODEL", "  "), ("OPENAI_API_KEY", "")]));
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert!(config.openai_api_key.is_none());
    }
}
