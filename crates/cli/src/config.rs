//! Runtime configuration: `vportal.toml` plus environment overrides.
//!
//! The config file carries addresses and the designated admin email; service
//! keys only ever come from the environment so they stay out of version
//! control.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use portal::Email;
use serde::Deserialize;

/// Environment variable holding the document database service key.
pub const DOCSTORE_KEY_VAR: &str = "VPORTAL_DOCSTORE_KEY";
/// Environment variable holding the identity service key.
pub const IDENTITY_KEY_VAR: &str = "VPORTAL_IDENTITY_KEY";

/// One hosted service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
}

/// The full runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds, e.g. `"0.0.0.0:8080"`.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Email promoted to admin on bootstrap, when configured.
    #[serde(default)]
    pub admin_email: Option<String>,
    /// Hosted document database endpoint. Absent in memory mode.
    #[serde(default)]
    pub docstore: Option<ServiceConfig>,
    /// Hosted identity service endpoint. Absent in memory mode.
    #[serde(default)]
    pub identity: Option<ServiceConfig>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            admin_email: None,
            docstore: None,
            identity: None,
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not
    /// exist, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        } else {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Config::default()
        };

        if let Ok(addr) = env::var("VPORTAL_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(email) = env::var("VPORTAL_ADMIN_EMAIL") {
            config.admin_email = Some(email);
        }
        Ok(config)
    }

    /// The parsed admin email, rejecting an empty value rather than silently
    /// disabling bootstrap.
    pub fn admin_email(&self) -> Result<Option<Email>> {
        match &self.admin_email {
            None => Ok(None),
            Some(raw) => match Email::new(raw.clone()) {
                Some(email) => Ok(Some(email)),
                None => bail!("admin_email is set but empty"),
            },
        }
    }
}

/// Reads a service key from the environment.
pub fn service_key(var: &str) -> Result<String> {
    let key = env::var(var).with_context(|| format!("{var} must be set"))?;
    if key.trim().is_empty() {
        bail!("{var} is set but empty");
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file_parses() {
        let config: Config = toml::from_str(
            r#"
            listen_addr = "127.0.0.1:9090"
            admin_email = "admin@example.com"

            [docstore]
            base_url = "https://docs.internal.example.com"

            [identity]
            base_url = "https://id.internal.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9090");
        assert_eq!(config.admin_email.as_deref(), Some("admin@example.com"));
        assert_eq!(
            config.docstore.unwrap().base_url,
            "https://docs.internal.example.com"
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert!(config.admin_email.is_none());
        assert!(config.docstore.is_none());
    }

    #[test]
    fn empty_admin_email_is_rejected() {
        let config = Config {
            admin_email: Some(String::new()),
            ..Config::default()
        };
        assert!(config.admin_email().is_err());
    }
}
