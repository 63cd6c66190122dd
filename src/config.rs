// src/config.rs
//
// Runtime settings: config/app.yaml, then LISTINGS_* environment overrides.

use crate::domain::cleaning::PublishDefaults;
use crate::errors::ServerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub wizard: WizardConfig,
    pub site: SiteConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub max_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub schema_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "listings.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
        }
    }
}

/// Completions used when a listing is published with gaps.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub default_city: String,
    pub fallback_title: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        let defaults = PublishDefaults::default();
        Self {
            default_city: defaults.default_city,
            fallback_title: defaults.fallback_title,
        }
    }
}

impl WizardConfig {
    pub fn publish_defaults(&self) -> PublishDefaults {
        PublishDefaults {
            default_city: self.default_city.clone(),
            fallback_title: self.fallback_title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub footer_links: Vec<FooterLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "List Your Property".to_string(),
            footer_links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_cookie: String,
    /// When set, startup makes sure this owner exists and logs a session token for it.
    pub dev_owner_email: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: "session".to_string(),
            dev_owner_email: None,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the YAML file named by `LISTINGS_CONFIG` (or the default
    /// path), then applies `LISTINGS_ADDR` / `LISTINGS_DB_PATH`.
    pub fn load() -> Result<Self, ServerError> {
        dotenvy::dotenv().ok();

        let path = std::env::var("LISTINGS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// A missing file yields the built-in defaults; a malformed one is an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("read {} failed: {e}", path.display())))?;
        Self::from_yaml(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = set("LISTINGS_ADDR") {
            self.server.addr = addr;
        }
        if let Some(path) = set("LISTINGS_DB_PATH") {
            self.database.path = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_the_rest() {
        let config = AppConfig::from_yaml(
            r#"
wizard:
  default_city: Hyderabad
site:
  footer_links:
    - { label: "Privacy", href: "/privacy" }
"#,
        )
        .unwrap();

        assert_eq!(config.wizard.default_city, "Hyderabad");
        assert_eq!(config.wizard.fallback_title, "Property Listing");
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.site.footer_links[0].href, "/privacy");
        assert_eq!(config.auth.session_cookie, "session");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("server: [not, a, map]").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = AppConfig::from_file("does/not/exist.yaml").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "LISTINGS_ADDR" => Some("0.0.0.0:8080".to_string()),
            "LISTINGS_DB_PATH" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.database.path, "listings.sqlite3");
    }

    #[test]
    fn shipped_config_parses() {
        let config = AppConfig::from_file(DEFAULT_CONFIG_PATH).unwrap();
        assert!(!config.site.footer_links.is_empty());
        assert_eq!(config.wizard.publish_defaults().default_city, "Bangalore");
    }
}
