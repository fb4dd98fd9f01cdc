//! # Server Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     ROSE_SURFACE=browser                                                │
//! │     ROSE_DB_PATH=/var/lib/rose/rose.db                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     --config <path>, or                                                 │
//! │     ~/.config/rose-pos/rose.toml (Linux)                                │
//! │     ~/Library/Application Support/co.rose.pos/rose.toml (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//! surface = "mobile"          # mobile | browser
//!
//! [database]
//! path = "/var/lib/rose/rose.db"
//!
//! [store]
//! name = "ROSE"
//! utc_offset_minutes = -300   # Bogotá
//!
//! [catalog]
//! page_size = 10
//!
//! [checkout]
//! eligibility = { rule = "product_flag" }
//! excluded_toppings = ["helado"]
//! offer_exclusions = [{ product = "Malteadas", topping = "Helado" }]
//!
//! [auth]
//! jwt_secret = "change-me"
//! token_lifetime_secs = 43200
//!
//! [share]
//! base_url = "https://wa.me/"
//! ```

use chrono::FixedOffset;
use rose_core::checkout::DiscountPolicy;
use rose_core::share::WHATSAPP_BASE_URL;
use rose_core::surface::{Capabilities, Surface};
use rose_core::ITEMS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Development signing secret. Replaced via `[auth] jwt_secret` or
/// `ROSE_JWT_SECRET` outside development.
const DEV_JWT_SECRET: &str = "rose-pos-dev-secret-change-in-production";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Which client this instance serves.
    #[serde(default)]
    pub surface: Surface,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            surface: Surface::default(),
        }
    }
}

impl HttpSettings {
    /// `bind_addr:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Offset of the shop's wall clock from UTC, in minutes.
    /// Decides where "today" starts and ends.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_store_name() -> String {
    "ROSE".to_string()
}

fn default_utc_offset() -> i32 {
    -5 * 60
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    ITEMS_PER_PAGE
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime. Default: 12 hours (one shift).
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: i64,
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_token_lifetime() -> i64 {
    12 * 3600
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            jwt_secret: default_jwt_secret(),
            token_lifetime_secs: default_token_lifetime(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSettings {
    #[serde(default = "default_share_base_url")]
    pub base_url: String,
}

fn default_share_base_url() -> String {
    WHATSAPP_BASE_URL.to_string()
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            base_url: default_share_base_url(),
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub checkout: DiscountPolicy,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub share: ShareSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (rose.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        if config.auth.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the development JWT secret; set ROSE_JWT_SECRET in production");
        }

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.page_size == 0 {
            return Err(ConfigError::InvalidValue("catalog.page_size".into()));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue("auth.jwt_secret".into()));
        }
        if self.auth.token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("auth.token_lifetime_secs".into()));
        }
        if self.store_offset().is_none() {
            return Err(ConfigError::InvalidValue("store.utc_offset_minutes".into()));
        }
        if !self.share.base_url.starts_with("https://") && !self.share.base_url.starts_with("http://") {
            return Err(ConfigError::InvalidValue("share.base_url".into()));
        }
        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(surface) = std::env::var("ROSE_SURFACE") {
            match surface.parse() {
                Ok(parsed) => {
                    debug!(surface = %surface, "Overriding surface from environment");
                    self.server.surface = parsed;
                }
                Err(_) => warn!(surface = %surface, "Unknown surface in environment"),
            }
        }

        if let Ok(addr) = std::env::var("ROSE_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("ROSE_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            }
        }

        if let Ok(path) = std::env::var("ROSE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(offset) = std::env::var("ROSE_UTC_OFFSET_MINUTES") {
            if let Ok(minutes) = offset.parse::<i32>() {
                self.store.utc_offset_minutes = minutes;
            }
        }

        if let Ok(secret) = std::env::var("ROSE_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "rose", "pos").map(|dirs| dirs.config_dir().join("rose.toml"))
    }

    /// Configured database file, or `rose.db` in the platform data dir.
    pub fn database_path(&self) -> PathBuf {
        self.database.path.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("co", "rose", "pos")
                .map(|dirs| dirs.data_dir().join("rose.db"))
                .unwrap_or_else(|| PathBuf::from("rose.db"))
        })
    }

    /// The shop's UTC offset, if the configured minutes are in range.
    pub fn store_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.store.utc_offset_minutes.checked_mul(60)?)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_surface(self.server.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rose_core::checkout::DiscountEligibility;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.surface, Surface::Mobile);
        assert_eq!(config.catalog.page_size, 10);
        assert_eq!(config.share.base_url, "https://wa.me/");
        assert_eq!(
            config.store_offset(),
            FixedOffset::west_opt(5 * 3600)
        );
    }

    #[test]
    fn test_toml_sections() {
        let toml_str = r#"
            [server]
            port = 9090
            surface = "browser"

            [store]
            utc_offset_minutes = 60

            [checkout]
            eligibility = { rule = "name_contains", pattern = "fresas" }
        "#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert!(config.capabilities().admin);
        assert_eq!(
            config.checkout.eligibility,
            DiscountEligibility::NameContains {
                pattern: "fresas".to_string()
            }
        );
        // unspecified checkout keys keep the shop defaults
        assert_eq!(config.checkout.excluded_toppings, vec!["helado"]);
        assert_eq!(config.store_offset(), FixedOffset::east_opt(3600));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.catalog.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.store.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.share.base_url = "wa.me".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    }
}
