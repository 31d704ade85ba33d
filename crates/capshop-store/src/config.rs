//! # Session Simulator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAPSHOP_SESSION_LIFETIME_SECS=3600                                 │
//! │     CAPSHOP_LATENCY_MS=800                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/session.toml (Linux)                          │
//! │     ~/Library/Application Support/com.capshop.storefront/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # session.toml
//! session_lifetime_secs = 3600
//! latency_ms = 800
//! sign_out_latency_ms = 300
//! min_password_length = 6
//! case_insensitive_emails = false
//! storage_key = "mockAuthSession"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Storage key the remembered session token lives under.
pub const DEFAULT_STORAGE_KEY: &str = "mockAuthSession";

/// Longest session lifetime `validate` accepts (one year).
pub const MAX_SESSION_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Session simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long a session stays valid after sign-in (default: 1 hour).
    pub session_lifetime_secs: i64,

    /// Simulated round-trip for sign-up, sign-in, reset and update.
    pub latency_ms: u64,

    /// Simulated round-trip for sign-out.
    pub sign_out_latency_ms: u64,

    /// Minimum password length accepted by sign-up and password update.
    pub min_password_length: usize,

    /// Treat `Fan@Example.com` and `fan@example.com` as the same account.
    pub case_insensitive_emails: bool,

    /// Key for the remembered token in client storage.
    pub storage_key: String,

    /// Optional secret prepended to passwords before hashing.
    pub pepper: Option<String>,

    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: u32,

    /// Argon2 iteration count.
    pub hash_iterations: u32,

    /// Argon2 lanes.
    pub hash_parallelism: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            session_lifetime_secs: 3600,
            latency_ms: 800,
            sign_out_latency_ms: 300,
            min_password_length: 6,
            case_insensitive_emails: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            pepper: None,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            hash_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl SessionConfig {
    /// Cheapest Argon2 profile, for tests and demos only.
    pub fn fast_hashing(mut self) -> Self {
        self.hash_memory_kib = argon2::Params::MIN_M_COST.max(8 * self.hash_parallelism);
        self.hash_iterations = argon2::Params::MIN_T_COST;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn sign_out_latency(&self) -> Duration {
        Duration::from_millis(self.sign_out_latency_ms)
    }

    /// Session lifetime, kept within `1..=MAX_SESSION_LIFETIME_SECS`.
    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(
            self.session_lifetime_secs
                .clamp(1, MAX_SESSION_LIFETIME_SECS),
        )
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (session.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Session config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_LIFETIME_SECS).contains(&self.session_lifetime_secs) {
            return Err(ConfigError::InvalidValue(format!(
                "session_lifetime_secs must be between 1 and {}",
                MAX_SESSION_LIFETIME_SECS
            )));
        }

        if self.min_password_length == 0 {
            return Err(ConfigError::InvalidValue(
                "min_password_length must be greater than 0".into(),
            ));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue("storage_key must not be empty".into()));
        }

        argon2::Params::new(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
            None,
        )
        .map_err(|e| ConfigError::InvalidValue(format!("argon2 parameters: {}", e)))?;

        Ok(())
    }

    /// Applies `CAPSHOP_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<i64>("CAPSHOP_SESSION_LIFETIME_SECS")? {
            debug!(secs = v, "Overriding session lifetime from environment");
            self.session_lifetime_secs = v;
        }

        if let Some(v) = env_parse::<u64>("CAPSHOP_LATENCY_MS")? {
            debug!(ms = v, "Overriding latency from environment");
            self.latency_ms = v;
        }

        if let Some(v) = env_parse("CAPSHOP_SIGN_OUT_LATENCY_MS")? {
            self.sign_out_latency_ms = v;
        }

        if let Some(v) = env_parse("CAPSHOP_MIN_PASSWORD_LENGTH")? {
            self.min_password_length = v;
        }

        if let Ok(v) = std::env::var("CAPSHOP_CASE_INSENSITIVE_EMAILS") {
            self.case_insensitive_emails = v == "1" || v.eq_ignore_ascii_case("true");
        }

        if let Ok(key) = std::env::var("CAPSHOP_STORAGE_KEY") {
            self.storage_key = key;
        }

        if let Ok(pepper) = std::env::var("CAPSHOP_PASSWORD_PEPPER") {
            self.pepper = Some(pepper);
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "capshop", "storefront")
            .map(|dirs| dirs.config_dir().join("session.toml"))
    }
}

/// Reads and parses an environment variable, `None` when unset.
fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::PoisonError;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.session_lifetime_secs, 3600);
        assert_eq!(config.latency(), Duration::from_millis(800));
        assert_eq!(config.sign_out_latency(), Duration::from_millis(300));
        assert_eq!(config.storage_key, "mockAuthSession");
        assert!(!config.case_insensitive_emails);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml_str(
            r#"
            latency_ms = 50
            case_insensitive_emails = true
            "#,
        )
        .unwrap();

        assert_eq!(config.latency_ms, 50);
        assert!(config.case_insensitive_emails);
        assert_eq!(config.session_lifetime_secs, 3600);
        assert_eq!(config.min_password_length, 6);
    }

    #[test]
    fn test_validation() {
        let mut config = SessionConfig::default();
        config.session_lifetime_secs = 0;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.storage_key = "  ".into();
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.hash_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fast_hashing_is_valid() {
        let config = SessionConfig::default().fast_hashing();
        assert!(config.validate().is_ok());
        assert!(config.hash_memory_kib < SessionConfig::default().hash_memory_kib);
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = std::env::temp_dir().join(format!("capshop-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("session.toml");

        let mut config = SessionConfig::default();
        config.latency_ms = 10;
        config.save(Some(path.clone())).unwrap();

        let loaded = SessionConfig::from_toml_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(dir).ok();
    }

    /// Serializes tests that touch process environment variables.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const ENV_VARS: [&str; 7] = [
        "CAPSHOP_SESSION_LIFETIME_SECS",
        "CAPSHOP_LATENCY_MS",
        "CAPSHOP_SIGN_OUT_LATENCY_MS",
        "CAPSHOP_MIN_PASSWORD_LENGTH",
        "CAPSHOP_CASE_INSENSITIVE_EMAILS",
        "CAPSHOP_STORAGE_KEY",
        "CAPSHOP_PASSWORD_PEPPER",
    ];

    fn clear_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    fn write_toml(contents: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("capshop-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_reads_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();
        let (dir, path) = write_toml("latency_ms = 25\nstorage_key = \"fromFile\"\n");

        let config = SessionConfig::load(Some(path)).unwrap();
        assert_eq!(config.latency_ms, 25);
        assert_eq!(config.storage_key, "fromFile");
        assert_eq!(config.sign_out_latency_ms, 300);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_env_overrides_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();
        let (dir, path) = write_toml("latency_ms = 25\ncase_insensitive_emails = false\n");

        std::env::set_var("CAPSHOP_LATENCY_MS", " 40 ");
        std::env::set_var("CAPSHOP_CASE_INSENSITIVE_EMAILS", "TRUE");
        std::env::set_var("CAPSHOP_STORAGE_KEY", "fromEnv");
        let config = SessionConfig::load(Some(path.clone()));

        std::env::set_var("CAPSHOP_CASE_INSENSITIVE_EMAILS", "yes");
        let not_true = SessionConfig::load(Some(path.clone()));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.latency_ms, 40);
        assert!(config.case_insensitive_emails);
        assert_eq!(config.storage_key, "fromEnv");
        assert!(!not_true.unwrap().case_insensitive_emails);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let _env = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        clear_env();
        let (dir, path) = write_toml("");

        std::env::set_var("CAPSHOP_LATENCY_MS", "fast");
        let unparsable = SessionConfig::load(Some(path.clone()));
        clear_env();

        std::env::set_var("CAPSHOP_SESSION_LIFETIME_SECS", "10000000000000");
        let too_long = SessionConfig::load(Some(path.clone()));
        clear_env();

        assert!(
            matches!(unparsable, Err(ConfigError::InvalidValue(ref name)) if name == "CAPSHOP_LATENCY_MS")
        );
        assert!(matches!(too_long, Err(ConfigError::InvalidValue(_))));
        assert_eq!(
            SessionConfig::load_or_default(Some(path)),
            SessionConfig::default()
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_lifetime_upper_bound() {
        let mut config = SessionConfig::default();
        config.session_lifetime_secs = MAX_SESSION_LIFETIME_SECS;
        assert!(config.validate().is_ok());

        config.session_lifetime_secs = MAX_SESSION_LIFETIME_SECS + 1;
        assert!(config.validate().is_err());
        assert_eq!(
            config.session_lifetime(),
            chrono::Duration::seconds(MAX_SESSION_LIFETIME_SECS)
        );
    }
}
