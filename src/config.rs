//! Global configuration parsing and validation.
//!
//! Every field carries a default, so an empty TOML document yields the
//! production defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

/// Deep-link routing settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LinkConfig {
    /// Store key holding the single deferred thread id.
    #[serde(default = "default_pending_link_key")]
    pub pending_link_key: String,
    /// Router target prefix; the thread id is appended to it.
    #[serde(default = "default_thread_route_prefix")]
    pub thread_route_prefix: String,
    /// Router target for the authentication entry point.
    #[serde(default = "default_auth_route")]
    pub auth_route: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            pending_link_key: default_pending_link_key(),
            thread_route_prefix: default_thread_route_prefix(),
            auth_route: default_auth_route(),
        }
    }
}

fn default_pending_link_key() -> String {
    "pendingDeepLink".into()
}

fn default_thread_route_prefix() -> String {
    "/thread/".into()
}

fn default_auth_route() -> String {
    "/(auth)/sign-in".into()
}

/// Focus-mode prompt cadence tuning.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CadenceConfig {
    /// Store key holding the JSON preferences record.
    #[serde(default = "default_preferences_key")]
    pub preferences_key: String,
    /// Minimum hours between two prompts.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
    /// Modulo threshold while `times_prompted < early_prompt_limit`.
    #[serde(default = "default_early_threshold")]
    pub early_threshold: u32,
    /// Modulo threshold once `times_prompted >= early_prompt_limit`.
    #[serde(default = "default_late_threshold")]
    pub late_threshold: u32,
    /// Number of prompts counted as "early".
    #[serde(default = "default_early_prompt_limit")]
    pub early_prompt_limit: u32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            preferences_key: default_preferences_key(),
            cooldown_hours: default_cooldown_hours(),
            early_threshold: default_early_threshold(),
            late_threshold: default_late_threshold(),
            early_prompt_limit: default_early_prompt_limit(),
        }
    }
}

fn default_preferences_key() -> String {
    "focusModePreferences".into()
}

fn default_cooldown_hours() -> u32 {
    24
}

fn default_early_threshold() -> u32 {
    5
}

fn default_late_threshold() -> u32 {
    10
}

fn default_early_prompt_limit() -> u32 {
    3
}

fn default_db_path() -> PathBuf {
    PathBuf::from("godeeper.db")
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// `SQLite` file backing the key-value store.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Deep-link routing settings.
    #[serde(default)]
    pub links: LinkConfig,
    /// Prompt cadence tuning.
    #[serde(default)]
    pub cadence: CadenceConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            links: LinkConfig::default(),
            cadence: CadenceConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let cadence = &self.cadence;
        if cadence.cooldown_hours == 0 {
            return Err(AppError::Config(
                "cadence.cooldown_hours must be greater than zero".into(),
            ));
        }
        if cadence.early_threshold == 0 || cadence.late_threshold == 0 {
            return Err(AppError::Config(
                "cadence thresholds must be greater than zero".into(),
            ));
        }

        if self.links.pending_link_key.is_empty() || cadence.preferences_key.is_empty() {
            return Err(AppError::Config("store keys must not be empty".into()));
        }
        if self.links.pending_link_key == cadence.preferences_key {
            return Err(AppError::Config(
                "links.pending_link_key and cadence.preferences_key must differ".into(),
            ));
        }

        Ok(())
    }
}
