//! # proctor-config
//!
//! Layered configuration loading for Proctor using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PROCTOR_*` prefix, `__` as separator)
//! 2. Project-level `.proctor/config.toml`
//! 3. User-level `~/.config/proctor/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PROCTOR_ORACLE__PYTHON_PATH` -> `oracle.python_path`,
//! `PROCTOR_SIGNING__SECRET` -> `signing.secret`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use proctor_config::ProctorConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = ProctorConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = ProctorConfig::load().expect("config");
//!
//! if config.signing.is_configured() {
//!     println!("scan window: {} min", config.general.scan_window_minutes);
//! }
//! ```

mod error;
mod general;
mod oracle;
mod signing;
mod storage;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use oracle::OracleConfig;
pub use signing::SigningConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProctorConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ProctorConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` — use [`ProctorConfig::load_with_dotenv`] if you
    /// need `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`PROCTOR_*` prefix)
    /// 2. `.proctor/config.toml` (project-local)
    /// 3. `~/.config/proctor/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction from the merged sources fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction from the merged sources fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".proctor/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("PROCTOR_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("proctor").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
