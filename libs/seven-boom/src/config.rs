//! Loading the argument list from YAML and the environment.
//!
//! Layers, later ones win:
//! 1. YAML file (optional)
//! 2. `SEVEN_BOOM_*` environment variables, nested keys split on `__`
//!
//! ```yaml
//! arguments:
//!   - { name: timeThrown, order: 1, default: null }
//!   - { name: guid, order: 2 }
//!   - { name: errorCode, order: 3, default: E_UNKNOWN }
//! ```
//!
//! Computed defaults cannot be written in configuration; only constants and
//! the built-in providers for `timeThrown` and `guid` are available.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

use crate::spec::{ArgumentSpec, ArgumentSpecification, SpecError, canonicalize};

/// Prefix of the environment variables read by [`SevenBoomConfig::load`].
pub const ENV_PREFIX: &str = "SEVEN_BOOM_";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file '{}' does not exist", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid argument specification: {0}")]
    Spec(#[from] SpecError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Configuration of the error factory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SevenBoomConfig {
    /// Extra arguments, in any order.
    pub arguments: Vec<ArgumentSpec>,
}

impl SevenBoomConfig {
    /// Read the YAML file at `path`, if given, then apply environment overrides.
    ///
    /// # Errors
    /// - [`ConfigError::MissingFile`] when `path` does not exist
    /// - [`ConfigError::Load`] when a layer cannot be parsed into the config
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            tracing::debug!(path = %path.display(), "loading error factory config");
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Extract from an already assembled figment.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] when the figment does not fit the config.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// Canonical specification of the configured arguments.
    ///
    /// # Errors
    /// Returns [`ConfigError::Spec`] for an empty, reserved or duplicated name.
    pub fn specification(&self) -> Result<ArgumentSpecification, ConfigError> {
        Ok(canonicalize(self.arguments.iter().cloned())?)
    }
}
