//! Configuration for processes that verify edtoken bearer tokens.
//!
//! The public key is resolved once at start-up: defaults, then an optional
//! TOML file, then environment overrides. Binaries decide where the file
//! path comes from.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use edtoken_auth::{AuthError, Jwk, PublicKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base64Url key material replacing `key.x`.
pub const KEY_X_ENV: &str = "EDTOKEN_KEY_X";
/// Path of a JWK JSON file replacing the inline key.
pub const KEY_PATH_ENV: &str = "EDTOKEN_KEY_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Inline key descriptor.
    pub key: Jwk,
    /// JWK file that takes precedence over `key` when set.
    pub key_path: Option<PathBuf>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            key: Jwk::center(),
            key_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to import public key: {0}")]
    Key(#[from] AuthError),
}

impl VerifierConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `EDTOKEN_KEY_X` and `EDTOKEN_KEY_PATH` from the process
    /// environment.
    pub fn apply_environment_overrides(&mut self) {
        self.apply_overrides_with(|var| env::var(var).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(x) = value_of(KEY_X_ENV) {
            tracing::debug!(var = KEY_X_ENV, "overriding inline key material");
            self.key.x = x;
            self.key_path = None;
        }
        if let Some(path) = value_of(KEY_PATH_ENV) {
            tracing::debug!(var = KEY_PATH_ENV, %path, "overriding key file");
            self.key_path = Some(PathBuf::from(path));
        }
    }

    /// Import the configured key.
    pub fn public_key(&self) -> Result<PublicKey, ConfigError> {
        let key = match &self.key_path {
            Some(path) => PublicKey::from_jwk_json(&read(path)?)?,
            None => PublicKey::from_jwk(&self.key)?,
        };
        tracing::info!(kid = key.kid(), "loaded verification key");
        Ok(key)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
