//! # Runtime Configuration Module
//!
//! Explicit configuration for a [`Router`](crate::router::Router). Every router
//! owns its own [`RouterConfig`], so several routers with different defaults
//! can live in one process and be tested in isolation.
//!
//! ## Sources
//!
//! - [`RouterConfig::default()`] - built-in defaults
//! - [`RouterConfig::from_env()`] - environment variables, falling back to defaults
//! - [`RouterConfig::from_yaml_file()`] - a YAML document; missing keys fall back to defaults
//!
//! ## Environment Variables
//!
//! | Variable                    | Field                | Default            |
//! |-----------------------------|----------------------|--------------------|
//! | `MANGO_DEFAULT_MEDIA_TYPE`  | `default_media_type` | `application/json` |
//! | `MANGO_REQUEST_ID_HEADER`   | `request_id_header`  | `x-request-id`     |
//! | `MANGO_ECHO_REQUEST_ID`     | `echo_request_id`    | `true`             |
//! | `MANGO_CATCH_PANICS`        | `catch_panics`       | `true`             |
//!
//! ## Example
//!
//! ```yaml
//! default_media_type: application/yaml
//! echo_request_id: false
//! ```

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::encoding::DEFAULT_MEDIA_TYPE;

/// Header carrying the correlation id unless configured otherwise.
pub const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Media type substituted for `*/*` during negotiation
    pub default_media_type: String,
    /// Request header consulted for an upstream request id
    pub request_id_header: String,
    /// Copy the request id onto every response under `request_id_header`
    pub echo_request_id: bool,
    /// Convert panics in hooks and handlers into 500 responses
    pub catch_panics: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_media_type: DEFAULT_MEDIA_TYPE.to_string(),
            request_id_header: DEFAULT_REQUEST_ID_HEADER.to_string(),
            echo_request_id: true,
            catch_panics: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default value.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_media_type: env::var("MANGO_DEFAULT_MEDIA_TYPE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_media_type),
            request_id_header: env::var("MANGO_REQUEST_ID_HEADER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.request_id_header),
            echo_request_id: env::var("MANGO_ECHO_REQUEST_ID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.echo_request_id),
            catch_panics: env::var("MANGO_CATCH_PANICS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.catch_panics),
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML for
    /// this structure.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse router config {}", path.display()))
    }

    /// Parse configuration from YAML text. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for this structure.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).context("Invalid router config YAML")?;
        Ok(config)
    }
}
