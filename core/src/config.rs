//! Per-request transport configuration.
//!
//! Only the redirect policy is configurable. Keys are addressed by name so
//! hosts can forward settings from their own configuration files; an unknown
//! key is an error rather than being ignored.

use serde::{Deserialize, Serialize};

use crate::error::HttpError;

/// Redirect policy handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            follow_redirects: false,
            max_redirects: 10,
        }
    }
}

impl RequestConfig {
    /// Set one key. Recognized keys: `follow_redirects` (bool) and
    /// `max_redirects` (unsigned integer).
    pub fn set(&mut self, name: &str, value: &serde_json::Value) -> Result<(), HttpError> {
        match name {
            "follow_redirects" => {
                self.follow_redirects = value.as_bool().ok_or_else(|| invalid(name, value))?;
            }
            "max_redirects" => {
                self.max_redirects = value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid(name, value))?;
            }
            other => {
                return Err(HttpError::Configuration(format!("unknown parameter: {other}")));
            }
        }
        Ok(())
    }

    /// Set every key of a JSON object, stopping at the first error.
    pub fn set_all(&mut self, values: &serde_json::Value) -> Result<(), HttpError> {
        let map = values.as_object().ok_or_else(|| {
            HttpError::Configuration(format!("expected an object of parameters, got {values}"))
        })?;
        for (name, value) in map {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Build a complete configuration from JSON. Missing keys take defaults.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, HttpError> {
        Self::deserialize(value).map_err(|e| HttpError::Configuration(e.to_string()))
    }
}

fn invalid(name: &str, value: &serde_json::Value) -> HttpError {
    HttpError::Configuration(format!("invalid value for {name}: {value}"))
}
