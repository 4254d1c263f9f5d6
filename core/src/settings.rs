//! Shared, read-only exchange configuration.
//!
//! # Design
//! A `Settings` value is built once (from defaults, a JSON document, or the
//! environment) and then shared by reference across any number of
//! exchanges. The `with_*` methods return modified copies rather than
//! mutating in place.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::http::Request;

pub const ENV_TLS_VALIDATION: &str = "FACADE_TLS_VALIDATION";
pub const ENV_TLS_CA_CERTS: &str = "FACADE_TLS_CA_CERTS";
pub const ENV_TLS_CERT: &str = "FACADE_TLS_CERT";
pub const ENV_TLS_KEY: &str = "FACADE_TLS_KEY";

/// TLS configuration applied to every exchange unless a request overrides it.
///
/// Absent paths mean "use the transport's defaults".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tls_validation_enabled: bool,
    pub tls_ca_certs_path: Option<String>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tls_validation_enabled: true,
            tls_ca_certs_path: None,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Settings {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(doc: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Read settings from `FACADE_TLS_*` environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let tls_validation_enabled = match lookup(ENV_TLS_VALIDATION) {
            None => true,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(SettingsError::InvalidEnv {
                        var: ENV_TLS_VALIDATION,
                        value,
                    })
                }
            },
        };
        let path = |var: &str| lookup(var).filter(|p| !p.is_empty());
        Ok(Self {
            tls_validation_enabled,
            tls_ca_certs_path: path(ENV_TLS_CA_CERTS),
            tls_cert_path: path(ENV_TLS_CERT),
            tls_key_path: path(ENV_TLS_KEY),
        })
    }

    pub fn with_tls_validation(mut self, enabled: bool) -> Self {
        self.tls_validation_enabled = enabled;
        self
    }

    pub fn with_ca_certs(mut self, path: impl Into<String>) -> Self {
        self.tls_ca_certs_path = Some(path.into());
        self
    }

    pub fn with_client_cert(mut self, cert_path: impl Into<String>, key_path: impl Into<String>) -> Self {
        self.tls_cert_path = Some(cert_path.into());
        self.tls_key_path = Some(key_path.into());
        self
    }

    /// The TLS validation flag in effect for `request`.
    pub fn effective_tls_validation(&self, request: &Request) -> bool {
        request.tls_validation.unwrap_or(self.tls_validation_enabled)
    }
}
