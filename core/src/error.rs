//! Error types for the exchange layer.
//!
//! # Design
//! `Failure` is what a caller sees when an exchange or the transport's global
//! setup does not succeed. Every variant maps to a numeric code through
//! [`Failure::code`] so C callers and logs can tell the cases apart.
//! Header decoding anomalies are not represented here; they are logged and
//! absorbed by the decoder.

use thiserror::Error;

/// Code reported by a transport when no response was received at all.
pub const NO_RESPONSE_CODE: i32 = -1;

/// Fixed code for a failed global transport initialization.
pub const INIT_FAILURE_CODE: i32 = 2;

/// A failed exchange or lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The transport received nothing back, e.g. the connection failed or
    /// timed out.
    #[error("no response received from {url}")]
    NoResponse { url: String },

    /// The transport reported an error of its own.
    #[error("transport error {code}: {message}")]
    Transport { code: i32, message: String },

    /// Global transport initialization failed.
    #[error("transport global initialization failed")]
    Init,
}

impl Failure {
    pub fn code(&self) -> i32 {
        match self {
            Failure::NoResponse { .. } => NO_RESPONSE_CODE,
            Failure::Transport { code, .. } => *code,
            Failure::Init => INIT_FAILURE_CODE,
        }
    }
}

/// Errors raised while loading [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings document: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}
