//! Synchronous HTTP client facade over a pluggable transport.
//!
//! # Overview
//! The caller describes a [`Request`]; [`exchange`] hands it to a
//! [`Transport`] as one blocking call and turns the raw outcome into either
//! a [`Response`] with decoded headers or a typed [`Failure`]. The transport
//! does all network I/O, which keeps this crate deterministic and testable
//! with an in-process fake.
//!
//! # Design
//! - Header blocks are decoded by [`parse_headers`], which never fails;
//!   anomalies go to `tracing`.
//! - [`Settings`] is immutable and shared; a request may override the TLS
//!   validation flag per call.
//! - Process-wide transport setup lives in [`lifecycle`] and is the owning
//!   process's responsibility.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod client;
pub mod error;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod settings;
pub mod transport;

#[cfg(test)]
mod fake;

pub use client::{exchange, Client};
pub use error::{Failure, SettingsError, INIT_FAILURE_CODE, NO_RESPONSE_CODE};
pub use headers::parse_headers;
pub use http::{Headers, HttpMethod, Request, Response};
pub use lifecycle::{global_cleanup, global_init, GlobalGuard};
pub use settings::Settings;
pub use transport::{RawOutcome, Transport, TransportCall};
