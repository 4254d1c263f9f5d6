//! The boundary to whatever performs the network I/O.
//!
//! # Design
//! The core never opens a socket. An exchange is reduced to a single
//! synchronous [`Transport::execute`] call with string arguments, and the
//! transport reports back a [`RawOutcome`] carrying a numeric error code.
//! Implementations range from a libcurl binding behind the C ABI to an
//! in-process fake in tests.
//!
//! Empty strings stand in for absent certificate and key paths, matching the
//! convention of C transports.

/// Arguments for one transport call. Borrowed from the request and settings
/// for the duration of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportCall<'a> {
    pub validate_tls: bool,
    pub method: &'a str,
    pub url: &'a str,
    /// `Name: Value` lines in request insertion order.
    pub headers: &'a [String],
    pub body: &'a str,
    pub ca_certs_path: &'a str,
    pub cert_path: &'a str,
    pub key_path: &'a str,
}

/// What the transport hands back. `error_code == 0` means the remaining
/// fields describe a received response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutcome {
    pub status_code: u16,
    pub raw_headers: Option<String>,
    pub body: String,
    pub error_code: i32,
}

/// A synchronous network capability.
///
/// `global_init` and `global_cleanup` manage process-wide transport state and
/// are not thread-safe; see [`crate::lifecycle`]. Whether `execute` may be
/// called concurrently is up to the implementation.
pub trait Transport {
    fn execute(&self, call: &TransportCall<'_>) -> RawOutcome;

    /// Human-readable description for a non-zero error code.
    fn error_message(&self, code: i32) -> String;

    /// Returns 0 on success.
    fn global_init(&self) -> i32;

    fn global_cleanup(&self);
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, call: &TransportCall<'_>) -> RawOutcome {
        (**self).execute(call)
    }

    fn error_message(&self, code: i32) -> String {
        (**self).error_message(code)
    }

    fn global_init(&self) -> i32 {
        (**self).global_init()
    }

    fn global_cleanup(&self) {
        (**self).global_cleanup()
    }
}
