//! Adapts a C transport vtable to the core `Transport` trait.
//!
//! Every string handed to C is owned by a [`CallScope`] that lives exactly as
//! long as one `execute` callback. Dropping the scope frees all of them, on
//! the success path and on every early return alike.
//!
//! Non-zero codes belong to the transport: this adapter never reports codes
//! of its own, and every code is described by the transport's
//! `error_message` callback.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use facade_core::{RawOutcome, Transport, TransportCall, NO_RESPONSE_CODE};
use tracing::warn;

use crate::types::{c_string, opt_string, FfiRawOutcome, FfiTransport, FfiTransportCall};

/// C strings backing one `FfiTransportCall`.
struct CallScope {
    method: CString,
    url: CString,
    // Owns the strings `header_ptrs` points into.
    #[allow(dead_code)]
    headers: Vec<CString>,
    header_ptrs: Vec<*const c_char>,
    body: CString,
    ca_certs_path: CString,
    cert_path: CString,
    key_path: CString,
}

impl CallScope {
    fn new(call: &TransportCall<'_>) -> Self {
        let headers: Vec<CString> = call.headers.iter().map(|line| c_string(line)).collect();
        let header_ptrs = headers.iter().map(|h| h.as_ptr()).collect();
        Self {
            method: c_string(call.method),
            url: c_string(call.url),
            headers,
            header_ptrs,
            body: c_string(call.body),
            ca_certs_path: c_string(call.ca_certs_path),
            cert_path: c_string(call.cert_path),
            key_path: c_string(call.key_path),
        }
    }

    /// Borrowing view for C. Valid while `self` is alive.
    fn as_ffi(&self, validate_tls: bool) -> FfiTransportCall {
        FfiTransportCall {
            validate_tls,
            method: self.method.as_ptr(),
            url: self.url.as_ptr(),
            headers: if self.header_ptrs.is_empty() {
                std::ptr::null()
            } else {
                self.header_ptrs.as_ptr()
            },
            headers_len: self.header_ptrs.len() as u32,
            body: self.body.as_ptr(),
            ca_certs_path: self.ca_certs_path.as_ptr(),
            cert_path: self.cert_path.as_ptr(),
            key_path: self.key_path.as_ptr(),
        }
    }
}

/// Borrowed C transport usable wherever the core expects a `Transport`.
///
/// `hf_exchange` rejects a table without `execute` before building one.
pub(crate) struct CTransport<'a> {
    raw: &'a FfiTransport,
}

impl<'a> CTransport<'a> {
    pub(crate) fn new(raw: &'a FfiTransport) -> Self {
        Self { raw }
    }
}

impl Transport for CTransport<'_> {
    fn execute(&self, call: &TransportCall<'_>) -> RawOutcome {
        let Some(execute) = self.raw.execute else {
            return RawOutcome {
                error_code: NO_RESPONSE_CODE,
                ..RawOutcome::default()
            };
        };

        let scope = CallScope::new(call);
        let ffi_call = scope.as_ffi(call.validate_tls);
        let mut out = FfiRawOutcome::empty();

        execute(self.raw.ctx, &ffi_call, &mut out);

        let outcome = RawOutcome {
            status_code: out.status_code,
            raw_headers: unsafe { opt_string(out.raw_headers) },
            body: unsafe { opt_string(out.body) }.unwrap_or_default(),
            error_code: out.error_code,
        };
        if let Some(release) = self.raw.release_outcome {
            release(self.raw.ctx, &mut out);
        }
        outcome
    }

    fn error_message(&self, code: i32) -> String {
        let ptr = match self.raw.error_message {
            Some(message) => message(self.raw.ctx, code),
            None => std::ptr::null(),
        };
        if ptr.is_null() {
            warn!(code, "transport gave no description for error code");
            format!("transport error {code}")
        } else {
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        }
    }

    fn global_init(&self) -> i32 {
        self.raw.global_init.map_or(0, |init| init(self.raw.ctx))
    }

    fn global_cleanup(&self) {
        if let Some(cleanup) = self.raw.global_cleanup {
            cleanup(self.raw.ctx);
        }
    }
}
