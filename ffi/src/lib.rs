//! C-ABI wrapper around `facade-core`.
//!
//! # Overview
//! Lets a C program drive the facade with its own transport: the caller
//! supplies an `FfiTransport` table of callbacks (typically wrapping
//! libcurl), and this library handles request marshaling, header decoding
//! and failure classification.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `hf_exchange` returns a single `FfiExchangeResult` envelope for both
//!   responses and failures.
//! - The C caller owns all returned pointers and must call the matching
//!   `hf_free_*` function to release them.
//! - `hf_global_init` / `hf_global_cleanup` carry the same single-threaded
//!   contract as their core counterparts.

pub mod transport;
pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use facade_core::INIT_FAILURE_CODE;

use transport::CTransport;
use types::*;

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Initialize the transport's process-wide state.
///
/// Returns 0 on success and `INIT_FAILURE_CODE` otherwise, including when
/// `transport` is null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_global_init(transport: *const FfiTransport) -> i32 {
    catch_unwind(AssertUnwindSafe(|| {
        if transport.is_null() {
            return INIT_FAILURE_CODE;
        }
        let transport = CTransport::new(unsafe { &*transport });
        match facade_core::global_init(&transport) {
            Ok(()) => 0,
            Err(failure) => failure.code(),
        }
    }))
    .unwrap_or(INIT_FAILURE_CODE)
}

/// Tear down the transport's process-wide state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_global_cleanup(transport: *const FfiTransport) {
    if transport.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let transport = CTransport::new(unsafe { &*transport });
        facade_core::global_cleanup(&transport);
    }));
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Run one exchange through `transport`.
///
/// `settings` may be null, in which case defaults apply. The caller must free
/// the returned result with `hf_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn hf_exchange(
    transport: *const FfiTransport,
    request: *const FfiRequest,
    settings: *const FfiSettings,
) -> *mut FfiExchangeResult {
    catch_unwind(AssertUnwindSafe(|| {
        if transport.is_null() {
            return FfiExchangeResult::null_arg("transport");
        }
        if request.is_null() {
            return FfiExchangeResult::null_arg("request");
        }
        let raw_transport = unsafe { &*transport };
        if raw_transport.execute.is_none() {
            return FfiExchangeResult::null_arg("transport.execute");
        }
        let request = unsafe { &*request };
        if request.method.is_null() {
            return FfiExchangeResult::null_arg("request.method");
        }
        if request.url.is_null() {
            return FfiExchangeResult::null_arg("request.url");
        }

        let request = unsafe { request.to_core() };
        let settings = if settings.is_null() {
            facade_core::Settings::default()
        } else {
            unsafe { (*settings).to_core() }
        };

        let transport = CTransport::new(raw_transport);
        match facade_core::exchange(&transport, &request, &settings) {
            Ok(response) => FfiExchangeResult::ok(response),
            Err(failure) => FfiExchangeResult::from_failure(failure),
        }
    }))
    .unwrap_or_else(|_| FfiExchangeResult::panic("panic in hf_exchange"))
}

// ---------------------------------------------------------------------------
// Header decoding
// ---------------------------------------------------------------------------

/// Decode a raw CRLF-delimited header block. Null input yields an empty list.
///
/// Returns null only if an internal panic occurs. The caller must free the
/// returned list with `hf_free_header_list`.
#[unsafe(no_mangle)]
pub extern "C" fn hf_parse_headers(raw: *const c_char) -> *mut FfiHeaderList {
    catch_unwind(|| {
        let raw = unsafe { opt_string(raw) };
        FfiHeaderList::from_core(facade_core::parse_headers(raw.as_deref()))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiExchangeResult` returned by `hf_exchange`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_free_result(result: *mut FfiExchangeResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
        unsafe { free_headers(result.headers, result.headers_len) };
    });
}

/// Free an `FfiHeaderList` returned by `hf_parse_headers`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hf_free_header_list(list: *mut FfiHeaderList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let list = unsafe { Box::from_raw(list) };
        unsafe { free_headers(list.items, list.len) };
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
