//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*const c_char` instead of `String`, raw pointers plus lengths instead of
//! `Vec`, and enums with explicit discriminants. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.
//!
//! Input types (`FfiRequest`, `FfiSettings`, `FfiTransport`) are owned by the
//! C caller and only read. Output types (`FfiExchangeResult`,
//! `FfiHeaderList`) are allocated here and released by the matching
//! `hf_free_*` function.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use facade_core::{Failure, Headers, Request, Response, Settings};

// ---------------------------------------------------------------------------
// Transport vtable (caller-provided)
// ---------------------------------------------------------------------------

/// Arguments for one transport call. Every pointer is valid only for the
/// duration of the `execute` callback; empty strings mean "not supplied".
#[repr(C)]
pub struct FfiTransportCall {
    pub validate_tls: bool,
    pub method: *const c_char,
    pub url: *const c_char,
    /// Array of `Name: Value` lines.
    pub headers: *const *const c_char,
    pub headers_len: u32,
    pub body: *const c_char,
    pub ca_certs_path: *const c_char,
    pub cert_path: *const c_char,
    pub key_path: *const c_char,
}

/// Filled in by the transport's `execute` callback. Starts zeroed.
///
/// `raw_headers` may stay null. The strings remain owned by the transport;
/// they are copied before `release_outcome` is invoked.
#[repr(C)]
pub struct FfiRawOutcome {
    pub status_code: u16,
    pub raw_headers: *const c_char,
    pub body: *const c_char,
    pub error_code: i32,
}

impl FfiRawOutcome {
    pub(crate) fn empty() -> Self {
        Self {
            status_code: 0,
            raw_headers: std::ptr::null(),
            body: std::ptr::null(),
            error_code: 0,
        }
    }
}

pub type ExecuteFn = extern "C" fn(ctx: *mut c_void, call: *const FfiTransportCall, out: *mut FfiRawOutcome);
pub type ErrorMessageFn = extern "C" fn(ctx: *mut c_void, code: i32) -> *const c_char;
pub type ReleaseOutcomeFn = extern "C" fn(ctx: *mut c_void, out: *mut FfiRawOutcome);
pub type GlobalInitFn = extern "C" fn(ctx: *mut c_void) -> i32;
pub type GlobalCleanupFn = extern "C" fn(ctx: *mut c_void);

/// A transport implemented in C, e.g. a thin libcurl shim.
///
/// `ctx` is passed back unchanged to every callback. `execute` is required
/// for exchanges; the other callbacks may be null.
#[repr(C)]
pub struct FfiTransport {
    pub ctx: *mut c_void,
    pub execute: Option<ExecuteFn>,
    pub error_message: Option<ErrorMessageFn>,
    pub release_outcome: Option<ReleaseOutcomeFn>,
    pub global_init: Option<GlobalInitFn>,
    pub global_cleanup: Option<GlobalCleanupFn>,
}

// ---------------------------------------------------------------------------
// Request input (caller-provided)
// ---------------------------------------------------------------------------

/// A request header supplied by the C caller. Read, never freed.
#[repr(C)]
pub struct FfiRequestHeader {
    pub name: *const c_char,
    pub value: *const c_char,
}

/// An outbound request described as C data.
///
/// `body` may be null (no body). `tls_validation` is tri-state:
/// -1 = use settings, 0 = disable, 1 = enable.
#[repr(C)]
pub struct FfiRequest {
    pub method: *const c_char,
    pub url: *const c_char,
    pub headers: *const FfiRequestHeader,
    pub headers_len: u32,
    pub body: *const c_char,
    pub tls_validation: i32,
}

/// Exchange settings. Null paths mean "use transport defaults".
#[repr(C)]
pub struct FfiSettings {
    pub tls_validation_enabled: bool,
    pub tls_ca_certs_path: *const c_char,
    pub tls_cert_path: *const c_char,
    pub tls_key_path: *const c_char,
}

/// Copy a nullable C string into an owned `String`.
pub(crate) unsafe fn opt_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

/// Build a C string, dropping interior NULs.
///
/// Every string that reaches this crate either came from C or was derived
/// from C input, so the filter only matters for core values built in Rust.
pub(crate) fn c_string(s: &str) -> CString {
    let bytes: Vec<u8> = s.bytes().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default()
}

/// Allocate a C string for the caller. Interior NULs are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    c_string(&s).into_raw()
}

impl FfiRequest {
    /// Copy into a core `Request`. `method` and `url` must be non-null.
    pub(crate) unsafe fn to_core(&self) -> Request {
        let method = unsafe { opt_string(self.method) }.unwrap_or_default();
        let url = unsafe { opt_string(self.url) }.unwrap_or_default();
        let mut request = Request::new(method.as_str(), url);

        if !self.headers.is_null() {
            let headers = unsafe { std::slice::from_raw_parts(self.headers, self.headers_len as usize) };
            for header in headers {
                if let Some(name) = unsafe { opt_string(header.name) } {
                    let value = unsafe { opt_string(header.value) }.unwrap_or_default();
                    request.headers.insert(name, value);
                }
            }
        }

        request.body = unsafe { opt_string(self.body) };
        request.tls_validation = match self.tls_validation {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        };
        request
    }
}

impl FfiSettings {
    pub(crate) unsafe fn to_core(&self) -> Settings {
        Settings {
            tls_validation_enabled: self.tls_validation_enabled,
            tls_ca_certs_path: unsafe { opt_string(self.tls_ca_certs_path) },
            tls_cert_path: unsafe { opt_string(self.tls_cert_path) },
            tls_key_path: unsafe { opt_string(self.tls_key_path) },
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Category of an `FfiExchangeResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResultKind {
    Ok = 0,
    NoResponse = 1,
    Transport = 2,
    Init = 3,
    NullArg = 4,
    Panic = 5,
}

/// A decoded header allocated by this library for the C caller.
#[repr(C)]
pub struct FfiHeader {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// Decoded headers handed to C.
#[repr(C)]
pub struct FfiHeaderList {
    pub items: *mut FfiHeader,
    pub len: u32,
}

impl FfiHeaderList {
    pub(crate) fn from_core(headers: Headers) -> *mut Self {
        let (items, len) = headers_into_raw(headers);
        Box::into_raw(Box::new(FfiHeaderList { items, len }))
    }
}

fn headers_into_raw(headers: Headers) -> (*mut FfiHeader, u32) {
    if headers.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let items: Box<[FfiHeader]> = headers
        .into_iter()
        .map(|(name, value)| FfiHeader {
            name: into_c_string(name),
            value: into_c_string(value),
        })
        .collect();
    let len = items.len() as u32;
    (Box::into_raw(items) as *mut FfiHeader, len)
}

/// Release headers produced by `headers_into_raw`.
pub(crate) unsafe fn free_headers(items: *mut FfiHeader, len: u32) {
    if items.is_null() || len == 0 {
        return;
    }
    let items = unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(items, len as usize)) };
    for header in items.iter() {
        if !header.name.is_null() {
            drop(unsafe { CString::from_raw(header.name) });
        }
        if !header.value.is_null() {
            drop(unsafe { CString::from_raw(header.value) });
        }
    }
}

/// Result envelope for `hf_exchange`.
///
/// On success `kind` is `Ok`, `error_code` is 0, `error_message` is null and
/// `status`, `headers`, `body` describe the response. On failure `kind`
/// names the category, `error_code` carries the numeric code and
/// `error_message` a human-readable C string (for `Transport`, exactly what
/// the transport's `error_message` callback returned); the response fields
/// are zero/null.
#[repr(C)]
pub struct FfiExchangeResult {
    pub kind: FfiResultKind,
    pub error_code: i32,
    pub error_message: *mut c_char,
    pub status: u16,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiExchangeResult {
    fn failure(kind: FfiResultKind, error_code: i32, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiExchangeResult {
            kind,
            error_code,
            error_message: into_c_string(msg),
            status: 0,
            headers: std::ptr::null_mut(),
            headers_len: 0,
            body: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok(response: Response) -> *mut Self {
        let (headers, headers_len) = headers_into_raw(response.headers);
        Box::into_raw(Box::new(FfiExchangeResult {
            kind: FfiResultKind::Ok,
            error_code: 0,
            error_message: std::ptr::null_mut(),
            status: response.status,
            headers,
            headers_len,
            body: into_c_string(response.body),
        }))
    }

    pub(crate) fn from_failure(failure: Failure) -> *mut Self {
        let code = failure.code();
        match failure {
            Failure::NoResponse { .. } => Self::failure(FfiResultKind::NoResponse, code, failure.to_string()),
            // The transport's own description, unchanged.
            Failure::Transport { message, .. } => Self::failure(FfiResultKind::Transport, code, message),
            Failure::Init => Self::failure(FfiResultKind::Init, code, failure.to_string()),
        }
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiResultKind::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiResultKind::Panic, 0, msg.to_string())
    }
}
