//! Exchange orchestration.
//!
//! # Design
//! An exchange is one blocking transport call bracketed by pure steps:
//! resolve the effective TLS flag, flatten headers into wire lines, call the
//! transport, then either decode the header block into a [`Response`] or map
//! the error code onto a [`Failure`]. No state survives the call, so a
//! `Client` can be shared freely as long as its transport allows it.

use tracing::{debug, warn};

use crate::error::{Failure, NO_RESPONSE_CODE};
use crate::headers::parse_headers;
use crate::http::{Request, Response};
use crate::settings::Settings;
use crate::transport::{Transport, TransportCall};

/// Run one exchange through `transport`.
///
/// A `Response` is returned only when the transport reports error code 0;
/// every other code becomes a `Failure`.
pub fn exchange<T: Transport + ?Sized>(
    transport: &T,
    request: &Request,
    settings: &Settings,
) -> Result<Response, Failure> {
    perform(transport, request, settings, &[])
}

// `visited_urls` is reserved for redirect tracking and is not consulted yet.
fn perform<T: Transport + ?Sized>(
    transport: &T,
    request: &Request,
    settings: &Settings,
    _visited_urls: &[String],
) -> Result<Response, Failure> {
    let validate_tls = settings.effective_tls_validation(request);
    let header_lines = request.headers.to_lines();
    let call = TransportCall {
        validate_tls,
        method: request.method.as_str(),
        url: &request.url,
        headers: &header_lines,
        body: request.body.as_deref().unwrap_or(""),
        ca_certs_path: settings.tls_ca_certs_path.as_deref().unwrap_or(""),
        cert_path: settings.tls_cert_path.as_deref().unwrap_or(""),
        key_path: settings.tls_key_path.as_deref().unwrap_or(""),
    };

    debug!(method = call.method, url = call.url, validate_tls, "dispatching exchange");
    let outcome = transport.execute(&call);

    match outcome.error_code {
        0 => {
            let headers = parse_headers(outcome.raw_headers.as_deref());
            debug!(status = outcome.status_code, headers = headers.len(), "exchange completed");
            Ok(Response {
                status: outcome.status_code,
                headers,
                body: outcome.body,
            })
        }
        NO_RESPONSE_CODE => {
            warn!(url = %request.url, "no response received");
            Err(Failure::NoResponse {
                url: request.url.clone(),
            })
        }
        code => {
            let message = transport.error_message(code);
            warn!(code, %message, url = %request.url, "transport error");
            Err(Failure::Transport { code, message })
        }
    }
}

/// A transport paired with the settings applied to every exchange.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    settings: Settings,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, settings: Settings) -> Self {
        Self { transport, settings }
    }

    pub fn with_defaults(transport: T) -> Self {
        Self::new(transport, Settings::default())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn exchange(&self, request: &Request) -> Result<Response, Failure> {
        exchange(&self.transport, request, &self.settings)
    }
}
