//! Scriptable in-process transport for unit tests.

use std::cell::{Cell, RefCell};

use crate::transport::{RawOutcome, Transport, TransportCall};

/// Owned copy of a `TransportCall` as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub validate_tls: bool,
    pub method: String,
    pub url: String,
    pub headers: Vec<String>,
    pub body: String,
    pub ca_certs_path: String,
    pub cert_path: String,
    pub key_path: String,
}

pub(crate) struct FakeTransport {
    pub outcome: RawOutcome,
    pub init_code: i32,
    pub calls: RefCell<Vec<RecordedCall>>,
    pub inits: Cell<u32>,
    pub cleanups: Cell<u32>,
}

impl FakeTransport {
    pub fn returning(outcome: RawOutcome) -> Self {
        Self {
            outcome,
            init_code: 0,
            calls: RefCell::new(Vec::new()),
            inits: Cell::new(0),
            cleanups: Cell::new(0),
        }
    }

    pub fn ok(status_code: u16, raw_headers: &str, body: &str) -> Self {
        Self::returning(RawOutcome {
            status_code,
            raw_headers: Some(raw_headers.to_string()),
            body: body.to_string(),
            error_code: 0,
        })
    }

    pub fn failing(error_code: i32) -> Self {
        Self::returning(RawOutcome {
            error_code,
            ..RawOutcome::default()
        })
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls.borrow().last().cloned().expect("no transport call recorded")
    }
}

impl Transport for FakeTransport {
    fn execute(&self, call: &TransportCall<'_>) -> RawOutcome {
        self.calls.borrow_mut().push(RecordedCall {
            validate_tls: call.validate_tls,
            method: call.method.to_string(),
            url: call.url.to_string(),
            headers: call.headers.to_vec(),
            body: call.body.to_string(),
            ca_certs_path: call.ca_certs_path.to_string(),
            cert_path: call.cert_path.to_string(),
            key_path: call.key_path.to_string(),
        });
        self.outcome.clone()
    }

    fn error_message(&self, code: i32) -> String {
        format!("fake transport failure #{code}")
    }

    fn global_init(&self) -> i32 {
        self.inits.set(self.inits.get() + 1);
        self.init_code
    }

    fn global_cleanup(&self) {
        self.cleanups.set(self.cleanups.get() + 1);
    }
}
