//! End-to-end exchanges against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the facade through a
//! small ureq-backed `Transport`. The transport rebuilds a raw header block
//! from ureq's parsed response so the header decoder runs on real server
//! output.

use std::net::SocketAddr;

use facade_core::{
    exchange, Client, Failure, GlobalGuard, HttpMethod, RawOutcome, Request, Settings, Transport,
    TransportCall,
};
use mock_server::Echo;

struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, lines: &[String]) -> ureq::RequestBuilder<B> {
    for line in lines {
        if let Some((name, value)) = line.split_once(": ") {
            builder = builder.header(name, value);
        }
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, call: &TransportCall<'_>) -> RawOutcome {
        let url = call.url;
        let result = match HttpMethod::from(call.method) {
            HttpMethod::Get => with_headers(self.agent.get(url), call.headers).call(),
            HttpMethod::Head => with_headers(self.agent.head(url), call.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), call.headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), call.headers).send(call.body.as_bytes()),
            HttpMethod::Put => with_headers(self.agent.put(url), call.headers).send(call.body.as_bytes()),
            HttpMethod::Patch => with_headers(self.agent.patch(url), call.headers).send(call.body.as_bytes()),
            _ => {
                return RawOutcome {
                    error_code: 1,
                    ..RawOutcome::default()
                }
            }
        };

        let mut response = match result {
            Ok(response) => response,
            Err(_) => {
                return RawOutcome {
                    error_code: -1,
                    ..RawOutcome::default()
                }
            }
        };

        let status = response.status();
        let mut raw = format!(
            "{:?} {} {}\r\n",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        for (name, value) in response.headers() {
            raw.push_str(&format!("{}: {}\r\n", name, value.to_str().unwrap_or("")));
        }
        let body = response.body_mut().read_to_string().unwrap_or_default();

        RawOutcome {
            status_code: status.as_u16(),
            raw_headers: Some(raw),
            body,
            error_code: 0,
        }
    }

    fn error_message(&self, code: i32) -> String {
        match code {
            1 => "unsupported protocol".to_string(),
            _ => format!("ureq error {code}"),
        }
    }

    fn global_init(&self) -> i32 {
        0
    }

    fn global_cleanup(&self) {}
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn exchange_lifecycle() {
    let addr = start_server();
    let transport = UreqTransport::new();
    let _guard = GlobalGuard::acquire(&transport).unwrap();
    let client = Client::new(&transport, Settings::default());

    // Request headers and body reach the server.
    let request = Request::post(format!("http://{addr}/echo"))
        .header("X-Trace", "abc")
        .bearer_auth("s3cret")
        .body("hello");
    let response = client.exchange(&request).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.headers.get("x-trace").map(String::as_str), Some("abc"));
    assert_eq!(
        echo.headers.get("authorization").map(String::as_str),
        Some("Bearer s3cret")
    );
    assert_eq!(echo.body, "hello");

    // Server-set headers are decoded from the raw block.
    let response = client.exchange(&Request::get(format!("http://{addr}/headers"))).unwrap();
    assert_eq!(response.header("X-Mock"), Some("yes"));
    assert_eq!(response.header("x-request-id"), Some("42"));
    assert_eq!(response.body, "headers");

    // Error statuses are responses, not failures.
    let response = client.exchange(&Request::get(format!("http://{addr}/status/404"))).unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.body, "status 404");

    // JSON bodies round-trip through the echo route.
    let request = Request::put(format!("http://{addr}/echo"))
        .json(&serde_json::json!({"title": "Buy milk"}))
        .unwrap();
    let echo: Echo = client.exchange(&request).unwrap().json().unwrap();
    assert_eq!(echo.method, "PUT");
    let sent: serde_json::Value = serde_json::from_str(&echo.body).unwrap();
    assert_eq!(sent["title"], "Buy milk");
}

#[test]
fn unreachable_host_is_no_response() {
    // Grab a free port, then release it so nothing is listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let url = format!("http://{addr}/echo");

    let err = exchange(&UreqTransport::new(), &Request::get(url.clone()), &Settings::default())
        .unwrap_err();
    assert_eq!(err, Failure::NoResponse { url });
    assert_eq!(err.code(), -1);
}

#[test]
fn unsupported_method_is_transport_error() {
    let err = exchange(
        &UreqTransport::new(),
        &Request::new("PROPFIND", "http://127.0.0.1:1/"),
        &Settings::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Failure::Transport {
            code: 1,
            message: "unsupported protocol".to_string()
        }
    );
}
