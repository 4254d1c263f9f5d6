//! Header block decoding.
//!
//! Turns the raw status-line-plus-headers text a transport hands back into a
//! [`Headers`] map. Decoding never fails: anomalies are reported through
//! `tracing` and the offending line is dropped.
//!
//! # Rules
//!
//! - Lines are separated by CRLF; empty lines are ignored wherever they occur.
//! - The first line is the status line. A protocol token other than
//!   `HTTP/1.1` or `HTTP/2` is logged and otherwise ignored.
//! - A line starting with a space or tab folds onto the value of the most
//!   recently decoded header, joined by a single space.
//! - Other lines must look like `Name:Value` where the name consists of ASCII
//!   letters, `-` and `_`. The value is trimmed.
//! - A repeated name overwrites the earlier value.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::http::Headers;

static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z_-]+):(.*)$").unwrap()
});

const KNOWN_PROTOCOLS: [&str; 2] = ["HTTP/1.1", "HTTP/2"];

/// Decode a raw header block. `None` yields an empty map.
pub fn parse_headers(raw: Option<&str>) -> Headers {
    let mut headers = Headers::new();
    let Some(raw) = raw else {
        return headers;
    };

    let mut lines = raw.split("\r\n").filter(|line| !line.is_empty());

    if let Some(status_line) = lines.next() {
        if !KNOWN_PROTOCOLS.iter().any(|p| status_line.starts_with(p)) {
            warn!(line = status_line, "unrecognized protocol in status line");
        }
    }

    let mut current: Option<String> = None;

    for line in lines {
        if line.starts_with(' ') || line.starts_with('\t') {
            let folded = current.as_deref().and_then(|name| headers.get_mut(name));
            match folded {
                Some(value) => {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                None => warn!(line, "continuation line without a preceding header"),
            }
            continue;
        }

        match HEADER_LINE.captures(line) {
            Some(caps) => {
                let name = &caps[1];
                let value = caps.get(2).map_or("", |m| m.as_str().trim());
                headers.insert(name, value);
                current = Some(name.to_string());
            }
            None => warn!(line, "discarding malformed header line"),
        }
    }

    headers
}
