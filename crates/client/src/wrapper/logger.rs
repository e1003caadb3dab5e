//! Request/response logging (`CF_TRACE`).
//!
//! Responsibilities:
//! - Describe each outgoing request and the matching response to a
//!   `RequestLoggerOutput`.
//! - Hide credentials: `Authorization` values and sensitive form fields.
//!
//! Does NOT handle:
//! - Formatting or persisting the log lines (see `request_log`).
//!
//! Invariants:
//! - The request, the response and the error are passed through untouched.
//! - Output failures never fail the call; they go to `handle_internal_error`.
//! - Headers are emitted in lexicographic order.

use chrono::{DateTime, Local};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use std::io;
use std::sync::{Arc, Mutex};
use url::Position;

use super::Wrapper;
use crate::connection::{BoxFuture, Connection, FORM_CONTENT_TYPE, Request, Response};
use crate::error::Result;

pub use cf_config::constants::REDACTED_VALUE as REDACTED;

/// Form fields and JSON keys containing one of these are never logged verbatim.
const SENSITIVE_KEY_FRAGMENTS: &[&str] = &["token", "password", "secret"];

/// Sink for request log sections.
///
/// Each request produces one `start`/`stop` pair for the request and, when the
/// server answered, a second pair for the response.
pub trait RequestLoggerOutput: Send + Sync {
    fn start(&self) -> io::Result<()>;
    fn stop(&self) -> io::Result<()>;
    fn display_type(&self, name: &str, time: DateTime<Local>) -> io::Result<()>;
    fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()>;
    fn display_host(&self, host: &str) -> io::Result<()>;
    fn display_header(&self, name: &str, value: &str) -> io::Result<()>;
    fn display_json_body(&self, body: &[u8]) -> io::Result<()>;
    fn display_message(&self, message: &str) -> io::Result<()>;
    fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()>;
    fn handle_internal_error(&self, err: &io::Error);

    /// Lock held from `start` through `stop` by every logger writing to this
    /// output. Outputs that keep per-section state must return one.
    fn section_lock(&self) -> Option<&Mutex<()>> {
        None
    }
}

/// Logs every request and response passing through it.
pub struct RequestLogger {
    output: Arc<dyn RequestLoggerOutput>,
    // Used when the output has no section lock of its own.
    section: Mutex<()>,
}

impl RequestLogger {
    pub fn new(output: Arc<dyn RequestLoggerOutput>) -> Self {
        Self {
            output,
            section: Mutex::new(()),
        }
    }

    async fn run(&self, inner: &dyn Connection, request: &mut Request) -> Result<Response> {
        let body = match request.peek_body() {
            Ok(body) => body,
            Err(err) => {
                self.output.handle_internal_error(&err);
                None
            }
        };
        self.write_section(|output| display_request(output, request, body.as_deref()));

        let result = inner.make(request).await;

        match &result {
            Ok(response) => self.write_section(|output| {
                display_response(
                    output,
                    &response.protocol,
                    response.status,
                    &response.headers,
                    &response.raw_body,
                )
            }),
            Err(err) => {
                if let Some(raw) = err.raw_http() {
                    self.write_section(|output| {
                        display_response(
                            output,
                            &raw.protocol,
                            raw.status,
                            &raw.headers,
                            &raw.raw_response,
                        )
                    });
                }
            }
        }
        result
    }

    fn write_section<F>(&self, body: F)
    where
        F: FnOnce(&dyn RequestLoggerOutput) -> io::Result<()>,
    {
        let output = self.output.as_ref();
        let _guard = output
            .section_lock()
            .unwrap_or(&self.section)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(err) = output.start() {
            output.handle_internal_error(&err);
            return;
        }
        let written = body(output);
        let stopped = output.stop();
        if let Err(err) = written.and(stopped) {
            output.handle_internal_error(&err);
        }
    }
}

impl Wrapper for RequestLogger {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.run(inner, request))
    }
}

impl std::fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLogger").finish_non_exhaustive()
    }
}

fn display_request(
    output: &dyn RequestLoggerOutput,
    request: &Request,
    body: Option<&[u8]>,
) -> io::Result<()> {
    let url = request.url();
    output.display_type("REQUEST", Local::now())?;
    output.display_request_header(
        request.method().as_str(),
        &url[Position::BeforePath..Position::AfterQuery],
        "HTTP/1.1",
    )?;
    output.display_host(&url[Position::BeforeHost..Position::AfterPort])?;
    display_sorted_headers(output, request.headers())?;

    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Ok(());
    };
    match request.content_type().map(media_type) {
        Some(media) if media.contains("json") => output.display_json_body(body),
        Some(FORM_CONTENT_TYPE) => {
            output.display_message(&format!("[{} {}]", FORM_CONTENT_TYPE, redact_form(body)))
        }
        Some(media) => output.display_message(&format!("[{} Content Hidden]", media)),
        None => output.display_message("[Content Hidden]"),
    }
}

fn display_response(
    output: &dyn RequestLoggerOutput,
    protocol: &str,
    status: u16,
    headers: &HeaderMap,
    body: &[u8],
) -> io::Result<()> {
    output.display_type("RESPONSE", Local::now())?;
    output.display_response_header(protocol, &status_text(status))?;
    display_sorted_headers(output, headers)?;
    output.display_json_body(body)
}

fn display_sorted_headers(
    output: &dyn RequestLoggerOutput,
    headers: &HeaderMap,
) -> io::Result<()> {
    let mut names: Vec<_> = headers.keys().collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for name in names {
        let display_name = canonical_header_name(name.as_str());
        for value in headers.get_all(name) {
            if name == AUTHORIZATION {
                output.display_header(&display_name, REDACTED)?;
            } else {
                output.display_header(&display_name, &String::from_utf8_lossy(value.as_bytes()))?;
            }
        }
    }
    Ok(())
}

/// `x-vcap-request-id` -> `X-Vcap-Request-Id`.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

fn status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .map(|code| code.to_string())
        .unwrap_or_else(|_| status.to_string())
}

/// Whether a form field or JSON key holds a credential.
pub(crate) fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

fn redact_form(body: &[u8]) -> String {
    url::form_urlencoded::parse(body)
        .map(|(key, value)| {
            if is_sensitive_key(&key) {
                format!("{}={}", key, REDACTED)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
