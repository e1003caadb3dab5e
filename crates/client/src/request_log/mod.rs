//! Request log outputs for `CF_TRACE`.
//!
//! Responsibilities:
//! - Render request/response sections as plain text.
//! - Redact credential values inside JSON bodies.
//! - Deliver finished sections to the terminal or to log files.
//!
//! Invariants:
//! - A section is buffered between `start` and `stop` and written in one piece.
//! - The section buffer is only touched under the sink's section lock, which
//!   every logger sharing the sink holds from `start` through `stop`.
//! - Malformed JSON bodies are written raw.

mod file;
mod terminal;

pub use file::FileRequestLogger;
pub use terminal::TerminalRequestLogger;

use chrono::{DateTime, Local, SecondsFormat};
use serde_json::Value;
use std::io;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::wrapper::{REDACTED, RequestLoggerOutput, is_sensitive_key};

/// Destination for finished log sections.
pub trait LogSink: Send + Sync {
    /// Buffer holding the section currently being rendered.
    fn section(&self) -> &Mutex<String>;

    /// Lock serializing whole sections.
    fn section_lock(&self) -> &Mutex<()>;

    /// Write one finished section.
    fn write_section(&self, text: &str) -> io::Result<()>;
}

fn buffer<S: LogSink + ?Sized>(sink: &S) -> MutexGuard<'_, String> {
    sink.section()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn push_line<S: LogSink + ?Sized>(sink: &S, line: &str) -> io::Result<()> {
    let mut buf = buffer(sink);
    buf.push_str(line);
    buf.push('\n');
    Ok(())
}

impl<S: LogSink> RequestLoggerOutput for S {
    fn start(&self) -> io::Result<()> {
        buffer(self).clear();
        Ok(())
    }

    fn stop(&self) -> io::Result<()> {
        let text = {
            let mut buf = buffer(self);
            buf.push('\n');
            std::mem::take(&mut *buf)
        };
        self.write_section(&text)
    }

    fn display_type(&self, name: &str, time: DateTime<Local>) -> io::Result<()> {
        push_line(
            self,
            &format!("{}: [{}]", name, time.to_rfc3339_opts(SecondsFormat::Secs, false)),
        )
    }

    fn display_request_header(&self, method: &str, uri: &str, protocol: &str) -> io::Result<()> {
        push_line(self, &format!("{} {} {}", method, uri, protocol))
    }

    fn display_host(&self, host: &str) -> io::Result<()> {
        push_line(self, &format!("Host: {}", host))
    }

    fn display_header(&self, name: &str, value: &str) -> io::Result<()> {
        push_line(self, &format!("{}: {}", name, value))
    }

    fn display_json_body(&self, body: &[u8]) -> io::Result<()> {
        match format_json_body(body) {
            Some(text) => push_line(self, &text),
            None => Ok(()),
        }
    }

    fn display_message(&self, message: &str) -> io::Result<()> {
        push_line(self, message)
    }

    fn display_response_header(&self, protocol: &str, status: &str) -> io::Result<()> {
        push_line(self, &format!("{} {}", protocol, status))
    }

    fn handle_internal_error(&self, err: &io::Error) {
        warn!(error = %err, "Failed to write request log");
    }

    fn section_lock(&self) -> Option<&Mutex<()>> {
        Some(LogSink::section_lock(self))
    }
}

/// Pretty-print a JSON body with credentials redacted.
///
/// Returns `None` for an empty body and the raw text for malformed JSON.
pub fn format_json_body(body: &[u8]) -> Option<String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            redact_json(&mut value);
            serde_json::to_string_pretty(&value)
                .ok()
                .or_else(|| Some(String::from_utf8_lossy(body).into_owned()))
        }
        Err(_) => Some(String::from_utf8_lossy(body).into_owned()),
    }
}

/// Replace values of credential-bearing keys, at any depth.
pub fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact_json(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_json_body_pretty_prints() {
        let formatted = format_json_body(br#"{"a":"b","c":"<&>"}"#).unwrap();
        assert_eq!(formatted, "{\n  \"a\": \"b\",\n  \"c\": \"<&>\"\n}");
    }

    #[test]
    fn test_format_json_body_empty() {
        assert_eq!(format_json_body(b""), None);
        assert_eq!(format_json_body(b"  \n"), None);
    }

    #[test]
    fn test_format_json_body_malformed_is_raw() {
        let raw = r#"[{"data":1, "banana": 2}"#;
        assert_eq!(format_json_body(raw.as_bytes()).unwrap(), raw);
    }

    #[test]
    fn test_redact_json_nested() {
        let mut value = json!({
            "access_token": "abc",
            "user": {"name": "admin", "password": "hunter2"},
            "items": [{"client_secret": "s"}],
            "token_type": "bearer",
        });
        redact_json(&mut value);

        assert_eq!(value["access_token"], REDACTED);
        assert_eq!(value["user"]["name"], "admin");
        assert_eq!(value["user"]["password"], REDACTED);
        assert_eq!(value["items"][0]["client_secret"], REDACTED);
        assert_eq!(value["token_type"], REDACTED);
    }
}
