//! Request log written to a terminal stream.

use std::io::{self, Write};
use std::sync::Mutex;

use super::LogSink;

/// Writes request log sections to `W` (stderr by default).
pub struct TerminalRequestLogger<W: Write + Send = io::Stderr> {
    writer: Mutex<W>,
    section: Mutex<String>,
    section_lock: Mutex<()>,
}

impl TerminalRequestLogger<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TerminalRequestLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            section: Mutex::new(String::new()),
            section_lock: Mutex::new(()),
        }
    }

    /// Consume the logger and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> LogSink for TerminalRequestLogger<W> {
    fn section(&self) -> &Mutex<String> {
        &self.section
    }

    fn section_lock(&self) -> &Mutex<()> {
        &self.section_lock
    }

    fn write_section(&self, text: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

impl<W: Write + Send> std::fmt::Debug for TerminalRequestLogger<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalRequestLogger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::RequestLoggerOutput;
    use chrono::{Local, TimeZone};

    fn render(f: impl FnOnce(&TerminalRequestLogger<Vec<u8>>) -> io::Result<()>) -> String {
        let logger = TerminalRequestLogger::new(Vec::new());
        logger.start().unwrap();
        f(&logger).unwrap();
        logger.stop().unwrap();
        String::from_utf8(logger.into_inner()).unwrap()
    }

    #[test]
    fn test_request_section() {
        let output = render(|l| {
            l.display_request_header("GET", "/v2/spaces/guid/summary", "HTTP/1.1")?;
            l.display_host("api.example.com")?;
            l.display_header("Accept", "application/json")
        });
        assert_eq!(
            output,
            "GET /v2/spaces/guid/summary HTTP/1.1\nHost: api.example.com\nAccept: application/json\n\n"
        );
    }

    #[test]
    fn test_display_type_uses_rfc3339() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let output = render(|l| l.display_type("REQUEST", time));
        assert_eq!(
            output,
            format!("REQUEST: [{}]\n\n", time.to_rfc3339_opts(chrono::SecondsFormat::Secs, false))
        );
    }

    #[test]
    fn test_response_header_and_json() {
        let output = render(|l| {
            l.display_response_header("HTTP/1.1", "200 OK")?;
            l.display_json_body(br#"{"access_token":"abc"}"#)
        });
        assert!(output.starts_with("HTTP/1.1 200 OK\n"));
        assert!(output.contains("[PRIVATE DATA HIDDEN]"));
        assert!(!output.contains("abc"));
    }

    #[test]
    fn test_empty_json_body_writes_nothing() {
        assert_eq!(render(|l| l.display_json_body(b"")), "\n");
    }

    #[test]
    fn test_start_discards_unfinished_section() {
        let logger = TerminalRequestLogger::new(Vec::new());
        logger.start().unwrap();
        logger.display_message("lost").unwrap();
        logger.start().unwrap();
        logger.display_message("kept").unwrap();
        logger.stop().unwrap();
        assert_eq!(String::from_utf8(logger.into_inner()).unwrap(), "kept\n\n");
    }
}
