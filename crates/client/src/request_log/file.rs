//! Request log appended to one or more files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::LogSink;

/// Appends request log sections to every configured file.
///
/// Parent directories are created on first write.
#[derive(Debug)]
pub struct FileRequestLogger {
    paths: Vec<PathBuf>,
    section: Mutex<String>,
    section_lock: Mutex<()>,
}

impl FileRequestLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_paths(vec![path.into()])
    }

    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            section: Mutex::new(String::new()),
            section_lock: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn append(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())
}

impl LogSink for FileRequestLogger {
    fn section(&self) -> &Mutex<String> {
        &self.section
    }

    fn section_lock(&self) -> &Mutex<()> {
        &self.section_lock
    }

    fn write_section(&self, text: &str) -> io::Result<()> {
        for path in &self.paths {
            append(path, text).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::RequestLoggerOutput;
    use tempfile::TempDir;

    #[test]
    fn test_creates_intermediate_dirs_for_every_file() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("sub").join("trace1.log");
        let second = dir.path().join("a").join("b").join("trace2.log");
        let logger = FileRequestLogger::with_paths(vec![first.clone(), second.clone()]);

        logger.start().unwrap();
        logger.display_header("Header", "Value").unwrap();
        logger.stop().unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), "Header: Value\n\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "Header: Value\n\n");
    }

    #[test]
    fn test_appends_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.log");
        let logger = FileRequestLogger::new(&path);

        for host in ["one", "two"] {
            logger.start().unwrap();
            logger.display_host(host).unwrap();
            logger.stop().unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "Host: one\n\nHost: two\n\n");
    }

    #[test]
    fn test_json_body_redacted_in_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.log");
        let logger = FileRequestLogger::new(&path);

        logger.start().unwrap();
        logger
            .display_json_body(br#"{"refresh_token":"r-123","scope":"openid"}"#)
            .unwrap();
        logger.stop().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("r-123"));
        assert!(contents.contains("\"scope\": \"openid\""));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let logger = FileRequestLogger::new(blocker.join("trace.log"));

        logger.start().unwrap();
        logger.display_message("hello").unwrap();
        assert!(logger.stop().is_err());
    }
}
