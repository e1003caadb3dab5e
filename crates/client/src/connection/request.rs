//! The replayable request envelope.
//!
//! Responsibilities:
//! - Hold method, URL, headers and an optional body for one logical API call.
//! - Allow the body to be read, peeked and rewound so wrappers can replay it.
//! - Carry the caller's intent: JSON decoding of the response and idempotency.
//!
//! Invariants:
//! - In-memory and seekable bodies can always be rewound to their start.
//! - Stream bodies are never rewound; `reset_body` fails with `ErrorKind::Unsupported`.
//! - `peek_body` leaves the body positioned at its start.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use url::Url;

use crate::error::{ClientError, Result};

/// Content type for JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for form request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A reader that can be rewound.
pub trait SeekableRead: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableRead for T {}

/// Request body storage.
pub enum RequestBody {
    /// Bytes held in memory.
    Bytes(Cursor<Vec<u8>>),
    /// Caller-supplied reader that supports seeking.
    Seekable(Box<dyn SeekableRead>),
    /// One-shot reader. Cannot be replayed.
    Stream(Box<dyn Read + Send + Sync>),
}

impl RequestBody {
    fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            Self::Bytes(cursor) => cursor.read_to_end(&mut buf)?,
            Self::Seekable(reader) => reader.read_to_end(&mut buf)?,
            Self::Stream(reader) => reader.read_to_end(&mut buf)?,
        };
        Ok(buf)
    }

    fn rewind(&mut self) -> io::Result<()> {
        match self {
            Self::Bytes(cursor) => {
                cursor.set_position(0);
                Ok(())
            }
            Self::Seekable(reader) => reader.seek(SeekFrom::Start(0)).map(|_| ()),
            Self::Stream(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "request body is a stream and cannot be rewound",
            )),
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(cursor) => write!(f, "Bytes({} bytes)", cursor.get_ref().len()),
            Self::Seekable(_) => f.write_str("Seekable"),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// One HTTP call, possibly made more than once.
#[derive(Debug)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<RequestBody>,
    basic_auth: Option<(String, SecretString)>,
    decode_json: bool,
    idempotent: Option<bool>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            basic_auth: None,
            decode_json: false,
            idempotent: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: Url) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Serialize `value` as the JSON body and set `Content-Type: application/json`.
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            ClientError::InvalidRequest(format!("failed to encode JSON body: {}", e))
        })?;
        self.body = Some(RequestBody::Bytes(Cursor::new(bytes)));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        Ok(self)
    }

    /// Encode `pairs` as an urlencoded form body.
    pub fn form_body<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key.as_ref(), value.as_ref());
        }
        self.body = Some(RequestBody::Bytes(Cursor::new(serializer.finish().into_bytes())));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        self
    }

    /// Use raw bytes as the body. The caller sets `Content-Type`.
    pub fn bytes_body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(RequestBody::Bytes(Cursor::new(bytes.into())));
        self
    }

    pub fn seekable_body(mut self, reader: impl SeekableRead + 'static) -> Self {
        self.body = Some(RequestBody::Seekable(Box::new(reader)));
        self
    }

    /// Use a one-shot reader as the body. Such requests cannot be retried or replayed.
    pub fn stream_body(mut self, reader: impl Read + Send + Sync + 'static) -> Self {
        self.body = Some(RequestBody::Stream(Box::new(reader)));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Send HTTP Basic credentials (applied by the transport).
    pub fn basic_auth(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.basic_auth = Some((username.into(), password));
        self
    }

    /// Decode a successful response body as JSON into `Response::result`.
    pub fn decode_json(mut self) -> Self {
        self.decode_json = true;
        self
    }

    /// Mark whether the request may be retried after a transient server failure.
    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = Some(idempotent);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn basic_auth_credentials(&self) -> Option<&(String, SecretString)> {
        self.basic_auth.as_ref()
    }

    pub fn wants_json(&self) -> bool {
        self.decode_json
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// `Content-Type` header value, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Whether a transient server failure may be retried.
    ///
    /// Without an explicit marker every method except POST is considered idempotent.
    pub fn is_idempotent(&self) -> bool {
        self.idempotent.unwrap_or(self.method != Method::POST)
    }

    /// Read the body from its current position to the end.
    pub fn read_body(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.body.as_mut().map(RequestBody::read_remaining).transpose()
    }

    /// Rewind the body to its start. A request without a body always succeeds.
    pub fn reset_body(&mut self) -> io::Result<()> {
        match self.body.as_mut() {
            Some(body) => body.rewind(),
            None => Ok(()),
        }
    }

    /// Read the whole body without consuming it.
    ///
    /// Returns `Ok(None)` for requests without a body and for stream bodies.
    pub fn peek_body(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.body.as_mut() {
            None | Some(RequestBody::Stream(_)) => Ok(None),
            Some(body) => {
                body.rewind()?;
                let bytes = body.read_remaining()?;
                body.rewind()?;
                Ok(Some(bytes))
            }
        }
    }

    /// Replace the body with in-memory bytes positioned at the start.
    pub fn set_body_bytes(&mut self, bytes: Vec<u8>) {
        self.body = Some(RequestBody::Bytes(Cursor::new(bytes)));
    }
}
