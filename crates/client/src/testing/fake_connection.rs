//! Scripted in-memory connection.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

use crate::classifier::{ErrorSchema, classify};
use crate::connection::{BoxFuture, Connection, Request, Response, request_ids};
use crate::error::{ClientError, RawHttpStatusError, Result};

type ErrorFactory = Box<dyn Fn() -> ClientError + Send + Sync>;

enum Scripted {
    Respond {
        status: u16,
        headers: HeaderMap,
        body: Vec<u8>,
    },
    Fail(ErrorFactory),
}

/// What the fake saw for one physical attempt.
#[derive(Debug, Clone)]
pub struct RecordedAttempt {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Body bytes read from the request's current position.
    pub body: Option<Vec<u8>>,
}

/// A `Connection` that replays scripted outcomes in order and records every attempt.
///
/// Like the real transport it consumes the request body, returns `RawHttpStatus`
/// for status >= 400 and decodes JSON when asked. With an error schema set it
/// also classifies failures, standing in for a transport plus `ErrorWrapper`.
#[derive(Default)]
pub struct FakeConnection {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    schema: Option<ErrorSchema>,
    attempts: Mutex<Vec<RecordedAttempt>>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify HTTP failures with `schema` before returning them.
    pub fn with_error_schema(mut self, schema: ErrorSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Outcome used once the script is exhausted.
    pub fn with_fallback_status(mut self, status: u16, body: &str) -> Self {
        self.fallback = Some(Scripted::Respond {
            status,
            headers: json_headers(),
            body: body.as_bytes().to_vec(),
        });
        self
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(status, json_headers(), body.to_string().into_bytes());
    }

    pub fn push_response(&self, status: u16, headers: HeaderMap, body: Vec<u8>) {
        self.lock_script().push_back(Scripted::Respond {
            status,
            headers,
            body,
        });
    }

    pub fn push_error<F>(&self, factory: F)
    where
        F: Fn() -> ClientError + Send + Sync + 'static,
    {
        self.lock_script().push_back(Scripted::Fail(Box::new(factory)));
    }

    /// Every attempt seen so far, in order.
    pub fn attempts(&self) -> Vec<RecordedAttempt> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(
        &self,
        request: &Request,
        status: u16,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Response> {
        if status >= 400 {
            let raw = RawHttpStatusError {
                status,
                protocol: "HTTP/1.1".to_string(),
                request_ids: request_ids(&headers),
                headers,
                raw_response: body,
            };
            return Err(match self.schema {
                Some(schema) => classify(schema, raw),
                None => ClientError::RawHttpStatus(raw),
            });
        }

        let mut response = Response::new(status, "HTTP/1.1", headers, body);
        if request.wants_json() && !response.raw_body.is_empty() {
            response.result = Some(
                serde_json::from_slice(&response.raw_body)
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?,
            );
        }
        Ok(response)
    }

    fn execute(&self, request: &mut Request) -> Result<Response> {
        let body = request.read_body().map_err(ClientError::BodyRead)?;
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedAttempt {
                method: request.method().clone(),
                url: request.url().clone(),
                headers: request.headers().clone(),
                body,
            });

        let next = self.lock_script().pop_front();
        match next.as_ref().or(self.fallback.as_ref()) {
            Some(Scripted::Respond {
                status,
                headers,
                body,
            }) => self.respond(request, *status, headers.clone(), body.clone()),
            Some(Scripted::Fail(factory)) => Err(factory()),
            None => Err(ClientError::InvalidRequest(
                "FakeConnection has no scripted response left".to_string(),
            )),
        }
    }
}

impl Connection for FakeConnection {
    fn make<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Response>> {
        let result = self.execute(request);
        Box::pin(async move { result })
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
