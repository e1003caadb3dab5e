//! Converts raw HTTP status failures into typed API errors.

use tracing::debug;

use super::Wrapper;
use crate::classifier::{ErrorSchema, classify};
use crate::connection::{BoxFuture, Connection, Request, Response};
use crate::error::{ClientError, Result};

/// Applies the classifier for one API's error schema to `RawHttpStatus` errors.
/// Every other outcome passes through untouched.
#[derive(Debug, Clone, Copy)]
pub struct ErrorWrapper {
    schema: ErrorSchema,
}

impl ErrorWrapper {
    pub fn new(schema: ErrorSchema) -> Self {
        Self { schema }
    }

    pub fn uaa() -> Self {
        Self::new(ErrorSchema::Uaa)
    }

    pub fn router() -> Self {
        Self::new(ErrorSchema::Router)
    }
}

impl Wrapper for ErrorWrapper {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>> {
        Box::pin(async move {
            match inner.make(request).await {
                Err(ClientError::RawHttpStatus(raw)) => {
                    let status = raw.status;
                    let classified = classify(self.schema, raw);
                    debug!(
                        status,
                        schema = ?self.schema,
                        error = %classified,
                        "Classified HTTP failure"
                    );
                    Err(classified)
                }
                other => other,
            }
        })
    }
}
