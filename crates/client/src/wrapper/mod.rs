//! Composable connection decorators.
//!
//! Responsibilities:
//! - Define the `Wrapper` contract: one cross-cutting concern around an inner
//!   `Connection`.
//! - Compose an ordered list of wrappers around a base connection once, at
//!   construction time.
//!
//! Invariants:
//! - A wrapped connection is itself a `Connection`, so chains nest to any depth.
//! - The first wrapper passed to `compose` is the outermost.
//! - Wrappers may be re-entered with the same request (retry, replay).

mod auth;
mod errors;
mod logger;
mod retry;
mod trace;

pub use auth::UaaAuthentication;
pub use errors::ErrorWrapper;
pub use logger::{REDACTED, RequestLogger, RequestLoggerOutput};
pub(crate) use logger::is_sensitive_key;
pub use retry::RetryRequest;
pub use trace::{B3_SPAN_ID_HEADER, B3_TRACE_ID_HEADER, TraceHeaderRequest};

use std::sync::Arc;

use crate::connection::{BoxFuture, Connection, Request, Response};
use crate::error::Result;

/// A decorator around an inner connection.
pub trait Wrapper: Send + Sync {
    fn make<'a>(
        &'a self,
        inner: &'a dyn Connection,
        request: &'a mut Request,
    ) -> BoxFuture<'a, Result<Response>>;

    /// Wrap `inner`, producing a new connection.
    fn wrap(self, inner: Arc<dyn Connection>) -> Arc<dyn Connection>
    where
        Self: Sized + 'static,
    {
        Arc::new(Wrapped::new(Arc::new(self), inner))
    }
}

/// A wrapper bound to its inner connection.
pub struct Wrapped {
    wrapper: Arc<dyn Wrapper>,
    inner: Arc<dyn Connection>,
}

impl Wrapped {
    pub fn new(wrapper: Arc<dyn Wrapper>, inner: Arc<dyn Connection>) -> Self {
        Self { wrapper, inner }
    }
}

impl Connection for Wrapped {
    fn make<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Response>> {
        self.wrapper.make(self.inner.as_ref(), request)
    }
}

/// Apply `wrappers` around `base`; `wrappers[0]` ends up outermost.
pub fn compose(base: Arc<dyn Connection>, wrappers: Vec<Arc<dyn Wrapper>>) -> Arc<dyn Connection> {
    wrappers
        .into_iter()
        .rev()
        .fold(base, |inner, wrapper| Arc::new(Wrapped::new(wrapper, inner)))
}
