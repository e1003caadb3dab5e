//! The `Connection` abstraction and its base implementation.
//!
//! Responsibilities:
//! - Define the single-operation `Connection` contract shared by the transport
//!   and every wrapper.
//! - Provide the request and response envelopes that travel through the chain.
//!
//! Does NOT handle:
//! - Cross-cutting concerns such as retries or authentication (see `wrapper`).
//!
//! Invariants:
//! - Each call to `make` is one physical attempt from the caller's point of view
//!   and returns a freshly built `Response`.
//! - Implementations must tolerate being called repeatedly with the same request.

mod request;
mod response;
mod transport;

pub use futures::future::BoxFuture;

pub use request::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, Request, RequestBody, SeekableRead};
pub use response::{REQUEST_ID_HEADER, Response, WARNINGS_HEADER, request_ids};
pub use transport::{Transport, TransportConfig, default_user_agent};

use crate::error::Result;

/// Something that can execute a request.
pub trait Connection: Send + Sync {
    fn make<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Response>>;
}

impl<C: Connection + ?Sized> Connection for std::sync::Arc<C> {
    fn make<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Response>> {
        (**self).make(request)
    }
}
