//! Data models for the Cloud Foundry APIs.
//!
//! Each submodule holds the request and response shapes of one API.

pub mod cc;
pub mod networking;
pub mod router;
pub mod uaa;

pub use cc::ApiInfo;
pub use networking::{Policy, PolicyDestination, PolicyList, PolicySource, Ports};
pub use router::RouterGroup;
pub use uaa::{NewUser, TokenResponse, UaaUser, UserList};
