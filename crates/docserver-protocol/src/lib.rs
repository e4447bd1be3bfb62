//! Wire protocol for the documentation server.
//!
//! The HTTP routes are a direct projection of the repository trait. This
//! crate holds the pieces both ends of the wire agree on: endpoint paths,
//! request payloads, the status document, and the error body.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::{endpoints, ServerStatus, ServiceId};
pub use error::ErrorResponse;
pub use message::{
    CreateBundleRequest, CreateRevisionRequest, SearchParams, UpdateBundleRequest,
};
