//! VetClinic HTTP edge.
//!
//! Thin axum layer over [`vetclinic_core`]: bearer-token auth middleware,
//! JSON error mapping, and one handler per service operation. All domain
//! rules live in the core crate; handlers only translate HTTP to service
//! calls.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use types::ApiContext;
