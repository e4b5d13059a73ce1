//! Domain models for the vetclinic system.

mod appointment;
mod clinic;
mod pet;
mod staff;

pub use appointment::*;
pub use clinic::*;
pub use pet::*;
pub use staff::*;

/// Current UTC timestamp as RFC 3339 text (the storage format for
/// `created_at`/`updated_at` columns).
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fresh v4 UUID string id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
