//! Endpoint handlers, grouped by resource.

pub mod appointments;
pub mod clinics;
pub mod health;
pub mod pets;
pub mod sessions;

use std::sync::MutexGuard;

use vetclinic_core::{Actor, ClinicError, Database};

use crate::error::ApiError;
use crate::types::ApiContext;

/// Lock the database for one service call.
pub(crate) fn lock_db(ctx: &ApiContext) -> Result<MutexGuard<'_, Database>, ApiError> {
    ctx.db
        .lock()
        .map_err(|_| ApiError::Internal("db lock poisoned".into()))
}

/// The acting veterinarian's id, for vet-only operations.
pub(crate) fn require_vet(actor: &Actor) -> Result<&str, ApiError> {
    match actor {
        Actor::Veterinarian(id) => Ok(id),
        _ => Err(ClinicError::Forbidden(
            "this action requires a veterinarian session".to_string(),
        )
        .into()),
    }
}

/// The acting owner's id, for owner-only operations.
pub(crate) fn require_owner(actor: &Actor) -> Result<&str, ApiError> {
    match actor {
        Actor::Owner(id) => Ok(id),
        _ => Err(ClinicError::Forbidden(
            "this action requires an owner session".to_string(),
        )
        .into()),
    }
}
