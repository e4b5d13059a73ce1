//! Pet registration endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use vetclinic_core::models::{NewPet, PetPatch};
use vetclinic_core::{Actor, ClinicError, Pet, PetRegistration};

use crate::endpoints::{lock_db, require_owner};
use crate::error::ApiError;
use crate::types::ApiContext;

#[derive(Serialize)]
pub struct PetResponse {
    pub pet: Pet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPetsResponse {
    pub pending_pets: Vec<Pet>,
}

#[derive(Serialize)]
pub struct PetsResponse {
    pub pets: Vec<Pet>,
}

#[derive(Deserialize, Default)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// `POST /pets` — owner submits a pet for registration.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(data): Json<NewPet>,
) -> Result<Json<PetResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let pet = PetRegistration::new(&db).submit(data, &owner_id)?;
    Ok(Json(PetResponse { pet }))
}

/// `PATCH /pets/:id/approve` — clinic-side approval.
pub async fn approve(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
) -> Result<Json<PetResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let pet = PetRegistration::new(&db).approve(&pet_id, &actor)?;
    Ok(Json(PetResponse { pet }))
}

/// `PATCH /pets/:id/reject` — clinic-side rejection with an optional reason.
pub async fn reject(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<PetResponse>, ApiError> {
    let reason = body.and_then(|Json(req)| req.reason);
    let db = lock_db(&ctx)?;
    let pet = PetRegistration::new(&db).reject(&pet_id, &actor, reason)?;
    Ok(Json(PetResponse { pet }))
}

/// `GET /pets/clinic/pending` — pending registrations for the caller's
/// clinic. The clinic is resolved from the token's claims, never from
/// the request.
pub async fn list_pending(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<PendingPetsResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let clinic_id = actor_clinic_id(&db, &actor)?;
    let pending_pets = PetRegistration::new(&db).list_pending(&clinic_id, &actor)?;
    Ok(Json(PendingPetsResponse { pending_pets }))
}

/// `GET /pets/owner/my-pets` — all of the caller's pets.
pub async fn list_mine(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<PetsResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let pets = PetRegistration::new(&db).list_for_owner(&owner_id)?;
    Ok(Json(PetsResponse { pets }))
}

/// `GET /pets/:id` — owner-side read.
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
) -> Result<Json<PetResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let pet = PetRegistration::new(&db).get_owned(&pet_id, &owner_id)?;
    Ok(Json(PetResponse { pet }))
}

/// `PATCH /pets/:id` — owner-side attribute edit.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
    Json(patch): Json<PetPatch>,
) -> Result<Json<PetResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let pet = PetRegistration::new(&db).update(&pet_id, patch, &owner_id)?;
    Ok(Json(PetResponse { pet }))
}

/// `DELETE /pets/:id` — owner-initiated, unconditional delete.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    PetRegistration::new(&db).delete(&pet_id, &owner_id)?;
    Ok(Json(serde_json::json!({})))
}

/// The clinic a clinic-side actor works against: a vet's active clinic,
/// or a staff member's clinic.
fn actor_clinic_id(db: &vetclinic_core::Database, actor: &Actor) -> Result<String, ApiError> {
    match actor {
        Actor::Veterinarian(vet_id) => {
            let vet = db
                .get_veterinarian(vet_id)
                .map_err(|e| ApiError::Internal(e.to_string()))?
                .ok_or_else(|| ClinicError::NotFound(format!("veterinarian {vet_id}")))?;
            vet.current_active_clinic_id.ok_or_else(|| {
                ClinicError::Forbidden("veterinarian has no active clinic".to_string()).into()
            })
        }
        Actor::Staff(staff_id) => {
            let staff = db
                .get_staff_member(staff_id)
                .map_err(|e| ApiError::Internal(e.to_string()))?
                .ok_or_else(|| ClinicError::NotFound(format!("staff member {staff_id}")))?;
            Ok(staff.clinic_id)
        }
        Actor::Owner(_) => Err(ClinicError::Forbidden(
            "owners cannot review registrations".to_string(),
        )
        .into()),
    }
}
