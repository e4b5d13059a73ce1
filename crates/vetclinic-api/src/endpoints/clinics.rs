//! Clinic, veterinarian, and staff endpoints.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use vetclinic_core::models::{ClinicPatch, NewClinic, NewVeterinarian, StaffPatch, VetPatch};
use vetclinic_core::registry::{NewStaff, StaffRecord};
use vetclinic_core::{Actor, Clinic, PractitionerRegistry, Veterinarian};

use crate::endpoints::{lock_db, require_vet};
use crate::error::ApiError;
use crate::types::ApiContext;

#[derive(Serialize)]
pub struct ClinicResponse {
    pub clinic: Clinic,
}

#[derive(Serialize)]
pub struct ClinicsResponse {
    pub clinics: Vec<Clinic>,
}

#[derive(Serialize)]
pub struct StaffResponse {
    pub staff: StaffRecord,
}

#[derive(Serialize)]
pub struct VetResponse {
    pub vet: Veterinarian,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffRequest {
    pub clinic_id: String,
    #[serde(flatten)]
    pub staff: NewStaff,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchClinicRequest {
    pub clinic_id: String,
}

/// `POST /vets/register` — veterinarian signup. Unauthenticated, like
/// session issuance: the identity tier calls it once credentials are
/// established. Duplicate license numbers fail `Conflict`.
pub async fn register_vet(
    State(ctx): State<ApiContext>,
    Json(data): Json<NewVeterinarian>,
) -> Result<Json<VetResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let vet = PractitionerRegistry::new(&db).register_veterinarian(data)?;
    Ok(Json(VetResponse { vet }))
}

/// `POST /clinics` — create a clinic; the caller becomes its Primary vet.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(data): Json<NewClinic>,
) -> Result<Json<ClinicResponse>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let clinic = PractitionerRegistry::new(&db).create_clinic(data, &vet_id)?;
    Ok(Json(ClinicResponse { clinic }))
}

/// `GET /clinics` — directory listing.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<ClinicsResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let clinics = PractitionerRegistry::new(&db).list_clinics()?;
    Ok(Json(ClinicsResponse { clinics }))
}

/// `PATCH /clinics/:id` — update operating metadata.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(clinic_id): Path<String>,
    Json(patch): Json<ClinicPatch>,
) -> Result<Json<ClinicResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let clinic = PractitionerRegistry::new(&db).update_clinic(&clinic_id, patch, &actor)?;
    Ok(Json(ClinicResponse { clinic }))
}

/// `POST /clinics/staff` — add a veterinarian or support staff member.
pub async fn add_staff(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<AddStaffRequest>,
) -> Result<Json<StaffResponse>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let staff = PractitionerRegistry::new(&db).add_staff(&req.clinic_id, req.staff, &vet_id)?;
    Ok(Json(StaffResponse { staff }))
}

/// `PATCH /clinics/staff/:id` — update a support staff member.
pub async fn update_staff(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(staff_id): Path<String>,
    Json(patch): Json<StaffPatch>,
) -> Result<Json<StaffResponse>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let staff = PractitionerRegistry::new(&db).update_staff_member(&staff_id, patch, &vet_id)?;
    Ok(Json(StaffResponse {
        staff: StaffRecord::Support(staff),
    }))
}

/// `PATCH /clinics/staff/:id/deactivate`
pub async fn deactivate_staff(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(staff_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    PractitionerRegistry::new(&db).deactivate_staff_member(&staff_id, &vet_id)?;
    Ok(Json(serde_json::json!({})))
}

/// `PATCH /clinics/staff/:id/activate`
pub async fn activate_staff(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(staff_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    PractitionerRegistry::new(&db).activate_staff_member(&staff_id, &vet_id)?;
    Ok(Json(serde_json::json!({})))
}

/// `PATCH /vets/:id` — update a veterinarian.
pub async fn update_vet(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(target_vet_id): Path<String>,
    Json(patch): Json<VetPatch>,
) -> Result<Json<VetResponse>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let vet = PractitionerRegistry::new(&db).update_veterinarian(&target_vet_id, patch, &vet_id)?;
    Ok(Json(VetResponse { vet }))
}

/// `PATCH /vets/:id/deactivate` — always `Forbidden` for a Primary vet.
pub async fn deactivate_vet(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(target_vet_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    PractitionerRegistry::new(&db).deactivate_veterinarian(&target_vet_id, &vet_id)?;
    Ok(Json(serde_json::json!({})))
}

/// `PATCH /vets/:id/activate`
pub async fn activate_vet(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(target_vet_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    PractitionerRegistry::new(&db).activate_veterinarian(&target_vet_id, &vet_id)?;
    Ok(Json(serde_json::json!({})))
}

/// `PATCH /vets/active-clinic` — switch the caller's clinic context.
pub async fn switch_active_clinic(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<SwitchClinicRequest>,
) -> Result<Json<VetResponse>, ApiError> {
    let vet_id = require_vet(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let vet = PractitionerRegistry::new(&db).switch_active_clinic(&vet_id, &req.clinic_id)?;
    Ok(Json(VetResponse { vet }))
}
