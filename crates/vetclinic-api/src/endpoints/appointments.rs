//! Appointment endpoints.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vetclinic_core::{
    Actor, Appointment, AppointmentFilter, AppointmentScheduler, AppointmentStats,
    AppointmentStatus, BookRequest, ClinicError,
};

use crate::endpoints::{lock_db, require_owner};
use crate::error::ApiError;
use crate::types::ApiContext;

#[derive(Serialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize)]
pub struct OwnerAppointmentsResponse {
    pub appointments: Vec<Appointment>,
    pub stats: AppointmentStats,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub date_time: DateTime<Utc>,
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

/// `POST /appointments/book` — owner books a visit.
pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<BookRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let db = lock_db(&ctx)?;
    let appointment = AppointmentScheduler::new(&db).book(request, &owner_id)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `PATCH /appointments/:id/cancel` — either party, reason required.
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointment = AppointmentScheduler::new(&db).cancel(&id, &actor, &req.reason)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `PATCH /appointments/:id/confirm` — clinic-side.
pub async fn confirm(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointment = AppointmentScheduler::new(&db).confirm(&id, &actor)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `PATCH /appointments/:id/complete` — clinic-side, never in the future.
pub async fn complete(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointment = AppointmentScheduler::new(&db).complete(&id, &actor)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `PATCH /appointments/:id/reschedule` — clinic-side, new time re-checked
/// for slot conflicts.
pub async fn reschedule(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<AppointmentResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointment = AppointmentScheduler::new(&db).reschedule(&id, &actor, req.date_time)?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// `GET /appointments/owner/my-appointments?filter=...` — the caller's
/// appointments with stats. `filter` is `all` (default), `upcoming`,
/// `past`, or a status value.
pub async fn list_mine(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListQuery>,
) -> Result<Json<OwnerAppointmentsResponse>, ApiError> {
    let owner_id = require_owner(&actor)?.to_string();
    let filter = parse_filter(query.filter.as_deref())?;

    let db = lock_db(&ctx)?;
    let (appointments, stats) = AppointmentScheduler::new(&db).list_for_owner(&owner_id, filter)?;
    Ok(Json(OwnerAppointmentsResponse {
        appointments,
        stats,
    }))
}

/// `GET /appointments/pet/:petId` — a pet's history.
pub async fn list_for_pet(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(pet_id): Path<String>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointments = AppointmentScheduler::new(&db).list_for_pet(&pet_id, &actor)?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// `GET /appointments/vet/:vetId` — a vet's schedule.
pub async fn list_for_vet(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(vet_id): Path<String>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let db = lock_db(&ctx)?;
    let appointments = AppointmentScheduler::new(&db).list_for_vet(&vet_id, &actor)?;
    Ok(Json(AppointmentsResponse { appointments }))
}

fn parse_filter(raw: Option<&str>) -> Result<AppointmentFilter, ApiError> {
    match raw {
        None | Some("all") => Ok(AppointmentFilter::All),
        Some("upcoming") => Ok(AppointmentFilter::Upcoming),
        Some("past") => Ok(AppointmentFilter::Past),
        Some(other) => AppointmentStatus::parse(other)
            .map(AppointmentFilter::ByStatus)
            .ok_or_else(|| ClinicError::Validation("filter".to_string()).into()),
    }
}
