//! Appointment Scheduler.
//!
//! Booking, cancellation, confirmation, completion, and rescheduling of
//! visits. Slot conflicts are exact-instant: the backing store's partial
//! unique index makes the conflict check-and-insert atomic, so two
//! concurrent bookings cannot both take a vet's slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Actor;
use crate::db::{Database, DbError};
use crate::error::{require_field, ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentFilter, AppointmentStats, AppointmentStatus, Pet, StaffStatus,
};
use crate::notify::{emit, NotificationEvent, NotificationSink};
use crate::registry::PractitionerRegistry;

/// Fields supplied when booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub pet_id: String,
    pub clinic_id: String,
    pub vet_id: String,
    pub date_time: DateTime<Utc>,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Appointment booking and lifecycle service.
pub struct AppointmentScheduler<'a> {
    db: &'a Database,
    sink: Option<&'a dyn NotificationSink>,
}

impl<'a> AppointmentScheduler<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db, sink: None }
    }

    /// Attach a notification sink for lifecycle events.
    pub fn with_sink(db: &'a Database, sink: &'a dyn NotificationSink) -> Self {
        Self {
            db,
            sink: Some(sink),
        }
    }

    /// Book a new appointment for an approved pet.
    pub fn book(&self, request: BookRequest, owner_id: &str) -> ClinicResult<Appointment> {
        require_field(&request.reason, "reason")?;

        let pet = self.pet(&request.pet_id)?;
        if self.db.get_clinic(&request.clinic_id)?.is_none() {
            return Err(ClinicError::NotFound(format!("clinic {}", request.clinic_id)));
        }
        let vet = self
            .db
            .get_veterinarian(&request.vet_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("veterinarian {}", request.vet_id)))?;

        if pet.owner_id != owner_id {
            return Err(ClinicError::Forbidden(
                "pet belongs to a different owner".to_string(),
            ));
        }
        if !pet.is_approved() {
            return Err(ClinicError::Forbidden(
                "pet registration is not approved".to_string(),
            ));
        }
        if vet.status != StaffStatus::Active
            || !self.db.vet_belongs_to_clinic(&vet.id, &request.clinic_id)?
        {
            return Err(ClinicError::Validation("vetId".to_string()));
        }

        let appt = Appointment::new(
            request.pet_id,
            request.clinic_id,
            request.vet_id,
            request.date_time,
            request.reason,
            request.notes,
        );
        self.db.insert_appointment(&appt).map_err(slot_conflict)?;

        tracing::info!(appointment_id = %appt.id, vet_id = %appt.vet_id, "appointment booked");
        emit(self.sink, NotificationEvent::booked(&appt));
        Ok(appt)
    }

    /// Cancel an appointment. Either side may cancel; the reason is
    /// mandatory and persisted.
    pub fn cancel(&self, appointment_id: &str, actor: &Actor, reason: &str) -> ClinicResult<Appointment> {
        let mut appt = self.appointment(appointment_id)?;
        self.authorize_party(&appt, actor)?;

        appt.cancel(reason)?;
        self.db.update_appointment(&appt)?;
        tracing::info!(appointment_id = %appt.id, "appointment canceled");
        emit(self.sink, NotificationEvent::canceled(&appt));
        Ok(appt)
    }

    /// Confirm a booked or rescheduled appointment. Clinic-side action.
    pub fn confirm(&self, appointment_id: &str, actor: &Actor) -> ClinicResult<Appointment> {
        let mut appt = self.appointment(appointment_id)?;
        self.authorize_clinic_side(&appt, actor)?;

        appt.confirm()?;
        self.db.update_appointment(&appt)?;
        emit(self.sink, NotificationEvent::confirmed(&appt));
        Ok(appt)
    }

    /// Complete a confirmed appointment. Clinic-side action; future
    /// visits cannot be marked complete.
    pub fn complete(&self, appointment_id: &str, actor: &Actor) -> ClinicResult<Appointment> {
        let mut appt = self.appointment(appointment_id)?;
        self.authorize_clinic_side(&appt, actor)?;

        appt.complete(Utc::now())?;
        self.db.update_appointment(&appt)?;
        tracing::info!(appointment_id = %appt.id, "appointment completed");
        Ok(appt)
    }

    /// Move an appointment to a new time. Clinic-side action; the slot
    /// conflict check runs against the new time.
    pub fn reschedule(
        &self,
        appointment_id: &str,
        actor: &Actor,
        new_date_time: DateTime<Utc>,
    ) -> ClinicResult<Appointment> {
        let mut appt = self.appointment(appointment_id)?;
        self.authorize_clinic_side(&appt, actor)?;

        appt.reschedule(new_date_time)?;
        self.db.update_appointment(&appt).map_err(slot_conflict)?;
        tracing::info!(appointment_id = %appt.id, "appointment rescheduled");
        emit(self.sink, NotificationEvent::rescheduled(&appt));
        Ok(appt)
    }

    /// List an owner's appointments chronologically, with stats over the
    /// unfiltered set.
    pub fn list_for_owner(
        &self,
        owner_id: &str,
        filter: AppointmentFilter,
    ) -> ClinicResult<(Vec<Appointment>, AppointmentStats)> {
        let all = self.db.list_appointments_for_owner(owner_id)?;
        let now = Utc::now();

        let stats = AppointmentStats {
            total: all.len() as u32,
            upcoming: all.iter().filter(|a| is_upcoming(a, now)).count() as u32,
            completed: all
                .iter()
                .filter(|a| a.status == AppointmentStatus::Completed)
                .count() as u32,
            canceled: all
                .iter()
                .filter(|a| a.status == AppointmentStatus::Canceled)
                .count() as u32,
        };

        let appointments = all
            .into_iter()
            .filter(|a| match filter {
                AppointmentFilter::All => true,
                AppointmentFilter::Upcoming => is_upcoming(a, now),
                AppointmentFilter::Past => a.date_time <= now,
                AppointmentFilter::ByStatus(status) => a.status == status,
            })
            .collect();

        Ok((appointments, stats))
    }

    /// List a pet's appointments chronologically. Readable by the pet's
    /// owner or by clinic members of the pet's registered clinic.
    pub fn list_for_pet(&self, pet_id: &str, actor: &Actor) -> ClinicResult<Vec<Appointment>> {
        let pet = self.pet(pet_id)?;
        match actor {
            Actor::Owner(owner_id) => {
                if pet.owner_id != *owner_id {
                    return Err(ClinicError::Forbidden(
                        "pet belongs to a different owner".to_string(),
                    ));
                }
            }
            _ => {
                PractitionerRegistry::new(self.db)
                    .authorize_clinic_member(actor, &pet.registered_clinic_id)?;
            }
        }
        Ok(self.db.list_appointments_for_pet(pet_id)?)
    }

    /// List a vet's schedule chronologically. Readable by the vet
    /// themselves or by clinic members of any clinic the vet belongs to.
    pub fn list_for_vet(&self, vet_id: &str, actor: &Actor) -> ClinicResult<Vec<Appointment>> {
        if self.db.get_veterinarian(vet_id)?.is_none() {
            return Err(ClinicError::NotFound(format!("veterinarian {vet_id}")));
        }

        let authorized = match actor {
            Actor::Veterinarian(id) if id == vet_id => true,
            Actor::Owner(_) => false,
            _ => {
                let registry = PractitionerRegistry::new(self.db);
                self.db
                    .list_vet_clinic_ids(vet_id)?
                    .iter()
                    .any(|clinic_id| registry.authorize_clinic_member(actor, clinic_id).is_ok())
            }
        };
        if !authorized {
            return Err(ClinicError::Forbidden(
                "not a clinic member for this veterinarian".to_string(),
            ));
        }

        Ok(self.db.list_appointments_for_vet(vet_id)?)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Owner of the pet, or a clinic member of the appointment's clinic.
    fn authorize_party(&self, appt: &Appointment, actor: &Actor) -> ClinicResult<()> {
        match actor {
            Actor::Owner(owner_id) => {
                let pet = self.pet(&appt.pet_id)?;
                if pet.owner_id != *owner_id {
                    return Err(ClinicError::Forbidden(
                        "appointment belongs to a different owner".to_string(),
                    ));
                }
                Ok(())
            }
            _ => self.authorize_clinic_side(appt, actor),
        }
    }

    fn authorize_clinic_side(&self, appt: &Appointment, actor: &Actor) -> ClinicResult<()> {
        PractitionerRegistry::new(self.db).authorize_clinic_member(actor, &appt.clinic_id)
    }

    fn appointment(&self, id: &str) -> ClinicResult<Appointment> {
        self.db
            .get_appointment(id)?
            .ok_or_else(|| ClinicError::NotFound(format!("appointment {id}")))
    }

    fn pet(&self, pet_id: &str) -> ClinicResult<Pet> {
        self.db
            .get_pet(pet_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("pet {pet_id}")))
    }
}

fn is_upcoming(appt: &Appointment, now: DateTime<Utc>) -> bool {
    appt.date_time > now && appt.status != AppointmentStatus::Canceled
}

fn slot_conflict(err: DbError) -> ClinicError {
    match err {
        DbError::Constraint(field) => ClinicError::Conflict(field),
        other => ClinicError::Database(other),
    }
}
