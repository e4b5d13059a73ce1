//! Fire-and-forget notification seam.
//!
//! The notification relay (chat/appointment pushes) is an external
//! collaborator. Services emit events after a mutation commits; delivery
//! failures are logged and never roll back or mask the primary result.

use crate::models::{Appointment, Pet};

/// An event worth telling the relay about.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    PetApproved { pet_id: String, owner_id: String },
    PetRejected { pet_id: String, owner_id: String },
    AppointmentBooked { appointment_id: String, vet_id: String },
    AppointmentCanceled { appointment_id: String, vet_id: String },
    AppointmentConfirmed { appointment_id: String },
    AppointmentRescheduled { appointment_id: String, vet_id: String },
}

impl NotificationEvent {
    pub fn pet_approved(pet: &Pet) -> Self {
        NotificationEvent::PetApproved {
            pet_id: pet.id.clone(),
            owner_id: pet.owner_id.clone(),
        }
    }

    pub fn pet_rejected(pet: &Pet) -> Self {
        NotificationEvent::PetRejected {
            pet_id: pet.id.clone(),
            owner_id: pet.owner_id.clone(),
        }
    }

    pub fn booked(appt: &Appointment) -> Self {
        NotificationEvent::AppointmentBooked {
            appointment_id: appt.id.clone(),
            vet_id: appt.vet_id.clone(),
        }
    }

    pub fn canceled(appt: &Appointment) -> Self {
        NotificationEvent::AppointmentCanceled {
            appointment_id: appt.id.clone(),
            vet_id: appt.vet_id.clone(),
        }
    }

    pub fn confirmed(appt: &Appointment) -> Self {
        NotificationEvent::AppointmentConfirmed {
            appointment_id: appt.id.clone(),
        }
    }

    pub fn rescheduled(appt: &Appointment) -> Self {
        NotificationEvent::AppointmentRescheduled {
            appointment_id: appt.id.clone(),
            vet_id: appt.vet_id.clone(),
        }
    }
}

/// Delivery sink for notification events.
pub trait NotificationSink {
    fn deliver(&self, event: &NotificationEvent) -> Result<(), String>;
}

/// Deliver an event to an optional sink, logging (never surfacing) failures.
pub(crate) fn emit(sink: Option<&dyn NotificationSink>, event: NotificationEvent) {
    if let Some(sink) = sink {
        if let Err(reason) = sink.deliver(&event) {
            tracing::warn!(?event, reason, "notification delivery failed");
        }
    }
}
