//! Appointment model and booking state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now_rfc3339};
use crate::error::{ClinicError, ClinicResult};

/// The five-state lifecycle of a booked visit.
///
/// `Canceled` and `Completed` are terminal; history is retained, never
/// hard-deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Confirmed,
    Canceled,
    Completed,
    Rescheduled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booked" => Some(AppointmentStatus::Booked),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "canceled" => Some(AppointmentStatus::Canceled),
            "completed" => Some(AppointmentStatus::Completed),
            "rescheduled" => Some(AppointmentStatus::Rescheduled),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions and do not count
    /// toward slot conflicts.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Canceled | AppointmentStatus::Completed)
    }
}

/// A booked visit for a pet with a veterinarian at a clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub pet_id: String,
    pub clinic_id: String,
    pub vet_id: String,
    pub date_time: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    /// Set when the appointment is canceled.
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    /// Create a new appointment in `Booked` status.
    pub fn new(
        pet_id: String,
        clinic_id: String,
        vet_id: String,
        date_time: DateTime<Utc>,
        reason: String,
        notes: Option<String>,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            pet_id,
            clinic_id,
            vet_id,
            date_time,
            reason,
            notes,
            status: AppointmentStatus::Booked,
            cancellation_reason: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The canonical slot text for this appointment.
    ///
    /// Slots are exact points, not intervals: two appointments conflict
    /// iff their vet matches and their canonicalized instants are equal.
    /// The observed client contracts carry no duration field, so no
    /// interval semantics are assumed.
    pub fn slot_key(&self) -> String {
        self.date_time.to_rfc3339()
    }

    /// `Booked`/`Rescheduled` -> `Confirmed` (clinic action).
    pub fn confirm(&mut self) -> ClinicResult<()> {
        match self.status {
            AppointmentStatus::Booked | AppointmentStatus::Rescheduled => {
                self.status = AppointmentStatus::Confirmed;
                self.touch();
                Ok(())
            }
            _ => Err(self.bad_transition("confirm")),
        }
    }

    /// Any non-terminal status -> `Canceled`. A non-empty reason is mandatory.
    pub fn cancel(&mut self, reason: &str) -> ClinicResult<()> {
        if reason.trim().is_empty() {
            return Err(ClinicError::missing("reason"));
        }
        if self.status.is_terminal() {
            return Err(self.bad_transition("cancel"));
        }
        self.status = AppointmentStatus::Canceled;
        self.cancellation_reason = Some(reason.to_string());
        self.touch();
        Ok(())
    }

    /// `Confirmed` -> `Completed`, only at or after the appointment time.
    pub fn complete(&mut self, now: DateTime<Utc>) -> ClinicResult<()> {
        if self.status != AppointmentStatus::Confirmed {
            return Err(self.bad_transition("complete"));
        }
        if self.date_time > now {
            return Err(ClinicError::InvalidState(
                "appointment is in the future and cannot be completed".to_string(),
            ));
        }
        self.status = AppointmentStatus::Completed;
        self.touch();
        Ok(())
    }

    /// `Booked`/`Confirmed` -> `Rescheduled` with a new time.
    ///
    /// The slot-conflict check against the new time is the scheduler's
    /// responsibility; this only enforces the transition.
    pub fn reschedule(&mut self, new_date_time: DateTime<Utc>) -> ClinicResult<()> {
        match self.status {
            AppointmentStatus::Booked | AppointmentStatus::Confirmed => {
                self.date_time = new_date_time;
                self.status = AppointmentStatus::Rescheduled;
                self.touch();
                Ok(())
            }
            _ => Err(self.bad_transition("reschedule")),
        }
    }

    fn bad_transition(&self, action: &str) -> ClinicError {
        ClinicError::InvalidState(format!(
            "cannot {} an appointment in status {}",
            action,
            self.status.as_str()
        ))
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

/// Filter for owner-side appointment listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentFilter {
    All,
    /// `dateTime > now` and not canceled.
    Upcoming,
    /// `dateTime <= now`.
    Past,
    ByStatus(AppointmentStatus),
}

/// Per-owner appointment counts returned alongside listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total: u32,
    pub upcoming: u32,
    pub completed: u32,
    pub canceled: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_appointment(offset_hours: i64) -> Appointment {
        Appointment::new(
            "pet-1".into(),
            "clinic-1".into(),
            "vet-1".into(),
            Utc::now() + Duration::hours(offset_hours),
            "annual checkup".into(),
            None,
        )
    }

    #[test]
    fn test_new_appointment_is_booked() {
        let appt = make_appointment(24);
        assert_eq!(appt.status, AppointmentStatus::Booked);
        assert!(appt.cancellation_reason.is_none());
    }

    #[test]
    fn test_confirm_then_complete() {
        let mut appt = make_appointment(-1);
        appt.confirm().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        appt.complete(Utc::now()).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Completed);
    }

    #[test]
    fn test_complete_future_fails() {
        let mut appt = make_appointment(24);
        appt.confirm().unwrap();
        let err = appt.complete(Utc::now()).unwrap_err();
        assert_eq!(err.kind(), "INVALID_STATE");
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn test_complete_requires_confirmed() {
        let mut appt = make_appointment(-1);
        assert!(appt.complete(Utc::now()).is_err());
    }

    #[test]
    fn test_cancel_requires_reason() {
        let mut appt = make_appointment(24);
        let err = appt.cancel("  ").unwrap_err();
        assert_eq!(err.kind(), "VALIDATION");
        assert_eq!(appt.status, AppointmentStatus::Booked);

        appt.cancel("owner unavailable").unwrap();
        assert_eq!(appt.status, AppointmentStatus::Canceled);
        assert_eq!(appt.cancellation_reason.as_deref(), Some("owner unavailable"));
    }

    #[test]
    fn test_cancel_terminal_fails() {
        let mut appt = make_appointment(-1);
        appt.confirm().unwrap();
        appt.complete(Utc::now()).unwrap();
        let err = appt.cancel("too late").unwrap_err();
        assert_eq!(err.kind(), "INVALID_STATE");
    }

    #[test]
    fn test_reschedule_then_confirm() {
        let mut appt = make_appointment(24);
        let new_time = Utc::now() + Duration::hours(48);
        appt.reschedule(new_time).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Rescheduled);
        assert_eq!(appt.date_time, new_time);

        // Rescheduled behaves like Booked
        appt.confirm().unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn test_reschedule_from_rescheduled_fails() {
        let mut appt = make_appointment(24);
        appt.reschedule(Utc::now() + Duration::hours(48)).unwrap();
        assert!(appt.reschedule(Utc::now() + Duration::hours(72)).is_err());
    }
}
