//! Appointment database operations.
//!
//! The `idx_appointments_slot` partial unique index makes insert and
//! update the atomic check-and-set for slot conflicts; callers see a
//! `Constraint("dateTime")` when a non-terminal appointment already
//! holds the vet's slot.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{map_unique_violation, Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus};

const APPOINTMENT_COLUMNS: &str = "id, pet_id, clinic_id, vet_id, date_time, reason, notes,
       status, cancellation_reason, created_at, updated_at";

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    pet_id: String,
    clinic_id: String,
    vet_id: String,
    date_time: String,
    reason: String,
    notes: Option<String>,
    status: String,
    cancellation_reason: Option<String>,
    created_at: String,
    updated_at: String,
}

fn appointment_row(row: &Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        clinic_id: row.get(2)?,
        vet_id: row.get(3)?,
        date_time: row.get(4)?,
        reason: row.get(5)?,
        notes: row.get(6)?,
        status: row.get(7)?,
        cancellation_reason: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            DbError::Constraint(format!("Unknown appointment status: {}", row.status))
        })?;
        let date_time: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.date_time)
            .map_err(|e| DbError::Constraint(format!("Bad stored dateTime: {}", e)))?
            .with_timezone(&Utc);

        Ok(Appointment {
            id: row.id,
            pet_id: row.pet_id,
            clinic_id: row.clinic_id,
            vet_id: row.vet_id,
            date_time,
            reason: row.reason,
            notes: row.notes,
            status,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Database {
    /// Insert a new appointment. Fails `Constraint("dateTime")` when the
    /// vet's slot is already held by a non-terminal appointment.
    pub fn insert_appointment(&self, appt: &Appointment) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO appointments (
                    id, pet_id, clinic_id, vet_id, date_time, reason, notes,
                    status, cancellation_reason, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    appt.id,
                    appt.pet_id,
                    appt.clinic_id,
                    appt.vet_id,
                    appt.slot_key(),
                    appt.reason,
                    appt.notes,
                    appt.status.as_str(),
                    appt.cancellation_reason,
                    appt.created_at,
                    appt.updated_at,
                ],
            )
            .map_err(|e| map_unique_violation(e, "dateTime"))?;
        Ok(())
    }

    /// Update an existing appointment. A reschedule into an occupied slot
    /// fails `Constraint("dateTime")` the same way insert does.
    pub fn update_appointment(&self, appt: &Appointment) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                r#"
                UPDATE appointments SET
                    date_time = ?2,
                    reason = ?3,
                    notes = ?4,
                    status = ?5,
                    cancellation_reason = ?6,
                    updated_at = datetime('now')
                WHERE id = ?1
                "#,
                params![
                    appt.id,
                    appt.slot_key(),
                    appt.reason,
                    appt.notes,
                    appt.status.as_str(),
                    appt.cancellation_reason,
                ],
            )
            .map_err(|e| map_unique_violation(e, "dateTime"))?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"),
                [id],
                appointment_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all appointments for a pet, chronologically.
    pub fn list_appointments_for_pet(&self, pet_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE pet_id = ? ORDER BY date_time, id"
        ))?;
        let rows = stmt.query_map([pet_id], appointment_row)?;
        collect_appointments(rows)
    }

    /// List all appointments for an owner's pets, chronologically.
    pub fn list_appointments_for_owner(&self, owner_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments a
            WHERE a.pet_id IN (SELECT id FROM pets WHERE owner_id = ?)
            ORDER BY a.date_time, a.id
            "#
        ))?;
        let rows = stmt.query_map([owner_id], appointment_row)?;
        collect_appointments(rows)
    }

    /// List a veterinarian's appointments, chronologically.
    pub fn list_appointments_for_vet(&self, vet_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE vet_id = ? ORDER BY date_time, id"
        ))?;
        let rows = stmt.query_map([vet_id], appointment_row)?;
        collect_appointments(rows)
    }
}

fn collect_appointments(
    rows: impl Iterator<Item = rusqlite::Result<AppointmentRow>>,
) -> DbResult<Vec<Appointment>> {
    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row?.try_into()?);
    }
    Ok(appointments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clinic, NewClinic, NewPet, NewVeterinarian, Pet, Veterinarian};
    use chrono::TimeZone;

    struct Fixture {
        db: Database,
        clinic: Clinic,
        vet: Veterinarian,
        pet: Pet,
    }

    fn setup() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let vet = Veterinarian::new(NewVeterinarian {
            first_name: "Ada".into(),
            last_name: "Wong".into(),
            email: "ada@example.com".into(),
            phone: None,
            veterinary_id: "VET-1001".into(),
            specialization: None,
        });
        db.insert_veterinarian(&vet).unwrap();
        let clinic = Clinic::new(
            NewClinic {
                name: "Happy Paws".into(),
                address: "1 Main St".into(),
                phone_number: "555-0100".into(),
                operating_hours: None,
                description: None,
                location: None,
            },
            vet.id.clone(),
        );
        db.insert_clinic(&clinic).unwrap();
        let mut pet = Pet::new(
            NewPet {
                name: "Max".into(),
                species: "canine".into(),
                breed: None,
                weight_kg: None,
                date_of_birth: None,
                clinic_id: clinic.id.clone(),
            },
            "owner-1".into(),
        );
        pet.approve().unwrap();
        db.insert_pet(&pet).unwrap();
        Fixture { db, clinic, vet, pet }
    }

    fn slot(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn make_appointment(f: &Fixture, hour: u32) -> Appointment {
        Appointment::new(
            f.pet.id.clone(),
            f.clinic.id.clone(),
            f.vet.id.clone(),
            slot(hour),
            "annual checkup".into(),
            None,
        )
    }

    #[test]
    fn test_insert_and_get() {
        let f = setup();
        let appt = make_appointment(&f, 10);
        f.db.insert_appointment(&appt).unwrap();

        let retrieved = f.db.get_appointment(&appt.id).unwrap().unwrap();
        assert_eq!(retrieved.date_time, slot(10));
        assert_eq!(retrieved.status, AppointmentStatus::Booked);
    }

    #[test]
    fn test_double_booking_is_constraint() {
        let f = setup();
        f.db.insert_appointment(&make_appointment(&f, 10)).unwrap();

        let err = f.db.insert_appointment(&make_appointment(&f, 10)).unwrap_err();
        assert!(matches!(err, DbError::Constraint(field) if field == "dateTime"));
    }

    #[test]
    fn test_fk_failure_is_not_a_slot_conflict() {
        let f = setup();
        let mut appt = make_appointment(&f, 10);
        appt.vet_id = "ghost".into();

        // Unknown vet trips the FK, not the slot index
        let err = f.db.insert_appointment(&appt).unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn test_canceled_slot_reopens() {
        let f = setup();
        let mut appt = make_appointment(&f, 10);
        f.db.insert_appointment(&appt).unwrap();

        appt.cancel("owner unavailable").unwrap();
        f.db.update_appointment(&appt).unwrap();

        // Slot is free again once the holder is terminal
        f.db.insert_appointment(&make_appointment(&f, 10)).unwrap();
    }

    #[test]
    fn test_reschedule_into_held_slot_is_constraint() {
        let f = setup();
        f.db.insert_appointment(&make_appointment(&f, 10)).unwrap();
        let mut second = make_appointment(&f, 11);
        f.db.insert_appointment(&second).unwrap();

        second.reschedule(slot(10)).unwrap();
        let err = f.db.update_appointment(&second).unwrap_err();
        assert!(matches!(err, DbError::Constraint(field) if field == "dateTime"));
    }

    #[test]
    fn test_listings_chronological() {
        let f = setup();
        let late = make_appointment(&f, 15);
        let early = make_appointment(&f, 9);
        f.db.insert_appointment(&late).unwrap();
        f.db.insert_appointment(&early).unwrap();

        let for_pet = f.db.list_appointments_for_pet(&f.pet.id).unwrap();
        assert_eq!(for_pet.len(), 2);
        assert_eq!(for_pet[0].id, early.id);

        let for_owner = f.db.list_appointments_for_owner("owner-1").unwrap();
        assert_eq!(for_owner.len(), 2);

        let for_vet = f.db.list_appointments_for_vet(&f.vet.id).unwrap();
        assert_eq!(for_vet.len(), 2);
    }
}
