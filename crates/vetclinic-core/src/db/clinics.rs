//! Clinic database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Clinic, GeoPoint};

fn clinic_from_row(row: &Row<'_>) -> rusqlite::Result<Clinic> {
    let latitude: Option<f64> = row.get(6)?;
    let longitude: Option<f64> = row.get(7)?;
    Ok(Clinic {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone_number: row.get(3)?,
        operating_hours: row.get(4)?,
        description: row.get(5)?,
        location: match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        },
        primary_vet_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

const CLINIC_COLUMNS: &str = "id, name, address, phone_number, operating_hours, description,
       latitude, longitude, primary_vet_id, created_at, updated_at";

impl Database {
    /// Insert a new clinic.
    pub fn insert_clinic(&self, clinic: &Clinic) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinics (
                id, name, address, phone_number, operating_hours, description,
                latitude, longitude, primary_vet_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                clinic.id,
                clinic.name,
                clinic.address,
                clinic.phone_number,
                clinic.operating_hours,
                clinic.description,
                clinic.location.map(|p| p.latitude),
                clinic.location.map(|p| p.longitude),
                clinic.primary_vet_id,
                clinic.created_at,
                clinic.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update a clinic's mutable fields.
    pub fn update_clinic(&self, clinic: &Clinic) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE clinics SET
                name = ?2,
                address = ?3,
                phone_number = ?4,
                operating_hours = ?5,
                description = ?6,
                latitude = ?7,
                longitude = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                clinic.id,
                clinic.name,
                clinic.address,
                clinic.phone_number,
                clinic.operating_hours,
                clinic.description,
                clinic.location.map(|p| p.latitude),
                clinic.location.map(|p| p.longitude),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a clinic by id.
    pub fn get_clinic(&self, id: &str) -> DbResult<Option<Clinic>> {
        self.conn
            .query_row(
                &format!("SELECT {CLINIC_COLUMNS} FROM clinics WHERE id = ?"),
                [id],
                clinic_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Whether the given vet is the Primary Veterinarian of any clinic.
    pub fn is_primary_vet(&self, vet_id: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM clinics WHERE primary_vet_id = ?",
            [vet_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all clinics, alphabetically.
    pub fn list_clinics(&self) -> DbResult<Vec<Clinic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CLINIC_COLUMNS} FROM clinics ORDER BY name"))?;
        let rows = stmt.query_map([], clinic_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewClinic, NewVeterinarian, Veterinarian};

    fn setup() -> (Database, Veterinarian) {
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
        (db, vet)
    }

    fn make_clinic(primary_vet_id: &str) -> Clinic {
        Clinic::new(
            NewClinic {
                name: "Happy Paws".into(),
                address: "1 Main St".into(),
                phone_number: "555-0100".into(),
                operating_hours: Some("Mon-Fri 8-18".into()),
                description: None,
                location: Some(GeoPoint {
                    latitude: 40.7,
                    longitude: -74.0,
                }),
            },
            primary_vet_id.into(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let (db, vet) = setup();
        let clinic = make_clinic(&vet.id);
        db.insert_clinic(&clinic).unwrap();

        let retrieved = db.get_clinic(&clinic.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Happy Paws");
        assert_eq!(retrieved.primary_vet_id, vet.id);
        assert_eq!(
            retrieved.location,
            Some(GeoPoint {
                latitude: 40.7,
                longitude: -74.0
            })
        );
    }

    #[test]
    fn test_update_clinic() {
        let (db, vet) = setup();
        let mut clinic = make_clinic(&vet.id);
        db.insert_clinic(&clinic).unwrap();

        clinic.description = Some("Small animal practice".into());
        clinic.phone_number = "555-0199".into();
        assert!(db.update_clinic(&clinic).unwrap());

        let retrieved = db.get_clinic(&clinic.id).unwrap().unwrap();
        assert_eq!(retrieved.description.as_deref(), Some("Small animal practice"));
        assert_eq!(retrieved.phone_number, "555-0199");
    }

    #[test]
    fn test_get_missing_clinic() {
        let (db, _) = setup();
        assert!(db.get_clinic("nope").unwrap().is_none());
    }
}
