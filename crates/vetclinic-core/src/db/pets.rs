//! Pet database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Pet, RegistrationStatus};

const PET_COLUMNS: &str = "id, owner_id, name, species, breed, weight_kg, date_of_birth,
       registered_clinic_id, registration_status, rejection_reason,
       created_at, updated_at";

/// Intermediate row struct for database mapping.
struct PetRow {
    id: String,
    owner_id: String,
    name: String,
    species: String,
    breed: Option<String>,
    weight_kg: Option<f64>,
    date_of_birth: Option<String>,
    registered_clinic_id: String,
    registration_status: String,
    rejection_reason: Option<String>,
    created_at: String,
    updated_at: String,
}

fn pet_row(row: &Row<'_>) -> rusqlite::Result<PetRow> {
    Ok(PetRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        species: row.get(3)?,
        breed: row.get(4)?,
        weight_kg: row.get(5)?,
        date_of_birth: row.get(6)?,
        registered_clinic_id: row.get(7)?,
        registration_status: row.get(8)?,
        rejection_reason: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

impl TryFrom<PetRow> for Pet {
    type Error = DbError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let registration_status = RegistrationStatus::parse(&row.registration_status)
            .ok_or_else(|| {
                DbError::Constraint(format!(
                    "Unknown registration status: {}",
                    row.registration_status
                ))
            })?;

        Ok(Pet {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            weight_kg: row.weight_kg,
            date_of_birth: row.date_of_birth,
            registered_clinic_id: row.registered_clinic_id,
            registration_status,
            rejection_reason: row.rejection_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Database {
    /// Insert a new pet.
    pub fn insert_pet(&self, pet: &Pet) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO pets (
                id, owner_id, name, species, breed, weight_kg, date_of_birth,
                registered_clinic_id, registration_status, rejection_reason,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                pet.id,
                pet.owner_id,
                pet.name,
                pet.species,
                pet.breed,
                pet.weight_kg,
                pet.date_of_birth,
                pet.registered_clinic_id,
                pet.registration_status.as_str(),
                pet.rejection_reason,
                pet.created_at,
                pet.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing pet.
    pub fn update_pet(&self, pet: &Pet) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE pets SET
                name = ?2,
                species = ?3,
                breed = ?4,
                weight_kg = ?5,
                date_of_birth = ?6,
                registration_status = ?7,
                rejection_reason = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                pet.id,
                pet.name,
                pet.species,
                pet.breed,
                pet.weight_kg,
                pet.date_of_birth,
                pet.registration_status.as_str(),
                pet.rejection_reason,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a pet by id.
    pub fn get_pet(&self, id: &str) -> DbResult<Option<Pet>> {
        self.conn
            .query_row(
                &format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?"),
                [id],
                pet_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a clinic's pending registrations, newest first.
    pub fn list_pending_pets(&self, clinic_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PET_COLUMNS}
            FROM pets
            WHERE registered_clinic_id = ? AND registration_status = 'pending'
            ORDER BY created_at DESC, id
            "#
        ))?;

        let rows = stmt.query_map([clinic_id], pet_row)?;
        let mut pets = Vec::new();
        for row in rows {
            pets.push(row?.try_into()?);
        }
        Ok(pets)
    }

    /// List all pets belonging to an owner, newest first.
    pub fn list_pets_for_owner(&self, owner_id: &str) -> DbResult<Vec<Pet>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE owner_id = ? ORDER BY created_at DESC, id"
        ))?;

        let rows = stmt.query_map([owner_id], pet_row)?;
        let mut pets = Vec::new();
        for row in rows {
            pets.push(row?.try_into()?);
        }
        Ok(pets)
    }

    /// Delete a pet.
    pub fn delete_pet(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM pets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
