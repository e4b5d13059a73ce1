//! Veterinarian, membership, and support-staff database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{map_unique_violation, Database, DbError, DbResult};
use crate::models::{
    AccessLevel, ClinicStaffMember, StaffAccessLevel, StaffRole, StaffStatus, Veterinarian,
};

const VET_COLUMNS: &str = "id, first_name, last_name, email, phone, veterinary_id,
       specialization, access_level, status, current_active_clinic_id,
       created_at, updated_at";

const STAFF_COLUMNS: &str = "id, first_name, last_name, email, phone, role,
       access_level, status, clinic_id, created_at, updated_at";

/// Intermediate row struct for database mapping.
struct VetRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    veterinary_id: String,
    specialization: Option<String>,
    access_level: String,
    status: String,
    current_active_clinic_id: Option<String>,
    created_at: String,
    updated_at: String,
}

fn vet_row(row: &Row<'_>) -> rusqlite::Result<VetRow> {
    Ok(VetRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        veterinary_id: row.get(5)?,
        specialization: row.get(6)?,
        access_level: row.get(7)?,
        status: row.get(8)?,
        current_active_clinic_id: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

impl TryFrom<VetRow> for Veterinarian {
    type Error = DbError;

    fn try_from(row: VetRow) -> Result<Self, Self::Error> {
        let access_level = AccessLevel::parse(&row.access_level)
            .ok_or_else(|| DbError::Constraint(format!("Unknown access level: {}", row.access_level)))?;
        let status = StaffStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown status: {}", row.status)))?;

        Ok(Veterinarian {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            veterinary_id: row.veterinary_id,
            specialization: row.specialization,
            access_level,
            status,
            current_active_clinic_id: row.current_active_clinic_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Intermediate row struct for database mapping.
struct StaffRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    role: String,
    access_level: String,
    status: String,
    clinic_id: String,
    created_at: String,
    updated_at: String,
}

fn staff_row(row: &Row<'_>) -> rusqlite::Result<StaffRow> {
    Ok(StaffRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        role: row.get(5)?,
        access_level: row.get(6)?,
        status: row.get(7)?,
        clinic_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<StaffRow> for ClinicStaffMember {
    type Error = DbError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role = StaffRole::parse(&row.role)
            .ok_or_else(|| DbError::Constraint(format!("Unknown staff role: {}", row.role)))?;
        let access_level = StaffAccessLevel::parse(&row.access_level)
            .ok_or_else(|| DbError::Constraint(format!("Unknown access level: {}", row.access_level)))?;
        let status = StaffStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown status: {}", row.status)))?;

        Ok(ClinicStaffMember {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            role,
            access_level,
            status,
            clinic_id: row.clinic_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Database {
    // =========================================================================
    // Veterinarians
    // =========================================================================

    /// Insert a new veterinarian. Fails `Constraint("veterinaryId")` on a
    /// duplicate license number.
    pub fn insert_veterinarian(&self, vet: &Veterinarian) -> DbResult<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO veterinarians (
                    id, first_name, last_name, email, phone, veterinary_id,
                    specialization, access_level, status, current_active_clinic_id,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    vet.id,
                    vet.first_name,
                    vet.last_name,
                    vet.email,
                    vet.phone,
                    vet.veterinary_id,
                    vet.specialization,
                    vet.access_level.as_str(),
                    vet.status.as_str(),
                    vet.current_active_clinic_id,
                    vet.created_at,
                    vet.updated_at,
                ],
            )
            .map_err(|e| map_unique_violation(e, "veterinaryId"))?;
        Ok(())
    }

    /// Update an existing veterinarian.
    pub fn update_veterinarian(&self, vet: &Veterinarian) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE veterinarians SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                phone = ?5,
                specialization = ?6,
                access_level = ?7,
                status = ?8,
                current_active_clinic_id = ?9,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                vet.id,
                vet.first_name,
                vet.last_name,
                vet.email,
                vet.phone,
                vet.specialization,
                vet.access_level.as_str(),
                vet.status.as_str(),
                vet.current_active_clinic_id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a veterinarian by id.
    pub fn get_veterinarian(&self, id: &str) -> DbResult<Option<Veterinarian>> {
        self.conn
            .query_row(
                &format!("SELECT {VET_COLUMNS} FROM veterinarians WHERE id = ?"),
                [id],
                vet_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a veterinarian by license number.
    pub fn get_veterinarian_by_license(&self, veterinary_id: &str) -> DbResult<Option<Veterinarian>> {
        self.conn
            .query_row(
                &format!("SELECT {VET_COLUMNS} FROM veterinarians WHERE veterinary_id = ?"),
                [veterinary_id],
                vet_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    // =========================================================================
    // Clinic memberships
    // =========================================================================

    /// Record that a vet belongs to a clinic. Idempotent.
    pub fn add_clinic_membership(&self, vet_id: &str, clinic_id: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO clinic_memberships (vet_id, clinic_id) VALUES (?1, ?2)",
            params![vet_id, clinic_id],
        )?;
        Ok(())
    }

    /// Whether a vet's clinic membership includes the given clinic.
    pub fn vet_belongs_to_clinic(&self, vet_id: &str, clinic_id: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM clinic_memberships WHERE vet_id = ?1 AND clinic_id = ?2",
            params![vet_id, clinic_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List the clinic ids a vet belongs to.
    pub fn list_vet_clinic_ids(&self, vet_id: &str) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT clinic_id FROM clinic_memberships WHERE vet_id = ? ORDER BY joined_at",
        )?;
        let rows = stmt.query_map([vet_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List the veterinarians belonging to a clinic, alphabetically.
    pub fn list_clinic_veterinarians(&self, clinic_id: &str) -> DbResult<Vec<Veterinarian>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {VET_COLUMNS}
            FROM veterinarians v
            JOIN clinic_memberships m ON m.vet_id = v.id
            WHERE m.clinic_id = ?
            ORDER BY v.last_name, v.first_name
            "#
        ))?;

        let rows = stmt.query_map([clinic_id], vet_row)?;
        let mut vets = Vec::new();
        for row in rows {
            vets.push(row?.try_into()?);
        }
        Ok(vets)
    }

    // =========================================================================
    // Support staff
    // =========================================================================

    /// Insert a new support staff member.
    pub fn insert_staff_member(&self, staff: &ClinicStaffMember) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinic_staff (
                id, first_name, last_name, email, phone, role,
                access_level, status, clinic_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                staff.id,
                staff.first_name,
                staff.last_name,
                staff.email,
                staff.phone,
                staff.role.as_str(),
                staff.access_level.as_str(),
                staff.status.as_str(),
                staff.clinic_id,
                staff.created_at,
                staff.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing support staff member.
    pub fn update_staff_member(&self, staff: &ClinicStaffMember) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE clinic_staff SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                phone = ?5,
                role = ?6,
                access_level = ?7,
                status = ?8,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                staff.id,
                staff.first_name,
                staff.last_name,
                staff.email,
                staff.phone,
                staff.role.as_str(),
                staff.access_level.as_str(),
                staff.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a support staff member by id.
    pub fn get_staff_member(&self, id: &str) -> DbResult<Option<ClinicStaffMember>> {
        self.conn
            .query_row(
                &format!("SELECT {STAFF_COLUMNS} FROM clinic_staff WHERE id = ?"),
                [id],
                staff_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List the support staff of a clinic, alphabetically.
    pub fn list_clinic_staff(&self, clinic_id: &str) -> DbResult<Vec<ClinicStaffMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM clinic_staff WHERE clinic_id = ? ORDER BY last_name, first_name"
        ))?;

        let rows = stmt.query_map([clinic_id], staff_row)?;
        let mut staff = Vec::new();
        for row in rows {
            staff.push(row?.try_into()?);
        }
        Ok(staff)
    }
}
