//! Practitioner Registry: clinic membership and access control.
//!
//! All "primary vet is special" rules live here and nowhere else:
//! primariness is structural (`clinics.primary_vet_id`), the Primary
//! Veterinarian can never be deactivated, and their name, email, and
//! access level are immutable once set.

use serde::{Deserialize, Serialize};

use crate::auth::Actor;
use crate::db::{Database, DbError};
use crate::error::{require_field, ClinicError, ClinicResult};
use crate::models::{
    AccessLevel, Clinic, ClinicPatch, ClinicStaffMember, NewClinic, NewStaffMember,
    NewVeterinarian, StaffAccessLevel, StaffPatch, StaffStatus, Veterinarian, VetPatch,
};

/// Staff data accepted by `add_staff`, discriminated by `staffType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "staffType", rename_all = "snake_case")]
pub enum NewStaff {
    Veterinarian(NewVeterinarian),
    Support(NewStaffMember),
}

/// A staff record of either kind, as returned by `add_staff`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StaffRecord {
    Veterinarian(Veterinarian),
    Support(ClinicStaffMember),
}

/// Clinic membership and staff management service.
pub struct PractitionerRegistry<'a> {
    db: &'a Database,
}

impl<'a> PractitionerRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    // =========================================================================
    // Veterinarian registration & clinics
    // =========================================================================

    /// Register a veterinarian with no clinic membership yet.
    ///
    /// Fails `Conflict("veterinaryId")` on a duplicate license number.
    pub fn register_veterinarian(&self, data: NewVeterinarian) -> ClinicResult<Veterinarian> {
        require_field(&data.first_name, "firstName")?;
        require_field(&data.last_name, "lastName")?;
        require_field(&data.email, "email")?;
        require_field(&data.veterinary_id, "veterinaryId")?;

        let vet = Veterinarian::new(data);
        self.db.insert_veterinarian(&vet).map_err(into_conflict)?;
        tracing::info!(vet_id = %vet.id, "veterinarian registered");
        Ok(vet)
    }

    /// Create a clinic; the creating vet becomes its Primary Veterinarian.
    pub fn create_clinic(&self, data: NewClinic, creating_vet_id: &str) -> ClinicResult<Clinic> {
        require_field(&data.name, "name")?;
        require_field(&data.address, "address")?;
        require_field(&data.phone_number, "phoneNumber")?;

        let mut vet = self.active_vet(creating_vet_id)?;

        let clinic = Clinic::new(data, vet.id.clone());
        self.db.insert_clinic(&clinic)?;
        self.db.add_clinic_membership(&vet.id, &clinic.id)?;

        vet.access_level = AccessLevel::Primary;
        vet.current_active_clinic_id = Some(clinic.id.clone());
        self.db.update_veterinarian(&vet)?;

        tracing::info!(clinic_id = %clinic.id, primary_vet_id = %vet.id, "clinic created");
        Ok(clinic)
    }

    /// Update a clinic's operating metadata.
    ///
    /// Allowed for a vet with FullAccess on the clinic or a staff member
    /// of the clinic with Moderate access.
    pub fn update_clinic(
        &self,
        clinic_id: &str,
        patch: ClinicPatch,
        actor: &Actor,
    ) -> ClinicResult<Clinic> {
        let mut clinic = self.clinic(clinic_id)?;

        match actor {
            Actor::Veterinarian(vet_id) => {
                self.authorize_vet_action(vet_id, clinic_id, AccessLevel::FullAccess)?;
            }
            Actor::Staff(staff_id) => {
                self.authorize_staff_action(staff_id, clinic_id, StaffAccessLevel::Moderate)?;
            }
            Actor::Owner(_) => {
                return Err(ClinicError::Forbidden(
                    "owners cannot manage clinics".to_string(),
                ));
            }
        }

        if let Some(name) = patch.name {
            require_field(&name, "name")?;
            clinic.name = name;
        }
        if let Some(address) = patch.address {
            require_field(&address, "address")?;
            clinic.address = address;
        }
        if let Some(phone_number) = patch.phone_number {
            require_field(&phone_number, "phoneNumber")?;
            clinic.phone_number = phone_number;
        }
        if patch.operating_hours.is_some() {
            clinic.operating_hours = patch.operating_hours;
        }
        if patch.description.is_some() {
            clinic.description = patch.description;
        }
        if patch.location.is_some() {
            clinic.location = patch.location;
        }

        self.db.update_clinic(&clinic)?;
        Ok(clinic)
    }

    /// A vet's clinic context switch. The vet must belong to the clinic.
    pub fn switch_active_clinic(&self, vet_id: &str, clinic_id: &str) -> ClinicResult<Veterinarian> {
        let mut vet = self.active_vet(vet_id)?;
        self.clinic(clinic_id)?;
        if !self.db.vet_belongs_to_clinic(vet_id, clinic_id)? {
            return Err(ClinicError::Forbidden(
                "veterinarian does not belong to this clinic".to_string(),
            ));
        }
        vet.current_active_clinic_id = Some(clinic_id.to_string());
        self.db.update_veterinarian(&vet)?;
        Ok(vet)
    }

    // =========================================================================
    // Staff management
    // =========================================================================

    /// Add a veterinarian or support staff member to a clinic.
    ///
    /// Requires the acting vet to hold Primary or FullAccess on the clinic.
    pub fn add_staff(
        &self,
        clinic_id: &str,
        data: NewStaff,
        acting_vet_id: &str,
    ) -> ClinicResult<StaffRecord> {
        self.clinic(clinic_id)?;
        self.authorize_vet_action(acting_vet_id, clinic_id, AccessLevel::FullAccess)?;

        match data {
            NewStaff::Veterinarian(data) => {
                require_field(&data.first_name, "firstName")?;
                require_field(&data.last_name, "lastName")?;
                require_field(&data.email, "email")?;
                require_field(&data.veterinary_id, "veterinaryId")?;

                let vet = Veterinarian::new(data);
                self.db.insert_veterinarian(&vet).map_err(into_conflict)?;
                self.db.add_clinic_membership(&vet.id, clinic_id)?;
                tracing::info!(clinic_id, vet_id = %vet.id, "veterinarian added to clinic");
                Ok(StaffRecord::Veterinarian(vet))
            }
            NewStaff::Support(data) => {
                require_field(&data.first_name, "firstName")?;
                require_field(&data.last_name, "lastName")?;
                require_field(&data.email, "email")?;

                let staff = ClinicStaffMember::new(data, clinic_id.to_string());
                self.db.insert_staff_member(&staff)?;
                tracing::info!(clinic_id, staff_id = %staff.id, "staff member added to clinic");
                Ok(StaffRecord::Support(staff))
            }
        }
    }

    /// Update a veterinarian's fields.
    ///
    /// A Primary Veterinarian's name, email, and access level are
    /// immutable: a patch touching them fails `Forbidden` outright.
    /// Promotion to `Primary` is never possible through a patch.
    pub fn update_veterinarian(
        &self,
        vet_id: &str,
        patch: VetPatch,
        acting_vet_id: &str,
    ) -> ClinicResult<Veterinarian> {
        let mut vet = self.vet(vet_id)?;
        self.authorize_over_vet(acting_vet_id, &vet)?;

        if self.db.is_primary_vet(&vet.id)? && patch.touches_protected_fields() {
            return Err(ClinicError::Forbidden(
                "a primary veterinarian's name, email, and access level are immutable".to_string(),
            ));
        }
        if patch.access_level == Some(AccessLevel::Primary) {
            return Err(ClinicError::Conflict("accessLevel".to_string()));
        }

        if let Some(first_name) = patch.first_name {
            require_field(&first_name, "firstName")?;
            vet.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            require_field(&last_name, "lastName")?;
            vet.last_name = last_name;
        }
        if let Some(email) = patch.email {
            require_field(&email, "email")?;
            vet.email = email;
        }
        if patch.phone.is_some() {
            vet.phone = patch.phone;
        }
        if patch.specialization.is_some() {
            vet.specialization = patch.specialization;
        }
        if let Some(access_level) = patch.access_level {
            vet.access_level = access_level;
        }

        self.db.update_veterinarian(&vet)?;
        Ok(vet)
    }

    /// Update a support staff member's fields.
    pub fn update_staff_member(
        &self,
        staff_id: &str,
        patch: StaffPatch,
        acting_vet_id: &str,
    ) -> ClinicResult<ClinicStaffMember> {
        let mut staff = self.staff(staff_id)?;
        self.authorize_vet_action(acting_vet_id, &staff.clinic_id, AccessLevel::FullAccess)?;

        if let Some(first_name) = patch.first_name {
            require_field(&first_name, "firstName")?;
            staff.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            require_field(&last_name, "lastName")?;
            staff.last_name = last_name;
        }
        if let Some(email) = patch.email {
            require_field(&email, "email")?;
            staff.email = email;
        }
        if patch.phone.is_some() {
            staff.phone = patch.phone;
        }
        if let Some(role) = patch.role {
            staff.role = role;
        }
        if let Some(access_level) = patch.access_level {
            staff.access_level = access_level;
        }

        self.db.update_staff_member(&staff)?;
        Ok(staff)
    }

    /// Deactivate a veterinarian. Always fails `Forbidden` for a Primary
    /// Veterinarian; this invariant has no exceptions.
    pub fn deactivate_veterinarian(
        &self,
        vet_id: &str,
        acting_vet_id: &str,
    ) -> ClinicResult<Veterinarian> {
        let mut vet = self.vet(vet_id)?;
        self.authorize_over_vet(acting_vet_id, &vet)?;

        if self.db.is_primary_vet(&vet.id)? {
            return Err(ClinicError::Forbidden(
                "the primary veterinarian cannot be deactivated".to_string(),
            ));
        }

        vet.status = StaffStatus::Inactive;
        self.db.update_veterinarian(&vet)?;
        tracing::info!(vet_id = %vet.id, "veterinarian deactivated");
        Ok(vet)
    }

    /// Reactivate a veterinarian.
    pub fn activate_veterinarian(
        &self,
        vet_id: &str,
        acting_vet_id: &str,
    ) -> ClinicResult<Veterinarian> {
        let mut vet = self.vet(vet_id)?;
        self.authorize_over_vet(acting_vet_id, &vet)?;
        vet.status = StaffStatus::Active;
        self.db.update_veterinarian(&vet)?;
        Ok(vet)
    }

    /// Deactivate a support staff member.
    pub fn deactivate_staff_member(
        &self,
        staff_id: &str,
        acting_vet_id: &str,
    ) -> ClinicResult<ClinicStaffMember> {
        self.set_staff_status(staff_id, acting_vet_id, StaffStatus::Inactive)
    }

    /// Reactivate a support staff member.
    pub fn activate_staff_member(
        &self,
        staff_id: &str,
        acting_vet_id: &str,
    ) -> ClinicResult<ClinicStaffMember> {
        self.set_staff_status(staff_id, acting_vet_id, StaffStatus::Active)
    }

    fn set_staff_status(
        &self,
        staff_id: &str,
        acting_vet_id: &str,
        status: StaffStatus,
    ) -> ClinicResult<ClinicStaffMember> {
        let mut staff = self.staff(staff_id)?;
        self.authorize_vet_action(acting_vet_id, &staff.clinic_id, AccessLevel::FullAccess)?;
        staff.status = status;
        self.db.update_staff_member(&staff)?;
        Ok(staff)
    }

    // =========================================================================
    // Authorization helpers
    // =========================================================================

    /// Verify the acting vet is active, belongs to the clinic, and holds
    /// at least `required` access there. The clinic's Primary Veterinarian
    /// counts as `Primary` regardless of the stored access level.
    pub fn authorize_vet_action(
        &self,
        acting_vet_id: &str,
        clinic_id: &str,
        required: AccessLevel,
    ) -> ClinicResult<Veterinarian> {
        let vet = self.active_vet(acting_vet_id)?;
        if !self.db.vet_belongs_to_clinic(&vet.id, clinic_id)? {
            return Err(ClinicError::Forbidden(
                "veterinarian does not belong to this clinic".to_string(),
            ));
        }

        let clinic = self.clinic(clinic_id)?;
        let effective = if clinic.primary_vet_id == vet.id {
            AccessLevel::Primary
        } else {
            vet.access_level
        };
        if !effective.meets(required) {
            return Err(ClinicError::Forbidden(format!(
                "requires {} access",
                required.as_str()
            )));
        }
        Ok(vet)
    }

    /// Verify an active staff member holds at least `required` access at
    /// the given clinic.
    pub fn authorize_staff_action(
        &self,
        staff_id: &str,
        clinic_id: &str,
        required: StaffAccessLevel,
    ) -> ClinicResult<ClinicStaffMember> {
        let staff = self.staff(staff_id)?;
        if staff.status != StaffStatus::Active {
            return Err(ClinicError::Forbidden(
                "staff member is inactive".to_string(),
            ));
        }
        if staff.clinic_id != clinic_id {
            return Err(ClinicError::Forbidden(
                "staff member does not belong to this clinic".to_string(),
            ));
        }
        if !staff.access_level.meets(required) {
            return Err(ClinicError::Forbidden(format!(
                "requires {} access",
                required.as_str()
            )));
        }
        Ok(staff)
    }

    /// Verify the actor is an active vet or staff member of the clinic.
    /// The weakest clinic-side check, used for pet approval.
    pub fn authorize_clinic_member(&self, actor: &Actor, clinic_id: &str) -> ClinicResult<()> {
        match actor {
            Actor::Veterinarian(vet_id) => {
                let vet = self.active_vet(vet_id)?;
                if !self.db.vet_belongs_to_clinic(&vet.id, clinic_id)? {
                    return Err(ClinicError::Forbidden(
                        "veterinarian does not belong to this clinic".to_string(),
                    ));
                }
                Ok(())
            }
            Actor::Staff(staff_id) => {
                self.authorize_staff_action(staff_id, clinic_id, StaffAccessLevel::Basic)?;
                Ok(())
            }
            Actor::Owner(_) => Err(ClinicError::Forbidden(
                "this action requires clinic staff".to_string(),
            )),
        }
    }

    /// Authorize managing the target vet: acting on a shared clinic with
    /// FullAccess, or acting on oneself.
    fn authorize_over_vet(&self, acting_vet_id: &str, target: &Veterinarian) -> ClinicResult<()> {
        if acting_vet_id == target.id {
            self.active_vet(acting_vet_id)?;
            return Ok(());
        }

        let acting = self.active_vet(acting_vet_id)?;
        let mut shared = false;
        for clinic in self.db.list_clinics()? {
            if self.db.vet_belongs_to_clinic(&target.id, &clinic.id)?
                && self.db.vet_belongs_to_clinic(&acting.id, &clinic.id)?
            {
                shared = true;
                if self
                    .authorize_vet_action(acting_vet_id, &clinic.id, AccessLevel::FullAccess)
                    .is_ok()
                {
                    return Ok(());
                }
            }
        }
        if shared {
            Err(ClinicError::Forbidden("requires full_access access".to_string()))
        } else {
            Err(ClinicError::Forbidden(
                "no shared clinic with the target veterinarian".to_string(),
            ))
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn get_clinic(&self, clinic_id: &str) -> ClinicResult<Clinic> {
        self.clinic(clinic_id)
    }

    pub fn list_clinics(&self) -> ClinicResult<Vec<Clinic>> {
        Ok(self.db.list_clinics()?)
    }

    pub fn list_clinic_veterinarians(&self, clinic_id: &str) -> ClinicResult<Vec<Veterinarian>> {
        self.clinic(clinic_id)?;
        Ok(self.db.list_clinic_veterinarians(clinic_id)?)
    }

    pub fn list_clinic_staff(&self, clinic_id: &str) -> ClinicResult<Vec<ClinicStaffMember>> {
        self.clinic(clinic_id)?;
        Ok(self.db.list_clinic_staff(clinic_id)?)
    }

    fn clinic(&self, clinic_id: &str) -> ClinicResult<Clinic> {
        self.db
            .get_clinic(clinic_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("clinic {clinic_id}")))
    }

    fn vet(&self, vet_id: &str) -> ClinicResult<Veterinarian> {
        self.db
            .get_veterinarian(vet_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("veterinarian {vet_id}")))
    }

    fn staff(&self, staff_id: &str) -> ClinicResult<ClinicStaffMember> {
        self.db
            .get_staff_member(staff_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("staff member {staff_id}")))
    }

    fn active_vet(&self, vet_id: &str) -> ClinicResult<Veterinarian> {
        let vet = self.vet(vet_id)?;
        if vet.status != StaffStatus::Active {
            return Err(ClinicError::Forbidden(
                "veterinarian is inactive".to_string(),
            ));
        }
        Ok(vet)
    }
}

fn into_conflict(err: DbError) -> ClinicError {
    match err {
        DbError::Constraint(field) => ClinicError::Conflict(field),
        other => ClinicError::Database(other),
    }
}
