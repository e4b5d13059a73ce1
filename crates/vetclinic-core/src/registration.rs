//! Pet Registration Workflow.
//!
//! Owners submit pets against a clinic; clinic staff approve or reject
//! exactly once. `Pending -> {Approved, Rejected}` with no way back.

use crate::auth::Actor;
use crate::db::Database;
use crate::error::{require_field, ClinicError, ClinicResult};
use crate::models::{NewPet, Pet, PetPatch, RegistrationStatus};
use crate::notify::{emit, NotificationEvent, NotificationSink};
use crate::registry::PractitionerRegistry;

/// Pet registration service.
pub struct PetRegistration<'a> {
    db: &'a Database,
    sink: Option<&'a dyn NotificationSink>,
}

impl<'a> PetRegistration<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db, sink: None }
    }

    /// Attach a notification sink for approval/rejection events.
    pub fn with_sink(db: &'a Database, sink: &'a dyn NotificationSink) -> Self {
        Self {
            db,
            sink: Some(sink),
        }
    }

    /// Submit a pet for registration. The pet starts `Pending`.
    pub fn submit(&self, data: NewPet, owner_id: &str) -> ClinicResult<Pet> {
        require_field(&data.name, "name")?;
        require_field(&data.species, "species")?;
        require_field(&data.clinic_id, "clinicId")?;

        if self.db.get_clinic(&data.clinic_id)?.is_none() {
            return Err(ClinicError::NotFound(format!("clinic {}", data.clinic_id)));
        }

        let pet = Pet::new(data, owner_id.to_string());
        self.db.insert_pet(&pet)?;
        tracing::info!(pet_id = %pet.id, clinic_id = %pet.registered_clinic_id, "pet submitted");
        Ok(pet)
    }

    /// Approve a pending registration. The actor must belong to the pet's
    /// target clinic.
    pub fn approve(&self, pet_id: &str, actor: &Actor) -> ClinicResult<Pet> {
        let mut pet = self.pet(pet_id)?;
        PractitionerRegistry::new(self.db)
            .authorize_clinic_member(actor, &pet.registered_clinic_id)?;

        pet.approve()?;
        self.db.update_pet(&pet)?;
        tracing::info!(pet_id = %pet.id, "pet registration approved");
        emit(self.sink, NotificationEvent::pet_approved(&pet));
        Ok(pet)
    }

    /// Reject a pending registration, recording a reason (a generic one
    /// is stored when none is given).
    pub fn reject(&self, pet_id: &str, actor: &Actor, reason: Option<String>) -> ClinicResult<Pet> {
        let mut pet = self.pet(pet_id)?;
        PractitionerRegistry::new(self.db)
            .authorize_clinic_member(actor, &pet.registered_clinic_id)?;

        pet.reject(reason)?;
        self.db.update_pet(&pet)?;
        tracing::info!(pet_id = %pet.id, "pet registration rejected");
        emit(self.sink, NotificationEvent::pet_rejected(&pet));
        Ok(pet)
    }

    /// List a clinic's pending registrations, newest first. The actor
    /// must belong to the clinic.
    pub fn list_pending(&self, clinic_id: &str, actor: &Actor) -> ClinicResult<Vec<Pet>> {
        PractitionerRegistry::new(self.db).authorize_clinic_member(actor, clinic_id)?;
        Ok(self.db.list_pending_pets(clinic_id)?)
    }

    /// List all of an owner's pets, newest first.
    pub fn list_for_owner(&self, owner_id: &str) -> ClinicResult<Vec<Pet>> {
        Ok(self.db.list_pets_for_owner(owner_id)?)
    }

    /// Fetch a pet, owner-side: only the owner may read it.
    pub fn get_owned(&self, pet_id: &str, owner_id: &str) -> ClinicResult<Pet> {
        let pet = self.pet(pet_id)?;
        self.require_owner(&pet, owner_id)?;
        Ok(pet)
    }

    /// Owner-side edit of a pet's attributes. Rejected registrations are
    /// frozen; the owner resubmits instead.
    pub fn update(&self, pet_id: &str, patch: PetPatch, owner_id: &str) -> ClinicResult<Pet> {
        let mut pet = self.pet(pet_id)?;
        self.require_owner(&pet, owner_id)?;

        if pet.registration_status == RegistrationStatus::Rejected {
            return Err(ClinicError::InvalidState(
                "a rejected registration cannot be edited".to_string(),
            ));
        }

        if let Some(name) = patch.name {
            require_field(&name, "name")?;
            pet.name = name;
        }
        if patch.breed.is_some() {
            pet.breed = patch.breed;
        }
        if patch.weight_kg.is_some() {
            pet.weight_kg = patch.weight_kg;
        }
        if patch.date_of_birth.is_some() {
            pet.date_of_birth = patch.date_of_birth;
        }
        pet.touch();

        self.db.update_pet(&pet)?;
        Ok(pet)
    }

    /// Delete a pet. Owner-initiated and unconditional: no workflow gate.
    pub fn delete(&self, pet_id: &str, owner_id: &str) -> ClinicResult<()> {
        let pet = self.pet(pet_id)?;
        self.require_owner(&pet, owner_id)?;
        self.db.delete_pet(pet_id)?;
        tracing::info!(pet_id, "pet deleted by owner");
        Ok(())
    }

    fn pet(&self, pet_id: &str) -> ClinicResult<Pet> {
        self.db
            .get_pet(pet_id)?
            .ok_or_else(|| ClinicError::NotFound(format!("pet {pet_id}")))
    }

    fn require_owner(&self, pet: &Pet, owner_id: &str) -> ClinicResult<()> {
        if pet.owner_id != owner_id {
            return Err(ClinicError::Forbidden(
                "pet belongs to a different owner".to_string(),
            ));
        }
        Ok(())
    }
}
