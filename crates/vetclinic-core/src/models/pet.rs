//! Pet model and registration state machine.

use serde::{Deserialize, Serialize};

use super::{new_id, now_rfc3339};
use crate::error::{ClinicError, ClinicResult};

/// The three-state approval lifecycle of a pet against a clinic.
///
/// `Pending` transitions to `Approved` or `Rejected` exactly once; both
/// outcomes are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RegistrationStatus::Pending),
            "approved" => Some(RegistrationStatus::Approved),
            "rejected" => Some(RegistrationStatus::Rejected),
            _ => None,
        }
    }
}

/// A pet submitted for registration against a clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub weight_kg: Option<f64>,
    pub date_of_birth: Option<String>,
    pub registered_clinic_id: String,
    pub registration_status: RegistrationStatus,
    /// Set when the registration is rejected.
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when submitting a pet for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    pub clinic_id: String,
}

/// Owner-side partial update of a pet's attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl Pet {
    /// Create a new pet in `Pending` status.
    pub fn new(data: NewPet, owner_id: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            owner_id,
            name: data.name,
            species: data.species,
            breed: data.breed,
            weight_kg: data.weight_kg,
            date_of_birth: data.date_of_birth,
            registered_clinic_id: data.clinic_id,
            registration_status: RegistrationStatus::Pending,
            rejection_reason: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.registration_status == RegistrationStatus::Approved
    }

    /// Transition `Pending -> Approved`.
    pub fn approve(&mut self) -> ClinicResult<()> {
        self.require_pending()?;
        self.registration_status = RegistrationStatus::Approved;
        self.touch();
        Ok(())
    }

    /// Transition `Pending -> Rejected`, recording a reason.
    pub fn reject(&mut self, reason: Option<String>) -> ClinicResult<()> {
        self.require_pending()?;
        self.registration_status = RegistrationStatus::Rejected;
        self.rejection_reason =
            Some(reason.unwrap_or_else(|| "registration declined by clinic".to_string()));
        self.touch();
        Ok(())
    }

    fn require_pending(&self) -> ClinicResult<()> {
        if self.registration_status != RegistrationStatus::Pending {
            return Err(ClinicError::InvalidState(format!(
                "pet registration is already {}",
                self.registration_status.as_str()
            )));
        }
        Ok(())
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pet() -> Pet {
        Pet::new(
            NewPet {
                name: "Max".into(),
                species: "canine".into(),
                breed: Some("Golden Retriever".into()),
                weight_kg: Some(30.0),
                date_of_birth: None,
                clinic_id: "clinic-1".into(),
            },
            "owner-1".into(),
        )
    }

    #[test]
    fn test_new_pet_is_pending() {
        let pet = make_pet();
        assert_eq!(pet.registration_status, RegistrationStatus::Pending);
        assert_eq!(pet.id.len(), 36);
    }

    #[test]
    fn test_approve_once() {
        let mut pet = make_pet();
        pet.approve().unwrap();
        assert!(pet.is_approved());

        let err = pet.approve().unwrap_err();
        assert_eq!(err.kind(), "INVALID_STATE");
    }

    #[test]
    fn test_reject_records_reason() {
        let mut pet = make_pet();
        pet.reject(Some("incomplete records".into())).unwrap();
        assert_eq!(pet.registration_status, RegistrationStatus::Rejected);
        assert_eq!(pet.rejection_reason.as_deref(), Some("incomplete records"));
    }

    #[test]
    fn test_reject_default_reason() {
        let mut pet = make_pet();
        pet.reject(None).unwrap();
        assert!(pet.rejection_reason.is_some());
    }

    #[test]
    fn test_no_transition_from_rejected() {
        let mut pet = make_pet();
        pet.reject(None).unwrap();
        assert!(pet.approve().is_err());
        assert!(pet.reject(None).is_err());
    }
}
