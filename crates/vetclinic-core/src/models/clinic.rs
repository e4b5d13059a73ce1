//! Clinic model.

use serde::{Deserialize, Serialize};

use super::{new_id, now_rfc3339};

/// Optional geographic location for a clinic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A veterinary clinic.
///
/// Clinics are never hard-deleted; they fall out of use when their staff
/// are deactivated. The creating veterinarian is recorded as
/// `primary_vet_id`, which is the single source of truth for the
/// one-Primary-per-clinic invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    /// Free text, e.g. "Mon-Fri 8:00-18:00".
    pub operating_hours: Option<String>,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    /// The Primary Veterinarian who owns this clinic.
    pub primary_vet_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when creating a clinic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClinic {
    pub name: String,
    pub address: String,
    pub phone_number: String,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// Partial update of a clinic's operating metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl Clinic {
    /// Create a new clinic owned by the given veterinarian.
    pub fn new(data: NewClinic, primary_vet_id: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            name: data.name,
            address: data.address,
            phone_number: data.phone_number,
            operating_hours: data.operating_hours,
            description: data.description,
            location: data.location,
            primary_vet_id,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
