//! Practitioner and support-staff models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_rfc3339};

/// Activation status shared by veterinarians and support staff.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Active,
    Inactive,
}

impl StaffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffStatus::Active => "active",
            StaffStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(StaffStatus::Active),
            "inactive" => Some(StaffStatus::Inactive),
            _ => None,
        }
    }
}

/// Veterinarian authorization tier, ordered `Primary > FullAccess > NormalAccess`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Primary,
    FullAccess,
    NormalAccess,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Primary => "primary",
            AccessLevel::FullAccess => "full_access",
            AccessLevel::NormalAccess => "normal_access",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "primary" => Some(AccessLevel::Primary),
            "full_access" => Some(AccessLevel::FullAccess),
            "normal_access" => Some(AccessLevel::NormalAccess),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            AccessLevel::Primary => 3,
            AccessLevel::FullAccess => 2,
            AccessLevel::NormalAccess => 1,
        }
    }

    /// Whether this level satisfies an action requiring `required`.
    pub fn meets(&self, required: AccessLevel) -> bool {
        self.rank() >= required.rank()
    }
}

/// Support-staff authorization tier, ordered `Admin > Moderate > Basic`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StaffAccessLevel {
    Admin,
    Moderate,
    Basic,
}

impl StaffAccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffAccessLevel::Admin => "admin",
            StaffAccessLevel::Moderate => "moderate",
            StaffAccessLevel::Basic => "basic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(StaffAccessLevel::Admin),
            "moderate" => Some(StaffAccessLevel::Moderate),
            "basic" => Some(StaffAccessLevel::Basic),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            StaffAccessLevel::Admin => 3,
            StaffAccessLevel::Moderate => 2,
            StaffAccessLevel::Basic => 1,
        }
    }

    pub fn meets(&self, required: StaffAccessLevel) -> bool {
        self.rank() >= required.rank()
    }
}

/// Non-veterinary staff role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Receptionist,
    VetTech,
    Manager,
    Assistant,
    KennelStaff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Receptionist => "receptionist",
            StaffRole::VetTech => "vet_tech",
            StaffRole::Manager => "manager",
            StaffRole::Assistant => "assistant",
            StaffRole::KennelStaff => "kennel_staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "receptionist" => Some(StaffRole::Receptionist),
            "vet_tech" => Some(StaffRole::VetTech),
            "manager" => Some(StaffRole::Manager),
            "assistant" => Some(StaffRole::Assistant),
            "kennel_staff" => Some(StaffRole::KennelStaff),
            _ => None,
        }
    }
}

/// A licensed veterinarian.
///
/// A vet may belong to several clinics (see `clinic_memberships`), with
/// exactly one active clinic context at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Veterinarian {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// License number. Unique across the system.
    pub veterinary_id: String,
    pub specialization: Option<String>,
    pub access_level: AccessLevel,
    pub status: StaffStatus,
    /// The clinic context this vet is currently managing.
    pub current_active_clinic_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when registering a veterinarian.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVeterinarian {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub veterinary_id: String,
    #[serde(default)]
    pub specialization: Option<String>,
}

impl Veterinarian {
    /// Create a new veterinarian with no clinic membership yet.
    pub fn new(data: NewVeterinarian) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            veterinary_id: data.veterinary_id,
            specialization: data.specialization,
            access_level: AccessLevel::NormalAccess,
            status: StaffStatus::Active,
            current_active_clinic_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

/// Partial update for a veterinarian. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VetPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub access_level: Option<AccessLevel>,
}

impl VetPatch {
    /// Whether the patch touches the fields protected on a Primary vet.
    pub fn touches_protected_fields(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.access_level.is_some()
    }
}

/// A non-veterinary staff member of a single clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicStaffMember {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub access_level: StaffAccessLevel,
    pub status: StaffStatus,
    pub clinic_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when adding a support staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaffMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: StaffRole,
    #[serde(default = "default_staff_access")]
    pub access_level: StaffAccessLevel,
}

fn default_staff_access() -> StaffAccessLevel {
    StaffAccessLevel::Basic
}

impl ClinicStaffMember {
    /// Create a new staff member attached to a clinic.
    pub fn new(data: NewStaffMember, clinic_id: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            role: data.role,
            access_level: data.access_level,
            status: StaffStatus::Active,
            clinic_id,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Partial update for a support staff member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<StaffRole>,
    #[serde(default)]
    pub access_level: Option<StaffAccessLevel>,
}
