//! SQLite schema definition.

/// Complete database schema for the vetclinic core.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Clinics
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    operating_hours TEXT,
    description TEXT,
    latitude REAL,
    longitude REAL,
    primary_vet_id TEXT NOT NULL REFERENCES veterinarians(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_clinics_primary_vet ON clinics(primary_vet_id);

-- ============================================================================
-- Veterinarians
-- ============================================================================

CREATE TABLE IF NOT EXISTS veterinarians (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    veterinary_id TEXT NOT NULL UNIQUE,           -- license number
    specialization TEXT,
    access_level TEXT NOT NULL DEFAULT 'normal_access'
        CHECK (access_level IN ('primary', 'full_access', 'normal_access')),
    status TEXT NOT NULL DEFAULT 'active'
        CHECK (status IN ('active', 'inactive')),
    current_active_clinic_id TEXT REFERENCES clinics(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_vets_status ON veterinarians(status);

-- A vet may belong to several clinics; one row per membership.
CREATE TABLE IF NOT EXISTS clinic_memberships (
    vet_id TEXT NOT NULL REFERENCES veterinarians(id),
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    joined_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (vet_id, clinic_id)
);

CREATE INDEX IF NOT EXISTS idx_memberships_clinic ON clinic_memberships(clinic_id);

-- ============================================================================
-- Clinic Staff (non-veterinary)
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinic_staff (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    role TEXT NOT NULL
        CHECK (role IN ('receptionist', 'vet_tech', 'manager', 'assistant', 'kennel_staff')),
    access_level TEXT NOT NULL DEFAULT 'basic'
        CHECK (access_level IN ('admin', 'moderate', 'basic')),
    status TEXT NOT NULL DEFAULT 'active'
        CHECK (status IN ('active', 'inactive')),
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_staff_clinic ON clinic_staff(clinic_id);

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,                       -- opaque id from the identity tier
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    weight_kg REAL,
    date_of_birth TEXT,
    registered_clinic_id TEXT NOT NULL REFERENCES clinics(id),
    registration_status TEXT NOT NULL DEFAULT 'pending'
        CHECK (registration_status IN ('pending', 'approved', 'rejected')),
    rejection_reason TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id);
CREATE INDEX IF NOT EXISTS idx_pets_clinic_status ON pets(registered_clinic_id, registration_status);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    -- Historical reference, not a foreign key: appointment history
    -- survives owner-initiated pet deletion.
    pet_id TEXT NOT NULL,
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    vet_id TEXT NOT NULL REFERENCES veterinarians(id),
    date_time TEXT NOT NULL,                      -- canonical RFC 3339 UTC instant
    reason TEXT NOT NULL,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'booked'
        CHECK (status IN ('booked', 'confirmed', 'canceled', 'completed', 'rescheduled')),
    cancellation_reason TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Slot conflict guard: at most one non-terminal appointment per vet per
-- exact instant. Insert/update against this index is the atomic
-- check-and-set that serializes concurrent bookings.
CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_slot
    ON appointments(vet_id, date_time)
    WHERE status IN ('booked', 'confirmed', 'rescheduled');

CREATE INDEX IF NOT EXISTS idx_appointments_pet ON appointments(pet_id);
CREATE INDEX IF NOT EXISTS idx_appointments_vet_time ON appointments(vet_id, date_time);

-- ============================================================================
-- Sessions (server-issued bearer tokens; only the digest is stored)
-- ============================================================================

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,                  -- SHA-256 hex of the bearer token
    actor_kind TEXT NOT NULL
        CHECK (actor_kind IN ('owner', 'veterinarian', 'staff')),
    actor_id TEXT NOT NULL,
    issued_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_sessions_actor ON sessions(actor_kind, actor_id);
"#;
