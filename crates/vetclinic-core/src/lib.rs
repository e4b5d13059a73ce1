//! VetClinic Core Library
//!
//! Appointment lifecycle and clinic-membership authorization for a
//! veterinary clinic platform, backed by local SQLite.
//!
//! # Architecture
//!
//! ```text
//! Owner submits pet ──► [PENDING registration]
//!                               │
//!                  clinic staff approve/reject (once)
//!                               │
//!               ┌───────────────▼───────────────┐
//!               │   APPROVED: bookable pet      │
//!               └───────────────┬───────────────┘
//!                               │
//!        Owner books ──► Booked ──► Confirmed ──► Completed
//!                          │  ▲         │
//!                          │  └─────────┤ reschedule
//!                          └──► Canceled ◄┘ (terminal)
//!
//! Slot uniqueness: one live appointment per (vet, instant), enforced
//! by a partial unique index so check-and-insert is atomic.
//! ```
//!
//! # Core Principle
//!
//! **Every clinic-side action is authorized against a membership.**
//! A veterinarian or staff member acts only within clinics they belong
//! to, at the access level the clinic granted them; the clinic record
//! itself is the single source of truth for who is Primary.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Clinic, Veterinarian, Pet, Appointment, ...)
//! - [`registry`]: Clinics, veterinarians, staff, and access control
//! - [`registration`]: Pet registration workflow
//! - [`scheduler`]: Appointment booking and lifecycle
//! - [`auth`]: Bearer-token sessions (tokens stored as SHA-256 digests)
//! - [`notify`]: Lifecycle notification events (best-effort delivery)

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod registration;
pub mod registry;
pub mod scheduler;

// Re-export commonly used types
pub use auth::Actor;
pub use db::Database;
pub use error::{ClinicError, ClinicResult};
pub use models::{
    AccessLevel, Appointment, AppointmentFilter, AppointmentStats, AppointmentStatus, Clinic,
    ClinicStaffMember, Pet, RegistrationStatus, StaffAccessLevel, StaffStatus, Veterinarian,
};
pub use notify::{NotificationEvent, NotificationSink};
pub use registration::PetRegistration;
pub use registry::PractitionerRegistry;
pub use scheduler::{AppointmentScheduler, BookRequest};
