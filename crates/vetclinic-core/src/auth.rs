//! Actor claims and session-token authentication.
//!
//! Sessions are server-issued and server-verified; no client-held state
//! is trusted. The token's claims (actor kind + id), not anything in a
//! request body, determine what a caller may do. Credential checking
//! (passwords, OAuth) belongs to the identity tier outside this crate:
//! it calls `issue_session` once an actor has proven who they are.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::db::Database;
use crate::error::{ClinicError, ClinicResult};
use crate::models::StaffStatus;

/// The authenticated caller of a service operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// A pet owner. Owner ids are opaque, minted by the identity tier.
    Owner(String),
    /// A licensed veterinarian.
    Veterinarian(String),
    /// A non-veterinary staff member.
    Staff(String),
}

impl Actor {
    pub fn kind(&self) -> &'static str {
        match self {
            Actor::Owner(_) => "owner",
            Actor::Veterinarian(_) => "veterinarian",
            Actor::Staff(_) => "staff",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Actor::Owner(id) | Actor::Veterinarian(id) | Actor::Staff(id) => id,
        }
    }

    fn from_parts(kind: &str, id: String) -> Option<Self> {
        match kind {
            "owner" => Some(Actor::Owner(id)),
            "veterinarian" => Some(Actor::Veterinarian(id)),
            "staff" => Some(Actor::Staff(id)),
            _ => None,
        }
    }
}

/// SHA-256 hex digest of a bearer token (the at-rest form).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    // Two v4 UUIDs give 256 bits of randomness.
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Issue a bearer token for an already-authenticated actor.
///
/// Vet and staff actors must exist and be `Active`; owner ids are taken
/// on trust from the identity tier. Returns the cleartext token, which
/// is never persisted.
pub fn issue_session(db: &Database, actor: &Actor) -> ClinicResult<String> {
    match actor {
        Actor::Owner(_) => {}
        Actor::Veterinarian(id) => {
            let vet = db
                .get_veterinarian(id)?
                .ok_or_else(|| ClinicError::NotFound(format!("veterinarian {id}")))?;
            if vet.status != StaffStatus::Active {
                return Err(ClinicError::Forbidden(
                    "inactive veterinarian cannot start a session".to_string(),
                ));
            }
        }
        Actor::Staff(id) => {
            let staff = db
                .get_staff_member(id)?
                .ok_or_else(|| ClinicError::NotFound(format!("staff member {id}")))?;
            if staff.status != StaffStatus::Active {
                return Err(ClinicError::Forbidden(
                    "inactive staff member cannot start a session".to_string(),
                ));
            }
        }
    }

    let token = generate_token();
    db.insert_session(&hash_token(&token), actor.kind(), actor.id())?;
    tracing::debug!(kind = actor.kind(), "session issued");
    Ok(token)
}

/// Resolve a presented bearer token to its actor claims.
///
/// Returns `Ok(None)` for unknown tokens; the API edge maps that to 401.
pub fn verify_session(db: &Database, token: &str) -> ClinicResult<Option<Actor>> {
    let record = match db.get_session(&hash_token(token))? {
        Some(record) => record,
        None => return Ok(None),
    };
    Ok(Actor::from_parts(&record.actor_kind, record.actor_id))
}

/// Revoke a session. Unknown tokens are a no-op.
pub fn revoke_session(db: &Database, token: &str) -> ClinicResult<()> {
    db.delete_session(&hash_token(token))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewVeterinarian, Veterinarian};

    #[test]
    fn test_token_hash_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
        assert_eq!(hash_token("abc").len(), 64);
    }

    #[test]
    fn test_owner_session_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let actor = Actor::Owner("owner-1".into());

        let token = issue_session(&db, &actor).unwrap();
        assert_eq!(verify_session(&db, &token).unwrap(), Some(actor));

        revoke_session(&db, &token).unwrap();
        assert_eq!(verify_session(&db, &token).unwrap(), None);
    }

    #[test]
    fn test_unknown_token_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(verify_session(&db, "bogus").unwrap(), None);
    }

    #[test]
    fn test_vet_session_requires_existing_active_vet() {
        let db = Database::open_in_memory().unwrap();

        let err = issue_session(&db, &Actor::Veterinarian("missing".into())).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");

        let mut vet = Veterinarian::new(NewVeterinarian {
            first_name: "Ada".into(),
            last_name: "Wong".into(),
            email: "ada@example.com".into(),
            phone: None,
            veterinary_id: "VET-1001".into(),
            specialization: None,
        });
        vet.status = StaffStatus::Inactive;
        db.insert_veterinarian(&vet).unwrap();

        let err = issue_session(&db, &Actor::Veterinarian(vet.id.clone())).unwrap_err();
        assert_eq!(err.kind(), "FORBIDDEN");
    }
}
