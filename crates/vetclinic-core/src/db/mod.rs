//! Database layer for the vetclinic core.

mod schema;
mod clinics;
mod staff;
mod pets;
mod appointments;
mod sessions;

pub use schema::*;
#[allow(unused_imports)]
pub use clinics::*;
#[allow(unused_imports)]
pub use staff::*;
#[allow(unused_imports)]
pub use pets::*;
#[allow(unused_imports)]
pub use appointments::*;
#[allow(unused_imports)]
pub use sessions::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Uniqueness violation. Payload names the colliding field.
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Remap a unique-constraint failure to `DbError::Constraint` naming the
/// colliding field; pass other errors through. Only true uniqueness
/// violations are remapped; FK and CHECK failures stay `Sqlite`.
pub(crate) fn map_unique_violation(err: rusqlite::Error, field: &str) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::Constraint(field.to_string())
        }
        _ => DbError::Sqlite(err),
    }
}
