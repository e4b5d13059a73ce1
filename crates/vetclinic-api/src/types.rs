//! Shared types for the API layer.

use std::sync::{Arc, Mutex};

use vetclinic_core::Database;

/// Shared context for all API routes and middleware.
///
/// The SQLite connection is single-writer, so handlers take the mutex
/// for the duration of one service call.
#[derive(Clone)]
pub struct ApiContext {
    pub db: Arc<Mutex<Database>>,
}

impl ApiContext {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }
}
