//! Repository layer: entity-scoped database operations.
//!
//! Callers depend on the `PaperStore` trait; the SQLite functions are
//! re-exported for tests and tooling that hold a raw connection.

mod paper;

use uuid::Uuid;

use super::DatabaseError;
use crate::models::{NewPaper, Paper};

/// Persistence contract for paper submissions.
///
/// A missing paper is `Ok(None)` from `find_by_id`. Stores that can only
/// signal absence as an error may return `DatabaseError::NotFound` with the
/// paper id; the service treats both the same.
pub trait PaperStore: Send + Sync {
    /// Persist a new paper, assigning its id and timestamps.
    fn save(&self, paper: NewPaper) -> Result<Paper, DatabaseError>;
    fn find_by_id(&self, id: &Uuid) -> Result<Option<Paper>, DatabaseError>;
    /// Every stored paper. Order is stable across calls.
    fn find_all(&self) -> Result<Vec<Paper>, DatabaseError>;
}

pub use paper::*;
