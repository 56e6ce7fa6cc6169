use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::PaperStatus;

/// A persisted paper submission.
///
/// `id`, `created_at` and `updated_at` are assigned by the store on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub status: PaperStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A paper that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaper {
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub status: PaperStatus,
}

impl NewPaper {
    /// A fresh submission. Status is always `SUBMITTED`.
    pub fn submitted(
        title: impl Into<String>,
        author: impl Into<String>,
        abstract_text: Option<String>,
        journal: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            abstract_text,
            journal,
            status: PaperStatus::Submitted,
        }
    }

    /// Attach store-assigned identity and timestamps.
    pub fn into_paper(self, id: Uuid, now: NaiveDateTime) -> Paper {
        Paper {
            id,
            title: self.title,
            author: self.author,
            abstract_text: self.abstract_text,
            journal: self.journal,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}
