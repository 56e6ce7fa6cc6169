//! Paper submission use-cases.
//!
//! Write path: validate → save → publish. The save must succeed; the publish
//! never decides the outcome. A paper is created iff it was persisted.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::{DatabaseError, PaperStore};
use crate::events::{EventPublisher, PaperCreatedEvent};
use crate::models::{NewPaper, Paper, PaperStatus};

// ═══════════════════════════════════════════════════════════
// Request / response views
// ═══════════════════════════════════════════════════════════

/// Incoming create request, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
}

/// A create request whose required fields are present and non-blank.
///
/// Only obtainable through `PaperRequest::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPaperRequest {
    title: String,
    author: String,
    abstract_text: Option<String>,
    journal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<&'static str>,
}

impl PaperRequest {
    pub fn validate(self) -> Result<ValidPaperRequest, ValidationError> {
        let mut violations = Vec::new();
        let title = required(self.title, "Title is required", &mut violations);
        let author = required(self.author, "Author is required", &mut violations);

        match (title, author) {
            (Some(title), Some(author)) => Ok(ValidPaperRequest {
                title,
                author,
                abstract_text: self.abstract_text,
                journal: self.journal,
            }),
            _ => Err(ValidationError { violations }),
        }
    }
}

fn required(
    value: Option<String>,
    message: &'static str,
    violations: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            violations.push(message);
            None
        }
    }
}

/// Paper as returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub abstract_text: Option<String>,
    pub journal: Option<String>,
    pub status: PaperStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PaperResponse {
    pub fn from_entity(paper: Paper) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            author: paper.author,
            abstract_text: paper.abstract_text,
            journal: paper.journal,
            status: paper.status,
            created_at: paper.created_at,
            updated_at: paper.updated_at,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Service
// ═══════════════════════════════════════════════════════════

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Paper not found with ID: {0}")]
    NotFound(Uuid),

    #[error("Store error: {0}")]
    Store(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => match Uuid::parse_str(&id) {
                Ok(uuid) => ServiceError::NotFound(uuid),
                Err(_) => ServiceError::Store(DatabaseError::NotFound { entity_type, id }),
            },
            other => ServiceError::Store(other),
        }
    }
}

pub struct SubmissionService {
    store: Arc<dyn PaperStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn PaperStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Persist a new submission and announce it.
    ///
    /// Fails only if the store fails. Notification problems are logged.
    pub fn create_paper(&self, request: ValidPaperRequest) -> Result<PaperResponse, ServiceError> {
        let paper = NewPaper::submitted(
            request.title,
            request.author,
            request.abstract_text,
            request.journal,
        );

        let saved = self.store.save(paper)?;
        tracing::info!(paper_id = %saved.id, "Paper created");

        self.notify_created(&saved);

        Ok(PaperResponse::from_entity(saved))
    }

    pub fn get_paper_by_id(&self, id: &Uuid) -> Result<PaperResponse, ServiceError> {
        let paper = self
            .store
            .find_by_id(id)?
            .ok_or(ServiceError::NotFound(*id))?;
        Ok(PaperResponse::from_entity(paper))
    }

    pub fn get_all_papers(&self) -> Result<Vec<PaperResponse>, ServiceError> {
        let papers = self.store.find_all()?;
        Ok(papers.into_iter().map(PaperResponse::from_entity).collect())
    }

    /// Build and publish the creation event. Never fails, never panics out.
    fn notify_created(&self, paper: &Paper) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let event = PaperCreatedEvent::from_paper(paper);
            self.publisher.publish(&event, &paper.id.to_string())
        }));

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!(paper_id = %paper.id, "Paper created event handed off");
            }
            Ok(Err(e)) => {
                tracing::error!(
                    paper_id = %paper.id,
                    error = %e,
                    "Failed to send paper created event"
                );
            }
            Err(payload) => {
                tracing::error!(
                    paper_id = %paper.id,
                    panic = %panic_message(payload.as_ref()),
                    "Paper created event publisher panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
