//! Shared types for the API layer.

use std::sync::Arc;

use crate::submission::SubmissionService;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub submissions: Arc<SubmissionService>,
}

impl ApiContext {
    pub fn new(submissions: Arc<SubmissionService>) -> Self {
        Self { submissions }
    }
}
