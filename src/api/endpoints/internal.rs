//! Service-to-service endpoints.
//!
//! `GET /api/internal/papers/:id`: same lookup as the public detail route,
//! mounted separately so it can be kept off the public network.

use axum::extract::{Path, State};
use axum::Json;

use super::submissions::parse_paper_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::submission::PaperResponse;

pub async fn paper(
    State(ctx): State<ApiContext>,
    Path(paper_id): Path<String>,
) -> Result<Json<PaperResponse>, ApiError> {
    let id = parse_paper_id(&paper_id)?;
    Ok(Json(ctx.submissions.get_paper_by_id(&id)?))
}
