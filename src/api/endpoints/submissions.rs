//! Public submission endpoints.
//!
//! Three endpoints:
//! - `POST /api/v1/submissions`: create a paper
//! - `GET /api/v1/submissions/:id`: one paper
//! - `GET /api/v1/submissions`: all papers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::submission::{PaperRequest, PaperResponse};

/// `POST /api/v1/submissions`: submit a new paper.
///
/// Validation runs here, before the service sees the request.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PaperRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaperResponse>), ApiError> {
    let Json(request) = payload?;
    let request = request.validate()?;

    let created = ctx.submissions.create_paper(request)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/submissions/:id`: paper by id.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(paper_id): Path<String>,
) -> Result<Json<PaperResponse>, ApiError> {
    let id = parse_paper_id(&paper_id)?;
    Ok(Json(ctx.submissions.get_paper_by_id(&id)?))
}

/// `GET /api/v1/submissions`: every stored paper.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<PaperResponse>>, ApiError> {
    Ok(Json(ctx.submissions.get_all_papers()?))
}

pub(crate) fn parse_paper_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid paper ID: {e}")))
}
