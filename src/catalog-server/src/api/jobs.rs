//! Simulated background job endpoints.
//!
//! No work is queued: starting a job only mints an id, and every status
//! lookup reports completion.

use axum::{
    Json,
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::types::JobResponse;

/// Accept a processing request and point the client at its status resource.
pub async fn start_process() -> AppResult<Response> {
    let job_id = Uuid::new_v4();
    tracing::info!(%job_id, "Accepted processing job");

    let location = HeaderValue::from_str(&format!("api/products/status/{job_id}"))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::ACCEPTED,
        [(header::LOCATION, location)],
        Json(JobResponse {
            job_id,
            status: "Progressing".to_string(),
        }),
    )
        .into_response())
}

/// Report the status of a job.
pub async fn job_status(Path(job_id): Path<String>) -> AppResult<Json<JobResponse>> {
    let job_id = super::parse_id(&job_id)?;
    Ok(Json(JobResponse {
        job_id,
        status: "Completed".to_string(),
    }))
}
