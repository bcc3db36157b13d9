use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::submission::{Submission, SubmissionStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub job_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubmission {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: Option<SubmissionStatus>,
    pub match_score: Option<f64>,
    pub match_reasons: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubmission {
    pub status: Option<SubmissionStatus>,
    pub match_score: Option<f64>,
    pub match_reasons: Option<Value>,
}

/// GET /api/submissions?job_id=...&candidate_id=...
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListSubmissionsQuery>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions: Vec<Submission> = sqlx::query_as(
        "SELECT * FROM submissions \
         WHERE ($1::uuid IS NULL OR job_id = $1) \
           AND ($2::uuid IS NULL OR candidate_id = $2) \
         ORDER BY created_at DESC",
    )
    .bind(params.job_id)
    .bind(params.candidate_id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(submissions))
}

/// POST /api/submissions
/// A second submission for the same (job, candidate) pair is a 409.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(req): Json<CreateSubmission>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission: Submission = sqlx::query_as(
        r#"
        INSERT INTO submissions (job_id, candidate_id, status, match_score, match_reasons)
        VALUES ($1, $2, COALESCE($3, 'draft'), $4, COALESCE($5, '[]'::jsonb))
        RETURNING *
        "#,
    )
    .bind(req.job_id)
    .bind(req.candidate_id)
    .bind(req.status)
    .bind(req.match_score)
    .bind(&req.match_reasons)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| {
        AppError::or_conflict(e, "A submission already exists for this job and candidate")
    })?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// PATCH /api/submissions/:id
pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubmission>,
) -> Result<Json<Submission>, AppError> {
    let submission: Option<Submission> = sqlx::query_as(
        r#"
        UPDATE submissions SET
            status = COALESCE($2, status),
            match_score = COALESCE($3, match_score),
            match_reasons = COALESCE($4, match_reasons)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(req.status)
    .bind(req.match_score)
    .bind(&req.match_reasons)
    .fetch_optional(state.db.pool())
    .await?;
    let submission =
        submission.ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))?;
    Ok(Json(submission))
}

/// DELETE /api/submissions/:id
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Submission {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
