use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::sequence::{RunStatus, Sequence, SequenceRun};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSequence {
    pub name: String,
    pub steps: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSequence {
    pub name: Option<String>,
    pub steps: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollContact {
    pub contact_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRun {
    pub status: Option<RunStatus>,
    pub current_step: Option<i32>,
}

/// GET /api/sequences
pub async fn list_sequences(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sequence>>, AppError> {
    let sequences: Vec<Sequence> =
        sqlx::query_as("SELECT * FROM sequences ORDER BY created_at DESC")
            .fetch_all(state.db.pool())
            .await?;
    Ok(Json(sequences))
}

/// POST /api/sequences
pub async fn create_sequence(
    State(state): State<AppState>,
    Json(req): Json<CreateSequence>,
) -> Result<(StatusCode, Json<Sequence>), AppError> {
    let sequence: Sequence = sqlx::query_as(
        "INSERT INTO sequences (name, steps) VALUES ($1, COALESCE($2, '[]'::jsonb)) RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.steps)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(sequence)))
}

/// GET /api/sequences/:id
pub async fn get_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Sequence>, AppError> {
    let sequence: Option<Sequence> = sqlx::query_as("SELECT * FROM sequences WHERE id = $1")
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let sequence =
        sequence.ok_or_else(|| AppError::NotFound(format!("Sequence {id} not found")))?;
    Ok(Json(sequence))
}

/// PUT /api/sequences/:id
pub async fn update_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSequence>,
) -> Result<Json<Sequence>, AppError> {
    let sequence: Option<Sequence> = sqlx::query_as(
        "UPDATE sequences SET name = COALESCE($2, name), steps = COALESCE($3, steps) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.steps)
    .fetch_optional(state.db.pool())
    .await?;
    let sequence =
        sequence.ok_or_else(|| AppError::NotFound(format!("Sequence {id} not found")))?;
    Ok(Json(sequence))
}

/// DELETE /api/sequences/:id
pub async fn delete_sequence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM sequences WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Sequence {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sequences/:id/runs
pub async fn list_runs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SequenceRun>>, AppError> {
    let runs: Vec<SequenceRun> = sqlx::query_as(
        "SELECT * FROM sequence_runs WHERE sequence_id = $1 ORDER BY created_at ASC",
    )
    .bind(id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(runs))
}

/// POST /api/sequences/:id/runs
/// Enrolls a contact; enrolling the same contact twice is a 409.
pub async fn enroll_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnrollContact>,
) -> Result<(StatusCode, Json<SequenceRun>), AppError> {
    let run: SequenceRun = sqlx::query_as(
        "INSERT INTO sequence_runs (sequence_id, contact_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(id)
    .bind(req.contact_id)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| AppError::or_conflict(e, "Contact is already enrolled in this sequence"))?;
    Ok((StatusCode::CREATED, Json(run)))
}

/// PATCH /api/sequence-runs/:id
pub async fn update_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRun>,
) -> Result<Json<SequenceRun>, AppError> {
    let run: Option<SequenceRun> = sqlx::query_as(
        "UPDATE sequence_runs SET \
             status = COALESCE($2, status), \
             current_step = COALESCE($3, current_step) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(req.status)
    .bind(req.current_step)
    .fetch_optional(state.db.pool())
    .await?;
    let run = run.ok_or_else(|| AppError::NotFound(format!("Sequence run {id} not found")))?;
    Ok(Json(run))
}
