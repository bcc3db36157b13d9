use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screening::{ScreeningQuestion, ScreeningResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuestion {
    pub prompt: String,
    #[serde(default)]
    pub knockout: bool,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub question_id: Uuid,
    pub answer: Option<String>,
    pub passed: Option<bool>,
}

/// GET /api/jobs/:id/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ScreeningQuestion>>, AppError> {
    let questions: Vec<ScreeningQuestion> = sqlx::query_as(
        "SELECT * FROM screening_questions WHERE job_id = $1 ORDER BY position ASC",
    )
    .bind(job_id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(questions))
}

/// POST /api/jobs/:id/questions
pub async fn create_question(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<CreateQuestion>,
) -> Result<(StatusCode, Json<ScreeningQuestion>), AppError> {
    let question: ScreeningQuestion = sqlx::query_as(
        "INSERT INTO screening_questions (job_id, prompt, knockout, position) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(job_id)
    .bind(&req.prompt)
    .bind(req.knockout)
    .bind(req.position)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// DELETE /api/questions/:id
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM screening_questions WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Question {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/submissions/:id/responses
pub async fn list_responses(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<Vec<ScreeningResponse>>, AppError> {
    let responses: Vec<ScreeningResponse> = sqlx::query_as(
        "SELECT * FROM screening_responses WHERE submission_id = $1 ORDER BY created_at ASC",
    )
    .bind(submission_id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(responses))
}

/// POST /api/submissions/:id/responses
/// One answer per question per submission; duplicates are a 409.
pub async fn create_response(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
    Json(req): Json<CreateResponse>,
) -> Result<(StatusCode, Json<ScreeningResponse>), AppError> {
    let response: ScreeningResponse = sqlx::query_as(
        "INSERT INTO screening_responses (submission_id, question_id, answer, passed) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(submission_id)
    .bind(req.question_id)
    .bind(&req.answer)
    .bind(req.passed)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| AppError::or_conflict(e, "A response already exists for this question"))?;
    Ok((StatusCode::CREATED, Json(response)))
}
