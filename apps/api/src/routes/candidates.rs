use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CANDIDATE_COLUMNS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCandidate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
}

/// GET /api/candidates
pub async fn list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC");
    let candidates: Vec<Candidate> = sqlx::query_as(&sql).fetch_all(state.db.pool()).await?;
    Ok(Json(candidates))
}

/// POST /api/candidates
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(req): Json<CreateCandidate>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let sql = format!(
        "INSERT INTO candidates \
             (name, email, phone, location, headline, skills, tags, education, experience) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '[]'::jsonb), COALESCE($9, '[]'::jsonb)) \
         RETURNING {CANDIDATE_COLUMNS}"
    );
    let candidate: Candidate = sqlx::query_as(&sql)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.location)
        .bind(&req.headline)
        .bind(&req.skills)
        .bind(&req.tags)
        .bind(&req.education)
        .bind(&req.experience)
        .fetch_one(state.db.pool())
        .await
        .map_err(|e| AppError::or_conflict(e, "A candidate with this email already exists"))?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /api/candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
    let candidate: Option<Candidate> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let candidate =
        candidate.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate))
}

/// PUT /api/candidates/:id
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCandidate>,
) -> Result<Json<Candidate>, AppError> {
    let sql = format!(
        "UPDATE candidates SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             phone = COALESCE($4, phone), \
             location = COALESCE($5, location), \
             headline = COALESCE($6, headline), \
             skills = COALESCE($7, skills), \
             tags = COALESCE($8, tags), \
             education = COALESCE($9, education), \
             experience = COALESCE($10, experience) \
         WHERE id = $1 \
         RETURNING {CANDIDATE_COLUMNS}"
    );
    let candidate: Option<Candidate> = sqlx::query_as(&sql)
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(&req.location)
        .bind(&req.headline)
        .bind(&req.skills)
        .bind(&req.tags)
        .bind(&req.education)
        .bind(&req.experience)
        .fetch_optional(state.db.pool())
        .await
        .map_err(|e| AppError::or_conflict(e, "A candidate with this email already exists"))?;
    let candidate =
        candidate.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate))
}

/// DELETE /api/candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
