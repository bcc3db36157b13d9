use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{Job, JobStatus, JOB_COLUMNS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub company_id: Option<Uuid>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub nice_to_haves: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<JobStatus>,
    pub location: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub requirements: Option<Vec<String>>,
    pub nice_to_haves: Option<Vec<String>>,
}

/// GET /api/jobs?company_id=...&status=...
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs \
         WHERE ($1::uuid IS NULL OR company_id = $1) \
           AND ($2::job_status IS NULL OR status = $2) \
         ORDER BY created_at DESC"
    );
    let jobs: Vec<Job> = sqlx::query_as(&sql)
        .bind(params.company_id)
        .bind(params.status)
        .fetch_all(state.db.pool())
        .await?;
    Ok(Json(jobs))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let sql = format!(
        "INSERT INTO jobs \
             (company_id, title, description, status, location, salary_min, salary_max, \
              requirements, nice_to_haves) \
         VALUES ($1, $2, $3, COALESCE($4, 'draft'), $5, $6, $7, $8, $9) \
         RETURNING {JOB_COLUMNS}"
    );
    let job: Job = sqlx::query_as(&sql)
        .bind(req.company_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status)
        .bind(&req.location)
        .bind(req.salary_min)
        .bind(req.salary_max)
        .bind(&req.requirements)
        .bind(&req.nice_to_haves)
        .fetch_one(state.db.pool())
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
    let job: Option<Job> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PUT /api/jobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJob>,
) -> Result<Json<Job>, AppError> {
    let sql = format!(
        "UPDATE jobs SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             status = COALESCE($4, status), \
             location = COALESCE($5, location), \
             salary_min = COALESCE($6, salary_min), \
             salary_max = COALESCE($7, salary_max), \
             requirements = COALESCE($8, requirements), \
             nice_to_haves = COALESCE($9, nice_to_haves) \
         WHERE id = $1 \
         RETURNING {JOB_COLUMNS}"
    );
    let job: Option<Job> = sqlx::query_as(&sql)
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status)
        .bind(&req.location)
        .bind(req.salary_min)
        .bind(req.salary_max)
        .bind(&req.requirements)
        .bind(&req.nice_to_haves)
        .fetch_optional(state.db.pool())
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
