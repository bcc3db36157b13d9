use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::icp::Icp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIcp {
    pub name: String,
    pub industry: Option<String>,
    pub size_min: Option<i32>,
    pub size_max: Option<i32>,
    #[serde(default)]
    pub tech_keywords: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIcp {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size_min: Option<i32>,
    pub size_max: Option<i32>,
    pub tech_keywords: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// GET /api/icps
pub async fn list_icps(State(state): State<AppState>) -> Result<Json<Vec<Icp>>, AppError> {
    let icps: Vec<Icp> = sqlx::query_as("SELECT * FROM icps ORDER BY created_at DESC")
        .fetch_all(state.db.pool())
        .await?;
    Ok(Json(icps))
}

/// POST /api/icps
pub async fn create_icp(
    State(state): State<AppState>,
    Json(req): Json<CreateIcp>,
) -> Result<(StatusCode, Json<Icp>), AppError> {
    let icp: Icp = sqlx::query_as(
        r#"
        INSERT INTO icps (name, industry, size_min, size_max, tech_keywords, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.industry)
    .bind(req.size_min)
    .bind(req.size_max)
    .bind(&req.tech_keywords)
    .bind(&req.notes)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(icp)))
}

/// GET /api/icps/:id
pub async fn get_icp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Icp>, AppError> {
    let icp: Option<Icp> = sqlx::query_as("SELECT * FROM icps WHERE id = $1")
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let icp = icp.ok_or_else(|| AppError::NotFound(format!("ICP {id} not found")))?;
    Ok(Json(icp))
}

/// PUT /api/icps/:id
pub async fn update_icp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIcp>,
) -> Result<Json<Icp>, AppError> {
    let icp: Option<Icp> = sqlx::query_as(
        r#"
        UPDATE icps SET
            name = COALESCE($2, name),
            industry = COALESCE($3, industry),
            size_min = COALESCE($4, size_min),
            size_max = COALESCE($5, size_max),
            tech_keywords = COALESCE($6, tech_keywords),
            notes = COALESCE($7, notes)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.industry)
    .bind(req.size_min)
    .bind(req.size_max)
    .bind(&req.tech_keywords)
    .bind(&req.notes)
    .fetch_optional(state.db.pool())
    .await?;
    let icp = icp.ok_or_else(|| AppError::NotFound(format!("ICP {id} not found")))?;
    Ok(Json(icp))
}

/// DELETE /api/icps/:id
pub async fn delete_icp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM icps WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("ICP {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
