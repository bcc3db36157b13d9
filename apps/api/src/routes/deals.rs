use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::deal::{Deal, DealStage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListDealsQuery {
    pub company_id: Option<Uuid>,
    pub stage: Option<DealStage>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeal {
    pub company_id: Uuid,
    pub name: String,
    pub stage: Option<DealStage>,
    pub value: Option<f64>,
    pub probability: Option<i32>,
    pub close_date: Option<NaiveDate>,
}

/// Partial update. Stage moves from the pipeline board arrive here; the full
/// updated row is returned so the caller can reconcile its local state.
#[derive(Debug, Deserialize)]
pub struct UpdateDeal {
    pub name: Option<String>,
    pub stage: Option<DealStage>,
    pub value: Option<f64>,
    pub probability: Option<i32>,
    pub close_date: Option<NaiveDate>,
}

/// GET /api/deals?company_id=...&stage=...
pub async fn list_deals(
    State(state): State<AppState>,
    Query(params): Query<ListDealsQuery>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let deals: Vec<Deal> = sqlx::query_as(
        "SELECT * FROM deals \
         WHERE ($1::uuid IS NULL OR company_id = $1) \
           AND ($2::deal_stage IS NULL OR stage = $2) \
         ORDER BY created_at DESC",
    )
    .bind(params.company_id)
    .bind(params.stage)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(deals))
}

/// POST /api/deals
pub async fn create_deal(
    State(state): State<AppState>,
    Json(req): Json<CreateDeal>,
) -> Result<(StatusCode, Json<Deal>), AppError> {
    // probability outside [0,100] is rejected by the column CHECK regardless
    // of what arrives here.
    let deal: Deal = sqlx::query_as(
        r#"
        INSERT INTO deals (company_id, name, stage, value, probability, close_date)
        VALUES ($1, $2, COALESCE($3, 'prospect'), $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(req.company_id)
    .bind(&req.name)
    .bind(req.stage)
    .bind(req.value)
    .bind(req.probability)
    .bind(req.close_date)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

/// PATCH /api/deals/:id
pub async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDeal>,
) -> Result<Json<Deal>, AppError> {
    let deal: Option<Deal> = sqlx::query_as(
        r#"
        UPDATE deals SET
            name = COALESCE($2, name),
            stage = COALESCE($3, stage),
            value = COALESCE($4, value),
            probability = COALESCE($5, probability),
            close_date = COALESCE($6, close_date)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.stage)
    .bind(req.value)
    .bind(req.probability)
    .bind(req.close_date)
    .fetch_optional(state.db.pool())
    .await?;
    let deal = deal.ok_or_else(|| AppError::NotFound(format!("Deal {id} not found")))?;
    Ok(Json(deal))
}

/// DELETE /api/deals/:id
pub async fn delete_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM deals WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Deal {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
