use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::{Activity, ActivityKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListActivitiesQuery {
    pub subject_type: Option<String>,
    pub subject_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivity {
    pub subject_type: String,
    pub subject_id: Uuid,
    pub kind: ActivityKind,
    pub body: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// GET /api/activities?subject_type=...&subject_id=...
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ListActivitiesQuery>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let activities: Vec<Activity> = sqlx::query_as(
        "SELECT * FROM activities \
         WHERE ($1::text IS NULL OR subject_type = $1) \
           AND ($2::uuid IS NULL OR subject_id = $2) \
         ORDER BY occurred_at DESC",
    )
    .bind(&params.subject_type)
    .bind(params.subject_id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(activities))
}

/// POST /api/activities
/// The subject reference is informal: no foreign key, any entity type.
pub async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<CreateActivity>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let activity: Activity = sqlx::query_as(
        r#"
        INSERT INTO activities (subject_type, subject_id, kind, body, occurred_at)
        VALUES ($1, $2, $3, $4, COALESCE($5, now()))
        RETURNING *
        "#,
    )
    .bind(&req.subject_type)
    .bind(req.subject_id)
    .bind(req.kind)
    .bind(&req.body)
    .bind(req.occurred_at)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(activity)))
}
