use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::template::{EmailTemplate, RenderedTemplate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmailTemplate>>, AppError> {
    let templates: Vec<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates ORDER BY created_at DESC")
            .fetch_all(state.db.pool())
            .await?;
    Ok(Json(templates))
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<CreateTemplate>,
) -> Result<(StatusCode, Json<EmailTemplate>), AppError> {
    let template: EmailTemplate = sqlx::query_as(
        "INSERT INTO email_templates (name, subject, body) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.subject)
    .bind(&req.body)
    .fetch_one(state.db.pool())
    .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailTemplate>, AppError> {
    let template: Option<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(state.db.pool())
            .await?;
    let template =
        template.ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;
    Ok(Json(template))
}

/// PUT /api/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTemplate>,
) -> Result<Json<EmailTemplate>, AppError> {
    let template: Option<EmailTemplate> = sqlx::query_as(
        "UPDATE email_templates SET \
             name = COALESCE($2, name), \
             subject = COALESCE($3, subject), \
             body = COALESCE($4, body) \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.subject)
    .bind(&req.body)
    .fetch_optional(state.db.pool())
    .await?;
    let template =
        template.ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;
    Ok(Json(template))
}

/// DELETE /api/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Template {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/templates/:id/render
/// Substitutes `{{variable}}` placeholders and returns the preview.
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderedTemplate>, AppError> {
    let template: Option<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(state.db.pool())
            .await?;
    let template =
        template.ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))?;
    Ok(Json(template.render(&req.variables)))
}
