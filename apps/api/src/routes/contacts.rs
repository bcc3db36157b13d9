use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::contact::Contact;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub company_id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub do_not_contact: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_primary: Option<bool>,
    pub do_not_contact: Option<bool>,
}

/// GET /api/contacts?company_id=...
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<ListContactsQuery>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts: Vec<Contact> = sqlx::query_as(
        "SELECT * FROM contacts WHERE ($1::uuid IS NULL OR company_id = $1) \
         ORDER BY created_at DESC",
    )
    .bind(params.company_id)
    .fetch_all(state.db.pool())
    .await?;
    Ok(Json(contacts))
}

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<CreateContact>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact: Contact = sqlx::query_as(
        r#"
        INSERT INTO contacts (company_id, name, title, email, phone, is_primary, do_not_contact)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(req.company_id)
    .bind(&req.name)
    .bind(&req.title)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(req.is_primary)
    .bind(req.do_not_contact)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| AppError::or_conflict(e, "A contact with this email already exists"))?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, AppError> {
    let contact: Option<Contact> = sqlx::query_as("SELECT * FROM contacts WHERE id = $1")
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let contact = contact.ok_or_else(|| AppError::NotFound(format!("Contact {id} not found")))?;
    Ok(Json(contact))
}

/// PUT /api/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContact>,
) -> Result<Json<Contact>, AppError> {
    let contact: Option<Contact> = sqlx::query_as(
        r#"
        UPDATE contacts SET
            name = COALESCE($2, name),
            title = COALESCE($3, title),
            email = COALESCE($4, email),
            phone = COALESCE($5, phone),
            is_primary = COALESCE($6, is_primary),
            do_not_contact = COALESCE($7, do_not_contact)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.title)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(req.is_primary)
    .bind(req.do_not_contact)
    .fetch_optional(state.db.pool())
    .await
    .map_err(|e| AppError::or_conflict(e, "A contact with this email already exists"))?;
    let contact = contact.ok_or_else(|| AppError::NotFound(format!("Contact {id} not found")))?;
    Ok(Json(contact))
}

/// DELETE /api/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Contact {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
