use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::Db;
use crate::errors::AppError;
use crate::models::activity::ActivityKind;
use crate::models::company::{Company, PartnerStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub partner_status: Option<PartnerStatus>,
    pub hiring_urgency: Option<String>,
    pub signals: Option<Value>,
    pub funding_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub partner_status: Option<PartnerStatus>,
    pub hiring_urgency: Option<String>,
    pub signals: Option<Value>,
    pub funding_amount: Option<f64>,
}

/// GET /api/companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies: Vec<Company> =
        sqlx::query_as("SELECT * FROM companies ORDER BY created_at DESC")
            .fetch_all(state.db.pool())
            .await?;
    Ok(Json(companies))
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompany>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Company name is required".to_string()));
    }
    let company: Company = sqlx::query_as(
        r#"
        INSERT INTO companies
            (name, domain, industry, size, location, partner_status,
             hiring_urgency, signals, funding_amount)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'lead'), $7, COALESCE($8, '{}'::jsonb), $9)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.domain)
    .bind(&req.industry)
    .bind(&req.size)
    .bind(&req.location)
    .bind(req.partner_status)
    .bind(&req.hiring_urgency)
    .bind(&req.signals)
    .bind(req.funding_amount)
    .fetch_one(state.db.pool())
    .await
    .map_err(|e| AppError::or_conflict(e, "A company with this domain already exists"))?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company: Option<Company> = sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(state.db.pool())
        .await?;
    let company = company.ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))?;
    Ok(Json(company))
}

/// PUT /api/companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompany>,
) -> Result<Json<Company>, AppError> {
    // updated_at is maintained by the database trigger.
    let company: Option<Company> = sqlx::query_as(
        r#"
        UPDATE companies SET
            name = COALESCE($2, name),
            domain = COALESCE($3, domain),
            industry = COALESCE($4, industry),
            size = COALESCE($5, size),
            location = COALESCE($6, location),
            partner_status = COALESCE($7, partner_status),
            hiring_urgency = COALESCE($8, hiring_urgency),
            signals = COALESCE($9, signals),
            funding_amount = COALESCE($10, funding_amount)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(&req.domain)
    .bind(&req.industry)
    .bind(&req.size)
    .bind(&req.location)
    .bind(req.partner_status)
    .bind(&req.hiring_urgency)
    .bind(&req.signals)
    .bind(req.funding_amount)
    .fetch_optional(state.db.pool())
    .await?;
    let company = company.ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))?;
    Ok(Json(company))
}

/// DELETE /api/companies/:id
/// Cascades to the company's contacts, jobs and deals, and transitively to
/// submissions, screening rows and sequence runs referencing them.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Company {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Bulk import
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub partner_status: Option<PartnerStatus>,
    pub hiring_urgency: Option<String>,
    pub signals: Option<Value>,
    pub funding_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub records: Vec<ImportRecord>,
}

#[derive(Debug, Serialize)]
pub struct ImportFailure {
    pub record: ImportRecord,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResults {
    pub success: Vec<Company>,
    pub failed: Vec<ImportFailure>,
}

/// POST /api/companies/import
///
/// Records are processed independently: one record's failure is caught and
/// appended to `failed` while the rest of the batch continues.
pub async fn import_companies(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResults>, AppError> {
    let db = state.db.clone();
    let results = run_import(req.records, |record| {
        let db = db.clone();
        async move { upsert_company(&db, record).await }
    })
    .await;

    tracing::info!(
        "Company import finished: {} succeeded, {} failed",
        results.success.len(),
        results.failed.len()
    );
    Ok(Json(results))
}

/// Validates and upserts each record in turn. A record that fails validation
/// or the upsert lands in `failed` with its error message; the rest of the
/// batch continues regardless.
async fn run_import<F, Fut>(records: Vec<ImportRecord>, mut upsert: F) -> ImportResults
where
    F: FnMut(ImportRecord) -> Fut,
    Fut: Future<Output = Result<Company, sqlx::Error>>,
{
    let mut success = Vec::new();
    let mut failed = Vec::new();

    for record in records {
        let result = match validate_import_record(&record) {
            Ok(()) => upsert(record.clone()).await.map_err(|err| err.to_string()),
            Err(msg) => Err(msg),
        };
        match result {
            Ok(company) => success.push(company),
            Err(error) => failed.push(ImportFailure { record, error }),
        }
    }

    ImportResults { success, failed }
}

/// Required-fields check for one import record.
pub fn validate_import_record(record: &ImportRecord) -> Result<(), String> {
    match &record.name {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err("Company name is required".to_string()),
    }
}

/// Upserts one record (lookup by domain, update if found, insert otherwise)
/// and appends an Activity row, atomically.
async fn upsert_company(db: &Db, record: ImportRecord) -> Result<Company, sqlx::Error> {
    let company = db
        .transaction(move |tx| {
            Box::pin(async move {
                let existing: Option<Company> = match &record.domain {
                    Some(domain) => {
                        sqlx::query_as("SELECT * FROM companies WHERE domain = $1")
                            .bind(domain)
                            .fetch_optional(&mut **tx)
                            .await?
                    }
                    None => None,
                };

                let company: Company = match existing {
                    Some(existing) => {
                        sqlx::query_as(
                            r#"
                            UPDATE companies SET
                                name = $2,
                                industry = COALESCE($3, industry),
                                size = COALESCE($4, size),
                                location = COALESCE($5, location),
                                partner_status = COALESCE($6, partner_status),
                                hiring_urgency = COALESCE($7, hiring_urgency),
                                signals = COALESCE($8, signals),
                                funding_amount = COALESCE($9, funding_amount)
                            WHERE id = $1
                            RETURNING *
                            "#,
                        )
                        .bind(existing.id)
                        .bind(record.name.as_deref().unwrap_or_default())
                        .bind(&record.industry)
                        .bind(&record.size)
                        .bind(&record.location)
                        .bind(record.partner_status)
                        .bind(&record.hiring_urgency)
                        .bind(&record.signals)
                        .bind(record.funding_amount)
                        .fetch_one(&mut **tx)
                        .await?
                    }
                    None => {
                        sqlx::query_as(
                            r#"
                            INSERT INTO companies
                                (name, domain, industry, size, location, partner_status,
                                 hiring_urgency, signals, funding_amount)
                            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'lead'), $7,
                                    COALESCE($8, '{}'::jsonb), $9)
                            RETURNING *
                            "#,
                        )
                        .bind(record.name.as_deref().unwrap_or_default())
                        .bind(&record.domain)
                        .bind(&record.industry)
                        .bind(&record.size)
                        .bind(&record.location)
                        .bind(record.partner_status)
                        .bind(&record.hiring_urgency)
                        .bind(&record.signals)
                        .bind(record.funding_amount)
                        .fetch_one(&mut **tx)
                        .await?
                    }
                };

                sqlx::query(
                    "INSERT INTO activities (subject_type, subject_id, kind, body) \
                     VALUES ('company', $1, $2, 'Imported via bulk import')",
                )
                .bind(company.id)
                .bind(ActivityKind::Note)
                .execute(&mut **tx)
                .await?;

                Ok(company)
            })
        })
        .await?;

    Ok(company)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: Option<&str>) -> ImportRecord {
        ImportRecord {
            name: name.map(|n| n.to_string()),
            domain: None,
            industry: None,
            size: None,
            location: None,
            partner_status: None,
            hiring_urgency: None,
            signals: None,
            funding_amount: None,
        }
    }

    #[test]
    fn test_validate_accepts_named_record() {
        assert!(validate_import_record(&record(Some("Acme"))).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_name() {
        assert_eq!(
            validate_import_record(&record(None)).unwrap_err(),
            "Company name is required"
        );
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert_eq!(
            validate_import_record(&record(Some("   "))).unwrap_err(),
            "Company name is required"
        );
    }

    fn company_named(name: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            domain: None,
            industry: None,
            size: None,
            location: None,
            partner_status: PartnerStatus::Lead,
            hiring_urgency: None,
            signals: Value::Object(serde_json::Map::new()),
            funding_amount: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_import_batch_isolates_invalid_records() {
        let records = vec![record(Some("Acme")), record(None), record(Some("Globex"))];
        let results = run_import(records, |r| async move {
            Ok(company_named(r.name.as_deref().unwrap_or_default()))
        })
        .await;

        assert_eq!(results.success.len(), 2);
        assert_eq!(results.success[0].name, "Acme");
        assert_eq!(results.success[1].name, "Globex");
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.failed[0].error, "Company name is required");
        assert!(results.failed[0].record.name.is_none());
    }

    #[tokio::test]
    async fn test_import_batch_continues_past_upsert_failures() {
        let records = vec![record(Some("Acme")), record(Some("Globex"))];
        let results = run_import(records, |r| async move {
            if r.name.as_deref() == Some("Acme") {
                Err(sqlx::Error::RowNotFound)
            } else {
                Ok(company_named("Globex"))
            }
        })
        .await;

        assert_eq!(results.success.len(), 1);
        assert_eq!(results.failed.len(), 1);
        assert_eq!(results.failed[0].record.name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_import_skips_upsert_for_invalid_records() {
        let mut upserts = 0;
        let results = run_import(vec![record(Some("  ")), record(None)], |_| {
            upserts += 1;
            async move { Ok(company_named("unused")) }
        })
        .await;

        assert_eq!(upserts, 0);
        assert!(results.success.is_empty());
        assert_eq!(results.failed.len(), 2);
        for failure in &results.failed {
            assert_eq!(failure.error, "Company name is required");
        }
    }

    #[test]
    fn test_import_record_round_trips_json() {
        let r = record(Some("Acme"));
        let json = serde_json::to_string(&r).unwrap();
        let back: ImportRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name.as_deref(), Some("Acme"));
    }
}
