pub mod activities;
pub mod candidates;
pub mod companies;
pub mod contacts;
pub mod deals;
pub mod health;
pub mod icps;
pub mod jobs;
pub mod screening;
pub mod sequences;
pub mod submissions;
pub mod templates;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Companies
        .route(
            "/api/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route("/api/companies/import", post(companies::import_companies))
        // Contacts
        .route(
            "/api/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        // Deals
        .route("/api/deals", get(deals::list_deals).post(deals::create_deal))
        .route(
            "/api/deals/:id",
            patch(deals::update_deal).delete(deals::delete_deal),
        )
        // Jobs
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        // Candidates
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate)
                .put(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        // Submissions
        .route(
            "/api/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/api/submissions/:id",
            patch(submissions::update_submission).delete(submissions::delete_submission),
        )
        // Activities
        .route(
            "/api/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        // Sequences
        .route(
            "/api/sequences",
            get(sequences::list_sequences).post(sequences::create_sequence),
        )
        .route(
            "/api/sequences/:id",
            get(sequences::get_sequence)
                .put(sequences::update_sequence)
                .delete(sequences::delete_sequence),
        )
        .route("/api/sequences/:id/runs", get(sequences::list_runs).post(sequences::enroll_contact))
        .route("/api/sequence-runs/:id", patch(sequences::update_run))
        // ICPs (company-targeting variant only)
        .route("/api/icps", get(icps::list_icps).post(icps::create_icp))
        .route(
            "/api/icps/:id",
            get(icps::get_icp).put(icps::update_icp).delete(icps::delete_icp),
        )
        // Screening
        .route(
            "/api/jobs/:id/questions",
            get(screening::list_questions).post(screening::create_question),
        )
        .route("/api/questions/:id", delete(screening::delete_question))
        .route(
            "/api/submissions/:id/responses",
            get(screening::list_responses).post(screening::create_response),
        )
        // Email templates
        .route(
            "/api/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/templates/:id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/api/templates/:id/render", post(templates::render_template))
        .with_state(state)
}
