//! Demo-data seeding. Generators are pure (seeded RNG in, rows out) so the
//! insert pass is the only part that touches the database.

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use fake::faker::address::en::CityName;
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::Db;
use crate::models::company::PartnerStatus;
use crate::models::deal::DealStage;
use crate::models::job::JobStatus;
use crate::models::submission::SubmissionStatus;

const COMPANY_SIZES: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];
const HIRING_URGENCY: &[&str] = &["low", "medium", "high"];
const PARTNER_STATUSES: &[PartnerStatus] = &[
    PartnerStatus::Lead,
    PartnerStatus::Prospect,
    PartnerStatus::Active,
    PartnerStatus::Inactive,
    PartnerStatus::Churned,
];
const DEAL_STAGES: &[DealStage] = &[
    DealStage::Prospect,
    DealStage::Discovery,
    DealStage::Proposal,
    DealStage::Won,
    DealStage::Lost,
];
const JOB_TITLES: &[&str] = &[
    "Senior Backend Engineer",
    "Staff Platform Engineer",
    "Engineering Manager",
    "Data Engineer",
    "Site Reliability Engineer",
    "Product Designer",
    "Frontend Engineer",
];
const SKILLS: &[&str] = &[
    "rust", "postgres", "kubernetes", "python", "typescript", "go", "terraform", "react", "kafka",
    "aws",
];

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub seed: u64,
    pub companies: usize,
    pub contacts_per_company: usize,
    pub deals_per_company: usize,
    pub jobs_per_company: usize,
    pub candidates: usize,
    pub submission_attempts: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            seed: 42,
            companies: 12,
            contacts_per_company: 2,
            deals_per_company: 2,
            jobs_per_company: 2,
            candidates: 25,
            submission_attempts: 40,
        }
    }
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub companies: usize,
    pub contacts: usize,
    pub deals: usize,
    pub jobs: usize,
    pub candidates: usize,
    pub submissions: usize,
    pub duplicate_submissions_skipped: usize,
}

#[derive(Debug, Clone)]
pub struct CompanySeed {
    pub name: String,
    pub domain: String,
    pub industry: String,
    pub size: String,
    pub location: String,
    pub partner_status: PartnerStatus,
    pub hiring_urgency: String,
    pub funding_amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ContactSeed {
    pub name: String,
    pub title: String,
    pub email: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct DealSeed {
    pub name: String,
    pub stage: DealStage,
    pub value: f64,
    pub probability: i32,
    pub close_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct JobSeed {
    pub title: String,
    pub status: JobStatus,
    pub location: String,
    pub salary_min: i32,
    pub salary_max: i32,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CandidateSeed {
    pub name: String,
    pub email: String,
    pub location: String,
    pub headline: String,
    pub skills: Vec<String>,
}

fn slug(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

pub fn generate_companies(rng: &mut StdRng, count: usize) -> Vec<CompanySeed> {
    (0..count)
        .map(|i| {
            let name: String = CompanyName().fake_with_rng(rng);
            // Index suffix keeps domains unique across generated names.
            let domain = format!("{}-{i}.com", slug(&name));
            CompanySeed {
                name,
                domain,
                industry: Industry().fake_with_rng(rng),
                size: pick(rng, COMPANY_SIZES).to_string(),
                location: CityName().fake_with_rng(rng),
                partner_status: *pick(rng, PARTNER_STATUSES),
                hiring_urgency: pick(rng, HIRING_URGENCY).to_string(),
                funding_amount: if rng.gen_bool(0.5) {
                    Some(rng.gen_range(500_000.0..50_000_000.0))
                } else {
                    None
                },
            }
        })
        .collect()
}

pub fn generate_contacts(rng: &mut StdRng, domain: &str, count: usize) -> Vec<ContactSeed> {
    (0..count)
        .map(|i| {
            let name: String = Name().fake_with_rng(rng);
            ContactSeed {
                email: format!("{}-{i}@{domain}", slug(&name)),
                name,
                title: pick(rng, &["CTO", "VP Engineering", "Head of Talent", "Recruiter"])
                    .to_string(),
                is_primary: i == 0,
            }
        })
        .collect()
}

pub fn generate_deals(rng: &mut StdRng, company_name: &str, count: usize) -> Vec<DealSeed> {
    (0..count)
        .map(|i| DealSeed {
            name: format!("{company_name} — engagement {}", i + 1),
            stage: *pick(rng, DEAL_STAGES),
            value: rng.gen_range(5_000.0..250_000.0),
            probability: rng.gen_range(0..=100),
            close_date: Utc::now().date_naive() + Duration::days(rng.gen_range(14..180)),
        })
        .collect()
}

pub fn generate_jobs(rng: &mut StdRng, count: usize) -> Vec<JobSeed> {
    (0..count)
        .map(|_| {
            let salary_min = rng.gen_range(90..160) * 1000;
            let mut requirements: Vec<String> = (0..3)
                .map(|_| pick(rng, SKILLS).to_string())
                .collect();
            requirements.dedup();
            JobSeed {
                title: pick(rng, JOB_TITLES).to_string(),
                status: *pick(rng, &[JobStatus::Draft, JobStatus::Published, JobStatus::Closed]),
                location: CityName().fake_with_rng(rng),
                salary_min,
                salary_max: salary_min + rng.gen_range(10..60) * 1000,
                requirements,
            }
        })
        .collect()
}

pub fn generate_candidates(rng: &mut StdRng, count: usize) -> Vec<CandidateSeed> {
    (0..count)
        .map(|i| {
            let name: String = Name().fake_with_rng(rng);
            CandidateSeed {
                email: format!("{}-{i}@example.com", slug(&name)),
                name,
                location: CityName().fake_with_rng(rng),
                headline: pick(rng, JOB_TITLES).to_string(),
                skills: (0..4).map(|_| pick(rng, SKILLS).to_string()).collect(),
            }
        })
        .collect()
}

/// Outcome of one submission insert attempt. `(job_id, candidate_id)` carries
/// a unique constraint, so a unique violation means the random pairing drew an
/// existing pair and the attempt is skipped rather than treated as a failure.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Inserted,
    DuplicateSkipped,
}

/// Folds a submission insert result into an outcome: unique violations become
/// `DuplicateSkipped`, every other error stays fatal.
pub fn classify_submission_insert(
    result: Result<(), sqlx::Error>,
) -> Result<SubmissionOutcome, sqlx::Error> {
    match result {
        Ok(()) => Ok(SubmissionOutcome::Inserted),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Ok(SubmissionOutcome::DuplicateSkipped)
        }
        Err(err) => Err(err),
    }
}

/// Populates a demo dataset. Duplicate `(job, candidate)` submission picks are
/// expected from random pairing; the resulting unique violations are skipped,
/// not fatal.
pub async fn seed_database(db: &Db, cfg: &SeedConfig) -> Result<SeedSummary> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut summary = SeedSummary::default();
    let pool = db.pool();

    let mut job_ids: Vec<Uuid> = Vec::new();

    for company in generate_companies(&mut rng, cfg.companies) {
        let company_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO companies
                (name, domain, industry, size, location, partner_status,
                 hiring_urgency, signals, funding_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&company.name)
        .bind(&company.domain)
        .bind(&company.industry)
        .bind(&company.size)
        .bind(&company.location)
        .bind(company.partner_status)
        .bind(&company.hiring_urgency)
        .bind(json!({ "source": "seed" }))
        .bind(company.funding_amount)
        .fetch_one(pool)
        .await?;
        summary.companies += 1;

        for contact in generate_contacts(&mut rng, &company.domain, cfg.contacts_per_company) {
            sqlx::query(
                "INSERT INTO contacts (company_id, name, title, email, is_primary) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(company_id)
            .bind(&contact.name)
            .bind(&contact.title)
            .bind(&contact.email)
            .bind(contact.is_primary)
            .execute(pool)
            .await?;
            summary.contacts += 1;
        }

        for deal in generate_deals(&mut rng, &company.name, cfg.deals_per_company) {
            sqlx::query(
                "INSERT INTO deals (company_id, name, stage, value, probability, close_date) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(company_id)
            .bind(&deal.name)
            .bind(deal.stage)
            .bind(deal.value)
            .bind(deal.probability)
            .bind(deal.close_date)
            .execute(pool)
            .await?;
            summary.deals += 1;
        }

        for job in generate_jobs(&mut rng, cfg.jobs_per_company) {
            let job_id: Uuid = sqlx::query_scalar(
                "INSERT INTO jobs \
                     (company_id, title, status, location, salary_min, salary_max, requirements) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id",
            )
            .bind(company_id)
            .bind(&job.title)
            .bind(job.status)
            .bind(&job.location)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.requirements)
            .fetch_one(pool)
            .await?;
            job_ids.push(job_id);
            summary.jobs += 1;
        }
    }

    let mut candidate_ids: Vec<Uuid> = Vec::new();
    for candidate in generate_candidates(&mut rng, cfg.candidates) {
        let candidate_id: Uuid = sqlx::query_scalar(
            "INSERT INTO candidates (name, email, location, headline, skills) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.location)
        .bind(&candidate.headline)
        .bind(&candidate.skills)
        .fetch_one(pool)
        .await?;
        candidate_ids.push(candidate_id);
        summary.candidates += 1;
    }

    if job_ids.is_empty() || candidate_ids.is_empty() {
        return Ok(summary);
    }

    for _ in 0..cfg.submission_attempts {
        let job_id = *pick(&mut rng, &job_ids);
        let candidate_id = *pick(&mut rng, &candidate_ids);
        let status = *pick(
            &mut rng,
            &[
                SubmissionStatus::Draft,
                SubmissionStatus::Sent,
                SubmissionStatus::Interview,
            ],
        );
        let result = sqlx::query(
            "INSERT INTO submissions (job_id, candidate_id, status, match_score) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(job_id)
        .bind(candidate_id)
        .bind(status)
        .bind(rng.gen_range(0.0..1.0_f64))
        .execute(pool)
        .await
        .map(|_| ());
        match classify_submission_insert(result)? {
            SubmissionOutcome::Inserted => summary.submissions += 1,
            SubmissionOutcome::DuplicateSkipped => {
                debug!("Skipping duplicate submission for job {job_id}");
                summary.duplicate_submissions_skipped += 1;
            }
        }
    }

    info!(
        "Seeded {} companies, {} contacts, {} deals, {} jobs, {} candidates, {} submissions ({} duplicates skipped)",
        summary.companies,
        summary.contacts,
        summary.deals,
        summary.jobs,
        summary.candidates,
        summary.submissions,
        summary.duplicate_submissions_skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_company_domains_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let companies = generate_companies(&mut rng, 50);
        let domains: HashSet<_> = companies.iter().map(|c| c.domain.clone()).collect();
        assert_eq!(domains.len(), companies.len());
    }

    #[test]
    fn test_deal_probability_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for deal in generate_deals(&mut rng, "Acme", 200) {
            assert!((0..=100).contains(&deal.probability));
        }
    }

    #[test]
    fn test_contact_emails_unique_and_scoped_to_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        let contacts = generate_contacts(&mut rng, "acme-0.com", 10);
        let emails: HashSet<_> = contacts.iter().map(|c| c.email.clone()).collect();
        assert_eq!(emails.len(), contacts.len());
        assert!(contacts.iter().all(|c| c.email.ends_with("@acme-0.com")));
    }

    #[test]
    fn test_first_contact_is_primary() {
        let mut rng = StdRng::seed_from_u64(7);
        let contacts = generate_contacts(&mut rng, "acme-0.com", 3);
        assert!(contacts[0].is_primary);
        assert!(!contacts[1].is_primary);
    }

    #[test]
    fn test_candidate_emails_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates = generate_candidates(&mut rng, 100);
        let emails: HashSet<_> = candidates.iter().map(|c| c.email.clone()).collect();
        assert_eq!(emails.len(), candidates.len());
    }

    #[test]
    fn test_job_salary_band_ordered() {
        let mut rng = StdRng::seed_from_u64(7);
        for job in generate_jobs(&mut rng, 50) {
            assert!(job.salary_min < job.salary_max);
        }
    }

    #[test]
    fn test_generation_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let first = generate_companies(&mut a, 5);
        let second = generate_companies(&mut b, 5);
        for (x, y) in first.iter().zip(&second) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.domain, y.domain);
        }
    }

    #[test]
    fn test_slug_strips_punctuation() {
        assert_eq!(slug("O'Brien & Sons, Inc."), "obrien-sons-inc");
    }

    use sqlx::error::DatabaseError;
    use std::error::Error as StdError;
    use std::fmt;

    /// Minimal driver-independent `DatabaseError` for exercising the
    /// submission insert classification.
    #[derive(Debug)]
    struct StubDbError {
        unique: bool,
    }

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl StdError for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            if self.unique {
                "duplicate key value violates unique constraint"
            } else {
                "deadlock detected"
            }
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn test_successful_insert_counts_as_inserted() {
        assert_eq!(
            classify_submission_insert(Ok(())).unwrap(),
            SubmissionOutcome::Inserted
        );
    }

    #[test]
    fn test_unique_violation_is_skipped_not_fatal() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: true }));
        assert_eq!(
            classify_submission_insert(Err(err)).unwrap(),
            SubmissionOutcome::DuplicateSkipped
        );
    }

    #[test]
    fn test_other_database_errors_propagate() {
        let err = sqlx::Error::Database(Box::new(StubDbError { unique: false }));
        let propagated = classify_submission_insert(Err(err)).unwrap_err();
        assert!(matches!(propagated, sqlx::Error::Database(_)));
    }

    #[test]
    fn test_non_database_errors_propagate() {
        let propagated = classify_submission_insert(Err(sqlx::Error::RowNotFound)).unwrap_err();
        assert!(matches!(propagated, sqlx::Error::RowNotFound));
    }
}
