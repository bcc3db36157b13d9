//! Schema definition and initialization.
//!
//! The full DDL lives here as an ordered list of statements so the init CLI
//! can execute it statement-by-statement, tolerating "already exists" errors
//! on re-runs. `InitMode::Reset` drops everything first and recreates from
//! scratch — destructive, dev/reset use only.

use anyhow::{bail, Result};
use sqlx::PgPool;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// Execute creates only, skipping statements that report "already exists".
    Tolerant,
    /// Drop tables and types in dependency order, then recreate everything.
    Reset,
}

/// Drops in reverse dependency order. Children before parents, tables before
/// the enum types they reference.
pub const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS screening_responses CASCADE",
    "DROP TABLE IF EXISTS screening_questions CASCADE",
    "DROP TABLE IF EXISTS sequence_runs CASCADE",
    "DROP TABLE IF EXISTS sequences CASCADE",
    "DROP TABLE IF EXISTS submissions CASCADE",
    "DROP TABLE IF EXISTS activities CASCADE",
    "DROP TABLE IF EXISTS email_templates CASCADE",
    "DROP TABLE IF EXISTS icps CASCADE",
    "DROP TABLE IF EXISTS candidates CASCADE",
    "DROP TABLE IF EXISTS jobs CASCADE",
    "DROP TABLE IF EXISTS deals CASCADE",
    "DROP TABLE IF EXISTS contacts CASCADE",
    "DROP TABLE IF EXISTS companies CASCADE",
    "DROP FUNCTION IF EXISTS set_updated_at() CASCADE",
    "DROP TYPE IF EXISTS partner_status",
    "DROP TYPE IF EXISTS deal_stage",
    "DROP TYPE IF EXISTS job_status",
    "DROP TYPE IF EXISTS submission_status",
    "DROP TYPE IF EXISTS run_status",
    "DROP TYPE IF EXISTS activity_kind",
];

pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#,
    "CREATE EXTENSION IF NOT EXISTS vector",
    // Enum types: state values are restricted at the database level, not just
    // in application code.
    "CREATE TYPE partner_status AS ENUM ('lead', 'prospect', 'active', 'inactive', 'churned')",
    "CREATE TYPE deal_stage AS ENUM ('prospect', 'discovery', 'proposal', 'won', 'lost')",
    "CREATE TYPE job_status AS ENUM ('draft', 'published', 'closed')",
    "CREATE TYPE submission_status AS ENUM ('draft', 'sent', 'interview', 'offer', 'rejected')",
    "CREATE TYPE run_status AS ENUM ('pending', 'sent', 'replied', 'stopped', 'completed')",
    "CREATE TYPE activity_kind AS ENUM ('email', 'note', 'call', 'status', 'meeting', 'task')",
    r#"
    CREATE TABLE companies (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        domain TEXT UNIQUE,
        industry TEXT,
        size TEXT,
        location TEXT,
        partner_status partner_status NOT NULL DEFAULT 'lead',
        hiring_urgency TEXT,
        signals JSONB NOT NULL DEFAULT '{}'::jsonb,
        funding_amount DOUBLE PRECISION,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE contacts (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        title TEXT,
        email TEXT NOT NULL UNIQUE,
        phone TEXT,
        is_primary BOOLEAN NOT NULL DEFAULT false,
        do_not_contact BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE deals (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        stage deal_stage NOT NULL DEFAULT 'prospect',
        value DOUBLE PRECISION,
        probability INTEGER CHECK (probability >= 0 AND probability <= 100),
        close_date DATE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE jobs (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT,
        status job_status NOT NULL DEFAULT 'draft',
        location TEXT,
        salary_min INTEGER,
        salary_max INTEGER,
        requirements TEXT[] NOT NULL DEFAULT '{}',
        nice_to_haves TEXT[] NOT NULL DEFAULT '{}',
        embedding vector(1536),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE candidates (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT,
        location TEXT,
        headline TEXT,
        skills TEXT[] NOT NULL DEFAULT '{}',
        tags TEXT[] NOT NULL DEFAULT '{}',
        education JSONB NOT NULL DEFAULT '[]'::jsonb,
        experience JSONB NOT NULL DEFAULT '[]'::jsonb,
        embedding vector(1536),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE submissions (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        candidate_id UUID NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
        status submission_status NOT NULL DEFAULT 'draft',
        match_score DOUBLE PRECISION,
        match_reasons JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (job_id, candidate_id)
    )
    "#,
    r#"
    CREATE TABLE activities (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        subject_type TEXT NOT NULL,
        subject_id UUID NOT NULL,
        kind activity_kind NOT NULL,
        body TEXT,
        occurred_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE sequences (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        steps JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE sequence_runs (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        sequence_id UUID NOT NULL REFERENCES sequences(id) ON DELETE CASCADE,
        contact_id UUID NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
        status run_status NOT NULL DEFAULT 'pending',
        current_step INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (sequence_id, contact_id)
    )
    "#,
    r#"
    CREATE TABLE icps (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        industry TEXT,
        size_min INTEGER,
        size_max INTEGER,
        tech_keywords TEXT[] NOT NULL DEFAULT '{}',
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE screening_questions (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        job_id UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        prompt TEXT NOT NULL,
        knockout BOOLEAN NOT NULL DEFAULT false,
        position INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE screening_responses (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        submission_id UUID NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
        question_id UUID NOT NULL REFERENCES screening_questions(id) ON DELETE CASCADE,
        answer TEXT,
        passed BOOLEAN,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (submission_id, question_id)
    )
    "#,
    r#"
    CREATE TABLE email_templates (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name TEXT NOT NULL,
        subject TEXT,
        body TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX idx_contacts_company ON contacts(company_id)",
    "CREATE INDEX idx_deals_company ON deals(company_id)",
    "CREATE INDEX idx_deals_stage ON deals(stage)",
    "CREATE INDEX idx_jobs_company ON jobs(company_id)",
    "CREATE INDEX idx_jobs_status ON jobs(status)",
    "CREATE INDEX idx_submissions_job ON submissions(job_id)",
    "CREATE INDEX idx_submissions_candidate ON submissions(candidate_id)",
    "CREATE INDEX idx_activities_subject ON activities(subject_type, subject_id)",
    "CREATE INDEX idx_sequence_runs_sequence ON sequence_runs(sequence_id)",
    "CREATE INDEX idx_screening_questions_job ON screening_questions(job_id)",
    // updated_at is maintained by the database; applications never set it.
    r#"
    CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
    BEGIN
        NEW.updated_at = now();
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql
    "#,
    "CREATE TRIGGER companies_set_updated_at BEFORE UPDATE ON companies FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER contacts_set_updated_at BEFORE UPDATE ON contacts FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER deals_set_updated_at BEFORE UPDATE ON deals FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER jobs_set_updated_at BEFORE UPDATE ON jobs FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER candidates_set_updated_at BEFORE UPDATE ON candidates FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER submissions_set_updated_at BEFORE UPDATE ON submissions FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER activities_set_updated_at BEFORE UPDATE ON activities FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER sequences_set_updated_at BEFORE UPDATE ON sequences FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER sequence_runs_set_updated_at BEFORE UPDATE ON sequence_runs FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER icps_set_updated_at BEFORE UPDATE ON icps FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER screening_questions_set_updated_at BEFORE UPDATE ON screening_questions FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER screening_responses_set_updated_at BEFORE UPDATE ON screening_responses FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
    "CREATE TRIGGER email_templates_set_updated_at BEFORE UPDATE ON email_templates FOR EACH ROW EXECUTE FUNCTION set_updated_at()",
];

/// Whether a statement failure can be skipped during a tolerant init.
/// Matches the Postgres "already exists" family (tables, types, triggers,
/// indexes all phrase it this way).
pub fn is_tolerable(message: &str) -> bool {
    message.contains("already exists")
}

/// Executes the schema statements against `pool`.
///
/// Tolerant mode skips "already exists" failures so re-running against an
/// initialized database succeeds; any other failure aborts. Reset mode runs
/// the drop list first.
pub async fn init_schema(pool: &PgPool, mode: InitMode) -> Result<()> {
    if mode == InitMode::Reset {
        warn!("Reset mode: dropping existing tables and types");
        for stmt in DROP_STATEMENTS {
            sqlx::query(stmt).execute(pool).await?;
        }
    }

    let mut executed = 0usize;
    let mut skipped = 0usize;
    for stmt in SCHEMA_STATEMENTS {
        match sqlx::query(stmt).execute(pool).await {
            Ok(_) => executed += 1,
            Err(err) => {
                let message = err.to_string();
                if mode == InitMode::Tolerant && is_tolerable(&message) {
                    skipped += 1;
                    continue;
                }
                bail!("Schema statement failed: {message}\nStatement: {stmt}");
            }
        }
    }

    info!("Schema initialized ({executed} statements executed, {skipped} skipped)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_table_statements() -> Vec<&'static str> {
        SCHEMA_STATEMENTS
            .iter()
            .copied()
            .filter(|s| s.trim_start().starts_with("CREATE TABLE"))
            .collect()
    }

    #[test]
    fn test_tolerable_already_exists() {
        assert!(is_tolerable(r#"error returned from database: relation "companies" already exists"#));
        assert!(is_tolerable(r#"type "deal_stage" already exists"#));
    }

    #[test]
    fn test_not_tolerable_other_errors() {
        assert!(!is_tolerable("syntax error at or near \"CREAT\""));
        assert!(!is_tolerable("permission denied for schema public"));
    }

    #[test]
    fn test_every_table_has_timestamps() {
        for stmt in create_table_statements() {
            assert!(stmt.contains("created_at TIMESTAMPTZ"), "missing created_at: {stmt}");
            assert!(stmt.contains("updated_at TIMESTAMPTZ"), "missing updated_at: {stmt}");
        }
    }

    #[test]
    fn test_every_table_has_updated_at_trigger() {
        let tables: Vec<&str> = create_table_statements()
            .iter()
            .map(|s| {
                s.trim_start()
                    .strip_prefix("CREATE TABLE ")
                    .unwrap()
                    .split_whitespace()
                    .next()
                    .unwrap()
            })
            .collect();
        assert_eq!(tables.len(), 13);
        for table in tables {
            let trigger = format!("BEFORE UPDATE ON {table} ");
            assert!(
                SCHEMA_STATEMENTS.iter().any(|s| s.contains(&trigger)),
                "no updated_at trigger for {table}"
            );
        }
    }

    #[test]
    fn test_company_children_cascade() {
        for table in ["contacts", "deals", "jobs"] {
            let stmt = create_table_statements()
                .into_iter()
                .find(|s| s.contains(&format!("CREATE TABLE {table} ")))
                .unwrap();
            assert!(
                stmt.contains("REFERENCES companies(id) ON DELETE CASCADE"),
                "{table} must cascade from companies"
            );
        }
    }

    #[test]
    fn test_transitive_cascades() {
        let all = SCHEMA_STATEMENTS.join("\n");
        assert!(all.contains("REFERENCES jobs(id) ON DELETE CASCADE"));
        assert!(all.contains("REFERENCES candidates(id) ON DELETE CASCADE"));
        assert!(all.contains("REFERENCES contacts(id) ON DELETE CASCADE"));
        assert!(all.contains("REFERENCES submissions(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_submission_pair_unique() {
        let stmt = create_table_statements()
            .into_iter()
            .find(|s| s.contains("CREATE TABLE submissions"))
            .unwrap();
        assert!(stmt.contains("UNIQUE (job_id, candidate_id)"));
    }

    #[test]
    fn test_probability_check_bounds() {
        let stmt = create_table_statements()
            .into_iter()
            .find(|s| s.contains("CREATE TABLE deals"))
            .unwrap();
        assert!(stmt.contains("CHECK (probability >= 0 AND probability <= 100)"));
    }

    #[test]
    fn test_no_stage_probability_rule() {
        // Stage and probability are independent columns; the CHECK is the
        // only constraint on probability.
        let all = SCHEMA_STATEMENTS.join("\n");
        assert!(!all.contains("stage = 'won'"));
    }

    #[test]
    fn test_drops_cover_all_tables_and_types() {
        for table in create_table_statements().iter().map(|s| {
            s.trim_start()
                .strip_prefix("CREATE TABLE ")
                .unwrap()
                .split_whitespace()
                .next()
                .unwrap()
        }) {
            assert!(
                DROP_STATEMENTS
                    .iter()
                    .any(|d| d.contains(&format!("DROP TABLE IF EXISTS {table} "))),
                "no drop for table {table}"
            );
        }
        for ty in [
            "partner_status",
            "deal_stage",
            "job_status",
            "submission_status",
            "run_status",
            "activity_kind",
        ] {
            assert!(
                DROP_STATEMENTS
                    .iter()
                    .any(|d| d.contains(&format!("DROP TYPE IF EXISTS {ty}"))),
                "no drop for type {ty}"
            );
        }
    }

    #[test]
    fn test_children_drop_before_parents() {
        let pos = |needle: &str| {
            DROP_STATEMENTS
                .iter()
                .position(|d| d.contains(needle))
                .unwrap()
        };
        assert!(pos("submissions") < pos("DROP TABLE IF EXISTS jobs"));
        assert!(pos("screening_responses") < pos("screening_questions"));
        assert!(pos("sequence_runs") < pos("DROP TABLE IF EXISTS sequences"));
        assert!(pos("DROP TABLE IF EXISTS contacts") < pos("DROP TABLE IF EXISTS companies"));
    }
}
