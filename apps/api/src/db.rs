use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id              UUID PRIMARY KEY,
        target_category TEXT NOT NULL,
        target_role     TEXT NOT NULL,
        payload         JSONB NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resume_analyses (
        id                  UUID PRIMARY KEY,
        resume_id           UUID NOT NULL REFERENCES resumes (id) ON DELETE CASCADE,
        ats_score           INTEGER NOT NULL,
        keyword_match_score INTEGER NOT NULL,
        format_score        INTEGER NOT NULL,
        section_score       INTEGER NOT NULL,
        missing_skills      TEXT NOT NULL,
        recommendations     TEXT NOT NULL,
        payload             JSONB NOT NULL,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS resume_analyses_resume_id_idx ON resume_analyses (resume_id)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the resume and analysis tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
