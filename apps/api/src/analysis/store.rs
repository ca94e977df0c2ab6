//! Persistence for analyses. `AppState` carries an `Arc<dyn AnalysisStore>`;
//! production uses `PgAnalysisStore`, router tests use the in-memory store
//! from `testing`.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;

/// What gets saved for one upload.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub category: String,
    pub role: String,
    pub file_name: Option<String>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub category: String,
    pub role: String,
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Saves the resume payload and its analysis together; returns the analysis id.
    async fn save(&self, record: &AnalysisRecord) -> Result<Uuid, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredAnalysis>, AppError>;
}

/// Resume payload: the extracted profile, keyed the way the resume table
/// has always stored it.
fn resume_payload(record: &AnalysisRecord) -> Value {
    let fields = &record.analysis.fields;
    json!({
        "personal_info": {
            "name": fields.name,
            "email": fields.email,
            "phone": fields.phone,
            "linkedin": fields.linkedin,
            "github": fields.github,
            "portfolio": fields.portfolio,
        },
        "summary": fields.summary,
        "target_role": record.role,
        "target_category": record.category,
        "file_name": record.file_name,
        "education": fields.education,
        "experience": fields.experience,
        "projects": fields.projects,
        "skills": fields.skills,
    })
}

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: Uuid,
    resume_id: Uuid,
    target_category: String,
    target_role: String,
    payload: Value,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn save(&self, record: &AnalysisRecord) -> Result<Uuid, AppError> {
        let analysis = &record.analysis;
        let analysis_payload =
            serde_json::to_value(analysis).context("Failed to serialize analysis payload")?;
        let resume_id = Uuid::new_v4();
        let analysis_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO resumes (id, target_category, target_role, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(resume_id)
        .bind(&record.category)
        .bind(&record.role)
        .bind(resume_payload(record))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO resume_analyses
                (id, resume_id, ats_score, keyword_match_score, format_score, section_score,
                 missing_skills, recommendations, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(analysis_id)
        .bind(resume_id)
        .bind(analysis.ats_score as i32)
        .bind(analysis.keyword_match.score as i32)
        .bind(analysis.format_score as i32)
        .bind(analysis.section_score as i32)
        .bind(analysis.keyword_match.missing_skills.join(","))
        .bind(analysis.suggestions.join(","))
        .bind(analysis_payload)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(%analysis_id, %resume_id, "Saved resume analysis");
        Ok(analysis_id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredAnalysis>, AppError> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.resume_id, r.target_category, r.target_role, a.payload, a.created_at
            FROM resume_analyses a
            JOIN resumes r ON r.id = a.resume_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let analysis: AnalysisResult = serde_json::from_value(row.payload)
            .with_context(|| format!("Stored analysis {} has an unreadable payload", row.id))?;

        Ok(Some(StoredAnalysis {
            id: row.id,
            resume_id: row.resume_id,
            category: row.target_category,
            role: row.target_role,
            analysis,
            created_at: row.created_at,
        }))
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryAnalysisStore {
        records: Mutex<HashMap<Uuid, StoredAnalysis>>,
    }

    impl MemoryAnalysisStore {
        pub fn insert(&self, stored: StoredAnalysis) {
            self.records.lock().unwrap().insert(stored.id, stored);
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AnalysisStore for MemoryAnalysisStore {
        async fn save(&self, record: &AnalysisRecord) -> Result<Uuid, AppError> {
            let id = Uuid::new_v4();
            self.insert(StoredAnalysis {
                id,
                resume_id: Uuid::new_v4(),
                category: record.category.clone(),
                role: record.role.clone(),
                analysis: record.analysis.clone(),
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn get(&self, id: Uuid) -> Result<Option<StoredAnalysis>, AppError> {
            Ok(self.records.lock().unwrap().get(&id).cloned())
        }
    }

    /// Every call fails the way an unreachable database would.
    pub struct FailingAnalysisStore;

    #[async_trait]
    impl AnalysisStore for FailingAnalysisStore {
        async fn save(&self, _record: &AnalysisRecord) -> Result<Uuid, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _id: Uuid) -> Result<Option<StoredAnalysis>, AppError> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }
}
