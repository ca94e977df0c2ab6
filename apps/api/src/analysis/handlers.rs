use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::AnalysisResult;
use crate::analysis::store::{AnalysisRecord, StoredAnalysis};
use crate::catalog::courses::Course;
use crate::catalog::videos::VideoCatalog;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    /// Absent when the analysis could not be saved.
    pub id: Option<Uuid>,
    pub category: String,
    pub role: String,
    pub analysis: AnalysisResult,
    pub recommended_courses: Vec<Course>,
    pub tip_videos: &'static VideoCatalog,
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct UploadForm {
    file: Option<Bytes>,
    content_type: Option<String>,
    file_name: Option<String>,
    category: Option<String>,
    role: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.content_type = field.content_type().map(str::to_string);
                form.file_name = field.file_name().map(str::to_string);
                form.file = Some(field.bytes().await.map_err(multipart_error)?);
            }
            "category" => form.category = Some(field.text().await.map_err(multipart_error)?),
            "role" => form.role = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }
    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InputTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart form: {}", err.body_text()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/v1/analyses
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart).await?;

    let bytes = form
        .file
        .ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    let role_name = non_blank(form.role)
        .ok_or_else(|| AppError::Validation("Missing 'role' field".to_string()))?;

    let found = match non_blank(form.category) {
        Some(category) => state.roles.role(&category, &role_name),
        None => state.roles.find_role(&role_name),
    };
    let (category, entry) =
        found.ok_or_else(|| AppError::Validation(format!("Unknown role '{role_name}'")))?;

    info!(
        file_name = form.file_name.as_deref().unwrap_or("-"),
        bytes = bytes.len(),
        category = %category.name,
        role = %entry.name,
        "Analyzing uploaded resume"
    );

    // Extraction and scoring are CPU-bound.
    let analyzer = state.analyzer;
    let profile = entry.profile.clone();
    let content_type = form.content_type;
    let file_name = form.file_name.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        analyzer.analyze_document(&bytes, content_type.as_deref(), file_name.as_deref(), &profile)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))??;

    let mut warnings = Vec::new();
    if !analysis.document_type.is_resume() {
        warnings.push(format!(
            "Detected document type '{}'. Upload a resume for the full ATS analysis.",
            analysis.document_type
        ));
    }

    let record = AnalysisRecord {
        category: category.name.clone(),
        role: entry.name.clone(),
        file_name: form.file_name,
        analysis,
    };
    let id = match state.store.save(&record).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "Could not save resume analysis");
            warnings.push(
                "The analysis could not be saved and will not be available for download."
                    .to_string(),
            );
            None
        }
    };

    let status = if id.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let response = AnalysisResponse {
        id,
        recommended_courses: state.courses.recommend(Some(&record.category), &record.role),
        tip_videos: state.videos,
        category: record.category,
        role: record.role,
        analysis: record.analysis,
        warnings,
    };
    Ok((status, Json(response)))
}

async fn load(state: &AppState, id: Uuid) -> Result<StoredAnalysis, AppError> {
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredAnalysis>, AppError> {
    Ok(Json(load(&state, id).await?))
}

/// GET /api/v1/analyses/:id/download
pub async fn handle_download_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stored = load(&state, id).await?;
    let file_name = download_file_name(&stored);
    let body = serde_json::to_vec_pretty(&stored.analysis)
        .context("Failed to serialize analysis for download")?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

fn download_file_name(stored: &StoredAnalysis) -> String {
    format!("analysis_{}.json", stored.created_at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::analysis::analyzer::ResumeAnalyzer;
    use crate::analysis::models::RoleProfile;

    #[test]
    fn test_download_file_name_uses_creation_time() {
        let analysis = ResumeAnalyzer::default()
            .analyze("hello", &RoleProfile::new("x", &["python"]))
            .unwrap();
        let stored = StoredAnalysis {
            id: Uuid::nil(),
            resume_id: Uuid::nil(),
            category: "Data Science".to_string(),
            role: "Data Scientist".to_string(),
            analysis,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
        };
        assert_eq!(download_file_name(&stored), "analysis_20240309070501.json");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("Data".to_string())).as_deref(), Some("Data"));
    }
}
