use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::analysis::models::RoleProfile;
use crate::catalog::courses::Course;
use crate::catalog::roles::RoleCatalog;
use crate::catalog::videos::VideoCatalog;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RoleDetailResponse {
    pub category: String,
    pub role: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub courses: Vec<Course>,
    pub videos: &'static VideoCatalog,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<&'static RoleCatalog> {
    Json(state.roles)
}

/// GET /api/v1/roles/:category/:role
pub async fn handle_get_role(
    State(state): State<AppState>,
    Path((category, role)): Path<(String, String)>,
) -> Result<Json<RoleDetailResponse>, AppError> {
    let (category, entry) = state
        .roles
        .role(&category, &role)
        .ok_or_else(|| AppError::NotFound(format!("Role '{role}' in category '{category}'")))?;

    Ok(Json(RoleDetailResponse {
        category: category.name.clone(),
        role: entry.name.clone(),
        profile: entry.profile.clone(),
        courses: state.courses.recommend(Some(&category.name), &entry.name),
        videos: state.videos,
    }))
}
