use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::store::AnalysisStore;
use crate::catalog::courses::CourseCatalog;
use crate::catalog::roles::RoleCatalog;
use crate::catalog::videos::VideoCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analysis store. Default: PgAnalysisStore.
    pub store: Arc<dyn AnalysisStore>,
    pub analyzer: ResumeAnalyzer,
    pub roles: &'static RoleCatalog,
    pub courses: &'static CourseCatalog,
    pub videos: &'static VideoCatalog,
}
