mod analysis;
mod catalog;
mod config;
mod db;
mod errors;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::analysis::store::PgAnalysisStore;
use crate::catalog::courses::CourseCatalog;
use crate::catalog::roles::RoleCatalog;
use crate::catalog::videos::VideoCatalog;
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    let limits = config.analysis_limits();
    info!(
        max_document_bytes = limits.max_document_bytes,
        max_text_bytes = limits.max_text_bytes,
        "Analysis limits"
    );

    // Build app state
    let state = AppState {
        store: Arc::new(PgAnalysisStore::new(db)),
        analyzer: ResumeAnalyzer::new(limits),
        roles: RoleCatalog::builtin(),
        courses: CourseCatalog::builtin(),
        videos: VideoCatalog::builtin(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
