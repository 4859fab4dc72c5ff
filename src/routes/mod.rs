pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::matching::handlers as analysis;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // ── Upload ─────────────────────────────────────────────────────────
        .route("/api/v1/upload", post(ingest::handle_upload))
        // ── Analysis ───────────────────────────────────────────────────────
        .route("/api/v1/analysis/health", get(analysis::handle_analysis_health))
        .route(
            "/api/v1/analysis/documents/:file_id",
            get(ingest::handle_document_status).delete(ingest::handle_delete_document),
        )
        .route("/api/v1/analysis/match", post(analysis::handle_match))
        .route(
            "/api/v1/analysis/gap-analysis",
            post(analysis::handle_gap_analysis),
        )
        // ── Roadmap ────────────────────────────────────────────────────────
        .route(
            "/api/v1/roadmap/generate",
            post(roadmap::handle_generate_roadmap),
        )
        .route("/api/v1/roadmap/health", get(roadmap::handle_roadmap_health))
        .with_state(state)
}
