//! Axum route handlers for roadmap generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client;
use crate::roadmap::planner::{self, Roadmap};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoadmapGenerateRequest {
    pub resume_id: Uuid,
    pub jd_id: Uuid,
    /// 4–12 weeks; defaults to 8.
    pub target_weeks: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub success: bool,
    pub data: Roadmap,
    pub message: String,
}

/// POST /api/v1/roadmap/generate
///
/// Builds the N-week personalized learning roadmap from the match result
/// and its skill gap.
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Json(request): Json<RoadmapGenerateRequest>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let roadmap = planner::generate_roadmap(
        &state.store,
        &state.llm,
        &state.catalog,
        request.resume_id,
        request.jd_id,
        request.target_weeks,
    )
    .await?;

    Ok(Json(RoadmapResponse {
        success: true,
        data: roadmap,
        message: "Roadmap generated successfully".to_string(),
    }))
}

/// GET /api/v1/roadmap/health
pub async fn handle_roadmap_health(State(state): State<AppState>) -> Json<Value> {
    let configured = !state.config.openai_api_key.is_empty();
    Json(json!({
        "status": if configured { "ok" } else { "degraded" },
        "service": "roadmap",
        "llm_model": llm_client::MODEL,
        "catalog_resources": state.catalog.resource_count(),
    }))
}
