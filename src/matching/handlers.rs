//! Axum route handlers for match analysis and gap analysis.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{self, MatchResult};
use crate::matching::feedback::{self, Feedback};
use crate::roadmap::planner::compute_gap_set;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_document_id: Uuid,
    pub jd_document_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub success: bool,
    pub data: MatchResult,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GapAnalysisResponse {
    pub success: bool,
    pub data: GapAnalysisData,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GapAnalysisData {
    #[serde(flatten)]
    pub match_result: MatchResult,
    pub feedback: Feedback,
}

/// POST /api/v1/analysis/match
///
/// Pure function of the two ingested documents: similarity, section
/// scores, similar-tech bonus, score, and grade. 422 when either id is
/// unknown or not yet `completed`.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let result = engine::analyze_match(
        &state.store,
        &state.catalog,
        request.resume_document_id,
        request.jd_document_id,
    )
    .await?;

    let message = if result.insufficient_data {
        "Match computed with insufficient data".to_string()
    } else {
        "Match analysis completed".to_string()
    };

    Ok(Json(MatchResponse {
        success: true,
        data: result,
        message,
    }))
}

/// POST /api/v1/analysis/gap-analysis
///
/// Match analysis plus the LLM feedback block (strengths, improvements,
/// potential, action items).
pub async fn handle_gap_analysis(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<GapAnalysisResponse>, AppError> {
    let (match_result, keyword_analysis) = engine::analyze_full(
        &state.store,
        &state.catalog,
        request.resume_document_id,
        request.jd_document_id,
    )
    .await?;

    let gap_set = compute_gap_set(
        &keyword_analysis,
        &match_result.similar_tech,
        &match_result.section_scores,
    );
    let gap_keywords: Vec<String> = gap_set.into_iter().map(|g| g.keyword).collect();

    let feedback = feedback::generate_feedback(&state.llm, &match_result, &gap_keywords).await;

    Ok(Json(GapAnalysisResponse {
        success: true,
        data: GapAnalysisData {
            match_result,
            feedback,
        },
        message: "Gap analysis completed".to_string(),
    }))
}

/// GET /api/v1/analysis/health
pub async fn handle_analysis_health(State(state): State<AppState>) -> Json<Value> {
    // A cheap store round-trip tells us whether the vector store is up.
    let store_ok = state
        .store
        .get_document_by_file_id(Uuid::nil())
        .await
        .is_ok();

    Json(json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "service": "analysis",
        "vector_store": if store_ok { "connected" } else { "disconnected" },
    }))
}
