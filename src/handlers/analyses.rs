//! Symptom analysis submissions

use super::{ApiResponse, AppState};
use crate::core::auth::Principal;
use crate::core::error::PortalError;
use crate::core::validation::Validated;
use crate::entities::{SymptomAnalysis, SymptomRequest};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// `POST /analyses`
pub async fn submit_analysis(
    State(state): State<AppState>,
    principal: Principal,
    Validated(body): Validated<SymptomRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let analysis = SymptomAnalysis::new(principal.id, body.symptoms);
    let analysis = match state.analyzer.analyze(&analysis.symptoms).await {
        Ok(outcome) => analysis.with_outcome(outcome),
        Err(e) => {
            tracing::warn!(analysis_id = %analysis.id, error = %e, "symptom analyzer failed");
            analysis.failed()
        }
    };
    let analysis = state.analyses.create(analysis).await?;
    tracing::debug!(analysis_id = %analysis.id, status = ?analysis.status, "analysis submitted");

    Ok((StatusCode::CREATED, ApiResponse::ok(analysis)))
}

/// `GET /analyses`
pub async fn list_analyses(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<SymptomAnalysis>>>, PortalError> {
    let mut analyses: Vec<SymptomAnalysis> = state
        .analyses
        .list()
        .await?
        .into_iter()
        .filter(|a| a.visible_to(&principal))
        .collect();
    analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(ApiResponse::ok(analyses))
}
