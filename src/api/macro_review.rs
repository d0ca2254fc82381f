use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::api::AppState;
use crate::clients::ai::prompts::build_macro_review_prompt;
use crate::types::{MacroReviewRequest, MacroReviewResponse, ResponseMetadata};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MacroReviewRequest>,
) -> Result<Json<MacroReviewResponse>> {
    let start = Instant::now();

    let prompt = build_macro_review_prompt(&request.match_data);

    state.in_flight.store(true, Ordering::SeqCst);
    let result = state.engine.generate(&prompt).await;
    state.in_flight.store(false, Ordering::SeqCst);
    let text = result?;

    // Rendered as markdown by the dashboard, no parsing on this path.
    let agenda = format!(
        "{}\n\n---\n🤖 Generated by {} AI Assistant Coach",
        text, request.match_data.team_name
    );

    Ok(Json(MacroReviewResponse {
        agenda,
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: start.elapsed().as_millis() as u64,
            model_used: state.engine.model_used(),
        },
    }))
}
