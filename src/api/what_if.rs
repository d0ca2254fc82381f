use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::api::AppState;
use crate::clients::ai::prompts::build_what_if_prompt;
use crate::types::{ResponseMetadata, WhatIfRequest, WhatIfResponse};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WhatIfRequest>,
) -> Result<Json<WhatIfResponse>> {
    let start = Instant::now();

    // Rejected before any prompt is built; the builder itself does not
    // validate the question.
    let query = request.query.trim();
    if query.is_empty() {
        return Err(crate::AppError::InvalidInput(
            "Please enter a question".to_string(),
        ));
    }

    let prompt = build_what_if_prompt(query, &request.match_data);

    state.in_flight.store(true, Ordering::SeqCst);
    let result = state.engine.generate(&prompt).await;
    state.in_flight.store(false, Ordering::SeqCst);
    let analysis = result?;

    Ok(Json(WhatIfResponse {
        analysis,
        query: query.to_string(),
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: start.elapsed().as_millis() as u64,
            model_used: state.engine.model_used(),
        },
    }))
}
