use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::api::AppState;
use crate::clients::ai::prompts::build_insights_prompt;
use crate::decoder::decode_insights;
use crate::types::{InsightsRequest, InsightsResponse, ResponseMetadata};
use crate::Result;

pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>> {
    let start = Instant::now();

    let prompt = build_insights_prompt(&request.match_data);

    state.in_flight.store(true, Ordering::SeqCst);
    let result = state.engine.generate(&prompt).await;
    state.in_flight.store(false, Ordering::SeqCst);
    let raw = result?;

    let insights = decode_insights(&raw);
    tracing::info!(total = insights.total(), "decoded insights response");

    Ok(Json(InsightsResponse {
        insights,
        metadata: ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            execution_time_ms: start.elapsed().as_millis() as u64,
            model_used: state.engine.model_used(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{EngineConfig, LlmEngine};
    use crate::types::{MatchStats, Metrics};
    use crate::AppError;

    #[tokio::test]
    async fn engine_error_propagates_and_clears_in_flight() {
        let state = Arc::new(AppState::new(
            LlmEngine::new(EngineConfig::default()).unwrap(),
        ));
        let request = InsightsRequest {
            match_data: MatchStats {
                team_name: "Cloud9".to_string(),
                matches_analyzed: 1,
                metrics: Metrics::default(),
            },
        };

        let err = handler(State(state.clone()), Json(request))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(!state.in_flight.load(Ordering::SeqCst));
    }
}
