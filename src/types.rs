use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Insight Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    pub narrative: String,
    pub recommendation: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KastCorrelations,
    SetupPatterns,
    EconomyPatterns,
    TimingPatterns,
}

impl Category {
    /// Maps a free-text label to the closed category set, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "kast_correlations" => Some(Category::KastCorrelations),
            "setup_patterns" => Some(Category::SetupPatterns),
            "economy_patterns" => Some(Category::EconomyPatterns),
            "timing_patterns" => Some(Category::TimingPatterns),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    /// Unrecognized labels coerce to `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Medium,
        }
    }
}

/// All four category buckets are always present; each preserves the order
/// in which insights appeared in the source text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsBundle {
    pub kast_correlations: Vec<Insight>,
    pub setup_patterns: Vec<Insight>,
    pub economy_patterns: Vec<Insight>,
    pub timing_patterns: Vec<Insight>,
}

impl InsightsBundle {
    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<Insight> {
        match category {
            Category::KastCorrelations => &mut self.kast_correlations,
            Category::SetupPatterns => &mut self.setup_patterns,
            Category::EconomyPatterns => &mut self.economy_patterns,
            Category::TimingPatterns => &mut self.timing_patterns,
        }
    }

    pub fn total(&self) -> usize {
        self.kast_correlations.len()
            + self.setup_patterns.len()
            + self.economy_patterns.len()
            + self.timing_patterns.len()
    }
}

// Match Statistics Types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStats {
    pub team_name: String,
    pub matches_analyzed: u32,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub win_rate_by_map: BTreeMap<String, f64>,
    #[serde(default)]
    pub site_preferences: BTreeMap<String, f64>,
    #[serde(default)]
    pub aggression: Aggression,
    #[serde(default)]
    pub agent_composition: Vec<AgentPick>,
    #[serde(default)]
    pub player_tendencies: Vec<PlayerTendency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggression {
    pub style: Option<String>,
    pub avg_duration: Option<f64>,
    pub rush_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPick {
    pub agent: String,
    pub pick_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTendency {
    pub player: String,
    pub kd_ratio: Option<f64>,
    pub avg_kills: Option<f64>,
    pub avg_deaths: Option<f64>,
    pub first_kill_rate: Option<f64>,
    pub top_agent: Option<String>,
    pub top_agent_rate: Option<f64>,
}

// Request Types
#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub match_data: MatchStats,
}

#[derive(Debug, Deserialize)]
pub struct MacroReviewRequest {
    pub match_data: MatchStats,
}

#[derive(Debug, Deserialize)]
pub struct WhatIfRequest {
    pub query: String,
    pub match_data: MatchStats,
}

// Response Types
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: InsightsBundle,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct MacroReviewResponse {
    pub agenda: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct WhatIfResponse {
    pub analysis: String,
    pub query: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub in_flight: bool,
}

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    pub timestamp: String,
    pub execution_time_ms: u64,
    pub model_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_fold_case() {
        assert_eq!(
            Category::from_label("KAST_Correlations"),
            Some(Category::KastCorrelations)
        );
        assert_eq!(Category::from_label("momentum_patterns"), None);
    }

    #[test]
    fn unrecognized_severity_defaults_to_medium() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label("urgent"), Severity::Medium);
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn bundle_serializes_all_four_buckets_when_empty() {
        let value = serde_json::to_value(InsightsBundle::default()).unwrap();
        for key in [
            "kast_correlations",
            "setup_patterns",
            "economy_patterns",
            "timing_patterns",
        ] {
            assert_eq!(value[key], serde_json::json!([]));
        }
    }

    #[test]
    fn match_stats_fixture_deserializes() {
        let fixture = serde_json::json!({
            "team_name": "Cloud9",
            "matches_analyzed": 24,
            "metrics": {
                "win_rate": 48.5,
                "win_rate_by_map": { "Haven": 55.0, "Bind": 41.2 },
                "site_preferences": { "A": 46.0, "B": 32.0, "C": 22.0 },
                "aggression": {
                    "style": "Aggressive",
                    "avg_duration": 42.3,
                    "rush_rate": 31.0
                },
                "agent_composition": [
                    { "agent": "jett", "pick_rate": 88.0 }
                ],
                "player_tendencies": [
                    {
                        "player": "OXY",
                        "kd_ratio": 0.85,
                        "avg_kills": 14.2,
                        "avg_deaths": 16.7,
                        "first_kill_rate": 8.3,
                        "top_agent": "jett",
                        "top_agent_rate": 72.0
                    }
                ]
            }
        });

        let stats: MatchStats = serde_json::from_value(fixture).unwrap();
        assert_eq!(stats.team_name, "Cloud9");
        assert_eq!(stats.metrics.player_tendencies[0].player, "OXY");
        assert_eq!(stats.metrics.win_rate_by_map["Haven"], 55.0);
    }

    #[test]
    fn partial_metrics_deserialize_with_defaults() {
        let fixture = serde_json::json!({
            "team_name": "Cloud9",
            "matches_analyzed": 3,
            "metrics": { "win_rate": 50.0 }
        });

        let stats: MatchStats = serde_json::from_value(fixture).unwrap();
        assert!(stats.metrics.player_tendencies.is_empty());
        assert!(stats.metrics.aggression.style.is_none());
    }
}
