//! Personalised attraction recommendations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::itinerary::{AttractionRecommendation, LocationInfo, UserPreferences};

/// Body of `POST /api/recommendations/`.
///
/// The backend fills in `["natural", "scenic"]` when no activity types are
/// given and returns six results when `top_k` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub preferences: UserPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<LocationInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_visited: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl RecommendationRequest {
    pub fn new(user_id: impl Into<String>, preferences: UserPreferences) -> Self {
        Self {
            user_id: user_id.into(),
            preferences,
            current_location: None,
            exclude_visited: Vec::new(),
            top_k: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<AttractionRecommendation>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub algorithm_used: Option<String>,
    #[serde(default)]
    pub context: Map<String, Value>,
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,
    /// Stub backends report their filters here instead of in `context`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecommendationResponse {
    /// Names in ranked order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recommendations.iter().map(|r| r.name.as_str())
    }
}
