//! Saved itineraries and generated itinerary plans.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/itineraries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItinerary {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedItinerary {
    pub id: String,
    #[serde(default)]
    pub s3_key: Option<String>,
}

/// A stored itinerary as listed by `/api/itineraries/me`.
///
/// Hand-built itineraries carry `id`/`title`/`items`; saved plans carry
/// `itinerary_id`/`days`/`summary`. Both shapes land here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(alias = "itinerary_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub summary: Option<PlanSummary>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, rename = "createdAt", alias = "saved_at")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Itinerary {
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ if !self.days.is_empty() => format!("{}-day plan", self.days.len()),
            _ => "Untitled itinerary".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub status: String,
    pub itinerary_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResult {
    pub status: String,
    pub count: u64,
}

/// Preference block of a plan request. Unset fields are left to the
/// backend's defaults and are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_travel_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_size: Option<u32>,
    /// Trip length in days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body of `POST /api/itineraries/plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryPlanRequest {
    pub user_id: String,
    pub preferences: UserPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<LocationInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_visited: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Persist the plan for the signed-in user (backend default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
}

impl ItineraryPlanRequest {
    pub fn new(user_id: impl Into<String>, preferences: UserPreferences) -> Self {
        Self {
            user_id: user_id.into(),
            preferences,
            current_location: None,
            exclude_visited: Vec::new(),
            top_k: None,
            save: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelSegment {
    pub attraction: Map<String, Value>,
    #[serde(default)]
    pub travel: TravelLeg,
    pub arrival_time: String,
    pub departure_time: String,
}

impl TravelSegment {
    pub fn attraction_name(&self) -> Option<&str> {
        self.attraction.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_index: u32,
    pub date: String,
    #[serde(default)]
    pub segments: Vec<TravelSegment>,
    #[serde(default)]
    pub total_distance_km: f64,
    #[serde(default)]
    pub total_duration_minutes: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    #[serde(default)]
    pub total_days: u32,
    #[serde(default)]
    pub total_attractions: u32,
    #[serde(default)]
    pub total_distance_km: f64,
    #[serde(default)]
    pub total_travel_time_minutes: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionRecommendation {
    pub attraction_id: String,
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default = "default_true")]
    pub weather_suitable: bool,
}

fn default_true() -> bool {
    true
}

/// Response of `POST /api/itineraries/plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryPlan {
    pub itinerary_id: String,
    #[serde(default)]
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub summary: PlanSummary,
    #[serde(default)]
    pub weather: Option<Value>,
    #[serde(default)]
    pub recommendations: Vec<AttractionRecommendation>,
    #[serde(default)]
    pub context: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_request_sends_only_set_fields() {
        let req = ItineraryPlanRequest::new(
            "u1",
            UserPreferences {
                duration: Some(2),
                ..UserPreferences::default()
            },
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"user_id": "u1", "preferences": {"duration": 2}})
        );
    }

    #[test]
    fn test_parse_plan() {
        let json = json!({
            "itinerary_id": "it-1",
            "days": [{
                "day_index": 1,
                "date": "2025-10-01",
                "segments": [{
                    "attraction": {"name": "Sky Tower"},
                    "travel": {"distance_km": 3.2, "duration_minutes": null},
                    "arrival_time": "2025-10-01T09:00:00",
                    "departure_time": "2025-10-01T11:00:00"
                }],
                "total_distance_km": 3.2,
                "total_duration_minutes": 0.0
            }],
            "summary": {"total_days": 1, "total_attractions": 1, "total_distance_km": 3.2, "total_travel_time_minutes": 0.0},
            "weather": null,
            "recommendations": [{"attraction_id": "AKL_SKY_TOWER", "name": "Sky Tower", "score": 0.92}],
            "context": null
        });
        let plan: ItineraryPlan = serde_json::from_value(json).unwrap();
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].segments[0].attraction_name(), Some("Sky Tower"));
        assert_eq!(plan.days[0].segments[0].travel.duration_minutes, None);
        assert!(plan.recommendations[0].weather_suitable);
        assert_eq!(plan.summary.total_attractions, 1);
    }

    #[test]
    fn test_empty_plan_summary() {
        let plan: ItineraryPlan = serde_json::from_value(json!({
            "itinerary_id": "it-2",
            "days": [],
            "summary": {"total_attractions": 0},
            "weather": null,
            "recommendations": []
        }))
        .unwrap();
        assert_eq!(plan.summary.total_days, 0);
        assert!(plan.days.is_empty());
    }

    #[test]
    fn test_parse_both_itinerary_shapes() {
        let manual: Itinerary = serde_json::from_value(json!({
            "id": "abc",
            "owner": "u1",
            "title": "South Island loop",
            "items": [{"name": "Milford Sound"}],
            "metadata": {},
            "createdAt": "2025-10-01T08:30:00.123456"
        }))
        .unwrap();
        assert_eq!(manual.id, "abc");
        assert_eq!(manual.display_title(), "South Island loop");
        assert!(manual.created_at.is_some());

        let saved_plan: Itinerary = serde_json::from_value(json!({
            "itinerary_id": "it-1",
            "user_id": "u1",
            "days": [{"day_index": 1, "date": "2025-10-01", "segments": []}],
            "summary": {"total_days": 1, "total_attractions": 0},
            "saved_at": "2025-10-01T08:30:00",
            "context": "fine weather"
        }))
        .unwrap();
        assert_eq!(saved_plan.id, "it-1");
        assert_eq!(saved_plan.owner.as_deref(), Some("u1"));
        assert_eq!(saved_plan.display_title(), "1-day plan");
        assert_eq!(
            saved_plan.extra.get("context"),
            Some(&Value::String("fine weather".into()))
        );
    }
}
