//! Wire types for the travel planner backend.
//!
//! - `Credentials`, `Registration`, `LoginResponse`, `User`: authentication
//! - `Attraction`, `AttractionQuery`: attraction listings
//! - `NewItinerary`, `Itinerary` and the `ItineraryPlan*` family: saved
//!   itineraries and generated plans
//! - `RecommendationRequest`, `RecommendationResponse`: ranked attraction
//!   suggestions
//! - `HealthStatus`: the backend health probe

pub mod attraction;
pub mod auth;
pub mod health;
pub mod itinerary;
pub mod recommendation;

pub use attraction::{Attraction, AttractionQuery};
pub use auth::{Credentials, LoginResponse, Registration, User};
pub use health::HealthStatus;
pub use itinerary::{
    AttractionRecommendation, ClearResult, CreatedItinerary, DayPlan, DeleteResult, Itinerary,
    ItineraryPlan, ItineraryPlanRequest, LocationInfo, NewItinerary, TravelSegment,
    UserPreferences,
};
pub use recommendation::{RecommendationRequest, RecommendationResponse};

use serde::{Deserialize, Deserializer};

/// Identifiers arrive as strings from the real backend and as integers from
/// the stub one; normalise both to `String`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}
