use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::string_or_number;

/// Filters for `GET /api/attractions`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttractionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl AttractionQuery {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Ratings are a bare score on some records and an average/count pair on others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Summary { average: f64, count: Option<u64> },
}

impl Rating {
    pub fn average(&self) -> f64 {
        match self {
            Rating::Score(s) => *s,
            Rating::Summary { average, .. } => *average,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub rating: Option<Rating>,
    /// Fields this client does not model (features, seasons, prices, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attraction {
    /// `category` if set, else the first of `categories`
    pub fn primary_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .or_else(|| self.categories.first().map(String::as_str))
    }
}
