//! Endpoint helpers: one backend operation, one HTTP call.

use super::client::ApiClient;
use super::error::Result;
use super::request::{encode_segment, RequestDescriptor};
use crate::models::{
    Attraction, AttractionQuery, ClearResult, CreatedItinerary, Credentials, DeleteResult,
    HealthStatus, Itinerary, ItineraryPlan, ItineraryPlanRequest, LoginResponse, NewItinerary,
    RecommendationRequest, RecommendationResponse, Registration, User,
};

/// `/api/auth/*`
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /api/auth/login`. The caller decides whether to keep the token;
    /// see `Session::login`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let request = RequestDescriptor::post("/api/auth/login").with_json(credentials)?;
        self.client.execute(request).await
    }

    /// `POST /api/auth/register`
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let request = RequestDescriptor::post("/api/auth/register").with_json(registration)?;
        self.client.execute(request).await
    }
}

/// `/api/attractions*`
pub struct AttractionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AttractionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /api/attractions?<query>`
    pub async fn get_all(&self, query: &AttractionQuery) -> Result<Vec<Attraction>> {
        let request = RequestDescriptor::get("/api/attractions").with_query(query)?;
        self.client.execute(request).await
    }

    /// `GET /api/attractions/{id}`
    pub async fn get_by_id(&self, id: &str) -> Result<Attraction> {
        let request =
            RequestDescriptor::get(format!("/api/attractions/{}", encode_segment(id)));
        self.client.execute(request).await
    }
}

/// `/api/itineraries*`
pub struct ItineraryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ItineraryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /api/itineraries`
    pub async fn create(&self, itinerary: &NewItinerary) -> Result<CreatedItinerary> {
        let request = RequestDescriptor::post("/api/itineraries").with_json(itinerary)?;
        self.client.execute(request).await
    }

    /// `GET /api/itineraries/me`
    pub async fn get_mine(&self) -> Result<Vec<Itinerary>> {
        self.client
            .execute(RequestDescriptor::get("/api/itineraries/me"))
            .await
    }

    /// `GET /api/itineraries/user/{userId}`
    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<Itinerary>> {
        let request = RequestDescriptor::get(format!(
            "/api/itineraries/user/{}",
            encode_segment(user_id)
        ));
        self.client.execute(request).await
    }

    /// `DELETE /api/itineraries/{id}`
    pub async fn remove(&self, itinerary_id: &str) -> Result<DeleteResult> {
        let request = RequestDescriptor::delete(format!(
            "/api/itineraries/{}",
            encode_segment(itinerary_id)
        ));
        self.client.execute(request).await
    }

    /// `DELETE /api/itineraries`
    pub async fn clear(&self) -> Result<ClearResult> {
        self.client
            .execute(RequestDescriptor::delete("/api/itineraries"))
            .await
    }

    /// `POST /api/itineraries/plan`
    pub async fn plan(&self, payload: &ItineraryPlanRequest) -> Result<ItineraryPlan> {
        let request = RequestDescriptor::post("/api/itineraries/plan").with_json(payload)?;
        self.client.execute(request).await
    }
}

/// `/api/recommendations/`
pub struct RecommendationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RecommendationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /api/recommendations/`
    pub async fn get(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let request = RequestDescriptor::post("/api/recommendations/").with_json(request)?;
        self.client.execute(request).await
    }
}

impl ApiClient {
    /// `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        self.execute(RequestDescriptor::get("/health")).await
    }
}
