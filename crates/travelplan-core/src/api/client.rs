//! API client for communicating with the travel planner REST API.
//!
//! `ApiClient` owns the base URL, the token store and the hooks. Every
//! call goes through `send`: request hooks run first (bearer token), the
//! request is issued once, and failures are shown to the response hooks
//! (session expiry) before they are returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::debug;

use super::endpoints::{AttractionsApi, AuthApi, ItineraryApi, RecommendationsApi};
use super::error::{ApiError, Result};
use super::intercept::{BearerAuth, RequestInterceptor, ResponseInterceptor, SessionExpiry};
use super::request::RequestDescriptor;
use crate::auth::{MemoryTokenStore, TokenStore};
use crate::config::BaseUrl;
use crate::navigation::{Location, Navigator};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Capacity of the auth event channel; slow subscribers see `Lagged`.
const AUTH_EVENT_CAPACITY: usize = 16;

/// Changes in authentication state, published to `ApiClient::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    /// A 401 was received and the stored token was deleted
    SessionCleared,
}

/// API client for the travel planner backend.
/// Clone is cheap - clones share the connection pool, store and hooks.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: BaseUrl,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<AuthEvent>,
    request_hooks: Arc<[Arc<dyn RequestInterceptor>]>,
    response_hooks: Arc<[Arc<dyn ResponseInterceptor>]>,
}

pub struct ApiClientBuilder {
    base_url: BaseUrl,
    timeout: Duration,
    store: Option<Arc<dyn TokenStore>>,
    navigator: Option<Arc<dyn Navigator>>,
    request_hooks: Vec<Arc<dyn RequestInterceptor>>,
    response_hooks: Vec<Arc<dyn ResponseInterceptor>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            store: None,
            navigator: None,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Where the session token is read from and deleted. Defaults to memory.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Receives the redirect to the login page on a 401. Defaults to a
    /// private `Location`.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Extra request hook, run after the bearer token hook.
    pub fn request_interceptor(mut self, hook: Arc<dyn RequestInterceptor>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    /// Extra response hook, run after the session expiry hook.
    pub fn response_interceptor(mut self, hook: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(default_headers)
            .build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(Location::default()));
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        let mut request_hooks: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(BearerAuth::new(store.clone()))];
        request_hooks.extend(self.request_hooks);

        let mut response_hooks: Vec<Arc<dyn ResponseInterceptor>> = vec![Arc::new(
            SessionExpiry::new(store.clone(), navigator, events.clone()),
        )];
        response_hooks.extend(self.response_hooks);

        debug!(base_url = %self.base_url, "API client ready");

        Ok(ApiClient {
            client,
            base_url: self.base_url,
            store,
            events,
            request_hooks: request_hooks.into(),
            response_hooks: response_hooks.into(),
        })
    }
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Client with an in-memory token store and the default timeout
    pub fn new(base_url: BaseUrl) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn attractions(&self) -> AttractionsApi<'_> {
        AttractionsApi::new(self)
    }

    pub fn itineraries(&self) -> ItineraryApi<'_> {
        ItineraryApi::new(self)
    }

    pub fn recommendations(&self) -> RecommendationsApi<'_> {
        RecommendationsApi::new(self)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Issue a request through the hooks. A single attempt is made.
    pub async fn send(&self, mut request: RequestDescriptor) -> Result<reqwest::Response> {
        for hook in self.request_hooks.iter() {
            hook.on_request(&mut request);
        }

        let url = request.url(&self.base_url);
        let (method, _, headers, query, body) = request.into_parts();
        debug!(method = %method, url = %url, "Sending request");

        let mut builder = self.client.request(method, &url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let outcome = match builder.send().await {
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Response received");
                Self::check_response(response).await
            }
            Err(e) => Err(ApiError::from(e)),
        };

        match outcome {
            Ok(response) => Ok(response),
            Err(error) => {
                for hook in self.response_hooks.iter() {
                    hook.on_error(&error);
                }
                Err(error)
            }
        }
    }

    /// `send`, then decode the JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        let url = request.url(&self.base_url);
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }
}
