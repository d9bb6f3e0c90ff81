//! Request and response hooks run by `ApiClient` around every call.

use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use tokio::sync::broadcast;
use tracing::warn;

use super::client::AuthEvent;
use super::error::ApiError;
use super::request::RequestDescriptor;
use crate::auth::TokenStore;
use crate::navigation::{Navigator, Route};

/// Runs before a request is issued and may mutate it.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut RequestDescriptor);
}

/// Runs after a call fails, before the failure is returned to the caller.
/// Successful responses are not shown to response hooks.
pub trait ResponseInterceptor: Send + Sync {
    fn on_error(&self, error: &ApiError);
}

/// Attaches `Authorization: Bearer <token>` when a token is stored.
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut RequestDescriptor) {
        let Some(token) = self.store.get() else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(header::AUTHORIZATION, value);
            }
            Err(_) => warn!(
                "Stored session token is not a valid header value; \
                 sending request without it"
            ),
        }
    }
}

/// On a 401: drop the stored token, announce it, and send the user to the
/// login page. Every other failure is left alone.
pub struct SessionExpiry {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionExpiry {
    pub fn new(
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        events: broadcast::Sender<AuthEvent>,
    ) -> Self {
        Self {
            store,
            navigator,
            events,
        }
    }
}

impl ResponseInterceptor for SessionExpiry {
    fn on_error(&self, error: &ApiError) {
        if !error.is_unauthenticated() {
            return;
        }
        warn!("Received 401, clearing session");
        self.store.remove();
        // No subscribers is fine
        let _ = self.events.send(AuthEvent::SessionCleared);
        self.navigator.navigate(Route::Login.path());
    }
}
