//! REST API client module for the travel planner backend.
//!
//! `ApiClient` wraps `reqwest::Client` and runs two kinds of hooks around
//! every call: request interceptors (the bearer token is attached here) and
//! response interceptors (an expired session is cleared here). The endpoint
//! helpers in `endpoints` map each backend operation to a single call.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod intercept;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder, AuthEvent};
pub use endpoints::{AttractionsApi, AuthApi, ItineraryApi, RecommendationsApi};
pub use error::{ApiError, ErrorClass, Result};
pub use intercept::{BearerAuth, RequestInterceptor, ResponseInterceptor, SessionExpiry};
pub use request::RequestDescriptor;

#[cfg(test)]
mod tests;
