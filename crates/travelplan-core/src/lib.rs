//! Core library for the travel itinerary planner client.
//!
//! - `api`: `ApiClient`, its interception hooks and the endpoint helpers
//! - `auth`: session token storage and login/logout
//! - `navigation`: the static route table and the `Navigator` seam
//! - `config`: base URL resolution and the on-disk config file
//! - `models`: wire types for the backend's JSON contract

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;

pub use api::{ApiClient, ApiError, AuthEvent, ErrorClass};
pub use auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, Session, TokenStore};
pub use config::{BaseUrl, Config};
pub use navigation::{Location, Navigator, Route};
