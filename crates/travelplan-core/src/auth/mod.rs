//! Authentication module for the session token and login state.
//!
//! This module provides:
//! - `TokenStore`: where the bearer token lives between runs, with
//!   in-memory, JSON file and OS keychain backends
//! - `Session`: login/logout on top of a client and its token store
//!
//! The token is stored under the fixed key `token` in every backend.

pub mod session;
pub mod store;

pub use session::Session;
pub use store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
