//! Client-side routes and the navigation seam.
//!
//! The route table is static. The API client only ever navigates to
//! `Route::Login`, and it does so through a `Navigator` so callers decide
//! what "navigate" means (a recorded location in tests, a prompt in the CLI).

use std::sync::Mutex;

/// Pages of the planner application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Planner,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Planner,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Planner => "/planner",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::Planner => "Planner",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

/// Receives navigation requests from the client.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// In-memory current location.
#[derive(Debug)]
pub struct Location {
    current: Mutex<String>,
}

impl Location {
    pub fn new(initial: &str) -> Self {
        Self {
            current: Mutex::new(initial.to_string()),
        }
    }

    pub fn current(&self) -> String {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn route(&self) -> Option<Route> {
        Route::from_path(&self.current())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(Route::Home.path())
    }
}

impl Navigator for Location {
    fn navigate(&self, path: &str) {
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = path.to_string();
    }
}
