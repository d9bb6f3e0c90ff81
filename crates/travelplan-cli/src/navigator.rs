//! Terminal stand-in for browser navigation.

use std::sync::atomic::{AtomicBool, Ordering};

use travelplan_core::navigation::{Location, Navigator, Route};

const LOGIN_HINT: &str = "Not signed in. Run `travelplan login` to sign in.";

/// Records the target like a browser location and tells the user what to do
/// when they are sent to the login page. The hint is printed once per run,
/// however many concurrent requests were rejected.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    location: Location,
    hinted: AtomicBool,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> String {
        self.location.current()
    }

    /// The login hint, the first time it is due
    fn login_hint(&self, path: &str) -> Option<&'static str> {
        if Route::from_path(path) != Some(Route::Login) {
            return None;
        }
        (!self.hinted.swap(true, Ordering::SeqCst)).then_some(LOGIN_HINT)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        self.location.navigate(path);
        if let Some(hint) = self.login_hint(path) {
            eprintln!("{}", hint);
        }
    }
}
