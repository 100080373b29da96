//! Navigation trait.

use std::fmt;

/// Entry points the session core may send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The login entry point, after the session is lost.
    Login,
    /// The landing page, after a role check fails.
    Dashboard,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/auth/login"),
            Route::Dashboard => f.write_str("/dashboard"),
        }
    }
}

/// Something that can move the user to another entry point.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
