//! UI side effects requested by the client: navigation and user notices.
//!
//! The client never holds localized strings. It emits a [`Route`] or a
//! [`Notice`] through the hooks passed to [`crate::StayClientBuilder`] and the
//! UI layer decides how to present them.

use std::fmt;

/// Surfaces the client may redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Account check / sign-in surface, after a forced logout.
    AccountCheck,
    /// Access-denied surface, after an HTTP 403.
    AccessDenied,
}

impl Route {
    /// Application path of this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::AccountCheck => "/account_check",
            Route::AccessDenied => "/access-denied",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Blocking, user-facing notices. Localized by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The session ended (invalidated, or the token could not be reissued).
    SessionExpired,
    /// The current password supplied was wrong.
    WrongPassword,
}

impl Notice {
    /// Stable identifier, usable as a translation key.
    pub fn key(&self) -> &'static str {
        match self {
            Notice::SessionExpired => "auth.session_expired",
            Notice::WrongPassword => "auth.wrong_password",
        }
    }
}

/// Receives navigation requests.
pub trait Navigator: fmt::Debug + Send + Sync {
    /// Move the user to `route`.
    fn navigate(&self, route: Route);
}

/// Receives blocking notices. Called before the triggering error is returned.
pub trait Notifier: fmt::Debug + Send + Sync {
    /// Show `notice` to the user.
    fn notify(&self, notice: Notice);
}

/// Default hooks: record the side effect as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl Navigator for TracingHooks {
    fn navigate(&self, route: Route) {
        tracing::info!(%route, "navigation requested");
    }
}

impl Notifier for TracingHooks {
    fn notify(&self, notice: Notice) {
        tracing::warn!(notice = notice.key(), "user notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_map_to_application_paths() {
        assert_eq!(Route::AccountCheck.path(), "/account_check");
        assert_eq!(Route::AccessDenied.to_string(), "/access-denied");
    }
}
