use stayone::{Navigator, Notice, Notifier, Route};

/// Terminal rendition of the client's UI side effects.
#[derive(Debug, Clone, Copy)]
pub struct StderrHooks;

impl Navigator for StderrHooks {
    fn navigate(&self, route: Route) {
        let hint = match route {
            Route::AccountCheck => "sign in again with --email",
            Route::AccessDenied => "this account may not use that endpoint",
        };
        eprintln!("-> {route}: {hint}");
    }
}

impl Notifier for StderrHooks {
    fn notify(&self, notice: Notice) {
        let text = match notice {
            Notice::SessionExpired => "Your session has ended. Please sign in again.",
            Notice::WrongPassword => "The current password is incorrect.",
        };
        eprintln!("! {text}");
    }
}
