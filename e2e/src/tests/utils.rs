use std::sync::{Arc, Mutex, Once};

use httpmock::MockServer;
use serde_json::{json, Value};
use stayone::{MemorySessionStore, Navigator, Notice, Notifier, Route, StayClient};

static TRACING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("TRACING").unwrap_or_else(|_| "info".to_string()))
            // Use with_test_writer to ensure logs are captured correctly by the test runner.
            .with_test_writer()
            .init();
    });
}

/// Captures the side effects the client requests.
#[derive(Debug, Default)]
pub struct Recorder {
    routes: Mutex<Vec<Route>>,
    notices: Mutex<Vec<Notice>>,
}

impl Recorder {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// A client wired to `server`, with recording hooks and an in-memory flag.
pub struct Harness {
    pub client: StayClient,
    pub hooks: Arc<Recorder>,
}

impl Harness {
    pub fn new(server: &MockServer) -> Self {
        init_tracing();
        let hooks = Arc::new(Recorder::default());
        let client = StayClient::builder()
            .base_url(server.base_url())
            .session_store(Arc::new(MemorySessionStore::new()))
            .navigator(hooks.clone())
            .notifier(hooks.clone())
            .build()
            .unwrap();
        Self { client, hooks }
    }
}

/// A success envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({"status": 200, "code": 200, "message": "OK", "data": data})
}

/// A failure envelope.
pub fn fail(status: u16, code: i64, message: &str) -> Value {
    json!({"status": status, "code": code, "message": message, "data": null})
}
