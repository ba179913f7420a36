#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod auth;
mod client;
pub mod codes;
mod envelope;
pub mod errors;
mod hooks;
mod policy;
mod session;

pub mod prelude;

// --- PUBLIC API EXPORTS ---
// Transport
pub use client::core::{StayClient, StayClientBuilder, BASE_URL_ENV};
pub use client::form::FormData;
pub use client::transport::RequestOptions;
pub use client::verbs::ApiResponse;

// Envelope and request state machine
pub use envelope::{ApiCode, Envelope};
pub use policy::{classify, Disposition, RetryOutcome, RetryPolicy};

// Auth and session
pub use auth::Credentials;
pub use codes::AuthCodes;
pub use hooks::{Navigator, Notice, Notifier, Route, TracingHooks};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

// Errors
pub use errors::{ApiError, AuthError, BuildError, Error, RequestError, Result};

// Re-exports
pub use reqwest::{header, Method, StatusCode};
