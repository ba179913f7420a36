//! Unified error types for the `stayone` crate.
//!
//! This module centralizes all failures that can occur while talking to the
//! Stay One API and provides a single top-level [`Error`] enum plus the
//! convenient [`Result`] alias. Errors from lower layers (`reqwest`, URL
//! parsing, JSON) are mapped into structured variants so callers can branch on
//! them precisely instead of matching on message text.

use reqwest::StatusCode;
use thiserror::Error;

use crate::envelope::{ApiCode, Envelope};

// --- Build-Time Error ---

/// Errors that can occur while building a [`crate::StayClient`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// Neither [`crate::StayClientBuilder::base_url`] nor the
    /// `STAYONE_API_URL` environment variable provided a base URL.
    #[error("No API base URL configured (set STAYONE_API_URL or call `base_url`)")]
    MissingBaseUrl,

    /// The configured base URL is not a valid absolute `http(s)` URL.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// --- The Main Operational Error Enum ---

/// The crate’s top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`]: transport failures, invalid arguments, undecodable replies
/// - [`Error::Api`]: the server answered with a non-success envelope
/// - [`Error::Authentication`]: the 401/403 interception took over
/// - [`Error::Parse`]: URL parsing failures
/// - [`Error::Build`]: construction of the client failed
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed before an envelope could be acted upon.
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// The server replied with a non-2xx status. The decoded envelope is kept
    /// so callers can branch on the application code.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Session handling failed (refresh, forced logout, authorization denial).
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Building the client failed.
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

impl Error {
    /// The server-side failure behind this error, if the server answered at all.
    ///
    /// Looks through authentication errors so a caller can always reach the
    /// envelope of the reply that triggered them.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            Error::Authentication(auth) => auth.api_error(),
            _ => None,
        }
    }

    /// Application code of the reply behind this error, if any.
    pub fn code(&self) -> Option<&ApiCode> {
        self.api_error().and_then(ApiError::code)
    }

    /// HTTP status of the reply behind this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(|api| api.status)
    }
}

// --- Server Error ---

/// A non-success reply, decoded into the uniform envelope.
#[derive(Debug, Clone, Error)]
#[error("Server responded with an error: {status} - {}", .envelope.message)]
pub struct ApiError {
    /// The HTTP status code returned by the server.
    pub status: StatusCode,
    /// The decoded response envelope (`data` left as raw JSON).
    pub envelope: Envelope<serde_json::Value>,
}

impl ApiError {
    /// Application-level code carried in the envelope.
    pub fn code(&self) -> Option<&ApiCode> {
        self.envelope.code.as_ref()
    }

    /// Server supplied message.
    pub fn message(&self) -> &str {
        &self.envelope.message
    }

    /// Returns true if the envelope carries `code`.
    pub fn has_code(&self, code: &ApiCode) -> bool {
        self.code() == Some(code)
    }
}

// --- Consolidated Authentication Error ---

/// Errors produced by the 401/403 interception.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The access token expired and the reissue call failed. The session was
    /// logged out locally.
    #[error("Token reissue failed: {source}")]
    RefreshFailed {
        /// Why the reissue call failed.
        source: Box<Error>,
    },

    /// The server reported the session as invalidated. The session was logged
    /// out locally without attempting a reissue.
    #[error("Session was invalidated by the server")]
    SessionInvalidated(ApiError),

    /// The server denied access (HTTP 403). The navigator was sent to the
    /// access-denied route.
    #[error("Access denied")]
    Forbidden(ApiError),

    /// The access token kept expiring after every reissue until the retry
    /// budget ran out. Carries the last 401 reply.
    #[error("Access token still expired after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made for the logical request.
        attempts: u8,
        /// The last reply, still reporting an expired access token.
        last: ApiError,
    },
}

impl AuthError {
    /// The server reply behind this error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AuthError::RefreshFailed { source } => source.api_error(),
            AuthError::SessionInvalidated(api) | AuthError::Forbidden(api) => Some(api),
            AuthError::RetriesExhausted { last, .. } => Some(last),
        }
    }
}

// --- Consolidated Request Error ---

/// Transport, argument and decoding errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Caller supplied an invalid endpoint/argument for this API.
    #[error("Invalid request: {message}")]
    Validation {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// JSON decoding or encoding failed.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON (de)serializer.
        message: String,
    },
}

/// A specialized `Result` type for `stayone` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

impl_from_for_error!(reqwest::Error, Error::Request);

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::DecodeJson {
            message: err.to_string(),
        }
    }
}

impl_from_for_error!(serde_json::Error, Error::Request);
