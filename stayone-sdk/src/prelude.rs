//! Common imports for quick starts.

// Common
pub use crate::{ApiCode, ApiError, BuildError, Error, Result};

// Transport
pub use crate::{ApiResponse, FormData, RequestOptions, StayClient, StayClientBuilder};

// Auth and session
pub use crate::{Credentials, SessionStore};

// UI hooks
pub use crate::{Navigator, Notice, Notifier, Route};
