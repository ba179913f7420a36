use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::codes::AuthCodes;
use crate::errors::BuildError;
use crate::hooks::{Navigator, Notifier, TracingHooks};
use crate::policy::RetryPolicy;
use crate::session::{MemorySessionStore, SessionStore};

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "STAYONE_API_URL";

const DEFAULT_USER_AGENT: &str = concat!("stayone", "@", env!("CARGO_PKG_VERSION"),);

#[derive(Debug, Clone)]
#[must_use]
/// Configures a [`StayClient`] before construction.
///
/// Most code obtains this via [`StayClient::builder()`] or
/// [`StayClientBuilder::from_env()`].
///
/// # Defaults
/// - Base URL: none; [`Self::build`] fails with [`BuildError::MissingBaseUrl`]
/// - HTTP request timeout: none unless set via [`Self::request_timeout`]
/// - User-agent: `stayone@<crate-version>` plus any [`Self::user_agent_extra`]
/// - Retry policy: two attempts per logical request ([`RetryPolicy::default`])
/// - Session flag: [`MemorySessionStore`]
/// - Navigation and notices: [`TracingHooks`]
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// # use stayone::{StayClient, StayClientBuilder};
/// let client = StayClient::builder()
///     .base_url("https://api.stayone.example")
///     .request_timeout(Duration::from_secs(10))
///     .user_agent_extra("admin-console/1.2.3")
///     .build()?;
/// # Ok::<_, stayone::BuildError>(())
/// ```
pub struct StayClientBuilder {
    base_url: Option<String>,
    http_request_timeout: Option<Duration>,

    /// Optional user-agent segment appended to the default UA.
    user_agent_extra: Option<String>,

    retry_policy: RetryPolicy,
    auth_codes: AuthCodes,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl Default for StayClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            http_request_timeout: None,
            user_agent_extra: None,
            retry_policy: RetryPolicy::default(),
            auth_codes: AuthCodes::default(),
            session: Arc::new(MemorySessionStore::new()),
            navigator: Arc::new(TracingHooks),
            notifier: Arc::new(TracingHooks),
        }
    }
}

impl StayClientBuilder {
    /// Builder seeded with the base URL from [`BASE_URL_ENV`], if set.
    pub fn from_env() -> Self {
        let mut builder = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            builder.base_url(url);
        }
        builder
    }

    /// Set the API base URL. Endpoint paths are appended to it verbatim.
    pub fn base_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.base_url = Some(url.into());

        self
    }

    /// Set HTTP requests timeout.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.http_request_timeout = Some(timeout);

        self
    }

    /// Append an extra user-agent segment after the default `stayone@<version>`.
    pub fn user_agent_extra<S: Into<String>>(&mut self, extra: S) -> &mut Self {
        self.user_agent_extra = Some(extra.into());
        self
    }

    /// Replace the retry budget for expired access tokens.
    pub fn retry_policy(&mut self, policy: RetryPolicy) -> &mut Self {
        self.retry_policy = policy;
        self
    }

    /// Replace the application codes the interception branches on.
    pub fn auth_codes(&mut self, codes: AuthCodes) -> &mut Self {
        self.auth_codes = codes;
        self
    }

    /// Where the advisory session flag lives.
    pub fn session_store(&mut self, store: Arc<dyn SessionStore>) -> &mut Self {
        self.session = store;
        self
    }

    /// Receiver of navigation requests.
    pub fn navigator(&mut self, navigator: Arc<dyn Navigator>) -> &mut Self {
        self.navigator = navigator;
        self
    }

    /// Receiver of blocking notices.
    pub fn notifier(&mut self, notifier: Arc<dyn Notifier>) -> &mut Self {
        self.notifier = notifier;
        self
    }

    /// Build [StayClient]
    pub fn build(&self) -> Result<StayClient, BuildError> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(BuildError::MissingBaseUrl)?;
        let base_url = parse_base_url(raw)?;

        // Compose user agent with optional extra part.
        let user_agent = match &self.user_agent_extra {
            Some(extra) if !extra.trim().is_empty() => {
                &format!("{DEFAULT_USER_AGENT} {}", extra.trim())
            }
            _ => DEFAULT_USER_AGENT,
        };

        // The cookie jar plays the role of `credentials: include`.
        let mut http_builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true);

        if let Some(timeout) = self.http_request_timeout {
            http_builder = http_builder.timeout(timeout);
        }

        Ok(StayClient {
            http: http_builder.build()?,
            base_url: Arc::new(base_url),
            retry_policy: self.retry_policy,
            auth_codes: Arc::new(self.auth_codes.clone()),
            session: Arc::clone(&self.session),
            navigator: Arc::clone(&self.navigator),
            notifier: Arc::clone(&self.notifier),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BuildError> {
    let url = Url::parse(raw).map_err(|e| BuildError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(BuildError::InvalidBaseUrl(format!(
            "{raw}: expected an http(s) URL"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(BuildError::InvalidBaseUrl(format!(
            "{raw}: base URL must not carry a query or fragment"
        )));
    }
    Ok(url)
}

/// Authenticated request client for the Stay One API.
///
/// `StayClient` is the single entry point pages and tools use to talk to the
/// backend. It owns:
/// - a reqwest client with a cookie jar, so the HTTP-only session cookies the
///   backend sets are sent back on every call;
/// - the retry policy and the application codes driving the 401/403
///   interception;
/// - the session flag store and the navigation/notice hooks.
///
/// ### What it does
/// - Appends endpoint paths to the configured base URL and negotiates JSON.
/// - Decodes every reply into an [`crate::Envelope`].
/// - On an expired access token, reissues it and retries the call once.
/// - On an invalidated session or a failed reissue, logs out locally and
///   navigates to [`crate::Route::AccountCheck`].
/// - On HTTP 403, navigates to [`crate::Route::AccessDenied`].
///
/// ### What it *doesn’t* do
/// - No caching and no de-duplication: every verb call is a network call.
/// - No localization: side effects are structured [`crate::Notice`] values.
///
/// ### Concurrency
/// Cheap to clone; clones share the connection pool, the cookie jar and the
/// hooks. Concurrent calls are independent. Dropping a call's future aborts
/// it.
///
/// ### Examples
/// ```no_run
/// # use stayone::{StayClient, Result};
/// # async fn run() -> Result<()> {
/// let client = StayClient::new("https://api.stayone.example")?;
/// let users: serde_json::Value = client.get("/api/admin/users?page=1").await?.into_data();
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct StayClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Arc<Url>,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) auth_codes: Arc<AuthCodes>,
    pub(crate) session: Arc<dyn SessionStore>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl StayClient {
    /// Creates a client for `base_url` with default hooks and policy.
    pub fn new<S: Into<String>>(base_url: S) -> Result<StayClient, BuildError> {
        Self::builder().base_url(base_url).build()
    }

    /// Creates a client for the base URL in [`BASE_URL_ENV`].
    pub fn from_env() -> Result<StayClient, BuildError> {
        StayClientBuilder::from_env().build()
    }

    /// Returns a builder to edit settings before creating [`StayClient`].
    pub fn builder() -> StayClientBuilder {
        StayClientBuilder::default()
    }

    // === Getters ===

    /// The configured API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Retry budget applied to expired access tokens.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Application codes the interception branches on.
    pub fn auth_codes(&self) -> &AuthCodes {
        &self.auth_codes
    }

    /// The advisory session flag store.
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Shortcut for `self.session().is_logged_in()`.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }
}
