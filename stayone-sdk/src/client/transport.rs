use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::core::StayClient;
use super::form::FormData;
use crate::envelope::Envelope;
use crate::errors::{ApiError, RequestError, Result};

const JSON: &str = "application/json";

/// Per-call options.
///
/// ```
/// # use std::time::Duration;
/// # use stayone::RequestOptions;
/// let opts = RequestOptions::public().timeout(Duration::from_secs(5));
/// assert!(opts.skip_auth);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Bypass the 401/403 interception (anonymous/public endpoints).
    pub skip_auth: bool,
    /// Extra headers; they replace defaults with the same name.
    pub headers: HeaderMap,
    /// Timeout for each send of this call, overriding the client default.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Options for anonymous endpoints: `skip_auth` set.
    pub fn public() -> Self {
        Self {
            skip_auth: true,
            ..Self::default()
        }
    }

    /// Set or clear `skip_auth`.
    #[must_use]
    pub fn skip_auth(mut self, skip: bool) -> Self {
        self.skip_auth = skip;
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a per-send timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A request body kept in a form that can be sent again on retry.
#[derive(Debug, Clone)]
pub(crate) enum RequestBody {
    Empty,
    Json(Vec<u8>),
    Form(FormData),
}

impl RequestBody {
    pub(crate) fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_vec(body)?))
    }
}

/// One decoded reply.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) envelope: Envelope<Value>,
}

impl Reply {
    pub(crate) fn into_api_error(self) -> ApiError {
        ApiError {
            status: self.status,
            envelope: self.envelope,
        }
    }

    /// `Ok(())` for 2xx, the decoded failure otherwise.
    pub(crate) fn error_for_status(self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(self.into_api_error().into())
        }
    }
}

impl StayClient {
    /// Resolve an endpoint path against the base URL.
    ///
    /// The path is appended verbatim, so a base path prefix (`/v1`) and the
    /// path's own query string are both kept.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url> {
        let path = path.trim();
        if path.is_empty() {
            return Err(RequestError::Validation {
                message: "endpoint path is empty".into(),
            }
            .into());
        }
        // Only the path part counts; a query may carry URL-valued parameters.
        let path_part = path.split(['?', '#']).next().unwrap_or(path);
        if path_part.contains("://") {
            return Err(RequestError::Validation {
                message: format!("expected a path relative to the API base URL, got `{path}`"),
            }
            .into());
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let sep = if path.starts_with('/') { "" } else { "/" };
        Ok(Url::parse(&format!("{base}{sep}{path}"))?)
    }

    /// Transport primitive: one send of one request, decoded into an envelope.
    ///
    /// No interception happens here; `client::execute` decides what a reply
    /// means.
    pub(crate) async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
        opts: &RequestOptions,
    ) -> Result<Reply> {
        let url = self.endpoint_url(path)?;
        let mut rb = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, JSON);

        rb = match body {
            RequestBody::Empty => rb.header(CONTENT_TYPE, JSON),
            RequestBody::Json(bytes) => rb.header(CONTENT_TYPE, JSON).body(bytes.clone()),
            // The multipart encoder sets its own content type with the boundary.
            RequestBody::Form(form) => rb.multipart(form.to_multipart()?),
        };

        if !opts.headers.is_empty() {
            rb = rb.headers(opts.headers.clone());
        }
        if let Some(timeout) = opts.timeout {
            rb = rb.timeout(timeout);
        }

        let response = rb.send().await.map_err(RequestError::from)?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(RequestError::from)?;
        let envelope = Envelope::decode(status, &bytes)?;

        Ok(Reply {
            status,
            headers,
            envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> StayClient {
        StayClient::new(base).unwrap()
    }

    #[test]
    fn endpoint_keeps_query_and_base_prefix() {
        let c = client("https://api.stayone.example/v1/");
        assert_eq!(
            c.endpoint_url("/api/admin/users?page=1").unwrap().as_str(),
            "https://api.stayone.example/v1/api/admin/users?page=1"
        );
        assert_eq!(
            c.endpoint_url("api/rooms").unwrap().as_str(),
            "https://api.stayone.example/v1/api/rooms"
        );
    }

    #[test]
    fn endpoint_rejects_absolute_and_empty() {
        let c = client("http://localhost:8080");
        assert!(c.endpoint_url("https://elsewhere.example/api").is_err());
        assert!(c.endpoint_url("  ").is_err());
    }

    #[test]
    fn endpoint_keeps_url_valued_query() {
        let c = client("https://api.stayone.example");
        assert_eq!(
            c.endpoint_url("/api/auth/oauth/start?redirect=https://stayone.example/home")
                .unwrap()
                .as_str(),
            "https://api.stayone.example/api/auth/oauth/start?redirect=https://stayone.example/home"
        );
        assert!(c.endpoint_url("/api/rooms#https://x.example").is_ok());
    }

    #[tokio::test]
    async fn invalid_path_fails_before_sending() {
        let c = client("http://127.0.0.1:1");
        let err = c
            .send_once(
                &Method::GET,
                "https://elsewhere.example/api",
                &RequestBody::Empty,
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Request(RequestError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let c = client("http://127.0.0.1:1");
        let err = c
            .send_once(
                &Method::GET,
                "/api/rooms",
                &RequestBody::Empty,
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Request(RequestError::Transport(_))
        ));
    }

    #[test]
    fn options_builders() {
        let opts = RequestOptions::default()
            .skip_auth(true)
            .header(
                HeaderName::from_static("accept-language"),
                HeaderValue::from_static("ko"),
            )
            .timeout(Duration::from_secs(3));
        assert!(opts.skip_auth);
        assert_eq!(opts.headers.get("accept-language").unwrap(), "ko");
        assert_eq!(opts.timeout, Some(Duration::from_secs(3)));
    }
}
