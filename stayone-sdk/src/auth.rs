//! Auth endpoints: sign-in, sign-out, token reissue and email availability.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::transport::{Reply, RequestBody, RequestOptions};
use crate::client::verbs::ApiResponse;
use crate::errors::Result;
use crate::StayClient;

pub(crate) const LOGIN_PATH: &str = "/api/auth/login";
pub(crate) const LOGOUT_PATH: &str = "/api/auth/logout";
pub(crate) const REISSUE_PATH: &str = "/api/auth/token/reissue";
pub(crate) const EMAIL_CHECK_PATH: &str = "/api/auth/email-check";

/// Sign-in payload.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Pair an email with a password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl StayClient {
    /// Sign in. `POST /api/auth/login`, without interception.
    ///
    /// On a 2xx reply whose code (if any) is itself a 2xx-range code, the
    /// session flag is set. Other application codes, such as
    /// [`crate::codes::EMAIL_NOT_VERIFIED`], are left to the caller: on success
    /// replies in [`ApiResponse::code`], on failures in
    /// [`crate::Error::code`].
    pub async fn login<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
    ) -> Result<ApiResponse<T>> {
        let response: ApiResponse<T> = self
            .post_with(LOGIN_PATH, credentials, RequestOptions::public())
            .await?;

        let signed_in = response
            .code
            .as_ref()
            .is_none_or(|code| code.as_i64().is_some_and(|n| (200..300).contains(&n)));
        if signed_in {
            self.session.set_logged_in();
            tracing::info!(email = %credentials.email, "signed in");
        } else {
            tracing::info!(
                email = %credentials.email,
                code = ?response.code,
                "sign-in answered without a session"
            );
        }

        Ok(response)
    }

    /// Sign out. `POST /api/auth/logout`.
    ///
    /// The session flag is cleared whether or not the server call succeeds;
    /// the call's own result is returned.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .send_once(
                &Method::POST,
                LOGOUT_PATH,
                &RequestBody::Empty,
                &RequestOptions::public(),
            )
            .await
            .and_then(Reply::error_for_status);
        self.session.clear();
        result
    }

    /// Ask the server for a fresh access token. `POST /api/auth/token/reissue`.
    ///
    /// Never intercepted and never retried. The new token arrives as a cookie
    /// and is stored in the client's cookie jar.
    pub async fn reissue(&self) -> Result<()> {
        self.send_once(
            &Method::POST,
            REISSUE_PATH,
            &RequestBody::Empty,
            &RequestOptions::public(),
        )
        .await?
        .error_for_status()
    }

    /// Check whether `email` can be used for a new account.
    /// `GET /api/auth/email-check?email=…`, anonymous.
    pub async fn email_check<T: DeserializeOwned>(&self, email: &str) -> Result<ApiResponse<T>> {
        let encoded: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
        let path = format!("{EMAIL_CHECK_PATH}?email={encoded}");
        self.get_with(&path, RequestOptions::public()).await
    }
}
