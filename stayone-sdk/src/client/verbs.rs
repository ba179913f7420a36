use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::core::StayClient;
use super::form::FormData;
use super::transport::{Reply, RequestBody, RequestOptions};
use crate::envelope::ApiCode;
use crate::errors::{RequestError, Result};

/// A successful reply: HTTP metadata plus the decoded envelope fields.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status (2xx).
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Application code, which may still carry meaning on success
    /// (e.g. [`crate::codes::EMAIL_NOT_VERIFIED`]).
    pub code: Option<ApiCode>,
    /// Server message.
    pub message: String,
    /// The envelope's `data`, decoded.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// The decoded `data`, unchanged.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns true if the envelope carries `code`.
    pub fn has_code(&self, code: &ApiCode) -> bool {
        self.code.as_ref() == Some(code)
    }
}

impl Reply {
    pub(crate) fn into_response<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        let envelope = self
            .envelope
            .into_typed::<T>()
            .map_err(|e| RequestError::DecodeJson {
                message: format!("unexpected `data` shape: {e}"),
            })?;
        Ok(ApiResponse {
            status: self.status,
            headers: self.headers,
            code: envelope.code,
            message: envelope.message,
            data: envelope.data,
        })
    }
}

macro_rules! body_verbs {
    ($(#[$doc:meta])* $name:ident, $name_with:ident, $form:ident, $form_with:ident, $method:expr) => {
        $(#[$doc])*
        pub async fn $name<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
        where
            B: Serialize + ?Sized,
            T: DeserializeOwned,
        {
            self.$name_with(path, body, RequestOptions::default()).await
        }

        #[doc = concat!("[`Self::", stringify!($name), "`] with per-call options.")]
        pub async fn $name_with<B, T>(
            &self,
            path: &str,
            body: &B,
            opts: RequestOptions,
        ) -> Result<ApiResponse<T>>
        where
            B: Serialize + ?Sized,
            T: DeserializeOwned,
        {
            self.call($method, path, RequestBody::json(body)?, &opts).await
        }

        #[doc = concat!("Multipart variant of [`Self::", stringify!($name), "`]; no JSON content type is sent.")]
        pub async fn $form<T: DeserializeOwned>(
            &self,
            path: &str,
            form: &FormData,
        ) -> Result<ApiResponse<T>> {
            self.$form_with(path, form, RequestOptions::default()).await
        }

        #[doc = concat!("[`Self::", stringify!($form), "`] with per-call options.")]
        pub async fn $form_with<T: DeserializeOwned>(
            &self,
            path: &str,
            form: &FormData,
            opts: RequestOptions,
        ) -> Result<ApiResponse<T>> {
            self.call($method, path, RequestBody::Form(form.clone()), &opts).await
        }
    };
}

impl StayClient {
    /// GET `path` and decode the envelope's `data` into `T`.
    ///
    /// Every call is a network call; nothing is cached or de-duplicated.
    ///
    /// # Examples
    /// ```no_run
    /// # use serde::Deserialize;
    /// # #[derive(Deserialize)] #[serde(rename_all = "camelCase")]
    /// # struct UserPage { users: Vec<serde_json::Value>, total_pages: u32 }
    /// # async fn ex(client: stayone::StayClient) -> stayone::Result<()> {
    /// let page: UserPage = client.get("/api/admin/users?page=1").await?.into_data();
    /// # Ok(()) }
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.get_with(path, RequestOptions::default()).await
    }

    /// [`Self::get`] with per-call options.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        self.call(Method::GET, path, RequestBody::Empty, &opts).await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.delete_with(path, RequestOptions::default()).await
    }

    /// [`Self::delete`] with per-call options.
    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        self.call(Method::DELETE, path, RequestBody::Empty, &opts).await
    }

    body_verbs!(
        /// POST `body` as JSON to `path`.
        post, post_with, post_form, post_form_with, Method::POST
    );

    body_verbs!(
        /// PUT `body` as JSON to `path`.
        put, put_with, put_form, put_form_with, Method::PUT
    );

    body_verbs!(
        /// PATCH `body` as JSON to `path`.
        patch, patch_with, patch_form, patch_form_with, Method::PATCH
    );

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        opts: &RequestOptions,
    ) -> Result<ApiResponse<T>> {
        self.execute(method, path, body, opts).await?.into_response()
    }
}
