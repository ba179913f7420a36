use reqwest::Method;

use super::core::StayClient;
use super::transport::{Reply, RequestBody, RequestOptions};
use crate::auth::LOGOUT_PATH;
use crate::errors::{AuthError, Error, Result};
use crate::hooks::{Notice, Route};
use crate::policy::{classify, Disposition, RetryOutcome};

/// A reply the retry loop stopped on, with the transition still to apply.
#[derive(Debug)]
pub(crate) struct Settled {
    reply: Reply,
    disposition: Disposition,
}

impl StayClient {
    /// Run one logical request through the state machine and apply its side
    /// effects. Returns the successful reply or the error for the caller.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        opts: &RequestOptions,
    ) -> Result<Reply> {
        match self.drive(&method, path, &body, opts).await? {
            RetryOutcome::Success(settled) => self.settle(settled).await,
            RetryOutcome::RefreshFailed(source) => {
                tracing::warn!(path, "token reissue failed: {source}");
                self.force_logout().await;
                Err(AuthError::RefreshFailed {
                    source: Box::new(source),
                }
                .into())
            }
            RetryOutcome::ExhaustedRetries { attempts, last } => {
                tracing::warn!(path, attempts, "access token still expired after reissue");
                Err(AuthError::RetriesExhausted { attempts, last }.into())
            }
        }
    }

    /// Send, and on an expired access token reissue and send again, within the
    /// retry budget.
    ///
    /// Transport errors end the loop immediately with `Err`.
    pub(crate) async fn drive(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
        opts: &RequestOptions,
    ) -> Result<RetryOutcome<Settled>> {
        let mut attempt: u8 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let reply = self.send_once(method, path, body, opts).await?;
            let disposition = classify(
                reply.status,
                reply.envelope.code.as_ref(),
                &self.auth_codes,
                opts.skip_auth,
            );
            tracing::debug!(%method, path, attempt, status = %reply.status, ?disposition, "reply");

            if disposition != Disposition::Refresh {
                return Ok(RetryOutcome::Success(Settled { reply, disposition }));
            }

            if !self.retry_policy.allows_retry_after(attempt) {
                return Ok(RetryOutcome::ExhaustedRetries {
                    attempts: attempt,
                    last: reply.into_api_error(),
                });
            }

            tracing::info!(path, attempt, "access token expired; reissuing");
            if let Err(e) = self.reissue().await {
                return Ok(RetryOutcome::RefreshFailed(e));
            }
        }
    }

    async fn settle(&self, settled: Settled) -> Result<Reply> {
        let Settled { reply, disposition } = settled;
        match disposition {
            Disposition::Done => Ok(reply),
            Disposition::LoggedOut => {
                tracing::warn!(status = %reply.status, "session invalidated by the server");
                self.force_logout().await;
                Err(AuthError::SessionInvalidated(reply.into_api_error()).into())
            }
            Disposition::Forbidden => {
                tracing::warn!("access denied");
                self.navigator.navigate(Route::AccessDenied);
                Err(AuthError::Forbidden(reply.into_api_error()).into())
            }
            Disposition::WrongPassword => {
                self.notifier.notify(Notice::WrongPassword);
                Err(Error::Api(reply.into_api_error()))
            }
            Disposition::Refresh => {
                // `drive` never settles on `Refresh`; reaching this is a bug.
                tracing::error!(status = %reply.status, "settled on an expired-token reply");
                Err(Error::Api(reply.into_api_error()))
            }
            Disposition::Failed => Err(Error::Api(reply.into_api_error())),
        }
    }

    /// Irrecoverable session loss: tell the server (best effort), tell the
    /// user, drop the flag, go to the account check surface.
    pub(crate) async fn force_logout(&self) {
        let result = self
            .send_once(
                &Method::POST,
                LOGOUT_PATH,
                &RequestBody::Empty,
                &RequestOptions::public(),
            )
            .await
            .and_then(Reply::error_for_status);
        if let Err(e) = result {
            tracing::debug!("logout call during forced logout failed: {e}");
        }

        self.notifier.notify(Notice::SessionExpired);
        self.session.clear();
        self.navigator.navigate(Route::AccountCheck);
    }
}
