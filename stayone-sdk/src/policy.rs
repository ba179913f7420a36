//! Retry policy and reply classification for the request state machine.
//!
//! ```text
//! INITIAL ─ 2xx ─────────────────────────────▶ DONE
//!    │ 401 + access-expired ──▶ REFRESHING ─ retry ─▶ DONE | FAILED
//!    │ 401 + session-invalid ─────────────────▶ LOGGED_OUT
//!    │ 403 ───────────────────────────────────▶ FORBIDDEN
//!    └ other non-2xx ─────────────────────────▶ FAILED
//! ```
//!
//! [`classify`] is pure so every transition can be tested without a server;
//! the client drives it in `client::execute`.

use reqwest::StatusCode;

use crate::codes::AuthCodes;
use crate::envelope::ApiCode;
use crate::errors::{ApiError, Error};

/// Bounded retry budget for one logical request.
///
/// Attempts are counted per logical request, the first send included. There
/// is no backoff between attempts: a retry only follows a successful reissue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u8,
}

impl RetryPolicy {
    /// Default ceiling: the original send plus one retry.
    pub const DEFAULT_MAX_ATTEMPTS: u8 = 2;

    /// Policy allowing `max_attempts` sends in total. Values below 1 are raised to 1.
    pub fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Policy that never retries; an expired token fails right away.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Total sends allowed for one logical request.
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    /// Whether another send may follow attempt number `attempt` (1-based).
    pub fn allows_retry_after(&self, attempt: u8) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// What the client must do with a decoded reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 2xx: hand the data to the caller.
    Done,
    /// 401 with the access-expired code: reissue, then retry.
    Refresh,
    /// 401 with the session-invalidated code: forced logout.
    LoggedOut,
    /// 403: navigate to the access-denied route.
    Forbidden,
    /// 400 with the wrong-password code: alert, then fail.
    WrongPassword,
    /// Any other non-2xx: fail with the envelope.
    Failed,
}

/// Map an HTTP status and application code to the next transition.
///
/// With `skip_auth` set the 401/403 interception is bypassed and such replies
/// are plain failures.
pub fn classify(
    status: StatusCode,
    code: Option<&ApiCode>,
    codes: &AuthCodes,
    skip_auth: bool,
) -> Disposition {
    if status.is_success() {
        return Disposition::Done;
    }

    match status {
        StatusCode::UNAUTHORIZED if !skip_auth => match code {
            Some(c) if *c == codes.access_expired => Disposition::Refresh,
            Some(c) if *c == codes.session_invalidated => Disposition::LoggedOut,
            _ => Disposition::Failed,
        },
        StatusCode::FORBIDDEN if !skip_auth => Disposition::Forbidden,
        StatusCode::BAD_REQUEST if code == Some(&codes.wrong_password) => {
            Disposition::WrongPassword
        }
        _ => Disposition::Failed,
    }
}

/// Typed result of driving one logical request through the retry loop.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The loop settled on a reply that needs no further reissue. It may
    /// still be a failure of another kind; `T` carries what to do with it.
    Success(T),
    /// The access token expired and the reissue call failed.
    RefreshFailed(Error),
    /// Every allowed attempt came back with an expired access token.
    ExhaustedRetries {
        /// Number of attempts made.
        attempts: u8,
        /// The last expired-token reply.
        last: ApiError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> AuthCodes {
        AuthCodes::default()
    }

    #[test]
    fn success_is_done_regardless_of_code() {
        let code = ApiCode::Number(40107);
        assert_eq!(
            classify(StatusCode::OK, Some(&code), &codes(), false),
            Disposition::Done
        );
        assert_eq!(
            classify(StatusCode::CREATED, None, &codes(), true),
            Disposition::Done
        );
    }

    #[test]
    fn unauthorized_branches_on_code() {
        let expired = ApiCode::Number(40101);
        let invalid = ApiCode::from("40103");
        let other = ApiCode::Number(40107);

        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, Some(&expired), &codes(), false),
            Disposition::Refresh
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, Some(&invalid), &codes(), false),
            Disposition::LoggedOut
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, Some(&other), &codes(), false),
            Disposition::Failed
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, None, &codes(), false),
            Disposition::Failed
        );
    }

    #[test]
    fn skip_auth_bypasses_interception() {
        let expired = ApiCode::Number(40101);
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, Some(&expired), &codes(), true),
            Disposition::Failed
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, None, &codes(), true),
            Disposition::Failed
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, None, &codes(), false),
            Disposition::Forbidden
        );
    }

    #[test]
    fn wrong_password_only_on_bad_request() {
        let wrong = ApiCode::Number(40001);
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some(&wrong), &codes(), true),
            Disposition::WrongPassword
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some(&ApiCode::Number(40002)), &codes(), false),
            Disposition::Failed
        );
        assert_eq!(
            classify(StatusCode::CONFLICT, Some(&wrong), &codes(), false),
            Disposition::Failed
        );
    }

    #[test]
    fn custom_codes_are_honoured() {
        let custom = AuthCodes {
            access_expired: ApiCode::from("TOKEN_EXPIRED"),
            ..AuthCodes::default()
        };
        assert_eq!(
            classify(
                StatusCode::UNAUTHORIZED,
                Some(&ApiCode::from("TOKEN_EXPIRED")),
                &custom,
                false
            ),
            Disposition::Refresh
        );
        assert_eq!(
            classify(
                StatusCode::UNAUTHORIZED,
                Some(&ApiCode::Number(40101)),
                &custom,
                false
            ),
            Disposition::Failed
        );
    }

    #[test]
    fn retry_budget_counts_the_first_send() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 2);
        assert!(policy.allows_retry_after(1));
        assert!(!policy.allows_retry_after(2));

        assert!(!RetryPolicy::no_retry().allows_retry_after(1));
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }
}
