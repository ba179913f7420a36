//! Application codes the client branches on.

use crate::envelope::ApiCode;

/// Access token expired; recoverable through a reissue.
pub const ACCESS_TOKEN_EXPIRED: i64 = 40101;
/// Session invalidated server-side (e.g. signed in elsewhere); not recoverable.
pub const SESSION_INVALIDATED: i64 = 40103;
/// The current password supplied to a password change was wrong.
pub const CURRENT_PASSWORD_INCORRECT: i64 = 40001;
/// Sign-in refused until the account's email address is verified.
///
/// The client never intercepts this code; it is exported so callers can route
/// to their verification screen.
pub const EMAIL_NOT_VERIFIED: i64 = 40107;

/// The distinguished codes driving the 400/401 interception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCodes {
    /// 401 code that triggers a token reissue and a single retry.
    pub access_expired: ApiCode,
    /// 401 code that triggers a forced logout.
    pub session_invalidated: ApiCode,
    /// 400 code that triggers a blocking wrong-password notice.
    pub wrong_password: ApiCode,
}

impl Default for AuthCodes {
    fn default() -> Self {
        Self {
            access_expired: ApiCode::Number(ACCESS_TOKEN_EXPIRED),
            session_invalidated: ApiCode::Number(SESSION_INVALIDATED),
            wrong_password: ApiCode::Number(CURRENT_PASSWORD_INCORRECT),
        }
    }
}
