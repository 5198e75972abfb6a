use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use resale_core::UserId;

/// An authenticated operator session (transport-agnostic).
///
/// This is what the identity provider hands back after sign-in; the token is
/// forwarded to the hosted backend as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    pub access_token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no active session")]
    SignedOut,

    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a session's time window.
pub fn validate_session(session: &Session, now: DateTime<Utc>) -> Result<(), SessionError> {
    if session.expires_at <= session.issued_at {
        return Err(SessionError::InvalidTimeWindow);
    }
    if now < session.issued_at {
        return Err(SessionError::NotYetValid);
    }
    if now >= session.expires_at {
        return Err(SessionError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(issued: DateTime<Utc>, ttl: Duration) -> Session {
        Session {
            user_id: UserId::new(),
            email: Some("ops@example.com".into()),
            access_token: "secret".into(),
            issued_at: issued,
            expires_at: issued + ttl,
        }
    }

    #[test]
    fn live_session_is_valid() {
        let now = Utc::now();
        let live = session(now - Duration::minutes(1), Duration::hours(1));
        assert_eq!(validate_session(&live, now), Ok(()));
    }

    #[test]
    fn expired_and_future_sessions_are_rejected() {
        let now = Utc::now();
        assert_eq!(
            validate_session(&session(now - Duration::hours(2), Duration::hours(1)), now),
            Err(SessionError::Expired)
        );
        assert_eq!(
            validate_session(&session(now + Duration::hours(1), Duration::hours(1)), now),
            Err(SessionError::NotYetValid)
        );
        assert_eq!(
            validate_session(&session(now, Duration::zero()), now),
            Err(SessionError::InvalidTimeWindow)
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let s = session(Utc::now(), Duration::hours(1));
        assert!(!format!("{s:?}").contains("secret"));
    }
}
