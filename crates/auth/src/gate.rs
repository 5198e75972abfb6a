use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::session::{Session, SessionError, validate_session};

/// Source of the current session.
///
/// Every inventory operation asks the gate first; a missing or stale session
/// stops the operation before any storage is touched.
pub trait SessionGate: Send + Sync {
    fn current(&self) -> Option<Session>;

    /// The current session, if it is valid at `now`.
    fn require(&self, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let session = self.current().ok_or(SessionError::SignedOut)?;
        validate_session(&session, now)?;
        Ok(session)
    }
}

impl<G> SessionGate for Arc<G>
where
    G: SessionGate + ?Sized,
{
    fn current(&self) -> Option<Session> {
        (**self).current()
    }
}

/// Gate holding whatever session the sign-in flow last stored.
#[derive(Debug, Default)]
pub struct StaticSessionGate {
    session: RwLock<Option<Session>>,
}

impl StaticSessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }

    pub fn sign_in(&self, session: Session) {
        tracing::info!(user_id = %session.user_id, "operator signed in");
        *self.session.write().unwrap_or_else(|p| p.into_inner()) = Some(session);
    }

    pub fn sign_out(&self) {
        tracing::info!("operator signed out");
        *self.session.write().unwrap_or_else(|p| p.into_inner()) = None;
    }
}

impl SessionGate for StaticSessionGate {
    fn current(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}
