//! `resale-auth`: the session gate in front of every inventory operation.
//!
//! Credentials are managed by the hosted identity provider; this crate only
//! models the resulting session and answers "is someone signed in?".

pub mod gate;
pub mod session;

pub use gate::{SessionGate, StaticSessionGate};
pub use session::{Session, SessionError, validate_session};
