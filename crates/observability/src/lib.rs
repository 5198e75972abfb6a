//! Process-wide logging setup shared by the app shell and the test suites.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_for_tests, init_with};
