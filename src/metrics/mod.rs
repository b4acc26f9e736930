//! Metrics module for session-level sensor statistics.

pub mod session;

pub use session::RunningStat;
