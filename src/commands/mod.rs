//! Command handlers behind each CLI subcommand.
//!
//! Handlers render to any `Write` so tests can capture their output. A
//! missing endpoint configuration is informational, not an error; any other
//! failure is returned to the caller with a readable message.

mod classify;
mod csv;
mod dashboard;
mod endpoints;
mod stats;

pub use self::classify::classify;
pub use self::csv::csv;
pub use self::dashboard::dashboard;
pub use self::endpoints::endpoints;
pub use self::stats::stats;

pub const NOT_CONFIGURED_MESSAGE: &str = "Live classification and statistics are disabled: \
set API_BASE or API_ENDPOINT (or pass --api-base / --api-endpoint).";
