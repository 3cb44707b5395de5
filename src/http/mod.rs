//! HTTP layer: single-attempt transport, error classification and the
//! candidate fallback loop used for classification.

mod error;
mod fallback;
mod transport;

pub use error::{ApiError, MAX_ERROR_BODY_CHARS, TransportError, truncate_body};
pub use fallback::{ClassifyOutcome, classify};
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{AttemptResult, ReqwestTransport, Transport};
