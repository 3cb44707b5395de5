//! Classify request with fallback across candidate endpoint URLs.
//!
//! Each candidate is tried exactly once, in order. The first HTTP 200 wins.
//! 401/403 abort the whole call; 404, other statuses, timeouts and network
//! failures move on to the next candidate.

use log::{debug, info, warn};
use std::time::Duration;

use super::error::{ApiError, truncate_body};
use super::transport::{AttemptResult, Transport};
use crate::endpoint::Headers;

/// A successful classify call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutcome {
    pub body: serde_json::Value,
    pub url: String,
    /// Client-measured latency of the successful attempt.
    pub elapsed_ms: u64,
}

/// What the loop does after one attempt.
enum Step {
    Done(ClassifyOutcome),
    Abort(ApiError),
    Next(ApiError),
}

/// Tries `candidates` in order and returns the first successful response.
#[tracing::instrument(skip(transport, payload, headers))]
pub async fn classify<T: Transport + ?Sized>(
    transport: &T,
    candidates: &[String],
    payload: &serde_json::Value,
    headers: &Headers,
    timeout: Duration,
) -> Result<ClassifyOutcome, ApiError> {
    if candidates.is_empty() {
        debug!("No classify candidates, not attempting any request");
        return Err(ApiError::NotConfigured);
    }

    let mut last_error: Option<ApiError> = None;

    for (index, url) in candidates.iter().enumerate() {
        debug!(
            "Trying candidate {}/{}: {}",
            index + 1,
            candidates.len(),
            url
        );

        let step = match transport.post_json(url, payload, headers, timeout).await {
            Ok(attempt) => evaluate(url, attempt),
            Err(e) => {
                let err = ApiError::from_transport(url, e);
                if err.is_terminal() {
                    Step::Abort(err)
                } else {
                    Step::Next(err)
                }
            }
        };

        match step {
            Step::Done(outcome) => {
                info!("Classified via {} in {}ms", outcome.url, outcome.elapsed_ms);
                return Ok(outcome);
            }
            Step::Abort(err) => {
                warn!("Stopping after terminal error: {}", err);
                return Err(err);
            }
            Step::Next(err) => {
                warn!("Candidate {} failed ({}), trying next...", url, err);
                last_error = Some(err);
            }
        }
    }

    Err(ApiError::AllCandidatesFailed {
        attempts: candidates.len(),
        last: Box::new(last_error.unwrap_or(ApiError::NotConfigured)),
    })
}

fn evaluate(url: &str, attempt: AttemptResult) -> Step {
    match attempt.status {
        200 => match serde_json::from_str::<serde_json::Value>(&attempt.body) {
            Ok(body) => Step::Done(ClassifyOutcome {
                body,
                url: url.to_string(),
                elapsed_ms: attempt.elapsed_ms(),
            }),
            Err(e) => Step::Next(ApiError::NetworkFailure {
                url: url.to_string(),
                message: format!("malformed JSON response: {}", e),
            }),
        },
        401 | 403 => Step::Abort(ApiError::AuthError {
            status: attempt.status,
            url: url.to_string(),
        }),
        404 => Step::Next(ApiError::NotFoundAtCandidate {
            url: url.to_string(),
        }),
        status => Step::Next(ApiError::UnexpectedStatus {
            status,
            url: url.to_string(),
            body: truncate_body(&attempt.body),
        }),
    }
}
