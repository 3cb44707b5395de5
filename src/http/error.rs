//! Error kinds for calls to the classification service, split into terminal
//! and non-terminal outcomes for the candidate fallback loop.

use std::fmt;

/// Longest slice of a response body kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failure below the HTTP status level for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete before its deadline.
    Timeout,
    /// Connection refused, DNS failure, unreadable response...
    Network(String),
    /// A configured header could not be encoded for the wire.
    InvalidHeader(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Network(msg) => write!(f, "network failure: {}", msg),
            TransportError::InvalidHeader(name) => write!(f, "invalid value for header {}", name),
        }
    }
}

impl std::error::Error for TransportError {}

/// Outcome of a failed classify or stats call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Neither a base URL nor an explicit endpoint is configured.
    NotConfigured,
    /// The candidate did not answer in time.
    Timeout { url: String },
    /// The connection could not be established or the reply was unusable.
    NetworkFailure { url: String, message: String },
    /// HTTP 401 or 403. Stops the fallback loop.
    AuthError { status: u16, url: String },
    /// HTTP 404 at one candidate. Advances the fallback loop.
    NotFoundAtCandidate { url: String },
    /// Any other non-200 status. Advances the fallback loop.
    UnexpectedStatus { status: u16, url: String, body: String },
    /// Every candidate was tried; carries the most recent failure.
    AllCandidatesFailed { attempts: usize, last: Box<ApiError> },
    /// A configured header (usually the token) cannot be sent.
    InvalidHeader(String),
    /// Blank text or otherwise unusable user input.
    MalformedInput(String),
}

impl ApiError {
    /// Terminal errors end a classify invocation without trying the
    /// remaining candidates.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApiError::NotConfigured
                | ApiError::AuthError { .. }
                | ApiError::AllCandidatesFailed { .. }
                | ApiError::InvalidHeader(_)
                | ApiError::MalformedInput(_)
        )
    }

    /// The error that actually ended the call, looking through
    /// `AllCandidatesFailed`.
    pub fn root(&self) -> &ApiError {
        match self {
            ApiError::AllCandidatesFailed { last, .. } => last.root(),
            other => other,
        }
    }

    pub(crate) fn from_transport(url: &str, error: TransportError) -> Self {
        match error {
            TransportError::Timeout => ApiError::Timeout {
                url: url.to_string(),
            },
            TransportError::Network(message) => ApiError::NetworkFailure {
                url: url.to_string(),
                message,
            },
            TransportError::InvalidHeader(name) => ApiError::InvalidHeader(name),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotConfigured => write!(
                f,
                "No classification endpoint configured. Set API_BASE or API_ENDPOINT."
            ),
            ApiError::Timeout { url } => write!(f, "Timed out waiting for {}", url),
            ApiError::NetworkFailure { url, message } => {
                write!(f, "Could not reach {}: {}", url, message)
            }
            ApiError::AuthError { status, url } => write!(
                f,
                "Authentication failed (HTTP {}) at {}. Check API_TOKEN.",
                status, url
            ),
            ApiError::NotFoundAtCandidate { url } => write!(f, "Not found at {}", url),
            ApiError::UnexpectedStatus { status, url, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {} from {}", status, url)
                } else {
                    write!(f, "HTTP {} from {}: {}", status, url, body)
                }
            }
            ApiError::AllCandidatesFailed { attempts, last } => write!(
                f,
                "All {} candidate endpoint(s) failed. Last error: {}",
                attempts, last
            ),
            ApiError::InvalidHeader(name) => {
                write!(f, "Header {} contains characters that cannot be sent", name)
            }
            ApiError::MalformedInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Cuts a response body down to [`MAX_ERROR_BODY_CHARS`] characters.
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
