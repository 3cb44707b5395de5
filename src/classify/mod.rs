//! Live classification of a single text.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::endpoint::{build_auth_headers, resolve_classify_candidates};
use crate::http::{ApiError, Transport, classify};

/// Body sent to the classification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyRequest {
    pub text: String,
}

impl ClassifyRequest {
    /// Rejects empty or whitespace-only text. The text itself is sent as given.
    pub fn new(text: impl Into<String>) -> Result<Self, ApiError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ApiError::MalformedInput(
                "text to classify is empty".to_string(),
            ));
        }
        Ok(Self { text })
    }

    pub fn to_payload(&self) -> Value {
        serde_json::json!({ "text": self.text })
    }
}

/// Fields the classifier may return. Every field is optional; a field of an
/// unexpected type reads as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifyResponse {
    /// IHRA category, shown verbatim.
    pub label: Option<String>,
    pub confidence: Option<f64>,
    pub subtype: Option<String>,
    pub reason: Option<String>,
    /// Server-reported latency.
    pub elapsed_ms: Option<u64>,
    pub ihra_version: Option<String>,
}

impl ClassifyResponse {
    pub fn from_value(value: &Value) -> Self {
        Self {
            label: value.get("label").and_then(scalar_to_string),
            confidence: value.get("confidence").and_then(Value::as_f64),
            subtype: value.get("subtype").and_then(non_empty_str),
            reason: value.get("reason").and_then(non_empty_str),
            elapsed_ms: value.get("elapsed_ms").and_then(as_millis),
            ihra_version: value.get("ihra_version").and_then(non_empty_str),
        }
    }
}

/// A classified text together with where and how fast it was answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub response: ClassifyResponse,
    pub url: String,
    pub client_elapsed_ms: u64,
}

impl Classification {
    /// Server-reported latency when present, otherwise the client's measurement.
    pub fn elapsed_ms(&self) -> u64 {
        self.response.elapsed_ms.unwrap_or(self.client_elapsed_ms)
    }
}

/// Classifies `text` against the endpoints resolved from `config`.
#[tracing::instrument(skip(transport, config, text))]
pub async fn classify_text<T: Transport + ?Sized>(
    transport: &T,
    config: &Config,
    text: &str,
) -> Result<Classification, ApiError> {
    let request = ClassifyRequest::new(text)?;
    let candidates = resolve_classify_candidates(config);
    let headers = build_auth_headers(config);

    debug!(
        "Classifying {} character(s) against {} candidate(s)",
        request.text.chars().count(),
        candidates.len()
    );

    let outcome = classify(
        transport,
        &candidates,
        &request.to_payload(),
        &headers,
        config.timeout,
    )
    .await?;

    Ok(Classification {
        response: ClassifyResponse::from_value(&outcome.body),
        url: outcome.url,
        client_elapsed_ms: outcome.elapsed_ms,
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

fn as_millis(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    })
}
