//! Endpoint resolution: turns a [`Config`] into candidate URLs and headers.
//!
//! Different deployments mount the classifier at different paths, so the
//! classify operation gets an ordered list of guesses. Nothing here touches
//! the network.

use log::debug;
use std::collections::BTreeMap;

use crate::config::Config;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const JSON_MEDIA_TYPE: &str = "application/json";

const BEARER_PREFIX: &str = "Bearer ";

/// Request headers as plain name/value strings.
pub type Headers = BTreeMap<String, String>;

/// Ordered, de-duplicated classify URLs: the explicit endpoint first, then
/// `<base>/api/classify` and `<base>/classify`.
#[tracing::instrument(skip(config))]
pub fn resolve_classify_candidates(config: &Config) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(endpoint) = &config.explicit_endpoint {
        candidates.push(endpoint.clone());
    }

    if let Some(base) = config.base_url.as_deref().map(strip_trailing_slash) {
        candidates.push(format!("{}/api/classify", base));
        candidates.push(format!("{}/classify", base));
    }

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }

    debug!("Resolved {} classify candidate(s): {:?}", unique.len(), unique);
    unique
}

/// `<base>/api/stats`, or `None` without a base URL.
pub fn resolve_stats_url(config: &Config) -> Option<String> {
    config
        .base_url
        .as_deref()
        .map(|base| format!("{}/api/stats", strip_trailing_slash(base)))
}

/// JSON content type plus, when a token is configured, a bearer
/// `Authorization` header. A token that already carries the prefix is
/// sent unchanged.
pub fn build_auth_headers(config: &Config) -> Headers {
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE.to_string(), JSON_MEDIA_TYPE.to_string());

    if let Some(token) = &config.auth_token {
        headers.insert(AUTHORIZATION.to_string(), bearer_value(token));
    }

    headers
}

fn bearer_value(token: &str) -> String {
    let has_prefix = token
        .get(..BEARER_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(BEARER_PREFIX));

    if has_prefix {
        token.to_string()
    } else {
        format!("{}{}", BEARER_PREFIX, token)
    }
}

/// Removes at most one trailing slash.
fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
