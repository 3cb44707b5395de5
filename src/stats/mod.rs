//! Aggregate statistics from the remote service. One GET, no fallback.

use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::endpoint::{build_auth_headers, resolve_stats_url};
use crate::http::{ApiError, Transport, truncate_body};

/// Time window accepted by the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum StatsRange {
    #[value(name = "7d")]
    Week,
    #[default]
    #[value(name = "30d")]
    Month,
    #[value(name = "90d")]
    Quarter,
}

impl StatsRange {
    pub const ALL: [StatsRange; 3] = [StatsRange::Week, StatsRange::Month, StatsRange::Quarter];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsRange::Week => "7d",
            StatsRange::Month => "30d",
            StatsRange::Quarter => "90d",
        }
    }
}

impl fmt::Display for StatsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(StatsRange::Week),
            "30d" => Ok(StatsRange::Month),
            "90d" => Ok(StatsRange::Quarter),
            _ => anyhow::bail!("Unknown range: {}. Expected 7d, 30d, or 90d.", s),
        }
    }
}

/// One per-date entry of the `series` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: String,
    pub counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsResponse {
    pub counts: BTreeMap<String, u64>,
    pub series: Vec<SeriesPoint>,
}

impl StatsResponse {
    /// Reads `counts` and `series` leniently: entries that are not
    /// non-negative integers are skipped.
    pub fn from_value(value: &Value) -> Self {
        let counts = value
            .get("counts")
            .and_then(Value::as_object)
            .map(|obj| {
                obj.iter()
                    .filter_map(|(label, count)| count_of(count).map(|c| (label.clone(), c)))
                    .collect()
            })
            .unwrap_or_default();

        let series = value
            .get("series")
            .and_then(Value::as_array)
            .map(|points| points.iter().filter_map(series_point).collect())
            .unwrap_or_default();

        Self { counts, series }
    }

    /// Counts ordered by label, numeric labels first in numeric order.
    pub fn sorted_counts(&self) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> =
            self.counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
        counts.sort_by(|a, b| crate::dataset::compare_labels(&a.0, &b.0));
        counts
    }
}

/// Fetches statistics for `range`. A single attempt.
#[tracing::instrument(skip(transport, config))]
pub async fn fetch_stats<T: Transport + ?Sized>(
    transport: &T,
    config: &Config,
    range: StatsRange,
) -> Result<StatsResponse, ApiError> {
    let url = resolve_stats_url(config).ok_or(ApiError::NotConfigured)?;
    let headers = build_auth_headers(config);
    let query = [("range".to_string(), range.to_string())];

    debug!("Fetching stats from {} for range {}", url, range);

    let attempt = transport
        .get(&url, &query, &headers, config.timeout)
        .await
        .map_err(|e| ApiError::from_transport(&url, e))?;

    match attempt.status {
        200 => {
            let body: Value =
                serde_json::from_str(&attempt.body).map_err(|e| ApiError::NetworkFailure {
                    url: url.clone(),
                    message: format!("malformed JSON response: {}", e),
                })?;
            let stats = StatsResponse::from_value(&body);
            info!(
                "Fetched stats: {} label(s), {} series point(s) in {}ms",
                stats.counts.len(),
                stats.series.len(),
                attempt.elapsed_ms()
            );
            Ok(stats)
        }
        401 | 403 => Err(ApiError::AuthError {
            status: attempt.status,
            url,
        }),
        status => Err(ApiError::UnexpectedStatus {
            status,
            url,
            body: truncate_body(&attempt.body),
        }),
    }
}

fn count_of(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

fn series_point(value: &Value) -> Option<SeriesPoint> {
    let obj = value.as_object()?;
    let date = obj.get("date").and_then(Value::as_str)?.to_string();
    let counts = obj
        .iter()
        .filter(|(key, _)| key.as_str() != "date")
        .filter_map(|(key, count)| count_of(count).map(|c| (key.clone(), c)))
        .collect();
    Some(SeriesPoint { date, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMEOUT;
    use crate::http::{AttemptResult, MockTransport, ReqwestTransport, TransportError};
    use std::time::Duration;

    fn base_config() -> Config {
        Config::new(Some("https://x.test".into()), None, None, DEFAULT_TIMEOUT)
    }

    fn reply(status: u16, body: &str) -> Result<AttemptResult, TransportError> {
        Ok(AttemptResult {
            status,
            body: body.to_string(),
            elapsed: Duration::from_millis(7),
        })
    }

    #[test]
    fn test_range_parsing_and_display() {
        for range in StatsRange::ALL {
            assert_eq!(range.to_string().parse::<StatsRange>().unwrap(), range);
        }
        assert_eq!(StatsRange::default(), StatsRange::Month);
        assert!("1y".parse::<StatsRange>().is_err());
    }

    #[test]
    fn test_from_value_reads_counts_and_series() {
        let value = serde_json::json!({
            "counts": {"0": 10, "1": 4, "2": 2, "3": "n/a"},
            "series": [
                {"date": "2025-10-01", "0": 3, "1": 1, "2": 0, "3": 0},
                {"0": 1},
                {"date": "2025-10-02", "0": 7, "1": 3}
            ]
        });

        let stats = StatsResponse::from_value(&value);

        assert_eq!(stats.counts.len(), 3);
        assert_eq!(stats.counts["0"], 10);
        assert_eq!(stats.series.len(), 2);
        assert_eq!(stats.series[0].date, "2025-10-01");
        assert_eq!(stats.series[1].counts["1"], 3);
    }

    #[test]
    fn test_from_value_missing_keys() {
        assert_eq!(
            StatsResponse::from_value(&serde_json::json!({})),
            StatsResponse::default()
        );
    }

    #[test]
    fn test_sorted_counts_numeric_order() {
        let value = serde_json::json!({"counts": {"10": 1, "2": 5, "0": 3}});
        let sorted = StatsResponse::from_value(&value).sorted_counts();
        let labels: Vec<&str> = sorted.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["0", "2", "10"]);
    }

    #[tokio::test]
    async fn test_fetch_without_base_url_is_not_configured() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();

        let config = Config::new(None, Some("https://edge.test".into()), None, DEFAULT_TIMEOUT);
        let err = fetch_stats(&transport, &config, StatsRange::Week)
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::NotConfigured);
    }

    #[tokio::test]
    async fn test_fetch_sends_range_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|url, query, _, _| {
                url == "https://x.test/api/stats"
                    && query == [("range".to_string(), "90d".to_string())]
            })
            .times(1)
            .returning(|_, _, _, _| reply(200, r#"{"counts": {"1": 2}}"#));

        let stats = fetch_stats(&transport, &base_config(), StatsRange::Quarter)
            .await
            .unwrap();

        assert_eq!(stats.counts["1"], 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_retried() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _, _, _| reply(502, "bad gateway"));

        let err = fetch_stats(&transport, &base_config(), StatsRange::Month)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::UnexpectedStatus {
                status: 502,
                url: "https://x.test/api/stats".into(),
                body: "bad gateway".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_auth_and_timeout() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _, _, _| reply(401, ""));
        let err = fetch_stats(&transport, &base_config(), StatsRange::Month)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthError { status: 401, .. }));

        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _, _, _| Err(TransportError::Timeout));
        let err = fetch_stats(&transport, &base_config(), StatsRange::Month)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_fetch_against_real_server() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/stats?range=7d")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"counts": {"0": 5, "3": 1}}"#)
            .create_async()
            .await;

        let config = Config::new(
            Some(format!("{}/", server.url())),
            None,
            Some("tok".into()),
            Duration::from_secs(5),
        );
        let transport = ReqwestTransport::new(reqwest::Client::new());
        let stats = fetch_stats(&transport, &config, StatsRange::Week)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stats.counts["3"], 1);
    }
}
