use anyhow::Result;
use std::io::Write;

use crate::{
    classify::classify_text,
    config::Config,
    http::{ApiError, Transport},
    ui::{render_banner, render_classification},
};

use super::NOT_CONFIGURED_MESSAGE;

const TIMEOUT_HINT: &str =
    "The service did not answer in time. Raise --timeout (or SEMITIA_TIMEOUT) if it is slow.";

/// Classify a single text against the remote service
#[tracing::instrument(skip(transport, config, text, out))]
pub async fn classify<T: Transport + ?Sized, W: Write>(
    transport: &T,
    config: &Config,
    text: &str,
    out: &mut W,
) -> Result<()> {
    render_banner(out, "Real-time IHRA classification")?;

    match classify_text(transport, config, text).await {
        Ok(result) => {
            render_classification(out, &result)?;
            Ok(())
        }
        Err(ApiError::NotConfigured) => {
            writeln!(out, "{}", NOT_CONFIGURED_MESSAGE)?;
            Ok(())
        }
        Err(e) => {
            if let ApiError::Timeout { .. } = e.root() {
                writeln!(out, "{}", TIMEOUT_HINT)?;
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMEOUT;
    use crate::http::{AttemptResult, MockTransport, TransportError};
    use std::time::Duration;

    #[tokio::test]
    async fn test_classify_renders_result() {
        let config = Config::new(Some("https://x.test".into()), None, None, DEFAULT_TIMEOUT);
        let mut transport = MockTransport::new();
        transport.expect_post_json().times(1).returning(|_, _, _, _| {
            Ok(AttemptResult {
                status: 200,
                body: r#"{"label": 0, "confidence": 0.93, "elapsed_ms": 80}"#.into(),
                elapsed: Duration::from_millis(120),
            })
        });
        let mut out = Vec::new();

        classify(&transport, &config, "Buen día", &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("IHRA level:   0"));
        assert!(output.contains("93.0%"));
        assert!(output.contains("80 ms"));
    }

    #[tokio::test]
    async fn test_classify_not_configured_is_informational() {
        let mut transport = MockTransport::new();
        transport.expect_post_json().never();
        let mut out = Vec::new();

        classify(&transport, &Config::default(), "hola", &mut out)
            .await
            .unwrap();

        assert!(String::from_utf8(out).unwrap().contains(NOT_CONFIGURED_MESSAGE));
    }

    #[tokio::test]
    async fn test_classify_auth_error_is_returned() {
        let config = Config::new(Some("https://x.test".into()), None, None, DEFAULT_TIMEOUT);
        let mut transport = MockTransport::new();
        transport.expect_post_json().times(1).returning(|_, _, _, _| {
            Ok(AttemptResult {
                status: 403,
                body: String::new(),
                elapsed: Duration::from_millis(5),
            })
        });
        let mut out = Vec::new();

        let err = classify(&transport, &config, "hola", &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::AuthError { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_classify_timeout_prints_hint() {
        let config = Config::new(Some("https://x.test".into()), None, None, DEFAULT_TIMEOUT);
        let mut transport = MockTransport::new();
        transport
            .expect_post_json()
            .times(2)
            .returning(|_, _, _, _| Err(TransportError::Timeout));
        let mut out = Vec::new();

        let err = classify(&transport, &config, "hola", &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::AllCandidatesFailed { attempts: 2, .. })
        ));
        assert!(String::from_utf8(out).unwrap().contains(TIMEOUT_HINT));
    }

    #[tokio::test]
    async fn test_classify_other_failures_print_no_hint() {
        let config = Config::new(Some("https://x.test".into()), None, None, DEFAULT_TIMEOUT);
        let mut transport = MockTransport::new();
        transport.expect_post_json().times(2).returning(|_, _, _, _| {
            Ok(AttemptResult {
                status: 404,
                body: String::new(),
                elapsed: Duration::from_millis(5),
            })
        });
        let mut out = Vec::new();

        classify(&transport, &config, "hola", &mut out)
            .await
            .unwrap_err();

        assert!(!String::from_utf8(out).unwrap().contains(TIMEOUT_HINT));
    }
}
