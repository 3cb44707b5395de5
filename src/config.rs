use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::runtime::Runtime;

pub const ENV_API_BASE: &str = "API_BASE";
pub const ENV_API_ENDPOINT: &str = "API_ENDPOINT";
pub const ENV_API_TOKEN: &str = "API_TOKEN";

/// Per-request deadline used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the remote classification service.
///
/// Built once at start-up and passed by reference to the resolver and the
/// request client. Blank values are normalized to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub explicit_endpoint: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            explicit_endpoint: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub explicit_endpoint: Option<String>,
    pub auth_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(
        base_url: Option<String>,
        explicit_endpoint: Option<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: non_blank(base_url),
            explicit_endpoint: non_blank(explicit_endpoint),
            auth_token: non_blank(auth_token),
            timeout,
        }
    }

    /// Reads `API_BASE`, `API_ENDPOINT` and `API_TOKEN` through the runtime,
    /// letting command-line overrides take precedence.
    #[tracing::instrument(skip(runtime, overrides))]
    pub fn load<R: Runtime>(runtime: &R, overrides: Overrides) -> Result<Self> {
        let from_env = |key: &str| runtime.env_var(key).ok();

        let config = Config::new(
            overrides.base_url.or_else(|| from_env(ENV_API_BASE)),
            overrides
                .explicit_endpoint
                .or_else(|| from_env(ENV_API_ENDPOINT)),
            overrides.auth_token.or_else(|| from_env(ENV_API_TOKEN)),
            overrides.timeout.unwrap_or(DEFAULT_TIMEOUT),
        );

        if config.timeout.is_zero() {
            anyhow::bail!("Timeout must be greater than zero.");
        }

        debug!(
            "Loaded config: base_url={:?} explicit_endpoint={:?} token={} timeout={:?}",
            config.base_url,
            config.explicit_endpoint,
            config
                .auth_token
                .as_deref()
                .map(mask_token)
                .unwrap_or_else(|| "(none)".to_string()),
            config.timeout
        );

        Ok(config)
    }

    /// True when there is at least one URL to classify against.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() || self.explicit_endpoint.is_some()
    }
}

/// Shows only the edges of a secret, e.g. `abcd****wxyz`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn runtime_with_env(vars: &'static [(&'static str, &'static str)]) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_env_var().returning(move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .ok_or(std::env::VarError::NotPresent)
        });
        runtime
    }

    #[test]
    fn test_load_reads_environment() {
        let runtime = runtime_with_env(&[
            ("API_BASE", "https://api.test"),
            ("API_ENDPOINT", "https://edge.test/v2/classify"),
            ("API_TOKEN", "secret-token"),
        ]);

        let config = Config::load(&runtime, Overrides::default()).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://api.test"));
        assert_eq!(
            config.explicit_endpoint.as_deref(),
            Some("https://edge.test/v2/classify")
        );
        assert_eq!(config.auth_token.as_deref(), Some("secret-token"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let runtime = runtime_with_env(&[("API_BASE", "https://env.test")]);

        let overrides = Overrides {
            base_url: Some("https://flag.test".to_string()),
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let config = Config::load(&runtime, overrides).unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://flag.test"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_environment_is_not_configured() {
        let mut runtime = MockRuntime::new();
        for key in [ENV_API_BASE, ENV_API_ENDPOINT, ENV_API_TOKEN] {
            runtime
                .expect_env_var()
                .with(eq(key))
                .returning(|_| Err(std::env::VarError::NotPresent));
        }

        let config = Config::load(&runtime, Overrides::default()).unwrap();

        assert!(!config.is_configured());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let config = Config::new(
            Some("   ".to_string()),
            Some(String::new()),
            Some(" \t".to_string()),
            DEFAULT_TIMEOUT,
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let runtime = runtime_with_env(&[]);
        let overrides = Overrides {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(Config::load(&runtime, overrides).is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcd****mnop");
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token(""), "");
    }
}
