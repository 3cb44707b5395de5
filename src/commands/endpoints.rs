use anyhow::Result;
use std::io::Write;

use crate::{
    config::{Config, mask_token},
    endpoint::{resolve_classify_candidates, resolve_stats_url},
};

use super::NOT_CONFIGURED_MESSAGE;

/// Print the URLs the client would try, in order
pub fn endpoints<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let candidates = resolve_classify_candidates(config);

    if candidates.is_empty() {
        writeln!(out, "{}", NOT_CONFIGURED_MESSAGE)?;
    } else {
        writeln!(out, "Classify candidates:")?;
        for (i, url) in candidates.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, url)?;
        }
    }

    match resolve_stats_url(config) {
        Some(url) => writeln!(out, "Stats URL: {}", url)?,
        None => writeln!(out, "Stats URL: (requires API_BASE)")?,
    }

    let token = config
        .auth_token
        .as_deref()
        .map(mask_token)
        .unwrap_or_else(|| "(none)".to_string());
    writeln!(out, "Token: {}", token)?;
    writeln!(out, "Timeout: {}s", config.timeout.as_secs_f64())?;

    Ok(())
}
