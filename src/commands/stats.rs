use anyhow::Result;
use std::io::Write;

use crate::{
    config::Config,
    http::{ApiError, Transport},
    stats::{StatsRange, fetch_stats},
    ui::{render_banner, render_stats},
};

use super::NOT_CONFIGURED_MESSAGE;

/// Fetch and chart aggregate statistics
#[tracing::instrument(skip(transport, config, out))]
pub async fn stats<T: Transport + ?Sized, W: Write>(
    transport: &T,
    config: &Config,
    range: StatsRange,
    out: &mut W,
) -> Result<()> {
    render_banner(out, &format!("Global antisemitism statistics ({})", range))?;

    match fetch_stats(transport, config, range).await {
        Ok(stats) => {
            render_stats(out, &stats)?;
            Ok(())
        }
        Err(ApiError::NotConfigured) => {
            writeln!(out, "{}", NOT_CONFIGURED_MESSAGE)?;
            Ok(())
        }
        Err(e) => Err(anyhow::Error::from(e).context("Could not fetch stats")),
    }
}
