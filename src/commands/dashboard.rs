use anyhow::Result;
use log::debug;
use std::io::Write;
use std::path::PathBuf;

use crate::{
    config::Config,
    dataset::DEFAULT_EXPORT_NAME,
    http::Transport,
    runtime::Runtime,
    stats::StatsRange,
    ui::{SessionState, ViewMode},
};

use super::{classify, csv, stats};

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];
const YES_WORDS: [&str; 2] = ["y", "yes"];

/// Interactive loop over the three view modes.
///
/// Every action is independent: a failure is printed and the loop asks
/// again. End of input or `q` ends the session.
#[tracing::instrument(skip(runtime, transport, config, out))]
pub async fn dashboard<R: Runtime + ?Sized, T: Transport + ?Sized, W: Write>(
    runtime: &R,
    transport: &T,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let mut session = SessionState::default();

    if !config.is_configured() {
        writeln!(out, "{}", super::NOT_CONFIGURED_MESSAGE)?;
        writeln!(out)?;
    }

    loop {
        let default_mode = session.mode.map(|m| m.to_string());
        let Some(answer) = runtime.prompt("Mode (csv, classify, stats; q to quit):", default_mode)?
        else {
            break;
        };
        if QUIT_WORDS.contains(&answer.trim().to_lowercase().as_str()) {
            break;
        }

        let mode = match answer.parse::<ViewMode>() {
            Ok(mode) => mode,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };
        session.remember_mode(mode);
        debug!("Dashboard action: {}", mode);

        let Some(result) = run_action(runtime, transport, config, mode, &mut session, out).await?
        else {
            break;
        };
        if let Err(e) = result {
            writeln!(out, "Error: {:#}", e)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Bye.")?;
    Ok(())
}

/// Outer `Err` is a broken terminal; inner `Err` is a failed action.
/// `None` means the input ended while prompting.
async fn run_action<R: Runtime + ?Sized, T: Transport + ?Sized, W: Write>(
    runtime: &R,
    transport: &T,
    config: &Config,
    mode: ViewMode,
    session: &mut SessionState,
    out: &mut W,
) -> Result<Option<Result<()>>> {
    match mode {
        ViewMode::Csv => {
            let default_path = session
                .last_csv
                .as_ref()
                .map(|p| p.display().to_string());
            let Some(path) = runtime.prompt("CSV file:", default_path)? else {
                return Ok(None);
            };
            let Some(label) = runtime.prompt("Label (empty for the first one):", None)? else {
                return Ok(None);
            };
            let Some(wants_export) = runtime.prompt("Export the table? (y/N):", None)? else {
                return Ok(None);
            };
            let export = if YES_WORDS.contains(&wants_export.trim().to_lowercase().as_str()) {
                let Some(target) =
                    runtime.prompt("Export file:", Some(DEFAULT_EXPORT_NAME.to_string()))?
                else {
                    return Ok(None);
                };
                Some(PathBuf::from(target.trim()))
            } else {
                None
            };
            let path = PathBuf::from(path.trim());
            session.last_csv = Some(path.clone());
            Ok(Some(csv(runtime, &path, Some(&label), export.as_deref(), out)))
        }
        ViewMode::Classify => {
            let Some(text) = runtime.prompt("Text to classify:", session.last_text.clone())? else {
                return Ok(None);
            };
            session.remember_text(&text);
            Ok(Some(classify(transport, config, &text, out).await))
        }
        ViewMode::Stats => {
            let Some(answer) =
                runtime.prompt("Range (7d, 30d, 90d):", Some(session.last_range.to_string()))?
            else {
                return Ok(None);
            };
            let range = match answer.parse::<StatsRange>() {
                Ok(range) => range,
                Err(e) => return Ok(Some(Err(e))),
            };
            session.last_range = range;
            Ok(Some(stats(transport, config, range, out).await))
        }
    }
}
