//! State remembered between actions of one interactive dashboard session.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::stats::StatsRange;

/// The three mutually exclusive dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Csv,
    Classify,
    Stats,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Csv, ViewMode::Classify, ViewMode::Stats];
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Csv => write!(f, "csv"),
            ViewMode::Classify => write!(f, "classify"),
            ViewMode::Stats => write!(f, "stats"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "1" => Ok(ViewMode::Csv),
            "classify" | "live" | "2" => Ok(ViewMode::Classify),
            "stats" | "3" => Ok(ViewMode::Stats),
            _ => anyhow::bail!(
                "Unknown mode: {}. Expected csv, classify, or stats.",
                s.trim()
            ),
        }
    }
}

/// Owned by the dashboard loop; the client code never sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Option<ViewMode>,
    pub last_text: Option<String>,
    pub last_csv: Option<PathBuf>,
    pub last_range: StatsRange,
}

impl SessionState {
    pub fn remember_mode(&mut self, mode: ViewMode) {
        self.mode = Some(mode);
    }

    /// Blank text is not worth remembering.
    pub fn remember_text(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.last_text = Some(text.to_string());
        }
    }
}
