//! Text rendering of the dashboard views.

mod chart;
mod session;

use std::io::{self, Write};

pub use chart::{BAR_WIDTH, render_bar_chart};
pub use session::{SessionState, ViewMode};

use crate::classify::Classification;
use crate::dataset::{Dataset, Row, compare_labels};
use crate::stats::StatsResponse;

/// Shown for any field the service did not return.
pub const PLACEHOLDER: &str = "—";

/// Longest text cell shown in the browse table.
const MAX_CELL_CHARS: usize = 60;

pub fn render_banner<W: Write>(out: &mut W, subtitle: &str) -> io::Result<()> {
    writeln!(out, "SemitIA · {}", subtitle)?;
    writeln!(out)
}

/// `0.875` -> `87.5%`.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) if c.is_finite() => format!("{:.1}%", c * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn render_classification<W: Write>(out: &mut W, result: &Classification) -> io::Result<()> {
    let response = &result.response;
    let or_placeholder = |v: &Option<String>| v.clone().unwrap_or_else(|| PLACEHOLDER.to_string());

    writeln!(out, "IHRA level:   {}", or_placeholder(&response.label))?;
    writeln!(out, "Confidence:   {}", format_confidence(response.confidence))?;
    writeln!(out, "Time:         {} ms", result.elapsed_ms())?;
    writeln!(out, "Subtype:      {}", or_placeholder(&response.subtype))?;
    writeln!(out, "Reason:       {}", or_placeholder(&response.reason))?;
    writeln!(out, "IHRA version: {}", or_placeholder(&response.ihra_version))?;
    writeln!(out, "Endpoint:     {}", result.url)
}

pub fn render_stats<W: Write>(out: &mut W, stats: &StatsResponse) -> io::Result<()> {
    if stats.counts.is_empty() {
        writeln!(out, "No count data yet.")?;
    } else {
        writeln!(out, "Count per IHRA level")?;
        render_bar_chart(out, "IHRA level", "Count", &stats.sorted_counts())?;
    }

    if stats.series.is_empty() {
        return Ok(());
    }

    let mut columns: Vec<&str> = Vec::new();
    for point in &stats.series {
        for key in point.counts.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    columns.sort_by(|a, b| compare_labels(a, b));

    writeln!(out)?;
    write!(out, "{:<12}", "date")?;
    for column in &columns {
        write!(out, " {:>6}", column)?;
    }
    writeln!(out)?;
    for point in &stats.series {
        write!(out, "{:<12}", point.date)?;
        for column in &columns {
            match point.counts.get(*column) {
                Some(count) => write!(out, " {:>6}", count)?,
                None => write!(out, " {:>6}", PLACEHOLDER)?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Distribution chart plus the list of labels available for filtering.
pub fn render_distribution<W: Write>(out: &mut W, dataset: &Dataset) -> io::Result<()> {
    let distribution: Vec<(String, u64)> = dataset
        .label_distribution()
        .into_iter()
        .map(|(label, count)| (label, count as u64))
        .collect();

    writeln!(out, "Classification distribution (IHRA 0–3), {} row(s)", dataset.len())?;
    if distribution.is_empty() {
        return writeln!(out, "No labelled rows.");
    }
    render_bar_chart(out, "IHRA category", "Texts", &distribution)?;
    writeln!(
        out,
        "Labels: {}",
        distribution
            .iter()
            .map(|(label, _)| label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

pub fn render_rows<W: Write>(out: &mut W, label: &str, rows: &[Row<'_>]) -> io::Result<()> {
    writeln!(out, "Showing {} text(s) with label {}", rows.len(), label)?;
    for (i, row) in rows.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[{}] {}", i + 1, truncate_cell(row.text))?;
        writeln!(
            out,
            "    subtype: {}  confidence: {}",
            cell_or_placeholder(row.subtype),
            cell_or_placeholder(row.confidence)
        )?;
        writeln!(out, "    reason: {}", truncate_cell(row.reason))?;
    }
    Ok(())
}

fn cell_or_placeholder(cell: &str) -> &str {
    if cell.trim().is_empty() {
        PLACEHOLDER
    } else {
        cell
    }
}

fn truncate_cell(cell: &str) -> String {
    let cell = cell_or_placeholder(cell).replace(['\r', '\n'], " ");
    match cell.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => format!("{}…", &cell[..idx]),
        None => cell,
    }
}
