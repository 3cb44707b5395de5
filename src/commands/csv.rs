use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::Path;

use crate::{
    dataset::Dataset,
    runtime::Runtime,
    ui::{render_banner, render_distribution, render_rows},
};

/// Load a classified CSV, chart its labels and list the rows of one label
#[tracing::instrument(skip(runtime, out))]
pub fn csv<R: Runtime + ?Sized, W: Write>(
    runtime: &R,
    path: &Path,
    label: Option<&str>,
    export: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    render_banner(out, "IHRA antisemitism analysis dashboard (0–3)")?;

    let reader = runtime.open(path)?;
    let dataset =
        Dataset::from_reader(reader).with_context(|| format!("Failed to load {:?}", path))?;
    debug!("Loaded {} row(s) from {:?}", dataset.len(), path);

    if let Some(export_path) = export {
        let writer = runtime.create_file(export_path)?;
        dataset
            .write_csv(writer)
            .with_context(|| format!("Failed to export to {:?}", export_path))?;
        info!("Exported dataset to {:?}", export_path);
        writeln!(out, "Exported {} row(s) to {}", dataset.len(), export_path.display())?;
        writeln!(out)?;
    }

    render_distribution(out, &dataset)?;

    let labels = dataset.labels();
    let selected = match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(l) => l.to_string(),
        None => match labels.first() {
            Some(first) => first.clone(),
            None => return Ok(()),
        },
    };

    writeln!(out)?;
    render_rows(out, &selected, &dataset.filter_by_label(&selected))?;
    Ok(())
}
