//! Export command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use kapital_core::{Database, ExportFormat, RecordExportOptions};

/// Render records in the requested format
pub fn render_records(
    db: &Database,
    format: ExportFormat,
    opts: &RecordExportOptions,
) -> Result<String> {
    match format {
        ExportFormat::Csv => db
            .export_records_csv(opts)
            .context("Failed to export records as CSV"),
        ExportFormat::Json => {
            let records = db.export_records(opts)?;
            serde_json::to_string_pretty(&records).context("Failed to serialize records")
        }
    }
}

pub fn cmd_export_records(
    db: &Database,
    format: ExportFormat,
    opts: &RecordExportOptions,
    output: Option<&Path>,
) -> Result<()> {
    let content = render_records(db, format, opts)?;

    match output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Exported records");
            eprintln!("✅ Exported records to {}", path.display());
        }
        None => print!("{}", content),
    }

    Ok(())
}
