//! Results export: `id,Prediction,Rationale` CSV.

use std::path::Path;

use super::types::VerificationItem;

/// Default file name offered for downloads.
pub const EXPORT_FILE_NAME: &str = "final_predictions.csv";

const HEADER: &str = "id,Prediction,Rationale";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

fn needs_quoting(value: &str) -> bool {
    value.contains([',', '"', '\r', '\n'])
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render results as CSV. Rows are joined with `\n`, without a trailing
/// newline. Items without a result get empty prediction and rationale
/// columns. Rationales are always quoted.
pub fn export_results_csv(items: &[VerificationItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(HEADER.to_string());

    for item in items {
        let id = if needs_quoting(&item.id) {
            quote(&item.id)
        } else {
            item.id.clone()
        };
        let line = match &item.result {
            Some(verdict) => format!("{id},{},{}", verdict.prediction, quote(&verdict.rationale)),
            None => format!("{id},,"),
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Write the export to `path`, creating parent directories.
pub fn write_results(items: &[VerificationItem], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, export_results_csv(items))?;
    tracing::info!(path = %path.display(), rows = items.len(), "Results exported");
    Ok(())
}
