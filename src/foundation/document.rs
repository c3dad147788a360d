use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CardError, CardResult};

/// On-disk encodings accepted for templates and job lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yml` / `.yaml`
    Yaml,
    /// `.csv` (job lists only)
    Csv,
}

impl DocumentFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Read a file that must exist; a missing file is a configuration error.
pub(crate) fn read_required(path: &Path, what: &str) -> CardResult<String> {
    if !path.exists() {
        return Err(CardError::config(format!(
            "{what} not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {what} '{}'", path.display()))
        .map_err(|e| CardError::config(format!("{e:#}")))?;
    Ok(text.trim_start_matches('\u{feff}').to_owned())
}

/// Parse JSON or YAML text into a generic value tree.
///
/// Empty YAML documents come back as `Value::Null`.
pub(crate) fn parse_structured(
    text: &str,
    format: DocumentFormat,
    path: &Path,
) -> CardResult<serde_json::Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text)
            .map_err(|e| CardError::config(format!("invalid JSON in '{}': {e}", path.display()))),
        DocumentFormat::Yaml => {
            if text.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            serde_yaml::from_str(text)
                .map_err(|e| CardError::config(format!("invalid YAML in '{}': {e}", path.display())))
        }
        DocumentFormat::Csv => Err(CardError::config(format!(
            "'{}' is CSV; expected a structured document",
            path.display()
        ))),
    }
}
