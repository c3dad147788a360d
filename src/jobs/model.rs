use std::{collections::BTreeMap, path::PathBuf};

use serde_json::Value;

use crate::foundation::error::{CardError, CardResult};

/// Placeholder names every job provides to text blocks.
pub const SUBSTITUTION_KEYS: [&str; 4] = ["recipient_name", "giver_name", "message", "project_name"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// One rendering request. Each job produces exactly one card.
pub struct Job {
    /// Fills `{recipient_name}` and names the default output file.
    pub recipient_name: String,
    /// Fills `{giver_name}`.
    pub giver_name: String,
    /// Fills `{message}`.
    pub message: String,
    /// Fills `{project_name}`.
    pub project_name: String,
    /// Photo files, placed into the template's boxes by position.
    pub photos: Vec<PathBuf>,
    /// Explicit output file stem (sanitized before use).
    pub output_name: Option<String>,
}

impl Job {
    /// Build a job from a structured record (YAML/JSON mapping).
    ///
    /// `photos` may be a single path or a sequence of paths.
    pub fn from_value(value: &Value, index: usize) -> CardResult<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| CardError::config(format!("jobs[{index}] must be a mapping")))?;
        let field = |key: &str| map.get(key).map(scalar_to_string).unwrap_or_default();

        let photos = match map.get("photos") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(scalar_to_string)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect(),
            Some(other) => {
                let single = scalar_to_string(other);
                if single.is_empty() {
                    Vec::new()
                } else {
                    vec![PathBuf::from(single)]
                }
            }
        };

        Ok(Self {
            recipient_name: field("recipient_name"),
            giver_name: field("giver_name"),
            message: field("message"),
            project_name: field("project_name"),
            photos,
            output_name: Some(field("output_name")).filter(|s| !s.is_empty()),
        })
    }

    /// Build a job from a tabular row, where `photos` is `;`-delimited.
    pub fn from_row(row: &BTreeMap<String, String>) -> Self {
        let field = |key: &str| row.get(key).cloned().unwrap_or_default();
        Self {
            recipient_name: field("recipient_name"),
            giver_name: field("giver_name"),
            message: field("message"),
            project_name: field("project_name"),
            photos: split_photo_list(&field("photos")),
            output_name: Some(field("output_name")).filter(|s| !s.is_empty()),
        }
    }

    /// Values available to `{placeholder}` tokens.
    pub fn substitutions(&self) -> BTreeMap<String, String> {
        SUBSTITUTION_KEYS
            .iter()
            .zip([
                &self.recipient_name,
                &self.giver_name,
                &self.message,
                &self.project_name,
            ])
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }
}

/// Split a `;`-delimited photo field, trimming parts and dropping empties.
pub fn split_photo_list(raw: &str) -> Vec<PathBuf> {
    raw.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/model.rs"]
mod tests;
