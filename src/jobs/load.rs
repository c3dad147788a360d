use std::{collections::BTreeMap, path::Path};

use serde_json::Value;

use crate::{
    foundation::{
        document::{DocumentFormat, parse_structured, read_required},
        error::{CardError, CardResult},
    },
    jobs::model::Job,
};

/// Load the job list from YAML, JSON or CSV.
///
/// Structured documents may be a bare sequence or a mapping with a `jobs` key.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_jobs(path: &Path) -> CardResult<Vec<Job>> {
    let text = read_required(path, "jobs file")?;
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| CardError::config("jobs must be YAML, JSON or CSV"))?;

    let jobs = match format {
        DocumentFormat::Csv => parse_csv_jobs(&text, path)?,
        DocumentFormat::Json | DocumentFormat::Yaml => {
            let doc = parse_structured(&text, format, path)?;
            parse_structured_jobs(&doc)?
        }
    };
    tracing::debug!(count = jobs.len(), "jobs loaded");
    Ok(jobs)
}

fn parse_structured_jobs(doc: &Value) -> CardResult<Vec<Job>> {
    let items = match doc {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("jobs") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err(CardError::config("'jobs' must be a sequence")),
        },
        _ => return Err(CardError::config("jobs document must be a sequence or mapping")),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| Job::from_value(v, i))
        .collect()
}

fn parse_csv_jobs(text: &str, path: &Path) -> CardResult<Vec<Job>> {
    let invalid = |row: usize, e: csv::Error| {
        CardError::config(format!("invalid CSV row {row} in '{}': {e}", path.display()))
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| invalid(0, e))?.clone();

    let mut jobs = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| invalid(i + 1, e))?;
        // Short rows leave their trailing columns unset; extra cells are dropped.
        let row: BTreeMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        jobs.push(Job::from_row(&row));
    }
    Ok(jobs)
}

#[cfg(test)]
#[path = "../../tests/unit/jobs/load.rs"]
mod tests;
