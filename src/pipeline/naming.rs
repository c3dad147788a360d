/// Stem used when neither an output name nor a recipient is available.
pub const FALLBACK_STEM: &str = "card";

/// Keep alphanumerics, `_`, `-` and whitespace, then join the remaining words
/// with `_`.
///
/// ```
/// assert_eq!(goodiecard::sanitize_filename("  Ana María / Q3 "), "Ana_María_Q3");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Sanitized output stem for a job: the explicit name when given, otherwise
/// `{recipient or "card"}_{slot}` where `slot` is the last photo slot attempted.
/// A name that sanitizes to nothing becomes [`FALLBACK_STEM`].
pub fn output_stem(output_name: Option<&str>, recipient_name: &str, slot: usize) -> String {
    let raw = match output_name.filter(|n| !n.is_empty()) {
        Some(name) => name.to_owned(),
        None => {
            let who = if recipient_name.is_empty() {
                FALLBACK_STEM
            } else {
                recipient_name
            };
            format!("{who}_{slot}")
        }
    };
    let stem = sanitize_filename(&raw);
    if stem.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        stem
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/naming.rs"]
mod tests;
