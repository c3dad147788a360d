use std::path::Path;

use crate::{
    foundation::{
        document::{DocumentFormat, parse_structured, read_required},
        error::{CardError, CardResult},
    },
    template::model::Template,
};

/// Load and validate a template document.
///
/// `.json` parses as JSON. Any other extension except `.csv` parses as YAML.
///
/// With `font_override`, every text block renders with that font file.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_template_config(path: &Path, font_override: Option<&Path>) -> CardResult<Template> {
    let text = read_required(path, "template config")?;
    let format = match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Csv) => {
            return Err(CardError::config(format!(
                "template '{}' must be JSON or YAML",
                path.display()
            )));
        }
        Some(f) => f,
        None => DocumentFormat::Yaml,
    };
    let doc = parse_structured(&text, format, path)?;
    let mut template = Template::from_value(&doc)?;
    if let Some(font) = font_override {
        template.override_font(font);
    }
    tracing::debug!(
        boxes = template.photo_boxes.len(),
        text_blocks = template.text_blocks.len(),
        overlays = template.overlays.len(),
        "template loaded"
    );
    Ok(template)
}

#[cfg(test)]
#[path = "../../tests/unit/template/load.rs"]
mod tests;
