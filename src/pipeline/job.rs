use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::{ImageFormat, RgbaImage};

use crate::{
    assets::decode::{is_jpeg_path, load_rgba},
    foundation::{
        color::hex_to_rgb,
        error::{CardError, CardResult},
    },
    jobs::model::Job,
    pipeline::naming::output_stem,
    render::{
        canvas::create_base_canvas,
        isolate::SubjectIsolator,
        overlay::paste_overlays,
        photo::{DEFAULT_PHOTO_SCALE, PhotoOptions, paste_photo},
        text::draw_text_block,
    },
    template::model::{Placement, Template},
};

/// Per-run rendering switches shared by every job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Auto colour correction of photos.
    pub auto_color: bool,
    /// Compute output paths without writing files.
    pub dry_run: bool,
    /// Multiplier applied to every text block size.
    pub font_scale: f64,
    /// Subject isolation for JPEG photos.
    pub remove_bg: bool,
    /// Enlargement of each photo relative to its box.
    pub photo_scale: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            auto_color: true,
            dry_run: false,
            font_scale: 1.0,
            remove_bg: false,
            photo_scale: DEFAULT_PHOTO_SCALE,
        }
    }
}

/// A composed card before it is written to disk.
#[derive(Clone, Debug)]
pub struct RenderedCard {
    /// Final pixels, straight-alpha RGBA8.
    pub image: RgbaImage,
    /// Sanitized file stem (no extension).
    pub file_stem: String,
}

/// Compose one card.
///
/// Layers, bottom to top: base canvas, `before_photos` overlays, photos,
/// `after_photos` overlays, text blocks, `top` overlays. The shared `template`
/// is never modified.
#[tracing::instrument(skip_all, fields(recipient = %job.recipient_name))]
pub fn render_card(
    job: &Job,
    template: &Template,
    opts: &RenderOptions,
    isolator: &dyn SubjectIsolator,
) -> CardResult<RenderedCard> {
    let mut template = template.clone();
    template.scale_text(opts.font_scale);

    let boxes = &template.photo_boxes;
    if !job.photos.is_empty() && boxes.is_empty() {
        return Err(CardError::config("template does not define any photo boxes"));
    }
    if job.photos.len() > boxes.len() {
        tracing::warn!(
            photos = job.photos.len(),
            boxes = boxes.len(),
            "more photos than boxes; extra photos ignored"
        );
    }

    let mut canvas = create_base_canvas(&template.canvas);
    let matte_rgb = hex_to_rgb(&template.canvas.background_color);

    paste_overlays(&mut canvas, &template.overlays, Placement::BeforePhotos);

    let mut last_slot = 0;
    for (slot, (path, bx)) in job.photos.iter().zip(boxes).enumerate() {
        last_slot = slot;
        let photo = match load_rgba(path) {
            Ok(photo) => photo,
            Err(err) => {
                tracing::warn!(%err, slot, "photo skipped");
                continue;
            }
        };
        let photo_opts = PhotoOptions {
            auto_color: opts.auto_color,
            remove_bg: opts.remove_bg && is_jpeg_path(path),
            matte_rgb: Some(matte_rgb),
            scale: opts.photo_scale,
        };
        paste_photo(&mut canvas, photo, bx, &photo_opts, isolator);
        tracing::debug!(slot, path = %path.display(), "photo placed");
    }

    paste_overlays(&mut canvas, &template.overlays, Placement::AfterPhotos);

    let values = job.substitutions();
    for (name, block) in &template.text_blocks {
        draw_text_block(&mut canvas, block, &values).map_err(|e| match e {
            CardError::Substitution(msg) => {
                CardError::substitution(format!("text block '{name}': {msg}"))
            }
            other => other,
        })?;
    }

    paste_overlays(&mut canvas, &template.overlays, Placement::Top);

    Ok(RenderedCard {
        image: canvas,
        file_stem: output_stem(job.output_name.as_deref(), &job.recipient_name, last_slot),
    })
}

/// Render one job and write `{output_dir}/{stem}.png`, returning the path.
///
/// With `dry_run` the path is computed and nothing is written.
#[tracing::instrument(skip_all, fields(recipient = %job.recipient_name))]
pub fn process_job(
    job: &Job,
    template: &Template,
    output_dir: &Path,
    opts: &RenderOptions,
    isolator: &dyn SubjectIsolator,
) -> CardResult<PathBuf> {
    let card = render_card(job, template, opts, isolator)?;
    let path = output_dir.join(format!("{}.png", card.file_stem));
    if opts.dry_run {
        tracing::info!(path = %path.display(), "dry run; card not written");
        return Ok(path);
    }

    card.image
        .save_with_format(&path, ImageFormat::Png)
        .with_context(|| format!("write card '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "card written");
    Ok(path)
}

/// Create `path` and any missing parents.
pub fn ensure_output_dir(path: &Path) -> CardResult<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("create output directory '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/job.rs"]
mod tests;
