//! Goodiecard renders personalised thank-you cards from a declarative template
//! and a list of per-recipient jobs.
//!
//! A [`Template`] describes the canvas, the photo boxes, named text blocks and
//! decorative overlays. Each [`Job`] supplies names, a message and photo paths.
//! One job produces exactly one PNG.
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`load_template_config`] and [`load_jobs`] turn YAML/JSON/CSV
//!    documents into typed values. Malformed configuration fails here.
//! 2. **Compose**: [`render_card`] builds the base canvas, then layers
//!    `before_photos` overlays, photos, `after_photos` overlays, text and `top`
//!    overlays in that order.
//! 3. **Write**: [`process_job`] saves `{output_dir}/{stem}.png` unless the run
//!    is a dry run.
//!
//! Missing photos, overlays, background images and fonts degrade the card and
//! are reported through `tracing`; only configuration and placeholder errors
//! abort a job.
//!
//! # Getting started
//!
//! ```no_run
//! use std::path::Path;
//!
//! let template = goodiecard::load_template_config(Path::new("configs/template.yml"), None)?;
//! let out = Path::new("output");
//! goodiecard::ensure_output_dir(out)?;
//! for job in goodiecard::load_jobs(Path::new("jobs/sample_jobs.yml"))? {
//!     let path = goodiecard::process_job(
//!         &job,
//!         &template,
//!         out,
//!         &goodiecard::RenderOptions::default(),
//!         &goodiecard::Passthrough,
//!     )?;
//!     println!("Built card -> {}", path.display());
//! }
//! # Ok::<(), goodiecard::CardError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;
mod jobs;
mod pipeline;
mod render;
mod template;

pub use assets::decode::{AssetLoadError, decode_rgba, is_jpeg_path, load_rgba};
pub use effects::blur::gaussian_blur_mask;
pub use effects::color_correct::auto_color_correct;
pub use effects::composite::{alpha_composite_at, over, paste_masked};
pub use effects::fit::{fit_to_box, scale_image};
pub use effects::mask::rounded_mask;
pub use foundation::color::{
    DEFAULT_BG_COLOR, DEFAULT_MATTE_RGB, DEFAULT_TEXT_COLOR, hex_to_rgb, parse_color,
};
pub use foundation::error::{CardError, CardResult};
pub use jobs::load::load_jobs;
pub use jobs::model::{Job, SUBSTITUTION_KEYS, split_photo_list};
pub use pipeline::job::{RenderOptions, RenderedCard, ensure_output_dir, process_job, render_card};
pub use pipeline::naming::{output_stem, sanitize_filename};
pub use render::canvas::create_base_canvas;
pub use render::font::{CardFont, load_font};
pub use render::isolate::{
    ExternalIsolator, INPUT_TOKEN, OUTPUT_TOKEN, Passthrough, SubjectIsolator, is_program_on_path,
};
pub use render::overlay::{paste_overlay, paste_overlays};
pub use render::photo::{DEFAULT_PHOTO_SCALE, PhotoOptions, centered_origin, paste_photo};
pub use render::text::{LINE_BREAK, draw_text_block, line_spacing, split_lines, substitute};
pub use template::load::load_template_config;
pub use template::model::{
    Align, CanvasSpec, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_TEXT_SIZE, Overlay,
    PhotoBox, Placement, Template, TextBlock,
};
