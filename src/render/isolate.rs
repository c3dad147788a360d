use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::OnceLock,
};

use image::{ImageFormat, RgbaImage};

use crate::{
    assets::decode::decode_rgba,
    foundation::error::{CardError, CardResult},
};

/// Subject isolation ("background removal") capability.
///
/// Implementations return a cutout whose alpha channel is the subject mask.
/// Callers treat any `Err` as non-fatal and keep the original photo.
pub trait SubjectIsolator {
    /// Replace the background of `image` with transparency.
    fn isolate(&self, image: &RgbaImage) -> CardResult<RgbaImage>;

    /// Whether the capability can run at all in this environment.
    fn is_available(&self) -> bool {
        true
    }
}

/// Isolator that leaves photos untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl SubjectIsolator for Passthrough {
    fn isolate(&self, image: &RgbaImage) -> CardResult<RgbaImage> {
        Ok(image.clone())
    }
}

/// Placeholder replaced by the input PNG path in [`ExternalIsolator`] arguments.
pub const INPUT_TOKEN: &str = "{input}";
/// Placeholder replaced by the output PNG path in [`ExternalIsolator`] arguments.
pub const OUTPUT_TOKEN: &str = "{output}";

/// Runs an external cutout tool on temporary PNG files.
///
/// The default configuration invokes `rembg i {input} {output}`.
#[derive(Debug)]
pub struct ExternalIsolator {
    program: PathBuf,
    args: Vec<String>,
    available: OnceLock<bool>,
}

impl ExternalIsolator {
    /// Isolator for `program` with argument template `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            available: OnceLock::new(),
        }
    }

    /// `rembg i {input} {output}`, or the same CLI under another program name.
    pub fn rembg(program: impl Into<PathBuf>) -> Self {
        Self::new(
            program,
            vec!["i".to_owned(), INPUT_TOKEN.to_owned(), OUTPUT_TOKEN.to_owned()],
        )
    }

    fn run_in(&self, work: &Path, image: &RgbaImage) -> CardResult<RgbaImage> {
        let input = work.join("input.png");
        let output = work.join("output.png");
        image
            .save_with_format(&input, ImageFormat::Png)
            .map_err(|e| CardError::image(format!("write isolation input: {e}")))?;

        let out = Command::new(&self.program)
            .args(self.render_args(&input, &output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| CardError::image(format!("spawn '{}': {e}", self.program.display())))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(CardError::image(format!(
                "'{}' exited with {}: {}",
                self.program.display(),
                out.status,
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&output)
            .map_err(|e| CardError::image(format!("read isolation output: {e}")))?;
        decode_rgba(&bytes).map_err(|e| CardError::image(format!("decode cutout: {e}")))
    }

    fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace(INPUT_TOKEN, &input).replace(OUTPUT_TOKEN, &output))
            .collect()
    }
}

impl SubjectIsolator for ExternalIsolator {
    fn isolate(&self, image: &RgbaImage) -> CardResult<RgbaImage> {
        let work = scratch_dir()?;
        let result = self.run_in(&work, image);
        std::fs::remove_dir_all(&work).ok();
        result
    }

    fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| is_program_on_path(&self.program))
    }
}

/// `true` when `program` is a path to an existing file or resolves via `PATH`.
pub fn is_program_on_path(program: &Path) -> bool {
    if program.components().count() > 1 {
        return program.is_file();
    }
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
    })
}

fn scratch_dir() -> CardResult<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "goodiecard_isolate_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir)
        .map_err(|e| CardError::image(format!("create '{}': {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/render/isolate.rs"]
mod tests;
