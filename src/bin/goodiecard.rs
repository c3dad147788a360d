use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "goodiecard", version, about = "Render thank-you cards from a template and a job list")]
struct Cli {
    /// Template config (YAML or JSON).
    #[arg(long, default_value = "configs/template.yml")]
    template: PathBuf,

    /// Job list (YAML, JSON or CSV).
    #[arg(long, default_value = "jobs/sample_jobs.yml")]
    jobs: PathBuf,

    /// Output directory for the rendered PNGs.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Disable automatic colour correction of photos.
    #[arg(long, default_value_t = false)]
    skip_autocolor: bool,

    /// Override the font of every text block.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Multiply every text size by this factor.
    #[arg(long, default_value_t = 1.3)]
    font_scale: f64,

    /// Enlarge photos relative to their boxes.
    #[arg(long, default_value_t = goodiecard::DEFAULT_PHOTO_SCALE)]
    photo_scale: f64,

    /// Remove photo backgrounds for JPEG inputs.
    #[arg(long, default_value_t = false)]
    remove_bg_jpg: bool,

    /// Background removal command, called as `<isolator> i <input> <output>`.
    #[arg(long, default_value = "rembg")]
    isolator: PathBuf,

    /// Print output paths without writing any files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let template = goodiecard::load_template_config(&cli.template, cli.font.as_deref())
        .with_context(|| format!("load template '{}'", cli.template.display()))?;
    let jobs = goodiecard::load_jobs(&cli.jobs)
        .with_context(|| format!("load jobs '{}'", cli.jobs.display()))?;
    goodiecard::ensure_output_dir(&cli.output)?;

    if jobs.is_empty() {
        println!("No jobs found. Add entries to your jobs file.");
        return Ok(());
    }

    let opts = goodiecard::RenderOptions {
        auto_color: !cli.skip_autocolor,
        dry_run: cli.dry_run,
        font_scale: cli.font_scale,
        remove_bg: cli.remove_bg_jpg,
        photo_scale: cli.photo_scale,
    };
    let isolator = goodiecard::ExternalIsolator::rembg(cli.isolator.clone());
    if opts.remove_bg && !goodiecard::SubjectIsolator::is_available(&isolator) {
        tracing::warn!(
            program = %cli.isolator.display(),
            "background removal requested but the isolator is not installed; photos keep their backgrounds"
        );
    }

    let mut failed = 0usize;
    for (index, job) in jobs.iter().enumerate() {
        match goodiecard::process_job(job, &template, &cli.output, &opts, &isolator) {
            Ok(dest) => println!("Built card -> {}", dest.display()),
            Err(err) if err.is_config() => {
                return Err(err).with_context(|| format!("job {index}"));
            }
            Err(err) => {
                tracing::error!(job = index, recipient = %job.recipient_name, %err, "card not built");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} card(s) failed", jobs.len());
    }
    Ok(())
}
