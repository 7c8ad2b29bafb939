//! `lesionscan` CLI - classify skin-lesion photos as malignant or benign.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesionscan::image::{load_image, Acquisition, Interpolation};
use lesionscan::report::{render, OutputFormat};
use lesionscan::{Config, Outcome, Pipeline};

/// Classify skin-lesion photos with a pretrained ONNX model.
#[derive(Parser, Debug)]
#[command(name = "lesionscan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image paths to classify.
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// ONNX model path. Defaults to $LESIONSCAN_MODEL or the platform data directory.
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Malignancy probability threshold (0.0-1.0).
    #[arg(short, long, value_name = "FLOAT")]
    threshold: Option<f64>,

    /// Resize filter: bilinear, catmull-rom or lanczos3.
    #[arg(long, value_name = "NAME")]
    interpolation: Option<Interpolation>,

    /// Output format: text or json.
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lesionscan={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every image was classified.
fn run(args: &Args) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(model) = &args.model {
        config.model_path = Some(model.clone());
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(interpolation) = args.interpolation {
        config.interpolation = interpolation;
    }

    let pipeline = Pipeline::load(config).context("Failed to initialize pipeline")?;

    let mut all_classified = true;
    for path in &args.images {
        let acquisition = match load_image(path) {
            Ok(image) => Acquisition::Captured(image),
            Err(err) => Acquisition::Failed(err.to_string()),
        };

        let outcome = pipeline.handle(acquisition);
        if !matches!(outcome, Outcome::Classified(_)) {
            all_classified = false;
        }

        println!("{}", render(path, &outcome, args.format));
    }

    Ok(all_classified)
}
