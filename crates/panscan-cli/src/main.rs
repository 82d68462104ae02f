//! panscan: run the analysis pipeline on a local image file.
//!
//! Prints the analysis (features + classification) as JSON to stdout.
//! With `--steps-dir`, also writes each intermediate stage as a PNG,
//! mirroring the per-step previews the HTTP service returns inline.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin panscan -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use panscan_pipeline::{
    ClassifierKind, PipelineConfig, PipelineError, StagedAnalysis, ThresholdKind, analyze_staged,
};

/// Analyze a medical image with the panscan pipeline.
#[derive(Parser)]
#[command(name = "panscan", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Classification strategy.
    #[arg(long, value_enum, default_value_t = Strategy::RuleBased)]
    classifier: Strategy,

    /// Gaussian blur sigma.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_BLUR_SIGMA)]
    blur_sigma: f32,

    /// Use a fixed binary threshold at the given level instead of Otsu.
    #[arg(long)]
    fixed_threshold: Option<u8>,

    /// Morphological opening radius in pixels.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_OPENING_RADIUS)]
    opening_radius: u8,

    /// Write each intermediate stage as a PNG into this directory.
    #[arg(long)]
    steps_dir: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// CLI-facing classifier selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Deterministic threshold ladder over the feature scalars.
    RuleBased,
    /// Random placeholder output, independent of the image.
    Stub,
}

impl From<Strategy> for ClassifierKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::RuleBased => Self::RuleBased,
            Strategy::Stub => Self::Stub,
        }
    }
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            blur_sigma: self.blur_sigma,
            threshold: self
                .fixed_threshold
                .map_or(ThresholdKind::Otsu, ThresholdKind::Fixed),
            opening_radius: self.opening_radius,
            classifier: self.classifier.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to write stage image: {0}")]
    StageWrite(#[from] image::ImageError),

    #[error("failed to serialize analysis: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let bytes = std::fs::read(&cli.image_path)?;
    let staged = analyze_staged(&bytes, &cli.pipeline_config())?;

    if let Some(dir) = &cli.steps_dir {
        write_steps(dir, &staged)?;
        tracing::info!("stage images written to {}", dir.display());
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&staged.analysis)?
    } else {
        serde_json::to_string(&staged.analysis)?
    };
    println!("{json}");
    Ok(())
}

/// Write every intermediate stage as a PNG, one file per stage.
fn write_steps(dir: &Path, staged: &StagedAnalysis) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)?;
    staged.original.save(dir.join("original.png"))?;
    staged.grayscale.save(dir.join("grayscale.png"))?;
    staged.blurred.save(dir.join("blurred.png"))?;
    staged.equalized.save(dir.join("preprocessed.png"))?;
    staged.binary.save(dir.join("threshold.png"))?;
    staged.segmented.save(dir.join("segmented.png"))?;
    staged.overlay.save(dir.join("features.png"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_pipeline() {
        let cli = Cli::parse_from(["panscan", "scan.png"]);
        let config = cli.pipeline_config();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn fixed_threshold_flag_overrides_otsu() {
        let cli = Cli::parse_from(["panscan", "scan.png", "--fixed-threshold", "127"]);
        assert_eq!(cli.pipeline_config().threshold, ThresholdKind::Fixed(127));
    }

    #[test]
    fn stub_strategy_is_selectable() {
        let cli = Cli::parse_from(["panscan", "scan.png", "--classifier", "stub"]);
        assert_eq!(cli.pipeline_config().classifier, ClassifierKind::Stub);
    }
}
