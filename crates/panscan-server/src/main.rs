//! panscan-server: HTTP front end for the panscan analysis pipeline.
//!
//! Accepts a multipart image upload, runs the processing pipeline,
//! and returns the classification with inline previews of every
//! stage. All state is request-scoped; the only process-wide data is
//! the immutable pipeline configuration built from the CLI flags.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin panscan-server -- [OPTIONS]
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use panscan_pipeline::{ClassifierKind, PipelineConfig, ThresholdKind};

mod encode;
mod error;
mod routes;

use routes::AppState;

/// HTTP upload service for the panscan analysis pipeline.
#[derive(Parser)]
#[command(name = "panscan-server", version)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: SocketAddr,

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

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let state = Arc::new(AppState {
        config: cli.pipeline_config(),
    });
    let app = routes::router(state);

    let listener = match tokio::net::TcpListener::bind(cli.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind {}: {err}", cli.bind);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("panscan-server listening on http://{}", cli.bind);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_otsu_and_rules() {
        let cli = Cli::parse_from(["panscan-server"]);
        let config = cli.pipeline_config();
        assert_eq!(config.threshold, ThresholdKind::Otsu);
        assert_eq!(config.classifier, ClassifierKind::RuleBased);
    }

    #[test]
    fn fixed_threshold_flag_overrides_otsu() {
        let cli = Cli::parse_from(["panscan-server", "--fixed-threshold", "127"]);
        assert_eq!(
            cli.pipeline_config().threshold,
            ThresholdKind::Fixed(127)
        );
    }

    #[test]
    fn stub_strategy_is_selectable() {
        let cli = Cli::parse_from(["panscan-server", "--classifier", "stub"]);
        assert_eq!(cli.pipeline_config().classifier, ClassifierKind::Stub);
    }
}
