//! GOES full-disk true-color image generator.
//!
//! Finds the red, veggie and blue ABI bands closest to (and not after) the
//! requested time in the public NOAA archive, composites them with a
//! synthetic green channel and writes the result as a PNG.

mod config;
mod time_spec;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, ensure, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use goes_common::DEFAULT_SATELLITE;
use ingestion::{fetch_triad, BandLocator, BandRetriever, DEFAULT_EARTH_SIZE};
use renderer::{encode_png, render, DEFAULT_GAMMA, DEFAULT_PADDING};
use storage::{S3Archive, S3ArchiveConfig};

use config::ImageryConfig;

#[derive(Parser, Debug)]
#[command(name = "goes-imagery")]
#[command(about = "Generate full-disk true-color images from GOES ABI data")]
struct Args {
    /// Output PNG path (parent directories are created)
    #[arg(short, long)]
    output: PathBuf,

    /// Satellite key (goes-east, goes-west, goes-16 ... goes-19)
    #[arg(long, visible_alias = "sat", env = "GOES_SATELLITE")]
    satellite: Option<String>,

    /// Target time: now, latest, -3h, -30m, YYYY-MM-DD, YYYY-MM-DD HH:MM[:SS]
    #[arg(short, long, default_value = "now", allow_hyphen_values = true)]
    time: String,

    /// Earth diameter in pixels
    #[arg(short = 's', long)]
    earth_size: Option<usize>,

    /// Canvas size as a multiple of the earth diameter (1.0 = no padding)
    #[arg(short, long)]
    padding: Option<f64>,

    /// Display gamma
    #[arg(short, long)]
    gamma: Option<f32>,

    /// YAML config (default: config/goes-imagery.yaml if present)
    #[arg(short, long, env = "GOES_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for transient band downloads
    #[arg(long, env = "GOES_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// AWS region of the archive buckets
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,

    /// S3-compatible endpoint override
    #[arg(long, env = "GOES_S3_ENDPOINT")]
    endpoint: Option<String>,

    /// Log progress at debug level
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and suppress the summary
    #[arg(short, long)]
    quiet: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,
}

/// Settings after merging flags, config defaults and built-in constants.
#[derive(Debug, Clone, PartialEq)]
struct RunSettings {
    satellite: String,
    earth_size: usize,
    padding: f64,
    gamma: f32,
}

impl RunSettings {
    fn resolve(args: &Args, config: &ImageryConfig) -> Result<Self> {
        let defaults = &config.defaults;
        let settings = Self {
            satellite: args
                .satellite
                .clone()
                .or_else(|| defaults.satellite.clone())
                .unwrap_or_else(|| DEFAULT_SATELLITE.to_string()),
            earth_size: args
                .earth_size
                .or(defaults.earth_size)
                .unwrap_or(DEFAULT_EARTH_SIZE),
            padding: args.padding.or(defaults.padding).unwrap_or(DEFAULT_PADDING),
            gamma: args.gamma.or(defaults.gamma).unwrap_or(DEFAULT_GAMMA),
        };

        ensure!(settings.earth_size > 0, "Earth size must be a positive number of pixels");
        ensure!(
            settings.gamma.is_finite() && settings.gamma > 0.0,
            "Gamma must be positive, got {}",
            settings.gamma
        );
        ensure!(
            settings.padding.is_finite(),
            "Padding must be a finite ratio, got {}",
            settings.padding
        );
        Ok(settings)
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level))
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if args.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}

async fn run(args: &Args) -> Result<()> {
    let config = ImageryConfig::resolve(args.config.as_deref())?;
    let registry = config.registry()?;
    let settings = RunSettings::resolve(args, &config)?;
    let target = time_spec::parse_time(&args.time, Utc::now())?;

    let satellite = registry.get(&settings.satellite)?;
    info!(
        satellite = %settings.satellite,
        name = %satellite.name,
        target = %target.format("%Y-%m-%d %H:%M:%S"),
        earth_size = settings.earth_size,
        padding = settings.padding,
        gamma = settings.gamma,
        "Creating true-color image"
    );

    let archive = S3Archive::anonymous(&S3ArchiveConfig {
        region: args.region.clone(),
        endpoint: args.endpoint.clone(),
    })
    .await;
    let decoder = netcdf_parser::default_decoder();

    let locator = BandLocator::new(&registry, &archive).with_options(config.search_options());
    let mut retriever = BandRetriever::new(&archive, decoder.as_ref());
    if let Some(dir) = &args.temp_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create temp dir: {}", dir.display()))?;
        retriever = retriever.with_temp_dir(dir);
    }

    let triad = fetch_triad(
        &locator,
        &retriever,
        target,
        settings.earth_size,
        &settings.satellite,
    )
    .await?;

    let image = render(
        &triad.red,
        &triad.veggie,
        &triad.blue,
        settings.padding,
        settings.gamma,
    )?;
    let png = encode_png(&image)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
    }
    tokio::fs::write(&args.output, &png)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "Saved image"
    );

    if !args.quiet {
        println!(
            "Saved: {} ({}x{})",
            args.output.display(),
            image.width(),
            image.height()
        );
        println!("Image time: {} UTC", triad.acquired.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("goes-imagery").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_output_is_required() {
        assert!(Args::try_parse_from(["goes-imagery"]).is_err());
    }

    #[test]
    fn test_short_flags_and_alias() {
        let args = parse(&["-o", "out.png", "--sat", "goes-east", "-t", "-3h", "-s", "512", "-p", "1.0", "-g", "1.8"]);
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.satellite.as_deref(), Some("goes-east"));
        assert_eq!(args.time, "-3h");
        assert_eq!(args.earth_size, Some(512));
        assert_eq!(args.padding, Some(1.0));
        assert_eq!(args.gamma, Some(1.8));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["goes-imagery", "-o", "x.png", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_settings_builtin_defaults() {
        let args = parse(&["-o", "out.png", "--satellite", "goes-16"]);
        let settings = RunSettings::resolve(&args, &ImageryConfig::default()).unwrap();
        assert_eq!(
            settings,
            RunSettings {
                satellite: "goes-16".to_string(),
                earth_size: 2048,
                padding: 2.1,
                gamma: 2.2,
            }
        );
    }

    #[test]
    fn test_flags_override_config_defaults() {
        let config = ImageryConfig::from_yaml_str(
            "defaults:\n  satellite: goes-east\n  earth_size: 1024\n  gamma: 1.5\n",
        )
        .unwrap();
        let args = parse(&["-o", "out.png", "-g", "2.0"]);
        let settings = RunSettings::resolve(&args, &config).unwrap();

        assert_eq!(settings.earth_size, 1024);
        assert_eq!(settings.gamma, 2.0);
        assert_eq!(settings.padding, 2.1);
        if std::env::var_os("GOES_SATELLITE").is_none() {
            assert_eq!(settings.satellite, "goes-east");
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let config = ImageryConfig::default();
        assert!(RunSettings::resolve(&parse(&["-o", "o.png", "-s", "0"]), &config).is_err());
        assert!(RunSettings::resolve(&parse(&["-o", "o.png", "-g", "0"]), &config).is_err());
        assert!(RunSettings::resolve(&parse(&["-o", "o.png", "-g", "NaN"]), &config).is_err());
    }
}
