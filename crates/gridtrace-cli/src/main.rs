//! gridtrace: trace a binary grid into filled polygons and write SVG.
//!
//! Reads either a text grid (one row per line, cells `0`/`1`) or a raster
//! image that is sampled into a grid, traces it, optionally writes the
//! SVG, and prints diagnostics. Useful for:
//!
//! - Converting QR codes and bitmap glyphs into minimal vector shapes
//! - Comparing the `component-map` and `edge-scan` coverage strategies
//! - Measuring trace durations and point reduction on large grids
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin gridtrace -- [OPTIONS] <INPUT>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gridtrace_export::{SvgMetadata, SvgRenderer};
use gridtrace_pipeline::raster::{self, DEFAULT_THRESHOLD};
use gridtrace_pipeline::{CoverageStrategy, Grid, TraceConfig, TraceDiagnostics, TraceError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Trace a binary grid into filled polygons.
///
/// Every 4-connected region of equal cells becomes one closed polygon.
/// Polygons are painted in order, so holes show through.
#[derive(Parser)]
#[command(name = "gridtrace", version)]
struct Cli {
    /// Path to the input grid (text) or image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// How to read the input.
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Image pixels per grid cell (images only).
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    cell_size: u32,

    /// Luminance below which a sampled pixel is dark (images only).
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Length of the longer document side, in points.
    #[arg(long, default_value_t = TraceConfig::DEFAULT_DOCUMENT_SIZE, conflicts_with = "inches")]
    size: f64,

    /// Length of the longer document side, in inches.
    #[arg(long)]
    inches: Option<f64>,

    /// How the scanner decides a cell is already enclosed.
    #[arg(long, value_enum, default_value_t = Coverage::ComponentMap)]
    coverage: Coverage,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full trace config as a JSON string.
    ///
    /// When provided, `--size`, `--inches` and `--coverage` are ignored.
    /// The JSON must be a valid `TraceConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Input format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pick by file extension: `.txt` and `.grid` are text, anything else
    /// is decoded as an image.
    Auto,
    /// Text grid.
    Text,
    /// Raster image sampled with `--cell-size` and `--threshold`.
    Image,
}

/// Coverage strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Coverage {
    /// Flood-filled bitmap of finalized regions (exact).
    ComponentMap,
    /// Search finalized polygon edges outward from the cell.
    EdgeScan,
}

impl From<Coverage> for CoverageStrategy {
    fn from(coverage: Coverage) -> Self {
        match coverage {
            Coverage::ComponentMap => Self::ComponentMap,
            Coverage::EdgeScan => Self::EdgeScan,
        }
    }
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` overrides the default
/// `info` level.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build a [`TraceConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<TraceConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        TraceConfig {
            coverage: cli.coverage.into(),
            document_size: cli
                .inches
                .map_or(cli.size, |inches| inches * TraceConfig::POINTS_PER_INCH),
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Resolve `Auto` against the input path.
fn resolve_format(format: Format, path: &Path) -> Format {
    if format != Format::Auto {
        return format;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("grid") => {
            Format::Text
        }
        _ => Format::Image,
    }
}

/// Turn raw input bytes into a grid.
fn load_grid(cli: &Cli, bytes: &[u8]) -> Result<Grid, TraceError> {
    match resolve_format(cli.format, &cli.input) {
        Format::Text => {
            let text = String::from_utf8_lossy(bytes);
            Ok(text.parse::<Grid>()?)
        }
        Format::Image | Format::Auto => raster::decode_grid(bytes, cli.cell_size, cli.threshold),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match std::fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let grid = match load_grid(&cli, &bytes) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    info!(
        input = %cli.input.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "grid loaded"
    );
    debug!(?config, runs = cli.runs, "trace settings");

    let config_json = serde_json::to_string(&config).ok();
    let title = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gridtrace");
    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        let metadata = SvgMetadata {
            title: Some(title),
            config_json: config_json.as_deref(),
            ..SvgMetadata::default()
        };
        let mut renderer = SvgRenderer::new(metadata);
        let diagnostics = match gridtrace_pipeline::trace_into(&grid, &config, &mut renderer) {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                eprintln!("Trace error: {e}");
                return ExitCode::FAILURE;
            }
        };

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Write SVG on the first run only.
        if run == 0
            && let Some(ref svg_path) = cli.svg
        {
            let svg = renderer.finish();
            if let Err(e) = std::fs::write(svg_path, &svg) {
                eprintln!("Error writing SVG to {}: {e}", svg_path.display());
                return ExitCode::FAILURE;
            }
            info!(path = %svg_path.display(), bytes = svg.len(), "SVG written");
        }

        all_diagnostics.push(diagnostics);
    }

    // Print summary when multiple runs.
    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Print aggregated timing across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[TraceDiagnostics]) {
    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gridtrace").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_trace_config() {
        let cli = parse(&["grid.txt"]);
        assert_eq!(config_from_cli(&cli).unwrap(), TraceConfig::default());
    }

    #[test]
    fn inches_convert_to_points() {
        let cli = parse(&["grid.txt", "--inches", "3", "--coverage", "edge-scan"]);
        let config = config_from_cli(&cli).unwrap();
        assert!((config.document_size - 216.0).abs() < f64::EPSILON);
        assert_eq!(config.coverage, CoverageStrategy::EdgeScan);
    }

    #[test]
    fn size_and_inches_conflict() {
        let result = Cli::try_parse_from(["gridtrace", "g.txt", "--size", "10", "--inches", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_cell_size_rejected_by_parser() {
        let result = Cli::try_parse_from(["gridtrace", "qr.png", "--cell-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "grid.txt",
            "--size",
            "10",
            "--config-json",
            r#"{"coverage":"EdgeScan"}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.coverage, CoverageStrategy::EdgeScan);
        assert!((config.document_size - TraceConfig::DEFAULT_DOCUMENT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_size_is_reported() {
        let cli = parse(&["grid.txt", "--size=-5"]);
        assert!(config_from_cli(&cli).unwrap_err().contains("document size"));
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["grid.txt", "--config-json", "{"]);
        assert!(config_from_cli(&cli).unwrap_err().starts_with("Error parsing --config-json"));
    }

    #[test]
    fn auto_format_uses_extension() {
        assert_eq!(
            resolve_format(Format::Auto, Path::new("a/qr.TXT")),
            Format::Text
        );
        assert_eq!(
            resolve_format(Format::Auto, Path::new("glyph.grid")),
            Format::Text
        );
        assert_eq!(
            resolve_format(Format::Auto, Path::new("qr.png")),
            Format::Image
        );
        assert_eq!(
            resolve_format(Format::Text, Path::new("qr.png")),
            Format::Text
        );
    }

    #[test]
    fn text_input_loads_grid() {
        let cli = parse(&["glyph.txt"]);
        let grid = load_grid(&cli, b"010\n111\n").unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
    }

    #[test]
    fn ragged_text_input_is_an_error() {
        let cli = parse(&["glyph.txt"]);
        assert!(matches!(
            load_grid(&cli, b"010\n11\n"),
            Err(TraceError::InvalidGrid(_))
        ));
    }
}
