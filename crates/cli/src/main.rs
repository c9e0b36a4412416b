//! sparsefield CLI - scalar-field estimation from scattered samples

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sparsefield_algorithms::interpolation::{KrigingParams, SamplePoint, VariogramFamily};
use sparsefield_algorithms::{train_variogram, Algorithm, EngineConfig, InterpolationEngine};
use sparsefield_core::{Extent, Grid, GridSpec};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "sparsefield")]
#[command(
    author,
    version,
    about = "Scalar-field estimation from scattered samples",
    long_about = None
)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration (JSON); defaults apply to missing fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a samples file
    Info {
        /// Samples file: JSON array of {"x", "y", "value"}
        samples: PathBuf,
    },
    /// Estimate the field at a single point
    Estimate {
        /// Samples file
        samples: PathBuf,
        /// Algorithm: linear, idw, kriging
        #[arg(short, long, default_value = "linear")]
        algorithm: String,
        /// Query x coordinate
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        /// Query y coordinate
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Estimate the field over a regular grid
    Grid {
        /// Samples file
        samples: PathBuf,
        /// Algorithm: linear, idw, kriging
        #[arg(short, long, default_value = "linear")]
        algorithm: String,
        /// Number of columns
        #[arg(long, default_value = "100")]
        nx: usize,
        /// Number of rows
        #[arg(long, default_value = "100")]
        ny: usize,
        /// Padding around the samples' bounding box, as a fraction of its span
        #[arg(short, long, default_value = "0.2")]
        padding: f64,
        /// Explicit domain; overrides the padded bounding box
        #[arg(long, allow_hyphen_values = true, requires_all = ["x_max", "y_min", "y_max"])]
        x_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        x_max: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y_max: Option<f64>,
        /// Output file (JSON); printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Train a kriging model and report its variogram
    Variogram {
        /// Samples file
        samples: PathBuf,
        /// Variogram family: gaussian, exponential, spherical [config: gaussian]
        #[arg(short, long)]
        family: Option<String>,
        /// Nugget [config: 1e-6]
        #[arg(short, long)]
        nugget: Option<f64>,
        /// Range; taken from the config, else derived from the sample spread
        #[arg(short, long)]
        range: Option<f64>,
        /// Also predict (with variance) at this x
        #[arg(long, allow_hyphen_values = true, requires = "y")]
        x: Option<f64>,
        /// Also predict (with variance) at this y
        #[arg(long, allow_hyphen_values = true, requires = "x")]
        y: Option<f64>,
    },
}

/// Grid written by the `grid` subcommand. Row 0 is the minimum-Y edge.
#[derive(Serialize)]
struct GridOutput<'a> {
    algorithm: &'a str,
    extent: Extent,
    nx: usize,
    ny: usize,
    cell_width: f64,
    cell_height: f64,
    values: Vec<Vec<f64>>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn progress_bar(rows: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(rows as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

fn read_samples(path: &Path) -> Result<Vec<SamplePoint>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read samples: {}", path.display()))?;
    let samples: Vec<SamplePoint> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid samples file: {}", path.display()))?;
    info!("Samples: {}", samples.len());
    Ok(samples)
}

fn read_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    debug!(?config, "loaded engine configuration");
    Ok(config)
}

/// Command-line overrides on top of the configured kriging parameters
fn variogram_params(
    base: KrigingParams,
    family: Option<&str>,
    nugget: Option<f64>,
    range: Option<f64>,
) -> Result<KrigingParams> {
    let family = match family {
        Some(name) => name.parse::<VariogramFamily>()?,
        None => base.family,
    };
    Ok(KrigingParams {
        family,
        nugget: nugget.unwrap_or(base.nugget),
        range: range.or(base.range),
    })
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    name.parse::<Algorithm>()
        .with_context(|| format!("Unknown algorithm: {}. Use linear, idw, or kriging.", name))
}

/// Bounding box of the samples, widened by ±5 on a flat axis and padded by
/// `padding × span` on each side
fn default_extent(samples: &[SamplePoint], padding: f64) -> Result<Extent> {
    let bbox = Extent::enclosing(samples.iter().map(|p| (p.x, p.y)))
        .context("Cannot derive a grid domain from an empty samples file")?;
    let e = bbox.widen_degenerate(5.0).padded(padding);
    Ok(Extent::new(e.x_min, e.x_max, e.y_min, e.y_max)?)
}

fn write_grid(output: &GridOutput<'_>, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let pb = spinner("Writing output...")?;
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            serde_json::to_writer(std::io::BufWriter::new(file), output)
                .context("Failed to write grid")?;
            pb.finish_and_clear();
        }
        None => println!("{}", serde_json::to_string(output)?),
    }
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn print_statistics(grid: &Grid<f64>) {
    let stats = grid.statistics();
    if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
        info!("Estimates: min {:.4}, max {:.4}, mean {:.4}", min, max, mean);
    }
}

// ─── Entry point ────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;
    let config = read_config(cli.config.as_deref())?;
    let engine = InterpolationEngine::new(config);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { samples } => {
            let points = read_samples(&samples)?;
            println!("File: {}", samples.display());
            println!("Samples: {}", points.len());

            if let Some(bbox) = Extent::enclosing(points.iter().map(|p| (p.x, p.y))) {
                println!(
                    "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                    bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max
                );
                let values = points.iter().map(|p| p.value);
                let min = values.clone().fold(f64::INFINITY, f64::min);
                let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
                let mean = values.sum::<f64>() / points.len() as f64;
                println!("\nValues:");
                println!("  Min: {:.4}", min);
                println!("  Max: {:.4}", max);
                println!("  Mean: {:.4}", mean);
            }

            let usable: Vec<&str> = Algorithm::ALL
                .iter()
                .filter(|a| points.len() >= a.min_samples())
                .map(|a| a.as_str())
                .collect();
            println!("\nUsable algorithms: {}", usable.join(", "));
        }

        // ── Estimate ─────────────────────────────────────────────────
        Commands::Estimate {
            samples,
            algorithm,
            x,
            y,
        } => {
            let algorithm = parse_algorithm(&algorithm)?;
            let points = read_samples(&samples)?;
            let value = engine
                .estimate(&points, algorithm, x, y)
                .with_context(|| format!("{} estimate at ({}, {}) failed", algorithm, x, y))?;
            println!("{}", value);
        }

        // ── Grid ─────────────────────────────────────────────────────
        Commands::Grid {
            samples,
            algorithm,
            nx,
            ny,
            padding,
            x_min,
            x_max,
            y_min,
            y_max,
            output,
        } => {
            let algorithm = parse_algorithm(&algorithm)?;
            let points = read_samples(&samples)?;

            let extent = match (x_min, x_max, y_min, y_max) {
                (Some(x0), Some(x1), Some(y0), Some(y1)) => Extent::new(x0, x1, y0, y1)?,
                _ => default_extent(&points, padding)?,
            };
            let spec = GridSpec::with_counts(extent, nx, ny)?;
            info!(
                "Grid: {} x {} over ({:.4}, {:.4}) - ({:.4}, {:.4})",
                nx, ny, extent.x_min, extent.y_min, extent.x_max, extent.y_max
            );

            let start = Instant::now();
            let pb = progress_bar(ny)?;
            let grid = engine
                .estimate_grid_with(&points, algorithm, &spec, |progress| {
                    pb.set_position(progress.rows_done as u64);
                    ControlFlow::Continue(())
                })
                .with_context(|| format!("{} grid failed", algorithm))?;
            pb.finish_and_clear();
            let elapsed = start.elapsed();
            print_statistics(&grid);

            let transform = spec.transform();
            let result = GridOutput {
                algorithm: algorithm.as_str(),
                extent,
                nx: spec.cols(),
                ny: spec.rows(),
                cell_width: transform.cell_width,
                cell_height: transform.cell_height,
                values: grid.to_rows(),
            };
            write_grid(&result, output.as_deref())?;
            if let Some(path) = output {
                done("Grid", &path, elapsed);
            }
        }

        // ── Variogram ────────────────────────────────────────────────
        Commands::Variogram {
            samples,
            family,
            nugget,
            range,
            x,
            y,
        } => {
            let params = variogram_params(
                engine.config().kriging,
                family.as_deref(),
                nugget,
                range,
            )?;
            debug!(?params, "variogram parameters");
            let points = read_samples(&samples)?;
            let model = train_variogram(&points, params.family, params.nugget, params.range)
                .context("Kriging training failed")?;
            let v = model.variogram();

            println!("Family: {}", v.family);
            println!("Nugget: {}", v.nugget);
            println!("Range: {:.6}", v.range);
            println!("Sill: {:.6}", v.sill);
            println!("Partial sill: {:.6}", v.psill);

            if let (Some(x), Some(y)) = (x, y) {
                let pred = model.predict_with_variance(x, y)?;
                println!("\nPrediction at ({}, {}):", x, y);
                println!("  Value: {:.6}", pred.value);
                println!("  Variance: {:.6}", pred.variance);
            }
        }
    }

    Ok(())
}
