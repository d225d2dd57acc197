//! Digit Pad CLI — replay a stroke script, export the surface as PNG, or
//! send it to a predict server and print the status line.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` (or pass `-v`)
//! to see state transitions and request details.

mod strokes;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dp_editor::{ClientConfig, HttpPredictClient, Submit, SurfaceController};
use std::path::{Path, PathBuf};
use strokes::StrokeScript;

#[derive(Parser)]
#[command(
    name = "digit-pad",
    about = "Draw a digit from a stroke script and classify it",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay strokes and write the surface as PNG
    Render {
        /// Stroke script (JSON)
        strokes: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Replay strokes and submit the surface to a predict server
    Predict {
        /// Stroke script (JSON)
        strokes: PathBuf,

        /// Client config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Predict endpoint URL, overriding the config
        #[arg(long)]
        endpoint: Option<String>,

        /// Also write the submitted PNG here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the 28×28 cell grid as text
    Grid {
        /// Stroke script (JSON)
        strokes: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli.command).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when the command ran but did not succeed
/// (e.g. the server reported an error).
async fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Render { strokes, out } => {
            let controller = replay(&strokes)?;
            write_png(&controller, &out)?;
            println!("wrote {}", out.display());
            Ok(true)
        }
        Commands::Predict {
            strokes,
            config,
            endpoint,
            out,
        } => {
            let mut config = match config {
                Some(path) => ClientConfig::from_json_file(&path)?,
                None => ClientConfig::default(),
            };
            if let Some(endpoint) = endpoint {
                config = config.with_endpoint(endpoint)?;
            }

            let mut controller = replay(&strokes)?;
            if let Some(out) = &out {
                write_png(&controller, out)?;
            }

            let client = HttpPredictClient::new(&config)?;
            log::info!("submitting to {}", client.endpoint());
            let submit = controller.submit_with(&client).await;
            if let Submit::EncodeFailed = submit {
                bail!("could not encode the surface");
            }

            let status = controller.status();
            println!("{}", status.text());
            Ok(status.is_success())
        }
        Commands::Grid { strokes } => {
            let controller = replay(&strokes)?;
            print!("{}", grid_text(&controller));
            Ok(true)
        }
    }
}

fn replay(path: &Path) -> Result<SurfaceController> {
    let script = StrokeScript::from_file(path)?;
    let mut controller = SurfaceController::new();
    script.replay(&mut controller);
    Ok(controller)
}

fn write_png(controller: &SurfaceController, path: &Path) -> Result<()> {
    let png_data = dp_core::encode_png(controller.raster())?;
    std::fs::write(path, &png_data).with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("PNG export complete: {} bytes", png_data.len());
    Ok(())
}

/// `#` for inked cells, `.` for empty, one grid row per line.
fn grid_text(controller: &SurfaceController) -> String {
    let grid = controller.raster().intensity_grid();
    let mut out = String::with_capacity(grid.len() + dp_core::GRID_SIZE);
    for row in grid.chunks(dp_core::GRID_SIZE) {
        out.extend(row.iter().map(|&v| if v > 0.0 { '#' } else { '.' }));
        out.push('\n');
    }
    out
}
