use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use value_canvas::config::CanvasConfig;
use value_canvas::render::render_board;
use value_canvas::replay::{read_script, read_snapshot, replay};
use value_canvas::Canvas;

#[derive(Parser)]
#[command(name = "vcanvas")]
#[command(about = "Inspect and replay feature-to-journey mappings on a value canvas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a workspace snapshot and print the board
    Inspect {
        /// Workspace snapshot (JSON)
        workspace: PathBuf,
    },
    /// Load a workspace snapshot, replay a gesture script, print the result
    Replay {
        /// Workspace snapshot (JSON)
        workspace: PathBuf,
        /// Gesture script (JSON array)
        script: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

/// Initialize tracing on stderr so stdout carries only rendered output.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CanvasConfig::load();
    init_tracing(&config.log_filter);

    match cli.command {
        Commands::Inspect { workspace } => {
            let mut canvas = Canvas::with_orphan_policy(config.orphan_policy);
            canvas.load(read_snapshot(&workspace)?)?;
            print!("{}", render_board(canvas.store()));
        }
        Commands::Replay { workspace, script } => {
            let mut canvas = Canvas::with_orphan_policy(config.orphan_policy);
            canvas.load(read_snapshot(&workspace)?)?;
            let steps = read_script(&script)?;

            for (i, outcome) in replay(&mut canvas, &steps).iter().enumerate() {
                println!("{:>3}: {}", i + 1, outcome);
            }
            println!();
            print!("{}", render_board(canvas.store()));
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
