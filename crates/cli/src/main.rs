//! pienoonctl - Pie Noon motion and loader CLI
//!
//! Fits and plots curves from the command line and exercises the background
//! resource loader against real files.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pienoon_loader::LoaderConfig;
use pienoon_motive::GraphSize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::PlotValue;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "pienoonctl")]
#[command(about = "Pie Noon CLI - Inspect motion curves and run the resource loader")]
#[command(version)]
#[command(long_about = "
pienoonctl is a command-line front end for the Pie Noon motion and loader crates.
It fits cubics to endpoint constraints, solves quadratics, and loads files
through the background loader the game uses for its assets.

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit a cubic to endpoint values and slopes, check it and plot it
    Cubic {
        /// Endpoint constraints as JSON, e.g.
        /// {"start_y":0,"start_derivative":0,"end_y":1,"end_derivative":0,"width_x":1}
        #[arg(long)]
        init: String,
        /// Which value to plot
        #[arg(long, value_enum, default_value_t = PlotValue::Value)]
        plot: PlotValue,
        /// Graph width in characters
        #[arg(long, default_value_t = 60)]
        width: usize,
        /// Graph height in characters
        #[arg(long, default_value_t = 20)]
        height: usize,
    },

    /// Solve c2*x^2 + c1*x + c0 = 0 and split an x range by sign
    #[command(allow_negative_numbers = true)]
    Roots {
        /// Coefficient of x^2
        c2: f32,
        /// Coefficient of x
        c1: f32,
        /// Constant term
        c0: f32,
        /// Start of the x range
        #[arg(long, default_value_t = -10.0)]
        start: f32,
        /// End of the x range
        #[arg(long, default_value_t = 10.0)]
        end: f32,
    },

    /// Load files on the loader's worker thread and report byte counts
    Load {
        /// Files to load, in queue order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Name for the worker thread
        #[arg(long)]
        thread_name: Option<String>,
        /// Give up if loading takes longer than this
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pienoonctl={log_level},pienoon_motive={log_level},pienoon_loader={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Cubic {
            init,
            plot,
            width,
            height,
        } => commands::cubic::execute(init, *plot, GraphSize::new(*width, *height), cli.json),
        Commands::Roots {
            c2,
            c1,
            c0,
            start,
            end,
        } => commands::roots::execute([*c2, *c1, *c0], *start, *end, cli.json),
        Commands::Load {
            files,
            thread_name,
            timeout_ms,
        } => {
            let config = thread_name
                .as_ref()
                .map_or_else(LoaderConfig::default, LoaderConfig::with_thread_name);
            commands::load::execute(files, config, Duration::from_millis(*timeout_ms), cli.json)
        }
    }
}
