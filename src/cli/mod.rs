//! Command-line front end.
//!
//! The CLI is a thin invoker: it wires configuration, the background
//! database connection, and the providers into a resolver, runs one
//! resolution, and prints the result. All lookup semantics live in
//! `services::resolver`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::error::ResolveError;

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "lookupd", about = "Tiered movie and weather lookups", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a configuration file (defaults to lookupd.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up movie details by title
    Movie(commands::movie::MovieArgs),
    /// Look up current weather by city name
    Weather(commands::weather::WeatherArgs),
}

/// Print a failed resolution and exit non-zero.
///
/// An explicit provider no-result is a client-side outcome (exit 2);
/// everything else is a server-side failure (exit 1), mirroring the
/// original service's 400/500 split.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    let exit_code = match err.downcast_ref::<ResolveError>() {
        Some(ResolveError::NotFound(_)) => 2,
        _ => 1,
    };

    if json {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{body}");
    } else {
        eprintln!("error: {err:#}");
    }

    std::process::exit(exit_code);
}
