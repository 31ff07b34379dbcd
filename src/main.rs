//! Lookupd CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lookupd::cli::{Cli, Commands};
use lookupd::domain::models::Config;
use lookupd::infrastructure::config::ConfigLoader;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_ref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => lookupd::cli::handle_error(err, cli.json),
    };

    init_tracing(&config);

    let result = match cli.command {
        Commands::Movie(args) => lookupd::cli::commands::movie::execute(args, cli.json, config).await,
        Commands::Weather(args) => {
            lookupd::cli::commands::weather::execute(args, cli.json, config).await
        }
    };

    if let Err(err) = result {
        lookupd::cli::handle_error(err, cli.json);
    }
}
