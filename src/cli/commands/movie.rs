use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::database::{connect_in_background, SqliteMovieStore};
use crate::infrastructure::providers::OmdbClient;
use crate::services::{EntityCache, Resolver};

#[derive(Args, Debug)]
pub struct MovieArgs {
    /// Movie title to look up
    pub title: String,
}

pub async fn execute(args: MovieArgs, json: bool, config: Config) -> Result<()> {
    let db = connect_in_background(config.database.clone());
    let store = Arc::new(SqliteMovieStore::new(db));
    let provider = Arc::new(OmdbClient::new(&config.omdb)?);

    let resolver = Resolver::new(EntityCache::new(), store, provider)
        .with_request_timeout(Duration::from_secs(config.request_timeout_secs))
        .with_upstream_timeout(Duration::from_secs(config.omdb.timeout_secs));

    let movie = resolver.resolve(&args.title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&movie)?);
    } else {
        println!("{} ({})", movie.title, movie.year);
        if !movie.rating.is_empty() {
            println!("IMDb rating: {}", movie.rating);
        }
        if !movie.language.is_empty() {
            println!("Language: {}", movie.language);
        }
        if !movie.plot.is_empty() {
            println!("\n{}", movie.plot);
        }
    }

    // One-shot process: give the detached write-back a bounded chance
    // to reach the store before exit.
    resolver.drain_persists(Duration::from_secs(5)).await;

    Ok(())
}
