use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::database::{connect_in_background, SqliteWeatherStore};
use crate::infrastructure::providers::OpenWeatherClient;
use crate::services::{EntityCache, Resolver};

#[derive(Args, Debug)]
pub struct WeatherArgs {
    /// City name to look up
    pub city: String,
}

pub async fn execute(args: WeatherArgs, json: bool, config: Config) -> Result<()> {
    let db = connect_in_background(config.database.clone());
    let store = Arc::new(SqliteWeatherStore::new(db));
    let provider = Arc::new(OpenWeatherClient::new(&config.weather)?);

    let resolver = Resolver::new(EntityCache::new(), store, provider)
        .with_request_timeout(Duration::from_secs(config.request_timeout_secs))
        .with_upstream_timeout(Duration::from_secs(config.weather.timeout_secs));

    let weather = resolver.resolve(&args.city).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&weather)?);
    } else {
        println!("{}", weather.name);
        if let Some(condition) = weather.conditions.first() {
            println!("{} ({})", condition.main, condition.description);
        }
        println!(
            "Temperature: {:.1} (feels like {:.1}), humidity {:.0}%",
            weather.main_data.temp, weather.main_data.feels_like, weather.main_data.humidity
        );
    }

    // One-shot process: give the detached write-back a bounded chance
    // to reach the store before exit.
    resolver.drain_persists(Duration::from_secs(5)).await;

    Ok(())
}
