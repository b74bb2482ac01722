use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod controller;
mod mapper;
mod render;
mod sections;
mod source;

use config::Config;
use controller::{AppController, ChangeOutcome, LogHaptics};
use source::openweather::OpenWeatherClient;
use source::sample::SampleWeatherSource;
use source::WeatherSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weathry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let location = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_location.clone());

    if config.openweather_api_key.is_some() {
        let client = OpenWeatherClient::new(&config)?;
        run(client, &config, &location).await
    } else {
        tracing::info!("OPENWEATHER_API_KEY not set, using sample weather data");
        run(SampleWeatherSource::new(), &config, &location).await
    }
}

async fn run<S: WeatherSource>(source: S, config: &Config, location: &str) -> anyhow::Result<()> {
    let mut controller =
        AppController::new(source, Box::new(LogHaptics), config.default_location.clone());

    match controller.change_location(location).await? {
        ChangeOutcome::Updated => {
            tracing::info!(location = controller.location(), "weather data refreshed");
        }
        outcome => {
            tracing::warn!(?outcome, "location change did not update state");
        }
    }

    println!("{}", render::render_registry(controller.sections()));

    Ok(())
}
