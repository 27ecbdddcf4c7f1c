use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pogoda_core::{App, UnitSystem};
use pogoda_ui::{render, request_weather_fetch, FetchRequest, WeatherError, WeatherModel};
use pogoda_weather::{Units, WeatherProvider};

/// Exit status when no city was given
const EXIT_NO_CITY: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pogoda - current weather, a short daily forecast and a 24-hour chart for a city"
)]
struct Cli {
    /// City to look up (defaults to weather.default_city)
    #[arg(short = 'C', long)]
    city: Option<String>,

    /// metric or imperial
    #[arg(short, long)]
    units: Option<Units>,

    /// Chart series: temperature, humidity or wind
    #[arg(short, long)]
    metric: Option<String>,

    /// Number of days in the forecast list
    #[arg(short, long, value_parser = parse_days)]
    days: Option<usize>,

    /// Path to config file (TOML format)
    #[arg(short, long, env = "POGODA_CONFIG")]
    config: Option<PathBuf>,
}

fn parse_days(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("forecast must include at least one day".to_string()),
        Ok(days) => Ok(days),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = pogoda_core::init() {
        eprintln!("{:#}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let app = App::new(cli.config.as_deref())?;
    let config = app.config();

    let units = cli.units.unwrap_or(match config.weather.units {
        UnitSystem::Metric => Units::Metric,
        UnitSystem::Imperial => Units::Imperial,
    });
    let days = cli.days.unwrap_or(config.weather.forecast_days);
    let chart_metric = cli
        .metric
        .unwrap_or_else(|| config.ui.chart_metric.clone());

    let mut model = WeatherModel::new(&chart_metric);

    let city = cli
        .city
        .or_else(|| config.weather.default_city.clone())
        .filter(|c| !c.trim().is_empty());
    let Some(city) = city else {
        model.show_error(WeatherError::EmptyCity);
        println!("{}", render(&model, config.ui.chart_width));
        return Ok(ExitCode::from(EXIT_NO_CITY));
    };

    let api_key = config.weather.resolved_api_key().unwrap_or_default();
    let provider = WeatherProvider::with_options(
        &api_key,
        &config.weather.base_url,
        &config.weather.lang,
        Duration::from_secs(config.weather.request_timeout_secs),
    )?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let _guard = runtime.enter();

    tracing::info!("Pogoda started for {:?}", city);

    let (tx, rx) = std::sync::mpsc::channel();
    let generation = model.begin_request();
    request_weather_fetch(
        &tx,
        Arc::new(provider),
        generation,
        FetchRequest { city, units, days },
    );
    drop(tx);

    let message = rx
        .recv()
        .context("Weather service stopped without a result")?;
    model.apply(message);

    println!("{}", render(&model, config.ui.chart_width));

    if model.error_message().is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
