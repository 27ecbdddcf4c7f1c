//! Weather data for Pogoda
//!
//! Fetches current conditions and the 5-day/3-hour forecast from
//! OpenWeatherMap and reduces the forecast into a short daily list and a
//! 24-hour chart series.

pub mod daily;
pub mod hourly;
pub mod payload;
pub mod provider;
pub mod types;
pub mod units;

pub use daily::{aggregate, aggregate_in, DEFAULT_FORECAST_DAYS};
pub use hourly::{build_hourly, build_hourly_in, HourlySeries, HOURLY_WINDOW};
pub use provider::WeatherProvider;
pub use types::*;
pub use units::{convert_wind, Units};
