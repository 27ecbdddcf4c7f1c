//! Presentation layer for Pogoda: view model, async fetch service and text rendering.

mod error_mapping;
pub mod models;
pub mod render;
pub mod services;

pub use models::{ChartModel, ForecastRow, WeatherModel};
pub use render::render;
pub use services::{request_weather_fetch, FetchRequest, WeatherError, WeatherServiceMessage};
