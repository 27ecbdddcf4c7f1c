pub mod weather_model;

pub use weather_model::{ChartModel, ForecastRow, WeatherModel};
