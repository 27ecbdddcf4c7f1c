//! OpenWeatherMap wire format and its conversion into domain values.
//!
//! Every numeric field is optional on the wire so that a missing value is
//! reported as [`WeatherError::InvalidSample`] with the entry index instead of
//! a generic JSON error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{CurrentWeather, Sample, WeatherError};
use crate::units::{convert_wind, Units};

/// Response of the `/forecast` endpoint (5 days, 3-hour steps).
/// Only `list` is read; `city`, `cnt` and the rest are ignored.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<RawEntry>,
}

/// One element of `list`
#[derive(Debug, Default, Deserialize)]
pub struct RawEntry {
    pub dt: Option<i64>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
    pub pop: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCondition {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

/// Response of the `/weather` endpoint
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: Option<String>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
}

impl Sample {
    /// Convert the `index`-th forecast entry.
    pub fn from_raw(index: usize, raw: &RawEntry) -> Result<Self, WeatherError> {
        let invalid = |reason: &str| WeatherError::InvalidSample {
            index,
            reason: reason.to_string(),
        };

        let timestamp_utc = raw.dt.ok_or_else(|| invalid("missing dt"))?;
        if DateTime::<Utc>::from_timestamp(timestamp_utc, 0).is_none() {
            return Err(invalid("dt out of range"));
        }

        let main = raw.main.as_ref().ok_or_else(|| invalid("missing main"))?;
        let temperature = finite(main.temp, "main.temp").map_err(|r| invalid(r.as_str()))?;
        let humidity = parse_humidity(main.humidity).map_err(|r| invalid(r.as_str()))?;

        let wind = raw.wind.as_ref().ok_or_else(|| invalid("missing wind"))?;
        let wind_speed = finite(wind.speed, "wind.speed").map_err(|r| invalid(r.as_str()))?;

        let description = parse_description(&raw.weather).map_err(|r| invalid(r.as_str()))?;

        // Absent pop means no precipitation forecast
        let precip_probability = raw.pop.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&precip_probability) {
            return Err(invalid("pop outside 0..1"));
        }

        Ok(Self {
            timestamp_utc,
            temperature,
            humidity,
            wind_speed,
            description,
            precip_probability,
        })
    }
}

impl ForecastResponse {
    /// Convert every entry, failing on the first malformed one.
    pub fn samples(&self) -> Result<Vec<Sample>, WeatherError> {
        self.list
            .iter()
            .enumerate()
            .map(|(index, raw)| Sample::from_raw(index, raw))
            .collect()
    }
}

impl CurrentResponse {
    /// Convert into display values; wind goes through [`convert_wind`].
    pub fn into_current(self, units: Units) -> Result<CurrentWeather, WeatherError> {
        let parse = |reason: String| WeatherError::Parse(format!("current weather: {}", reason));

        let main = self
            .main
            .as_ref()
            .ok_or_else(|| parse("missing main".to_string()))?;
        let temperature = finite(main.temp, "main.temp").map_err(parse)?;
        let humidity = parse_humidity(main.humidity).map_err(parse)?;
        let wind = self
            .wind
            .as_ref()
            .ok_or_else(|| parse("missing wind".to_string()))?;
        let wind_speed = finite(wind.speed, "wind.speed").map_err(parse)?;
        let description = parse_description(&self.weather).map_err(parse)?;

        Ok(CurrentWeather {
            city: self.name.unwrap_or_default(),
            temperature,
            description,
            humidity,
            wind_speed: convert_wind(wind_speed, units),
        })
    }
}

fn finite(value: Option<f64>, field: &str) -> Result<f64, String> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(format!("{} is not a finite number", field)),
        None => Err(format!("missing {}", field)),
    }
}

fn parse_humidity(value: Option<f64>) -> Result<u8, String> {
    let value = finite(value, "main.humidity")?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("main.humidity {} outside 0..100", value));
    }
    Ok(value.round() as u8)
}

fn parse_description(conditions: &[RawCondition]) -> Result<String, String> {
    conditions
        .first()
        .and_then(|c| c.description.clone())
        .ok_or_else(|| "missing weather[0].description".to_string())
}
