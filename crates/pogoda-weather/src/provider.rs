//! OpenWeatherMap client: current conditions and the 5-day/3-hour forecast.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::daily::aggregate;
use crate::hourly::build_hourly;
use crate::payload::{CurrentResponse, ForecastResponse};
use crate::types::{CurrentWeather, Forecast, Sample, WeatherError};
use crate::units::Units;

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_LANG: &str = "ru";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    lang: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_options(
            api_key,
            OPENWEATHER_API_BASE,
            DEFAULT_LANG,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_options(
        api_key: &str,
        base_url: &str,
        lang: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            lang: lang.to_string(),
        })
    }

    /// Current conditions for `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &str, units: Units) -> Result<CurrentWeather, WeatherError> {
        let response: CurrentResponse = self.get("weather", city, units).await?;
        response.into_current(units)
    }

    /// Raw forecast samples for `city`, in upstream order.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_samples(
        &self,
        city: &str,
        units: Units,
    ) -> Result<Vec<Sample>, WeatherError> {
        let response: ForecastResponse = self.get("forecast", city, units).await?;
        let samples = response.samples()?;
        tracing::debug!("Received {} forecast samples", samples.len());
        Ok(samples)
    }

    /// Fetch the forecast once and run both pipelines over it.
    pub async fn forecast(
        &self,
        city: &str,
        units: Units,
        max_days: usize,
    ) -> Result<Forecast, WeatherError> {
        let samples = self.forecast_samples(city, units).await?;

        Ok(Forecast {
            days: aggregate(&samples, max_days),
            hourly: build_hourly(&samples, units),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: Units,
    ) -> Result<T, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        Self::handle_response(response, city).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        city: &str,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()));
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidApiKey),
            StatusCode::NOT_FOUND => Err(WeatherError::CityNotFound(city.to_string())),
            _ => {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!("Weather API returned {}: {}", status, message);
                Err(WeatherError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
