use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::hourly::HourlySeries;

/// One 3-hour forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch
    pub timestamp_utc: i64,
    pub temperature: f64,
    /// Relative humidity in percent (0-100)
    pub humidity: u8,
    pub wind_speed: f64,
    pub description: String,
    /// Probability of precipitation (0.0-1.0)
    pub precip_probability: f64,
}

impl Sample {
    /// UTC instant of the sample. Timestamps chrono cannot represent map to the epoch.
    pub fn time_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.timestamp_utc, 0).unwrap_or_default()
    }

    /// Calendar date of the sample in the given time zone.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.time_utc().with_timezone(tz).date_naive()
    }

    /// Hour of day (0-23) of the sample in the given time zone.
    pub fn local_hour<Tz: TimeZone>(&self, tz: &Tz) -> u32 {
        self.time_utc().with_timezone(tz).hour()
    }
}

/// Reduced view of every sample that falls on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Grouping key and display label (`YYYY-MM-DD`, local time)
    pub day_key: String,
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Description of the first sample seen for this day
    pub description: String,
    /// Peak precipitation probability in percent (0-100)
    pub max_precip_probability: f64,
}

/// Chartable metrics of the hourly series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Temperature,
    Humidity,
    Wind,
}

impl Metric {
    /// Resolve a metric by name. Unknown names select the wind series.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "temperature" => Self::Temperature,
            "humidity" => Self::Humidity,
            "wind" => Self::Wind,
            other => {
                tracing::debug!("Unknown chart metric {:?}, falling back to wind", other);
                Self::Wind
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Wind => "wind",
        }
    }
}

/// Current conditions for a city, wind already converted for the requested units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Output of one forecast pipeline run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub days: Vec<DaySummary>,
    pub hourly: HourlySeries,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City name is empty")]
    EmptyCity,
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },
    #[error("Parse error: {0}")]
    Parse(String),
    /// Transport failure. The request URL is stripped since it carries the API key.
    #[error("Network error: {0}")]
    Network(reqwest::Error),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => "Enter a city".to_string(),
            Self::CityNotFound(_) => "Error: check the city name".to_string(),
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.".to_string(),
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later.".to_string()
            }
            Self::Api { status, .. } => format!("Weather request failed ({})", status),
            Self::InvalidSample { .. } | Self::Parse(_) => {
                "Received malformed weather data".to_string()
            }
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the failure is transient. Classification only; callers decide what to do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sample_at(ts: i64) -> Sample {
        Sample {
            timestamp_utc: ts,
            temperature: 0.0,
            humidity: 50,
            wind_speed: 1.0,
            description: "clear sky".into(),
            precip_probability: 0.0,
        }
    }

    #[test]
    fn test_local_date_follows_time_zone() {
        // 2024-03-10 23:00 UTC
        let sample = sample_at(1_710_111_600);
        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(sample.local_date(&Utc), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(
            sample.local_date(&plus_three),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
        assert_eq!(sample.local_hour(&Utc), 23);
        assert_eq!(sample.local_hour(&plus_three), 2);
    }

    #[test]
    fn test_unrepresentable_timestamp_maps_to_epoch() {
        let sample = sample_at(i64::MAX);
        assert_eq!(sample.time_utc(), DateTime::<Utc>::default());
    }

    #[test]
    fn test_metric_from_name() {
        assert_eq!(Metric::from_name("temperature"), Metric::Temperature);
        assert_eq!(Metric::from_name(" Humidity "), Metric::Humidity);
        assert_eq!(Metric::from_name("wind"), Metric::Wind);
    }

    #[test]
    fn test_metric_unknown_falls_back_to_wind() {
        assert_eq!(Metric::from_name("pressure"), Metric::Wind);
        assert_eq!(Metric::from_name(""), Metric::Wind);
    }

    #[test]
    fn test_metric_name_round_trip() {
        for metric in [Metric::Temperature, Metric::Humidity, Metric::Wind] {
            assert_eq!(Metric::from_name(metric.as_str()), metric);
        }
    }

    #[test]
    fn test_error_user_messages() {
        assert_eq!(WeatherError::EmptyCity.user_message(), "Enter a city");
        assert!(WeatherError::CityNotFound("Nowhere".into())
            .user_message()
            .contains("city name"));
        let err = WeatherError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(err.user_message().contains("unavailable"));
    }

    #[test]
    fn test_is_retryable() {
        let server_err = WeatherError::Api {
            status: 502,
            message: String::new(),
        };
        assert!(server_err.is_retryable());
        assert!(!WeatherError::InvalidApiKey.is_retryable());
        assert!(!WeatherError::CityNotFound("x".into()).is_retryable());
        assert!(!WeatherError::EmptyCity.is_retryable());
    }
}
