//! Weather backend: async weather fetching.
//! All network work runs on the tokio runtime; results are sent via mpsc.

use std::sync::Arc;

use pogoda_core::{NetworkError, ReqwestErrorExt};
use pogoda_weather::{CurrentWeather, Forecast, Units, WeatherProvider};

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherError {
    EmptyCity,
    CityNotFound(String),
    InvalidApiKey,
    Api { status: u16, message: String },
    Timeout,
    Network(String),
    InvalidData(String),
    NotInitialized,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::EmptyCity => write!(f, "No city given"),
            WeatherError::CityNotFound(city) => write!(f, "City not found: {}", city),
            WeatherError::InvalidApiKey => write!(f, "Invalid API key"),
            WeatherError::Api { status, message } => {
                write!(f, "Weather API error {}: {}", status, message)
            }
            WeatherError::Timeout => write!(f, "Weather request timed out"),
            WeatherError::Network(s) => write!(f, "Weather error: {}", s),
            WeatherError::InvalidData(s) => write!(f, "Invalid weather data: {}", s),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<pogoda_weather::WeatherError> for WeatherError {
    fn from(e: pogoda_weather::WeatherError) -> Self {
        use pogoda_weather::WeatherError as Upstream;

        match e {
            Upstream::EmptyCity => WeatherError::EmptyCity,
            Upstream::CityNotFound(city) => WeatherError::CityNotFound(city),
            Upstream::InvalidApiKey => WeatherError::InvalidApiKey,
            Upstream::Api { status, message } => WeatherError::Api { status, message },
            e @ (Upstream::InvalidSample { .. } | Upstream::Parse(_)) => {
                WeatherError::InvalidData(e.to_string())
            }
            Upstream::Network(e) => match e.into_network_error() {
                NetworkError::Timeout => WeatherError::Timeout,
                other => WeatherError::Network(other.to_string()),
            },
        }
    }
}

/// What to fetch
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub city: String,
    pub units: Units,
    pub days: usize,
}

/// Messages sent from async operations back to the caller
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Both halves of one fetch. `generation` is the value handed to [`request_fetch`].
    FetchDone {
        generation: u64,
        units: Units,
        current: Result<CurrentWeather, WeatherError>,
        forecast: Result<Forecast, WeatherError>,
    },
}

/// Request current weather and forecast for one city asynchronously.
/// Sends `FetchDone` on the channel when both requests have finished.
pub fn request_fetch(
    tx: &std::sync::mpsc::Sender<WeatherServiceMessage>,
    provider: Arc<WeatherProvider>,
    generation: u64,
    request: FetchRequest,
) {
    let tx = tx.clone();
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(r) => r,
        Err(_) => {
            let _ = tx.send(WeatherServiceMessage::FetchDone {
                generation,
                units: request.units,
                current: Err(WeatherError::NotInitialized),
                forecast: Err(WeatherError::NotInitialized),
            });
            return;
        }
    };

    runtime.spawn(async move {
        let FetchRequest { city, units, days } = request;
        tracing::info!("Fetching weather for {:?} ({}), generation {}", city, units, generation);

        let (current, forecast) = tokio::join!(
            provider.current(&city, units),
            provider.forecast(&city, units, days)
        );

        if let Err(e) = &current {
            tracing::warn!("Current weather failed: {}", e);
        }
        if let Err(e) = &forecast {
            tracing::warn!("Forecast failed: {}", e);
        }

        let _ = tx.send(WeatherServiceMessage::FetchDone {
            generation,
            units,
            current: current.map_err(WeatherError::from),
            forecast: forecast.map_err(WeatherError::from),
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(city: &str) -> FetchRequest {
        FetchRequest {
            city: city.to_string(),
            units: Units::Metric,
            days: 3,
        }
    }

    async fn receive(rx: mpsc::Receiver<WeatherServiceMessage>) -> WeatherServiceMessage {
        tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(10)))
            .await
            .unwrap()
            .unwrap()
    }

    #[test]
    fn weather_error_display() {
        assert!(format!("{}", WeatherError::Network("timeout".into())).contains("Weather"));
        assert!(format!("{}", WeatherError::CityNotFound("Oz".into())).contains("Oz"));
        assert!(format!("{}", WeatherError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn upstream_errors_convert() {
        use pogoda_weather::WeatherError as Upstream;

        assert_eq!(WeatherError::from(Upstream::EmptyCity), WeatherError::EmptyCity);
        assert_eq!(
            WeatherError::from(Upstream::CityNotFound("Oz".into())),
            WeatherError::CityNotFound("Oz".into())
        );
        assert!(matches!(
            WeatherError::from(Upstream::InvalidSample {
                index: 3,
                reason: "missing dt".into()
            }),
            WeatherError::InvalidData(s) if s.contains("missing dt")
        ));
    }

    #[test]
    fn fetch_without_runtime_reports_not_initialized() {
        let (tx, rx) = mpsc::channel();
        let provider = Arc::new(WeatherProvider::new("key").unwrap());

        request_fetch(&tx, provider, 7, request("Omsk"));

        match rx.recv().unwrap() {
            WeatherServiceMessage::FetchDone {
                generation,
                current,
                forecast,
                ..
            } => {
                assert_eq!(generation, 7);
                assert_eq!(current.unwrap_err(), WeatherError::NotInitialized);
                assert_eq!(forecast.unwrap_err(), WeatherError::NotInitialized);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_reports_both_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Omsk",
                "main": { "temp": -12.5, "humidity": 80 },
                "weather": [{ "description": "light snow" }],
                "wind": { "speed": 3.0 }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::with_options(
            "key",
            &mock_server.uri(),
            "ru",
            Duration::from_secs(5),
        )
        .unwrap();

        let (tx, rx) = mpsc::channel();
        request_fetch(&tx, Arc::new(provider), 1, request("Omsk"));

        match receive(rx).await {
            WeatherServiceMessage::FetchDone {
                generation,
                units,
                current,
                forecast,
            } => {
                assert_eq!(generation, 1);
                assert_eq!(units, Units::Metric);
                assert_eq!(current.unwrap().city, "Omsk");
                assert_eq!(
                    forecast.unwrap_err(),
                    WeatherError::Api {
                        status: 500,
                        message: "boom".into()
                    }
                );
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_connection_failure_keeps_key_out_of_errors() {
        // Nothing listens on the discard port
        let provider = WeatherProvider::with_options(
            "SECRET-KEY-123",
            "http://127.0.0.1:9",
            "ru",
            Duration::from_secs(5),
        )
        .unwrap();

        let (tx, rx) = mpsc::channel();
        request_fetch(&tx, Arc::new(provider), 3, request("Omsk"));

        match receive(rx).await {
            WeatherServiceMessage::FetchDone {
                current, forecast, ..
            } => {
                for err in [current.unwrap_err(), forecast.unwrap_err()] {
                    assert!(matches!(err, WeatherError::Network(_) | WeatherError::Timeout));
                    assert!(!err.to_string().contains("SECRET-KEY-123"));
                    let app_err = pogoda_core::AppError::from(err);
                    assert!(!app_err.to_string().contains("SECRET-KEY-123"));
                }
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_empty_city() {
        let (tx, rx) = mpsc::channel();
        let provider = Arc::new(WeatherProvider::new("key").unwrap());

        request_fetch(&tx, provider, 2, request("  "));

        match receive(rx).await {
            WeatherServiceMessage::FetchDone {
                current, forecast, ..
            } => {
                assert_eq!(current.unwrap_err(), WeatherError::EmptyCity);
                assert_eq!(forecast.unwrap_err(), WeatherError::EmptyCity);
            }
        }
    }
}
