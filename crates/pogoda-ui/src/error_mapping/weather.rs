use crate::services::weather_service::WeatherError as UiWeatherError;
use pogoda_core::{AppError, NetworkError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::EmptyCity => AppError::Weather(WeatherError::EmptyCity),
            UiWeatherError::CityNotFound(s) => AppError::Weather(WeatherError::CityNotFound(s)),
            UiWeatherError::InvalidApiKey => AppError::Weather(WeatherError::InvalidApiKey),
            UiWeatherError::Api { status, .. } if status >= 500 => {
                AppError::Weather(WeatherError::ServiceUnavailable)
            }
            UiWeatherError::Api { status, message } => {
                AppError::Weather(WeatherError::ApiError(format!("{}: {}", status, message)))
            }
            UiWeatherError::Timeout => AppError::Network(NetworkError::Timeout),
            UiWeatherError::Network(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            UiWeatherError::InvalidData(s) => AppError::Weather(WeatherError::InvalidData(s)),
            UiWeatherError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
