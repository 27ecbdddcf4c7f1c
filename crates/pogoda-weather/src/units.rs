//! Display units and the single place wind speed gets converted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::WeatherError;

/// Miles per hour to metres per second
pub const IMPERIAL_WIND_FACTOR: f64 = 0.44704;

/// Unit system requested from the API and used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Wind is always shown in m/s; imperial speeds are converted by [`convert_wind`].
    pub fn wind_suffix(&self) -> &'static str {
        "m/s"
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(WeatherError::Parse(format!("unknown units: {}", other))),
        }
    }
}

/// Convert an upstream wind speed to m/s. The API reports mph for imperial requests.
///
/// Both the current-weather and the hourly paths go through here.
pub fn convert_wind(speed: f64, units: Units) -> f64 {
    match units {
        Units::Metric => speed,
        Units::Imperial => speed * IMPERIAL_WIND_FACTOR,
    }
}
