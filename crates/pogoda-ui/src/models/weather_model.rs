//! View state for one city's weather: current conditions, the daily list and the chart.

use pogoda_core::AppError;
use pogoda_weather::{CurrentWeather, DaySummary, HourlySeries, Metric, Units};

use crate::services::weather_service::{WeatherError, WeatherServiceMessage};

/// One line of the daily forecast list, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    pub date: String,
    pub temp_min: String,
    pub temp_max: String,
    pub desc: String,
    pub pop: String,
}

impl From<&DaySummary> for ForecastRow {
    fn from(day: &DaySummary) -> Self {
        Self {
            date: day.day_key.clone(),
            temp_min: format!("{:.1}", day.min_temperature),
            temp_max: format!("{:.1}", day.max_temperature),
            desc: day.description.clone(),
            pop: format!("{:.0}", day.max_precip_probability),
        }
    }
}

/// Chart state. `data_points` and `times` always come from the same series.
#[derive(Debug, Clone, Default)]
pub struct ChartModel {
    graph_type: Metric,
    units: Units,
    series: HourlySeries,
    data_points: Vec<f64>,
    times: Vec<String>,
    revision: u64,
}

impl ChartModel {
    pub fn new(graph_type: &str) -> Self {
        Self {
            graph_type: Metric::from_name(graph_type),
            ..Self::default()
        }
    }

    pub fn graph_type(&self) -> Metric {
        self.graph_type
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn data_points(&self) -> &[f64] {
        &self.data_points
    }

    pub fn times(&self) -> &[String] {
        &self.times
    }

    /// Bumped every time the chart needs repainting
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Switch the displayed metric. Unknown names show wind.
    pub fn set_graph_type(&mut self, name: &str) {
        self.graph_type = Metric::from_name(name);
        self.refresh();
    }

    /// Replace the underlying series, keeping the current graph type
    pub fn set_series(&mut self, series: HourlySeries, units: Units) {
        self.series = series;
        self.units = units;
        self.refresh();
    }

    fn refresh(&mut self) {
        let (values, labels) = self.series.select(self.graph_type);
        self.data_points = values.to_vec();
        self.times = labels.to_vec();
        self.revision += 1;
    }
}

#[derive(Debug, Default)]
pub struct WeatherModel {
    loading: bool,
    has_data: bool,
    error_message: String,
    // Current weather
    city: String,
    temperature: String,
    description: String,
    humidity: String,
    wind: String,
    forecast: Vec<ForecastRow>,
    chart: ChartModel,
    generation: u64,
}

impl WeatherModel {
    pub fn new(graph_type: &str) -> Self {
        Self {
            chart: ChartModel::new(graph_type),
            ..Self::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// True while a current-weather block is available for display
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// Current-weather lines in display order
    pub fn current_lines(&self) -> [&str; 5] {
        [
            self.city.as_str(),
            self.temperature.as_str(),
            self.description.as_str(),
            self.humidity.as_str(),
            self.wind.as_str(),
        ]
    }

    pub fn forecast(&self) -> &[ForecastRow] {
        &self.forecast
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn set_graph_type(&mut self, name: &str) {
        self.chart.set_graph_type(name);
    }

    /// Start a new request and return its generation. Results of older requests are ignored.
    pub fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error_message.clear();
        self.generation
    }

    /// Show an error without any request, e.g. when no city was given.
    pub fn show_error(&mut self, error: WeatherError) {
        self.error_message = message_for(error);
    }

    /// Apply a service result. Returns false when the result belongs to a superseded request.
    pub fn apply(&mut self, message: WeatherServiceMessage) -> bool {
        match message {
            WeatherServiceMessage::FetchDone {
                generation,
                units,
                current,
                forecast,
            } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Dropping stale weather result {} (latest {})",
                        generation,
                        self.generation
                    );
                    return false;
                }

                self.loading = false;

                match current {
                    Ok(current) => self.update_current(&current, units),
                    Err(e) => {
                        tracing::error!("Failed to fetch current weather: {}", e);
                        self.has_data = false;
                        self.error_message = message_for(e);
                    }
                }

                match forecast {
                    Ok(forecast) => {
                        self.forecast = forecast.days.iter().map(ForecastRow::from).collect();
                        self.chart.set_series(forecast.hourly, units);
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch forecast: {}", e);
                        self.forecast.clear();
                        self.chart.set_series(HourlySeries::default(), units);
                        if self.error_message.is_empty() {
                            self.error_message = message_for(e);
                        }
                    }
                }

                true
            }
        }
    }

    fn update_current(&mut self, current: &CurrentWeather, units: Units) {
        self.city = format!("City: {}", current.city);
        self.temperature = format!(
            "Temperature: {}{}",
            current.temperature,
            units.temperature_suffix()
        );
        self.description = format!("Description: {}", current.description);
        self.humidity = format!("Humidity: {}%", current.humidity);
        self.wind = format!("Wind: {:.1} {}", current.wind_speed, units.wind_suffix());
        self.has_data = true;
    }
}

fn message_for(error: WeatherError) -> String {
    AppError::from(error).user_message().to_string()
}
