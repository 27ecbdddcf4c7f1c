//! Intraday series for charting: the first 24 hours of samples split into
//! index-aligned temperature, humidity, wind and hour-label arrays.

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::types::{Metric, Sample};
use crate::units::{convert_wind, Units};

/// Samples kept for the chart (8 x 3h = 24h)
pub const HOURLY_WINDOW: usize = 8;

/// Parallel series for the chart. All four sequences always have the same length.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HourlySeries {
    temps: Vec<f64>,
    humidities: Vec<f64>,
    winds: Vec<f64>,
    hour_labels: Vec<String>,
}

impl HourlySeries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            temps: Vec::with_capacity(capacity),
            humidities: Vec::with_capacity(capacity),
            winds: Vec::with_capacity(capacity),
            hour_labels: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, temp: f64, humidity: f64, wind: f64, label: String) {
        self.temps.push(temp);
        self.humidities.push(humidity);
        self.winds.push(wind);
        self.hour_labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.hour_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hour_labels.is_empty()
    }

    pub fn temps(&self) -> &[f64] {
        &self.temps
    }

    pub fn humidities(&self) -> &[f64] {
        &self.humidities
    }

    pub fn winds(&self) -> &[f64] {
        &self.winds
    }

    pub fn hour_labels(&self) -> &[String] {
        &self.hour_labels
    }

    /// Values for `metric` together with the shared hour labels.
    pub fn select(&self, metric: Metric) -> (&[f64], &[String]) {
        let values = match metric {
            Metric::Temperature => &self.temps,
            Metric::Humidity => &self.humidities,
            Metric::Wind => &self.winds,
        };
        (values, &self.hour_labels)
    }

    /// Like [`HourlySeries::select`], resolving the metric by name.
    /// Names other than temperature/humidity/wind get the wind series.
    pub fn select_by_name(&self, name: &str) -> (&[f64], &[String]) {
        self.select(Metric::from_name(name))
    }
}

/// Build the chart series from the first [`HOURLY_WINDOW`] samples, labelled in local time.
pub fn build_hourly(samples: &[Sample], units: Units) -> HourlySeries {
    build_hourly_in(samples, units, &Local)
}

/// Same as [`build_hourly`] with an explicit time zone for the hour labels.
pub fn build_hourly_in<Tz: TimeZone>(samples: &[Sample], units: Units, tz: &Tz) -> HourlySeries {
    let window = &samples[..samples.len().min(HOURLY_WINDOW)];
    let mut series = HourlySeries::with_capacity(window.len());

    for sample in window {
        series.push(
            sample.temperature,
            f64::from(sample.humidity),
            convert_wind(sample.wind_speed, units),
            format!("{}:00", sample.local_hour(tz)),
        );
    }

    series
}
