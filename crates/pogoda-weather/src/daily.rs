//! Daily aggregation: 3-hour samples reduced to one summary per calendar day.
//!
//! Days are taken in the order they are first seen in the input, not in
//! calendar order. Upstream delivers chronological data so the two agree in
//! practice.

use chrono::{Local, NaiveDate, TimeZone};

use crate::types::{DaySummary, Sample};

/// Number of days shown in the forecast list
pub const DEFAULT_FORECAST_DAYS: usize = 3;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Summarise `samples` per local calendar day, keeping at most `max_days` days.
pub fn aggregate(samples: &[Sample], max_days: usize) -> Vec<DaySummary> {
    aggregate_in(samples, max_days, &Local)
}

/// Same as [`aggregate`] with an explicit time zone for the day boundaries.
pub fn aggregate_in<Tz: TimeZone>(samples: &[Sample], max_days: usize, tz: &Tz) -> Vec<DaySummary> {
    let mut groups: Vec<DayGroup<'_>> = Vec::with_capacity(max_days);

    for sample in samples {
        let date = sample.local_date(tz);
        // Days past the limit are dropped; known days keep accumulating
        if let Some(i) = groups.iter().position(|g| g.date == date) {
            groups[i].push(sample);
        } else if groups.len() < max_days {
            groups.push(DayGroup::new(date, sample));
        }
    }

    tracing::debug!(
        "Aggregated {} samples into {} days (limit {})",
        samples.len(),
        groups.len(),
        max_days
    );

    groups.into_iter().map(DayGroup::finish).collect()
}

/// Running reduction for one day.
struct DayGroup<'a> {
    date: NaiveDate,
    min_temperature: f64,
    max_temperature: f64,
    description: &'a str,
    max_precip_probability: f64,
}

impl<'a> DayGroup<'a> {
    fn new(date: NaiveDate, first: &'a Sample) -> Self {
        Self {
            date,
            min_temperature: first.temperature,
            max_temperature: first.temperature,
            description: &first.description,
            max_precip_probability: first.precip_probability,
        }
    }

    fn push(&mut self, sample: &Sample) {
        self.min_temperature = self.min_temperature.min(sample.temperature);
        self.max_temperature = self.max_temperature.max(sample.temperature);
        self.max_precip_probability = self.max_precip_probability.max(sample.precip_probability);
    }

    fn finish(self) -> DaySummary {
        DaySummary {
            day_key: self.date.format(DAY_KEY_FORMAT).to_string(),
            date: self.date,
            min_temperature: self.min_temperature,
            max_temperature: self.max_temperature,
            description: self.description.to_string(),
            max_precip_probability: self.max_precip_probability * 100.0,
        }
    }
}
