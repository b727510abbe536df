//! Public advisory entry points.
//!
//! Every entry point returns an [`Advisory`]: the computed payload, or the
//! documented static fallback when anything inside failed.

pub mod growing_season;
pub mod health;
pub mod notifications;
pub mod pest_risk;
pub mod plant_care;
pub mod soil_moisture;
pub mod travel;
pub mod watering;

pub use growing_season::{GrowingSeasonReport, Season};
pub use health::{AirQualityReport, ColdFluReport, HealthAlerts, PollenReport, UvReport};
pub use notifications::{NotificationPreferences, SmartNotifications};
pub use pest_risk::PestRiskReport;
pub use plant_care::PlantCareReport;
pub use soil_moisture::SoilMoistureForecast;
pub use travel::{CommuteReport, PlannedRoute, RouteOptions, TravelForecast};
pub use watering::WateringReport;

use crate::error::Result;
use crate::logic::composer::DEFAULT_NOTIFICATION_CAP;
use crate::logic::normalizer::summarize_days;
use crate::logic::random::RandomSource;
use crate::logic::rules::RuleTables;
use crate::models::{DailySummary, WeatherSnapshot};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::error;

/// Computed payload, or the fallback that replaced it
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Advisory<T, F> {
    Ready(T),
    Degraded(F),
}

impl<T, F> Advisory<T, F> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Advisory::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Advisory::Ready(v) => Some(v),
            Advisory::Degraded(_) => None,
        }
    }

    pub fn degraded(self) -> Option<F> {
        match self {
            Advisory::Ready(_) => None,
            Advisory::Degraded(f) => Some(f),
        }
    }
}

impl<T> Advisory<T, T> {
    /// For advisories whose fallback has the same shape as the payload
    pub fn into_inner(self) -> T {
        match self {
            Advisory::Ready(v) | Advisory::Degraded(v) => v,
        }
    }
}

/// Turn a failed computation into its fallback payload, logging the error.
/// The error text goes to `fallback`; same-shape fallbacks only log it.
pub fn or_fallback<T, F>(
    name: &str,
    result: Result<T>,
    fallback: impl FnOnce(String) -> F,
) -> Advisory<T, F> {
    match result {
        Ok(value) => Advisory::Ready(value),
        Err(e) => {
            error!("Error computing {}: {}", name, e);
            Advisory::Degraded(fallback(e.to_string()))
        }
    }
}

/// Request-scoped context shared by all advisories
pub struct Advisor<'a> {
    tables: &'a RuleTables,
    now: NaiveDateTime,
    rng: Box<dyn RandomSource + 'a>,
    notification_cap: usize,
}

impl<'a> Advisor<'a> {
    pub fn new(tables: &'a RuleTables, now: NaiveDateTime, rng: Box<dyn RandomSource + 'a>) -> Self {
        Self {
            tables,
            now,
            rng,
            notification_cap: DEFAULT_NOTIFICATION_CAP,
        }
    }

    pub fn with_notification_cap(mut self, cap: usize) -> Self {
        self.notification_cap = cap;
        self
    }

    pub fn tables(&self) -> &'a RuleTables {
        self.tables
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn notification_cap(&self) -> usize {
        self.notification_cap
    }

    pub(crate) fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Daily summaries of the forecast, or of the current observation when the forecast is empty
    pub(crate) fn daily(&self, weather: &WeatherSnapshot) -> Vec<DailySummary> {
        if weather.periods.is_empty() {
            summarize_days(&[weather.current.observed_at(self.now)])
        } else {
            summarize_days(&weather.periods)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::logic::random::FixedSource;
    use crate::logic::rules::RuleTables;
    use crate::models::{ForecastLocation, RawForecastPeriod, WeatherCondition, WeatherSnapshot};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::Advisor;

    pub fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn advisor(now: NaiveDateTime) -> Advisor<'static> {
        Advisor::new(RuleTables::shared(), now, Box::new(FixedSource))
    }

    pub fn period(
        at: NaiveDateTime,
        temp: f64,
        humidity: f64,
        wind: f64,
        clouds: f64,
        pop: f64,
        condition: WeatherCondition,
    ) -> RawForecastPeriod {
        RawForecastPeriod {
            timestamp: at,
            temperature: Some(temp),
            humidity: Some(humidity),
            wind_speed: Some(wind),
            cloud_cover: Some(clouds),
            precipitation_probability: Some(pop),
            precipitation_mm: None,
            condition: Some(condition),
            description: None,
        }
    }

    /// Five days of 3-hourly mild, dry weather starting at midnight of `start`
    pub fn mild_snapshot(start: NaiveDate, latitude: f64) -> WeatherSnapshot {
        let midnight = start.and_hms_opt(0, 0, 0).unwrap();
        let periods = (0..40)
            .map(|i| {
                let at = midnight + Duration::hours(3 * i);
                period(at, 20.0, 45.0, 3.0, 30.0, 0.05, WeatherCondition::Clouds)
            })
            .collect();
        WeatherSnapshot {
            fetched_at: midnight,
            location: ForecastLocation {
                city: "Testville".into(),
                country: "TS".into(),
                latitude,
                longitude: 0.0,
            },
            current: period(midnight, 19.0, 50.0, 2.0, 30.0, 0.0, WeatherCondition::Clouds),
            periods,
            simulated: false,
        }
    }
}
