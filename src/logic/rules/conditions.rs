use crate::logic::calculations::uv_index;
use crate::models::DailySummary;
use chrono::NaiveDate;

/// Signals the forecast itself does not carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalMetric {
    Aqi,
    Uv,
}

/// Resolves whether an external signal reaches a warning threshold on a given day
pub trait ExternalConditions {
    fn holds(&self, metric: ExternalMetric, threshold: f64, day: &DailySummary) -> bool;
}

/// Knows nothing, so AQI and UV warnings never fire
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignals;

impl ExternalConditions for NoSignals {
    fn holds(&self, _metric: ExternalMetric, _threshold: f64, _day: &DailySummary) -> bool {
        false
    }
}

/// UV estimated from each day's forecast, AQI from a single reading for today
#[derive(Debug, Clone, Copy)]
pub struct ObservedConditions {
    pub latitude: f64,
    pub aqi_today: Option<(NaiveDate, f64)>,
}

impl ObservedConditions {
    pub fn new(latitude: f64) -> Self {
        Self {
            latitude,
            aqi_today: None,
        }
    }

    pub fn with_aqi(mut self, date: NaiveDate, aqi: f64) -> Self {
        self.aqi_today = Some((date, aqi));
        self
    }
}

impl ExternalConditions for ObservedConditions {
    fn holds(&self, metric: ExternalMetric, threshold: f64, day: &DailySummary) -> bool {
        match metric {
            ExternalMetric::Uv => {
                let uv = uv_index(day.avg_cloud_cover, day.condition, day.month(), self.latitude);
                f64::from(uv) >= threshold
            }
            ExternalMetric::Aqi => match self.aqi_today {
                Some((date, aqi)) => date == day.date && aqi >= threshold,
                None => false,
            },
        }
    }
}
