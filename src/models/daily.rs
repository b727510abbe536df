use super::forecast::WeatherCondition;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-day aggregate of the 3-hour forecast periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
    pub avg_humidity: f64,
    pub max_wind_speed: f64,
    pub avg_wind_speed: f64,
    pub avg_cloud_cover: f64,
    pub precipitation_sum: f64,         // mm
    pub precipitation_probability: f64, // 0.0-1.0, average over periods
    pub will_rain: bool,
    pub condition: WeatherCondition,
    pub period_count: usize,
}

impl DailySummary {
    pub fn day_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}
