use crate::models::DailySummary;

/// Threshold a day must reach for a warning; comparisons are inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarningThreshold {
    MaxTempAtLeast(f64),
    MinTempAtMost(f64),
    RainAtMost(f64),
    RainAtLeast(f64),
    WindAtLeast(f64),
    /// Resolved per day by an external signal
    AqiAtLeast(f64),
    UvAtLeast(f64),
}

impl WarningThreshold {
    pub fn value(&self) -> f64 {
        match *self {
            WarningThreshold::MaxTempAtLeast(v)
            | WarningThreshold::MinTempAtMost(v)
            | WarningThreshold::RainAtMost(v)
            | WarningThreshold::RainAtLeast(v)
            | WarningThreshold::WindAtLeast(v)
            | WarningThreshold::AqiAtLeast(v)
            | WarningThreshold::UvAtLeast(v) => v,
        }
    }

    /// Evaluate against forecast fields. `None` means the threshold needs external data.
    pub fn holds(&self, day: &DailySummary) -> Option<bool> {
        match *self {
            WarningThreshold::MaxTempAtLeast(t) => Some(day.max_temp >= t),
            WarningThreshold::MinTempAtMost(t) => Some(day.min_temp <= t),
            WarningThreshold::RainAtMost(mm) => Some(day.precipitation_sum <= mm),
            WarningThreshold::RainAtLeast(mm) => Some(day.precipitation_sum >= mm),
            WarningThreshold::WindAtLeast(w) => Some(day.max_wind_speed >= w),
            WarningThreshold::AqiAtLeast(_) | WarningThreshold::UvAtLeast(_) => None,
        }
    }

    /// Name of the template placeholder carrying the threshold
    pub fn placeholder(&self) -> &'static str {
        match self {
            WarningThreshold::MaxTempAtLeast(_) | WarningThreshold::MinTempAtMost(_) => "temp",
            WarningThreshold::RainAtMost(_) | WarningThreshold::RainAtLeast(_) => "rain",
            WarningThreshold::WindAtLeast(_) => "wind",
            WarningThreshold::AqiAtLeast(_) => "aqi",
            WarningThreshold::UvAtLeast(_) => "uv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WarningRule {
    pub id: &'static str,
    pub threshold: WarningThreshold,
    pub min_days: usize,
    pub icon: &'static str,
    pub templates: &'static [&'static str],
}

pub(super) fn builtin() -> Vec<WarningRule> {
    vec![
        WarningRule {
            id: "heat_wave",
            threshold: WarningThreshold::MaxTempAtLeast(32.0),
            min_days: 3,
            icon: "temperature-high",
            templates: &[
                "Heat wave alert: Temperatures above {temp}°C expected for {days} consecutive days.",
                "Extreme heat warning: {days}-day heat wave with temperatures reaching {temp}°C.",
                "Health alert: Prolonged heat wave with {days} days of temperatures exceeding {temp}°C.",
            ],
        },
        WarningRule {
            id: "cold_snap",
            threshold: WarningThreshold::MinTempAtMost(0.0),
            min_days: 3,
            icon: "temperature-low",
            templates: &[
                "Cold snap alert: Temperatures below {temp}°C expected for {days} consecutive days.",
                "Freezing conditions warning: {days}-day cold spell with temperatures dropping to {temp}°C.",
                "Frost alert: Extended period of {days} days with temperatures at or below {temp}°C.",
            ],
        },
        WarningRule {
            id: "dry_spell",
            threshold: WarningThreshold::RainAtMost(1.0),
            min_days: 7,
            icon: "drought",
            templates: &[
                "Dry spell alert: Minimal to no rainfall expected for {days} consecutive days.",
                "Drought risk warning: Extended {days}-day period with precipitation below {rain} mm.",
                "Water conservation notice: {days}-day dry spell forecasted with negligible rainfall.",
            ],
        },
        WarningRule {
            id: "heavy_rain",
            threshold: WarningThreshold::RainAtLeast(25.0),
            min_days: 2,
            icon: "cloud-showers-heavy",
            templates: &[
                "Heavy rain alert: Significant rainfall exceeding {rain} mm/day expected for {days} consecutive days.",
                "Flood risk warning: Prolonged heavy precipitation of {rain}+ mm daily for {days} days.",
                "Drainage alert: Extended period of {days} days with heavy rainfall above {rain} mm daily.",
            ],
        },
        WarningRule {
            id: "high_wind",
            threshold: WarningThreshold::WindAtLeast(40.0),
            min_days: 1,
            icon: "wind",
            templates: &[
                "High wind alert: Sustained winds of {wind} km/h or higher expected for {days} days.",
                "Wind hazard warning: Strong winds exceeding {wind} km/h forecasted for {days}-day period.",
                "Outdoor caution: High winds of {wind}+ km/h expected to persist for {days} days.",
            ],
        },
        WarningRule {
            id: "air_quality",
            threshold: WarningThreshold::AqiAtLeast(150.0),
            min_days: 1,
            icon: "smog",
            templates: &[
                "Poor air quality alert: AQI levels exceeding {aqi} expected for {days} days.",
                "Health caution: Unhealthy air quality (AQI {aqi}+) forecasted to continue for {days} days.",
                "Respiratory warning: Elevated pollution levels with AQI above {aqi} for {days}-day period.",
            ],
        },
        WarningRule {
            id: "high_uv",
            threshold: WarningThreshold::UvAtLeast(8.0),
            min_days: 1,
            icon: "sun",
            templates: &[
                "High UV alert: UV index of {uv} or higher expected for {days} consecutive days.",
                "Sun protection warning: Very high UV levels ({uv}+) forecasted for {days} days.",
                "Skin damage risk: Extreme UV radiation (index {uv}+) continuing for {days} days.",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;
    use chrono::NaiveDate;

    fn day(min_temp: f64, max_temp: f64, rain: f64, wind: f64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            min_temp,
            max_temp,
            avg_temp: (min_temp + max_temp) / 2.0,
            min_humidity: 50.0,
            max_humidity: 50.0,
            avg_humidity: 50.0,
            max_wind_speed: wind,
            avg_wind_speed: wind,
            avg_cloud_cover: 50.0,
            precipitation_sum: rain,
            precipitation_probability: 0.0,
            will_rain: rain > 0.5,
            condition: WeatherCondition::Clouds,
            period_count: 8,
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(WarningThreshold::MaxTempAtLeast(32.0).holds(&day(20.0, 32.0, 0.0, 0.0)), Some(true));
        assert_eq!(WarningThreshold::MinTempAtMost(0.0).holds(&day(0.0, 5.0, 0.0, 0.0)), Some(true));
        assert_eq!(WarningThreshold::RainAtMost(1.0).holds(&day(0.0, 5.0, 1.0, 0.0)), Some(true));
        assert_eq!(WarningThreshold::RainAtLeast(25.0).holds(&day(0.0, 5.0, 24.9, 0.0)), Some(false));
        assert_eq!(WarningThreshold::WindAtLeast(40.0).holds(&day(0.0, 5.0, 0.0, 40.0)), Some(true));
    }

    #[test]
    fn external_thresholds_defer() {
        let d = day(10.0, 20.0, 0.0, 0.0);
        assert_eq!(WarningThreshold::AqiAtLeast(150.0).holds(&d), None);
        assert_eq!(WarningThreshold::UvAtLeast(8.0).holds(&d), None);
        assert_eq!(WarningThreshold::UvAtLeast(8.0).placeholder(), "uv");
    }
}
