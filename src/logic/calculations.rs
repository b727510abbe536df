use crate::logic::random::RandomSource;
use crate::models::{AlertType, CommuteMode, RawForecastPeriod, SoilType, WeatherCondition};
use serde::Serialize;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean_or<I: Iterator<Item = Option<f64>>>(values: I, default: f64) -> f64 {
    let samples: Vec<f64> = values.flatten().filter(|v| v.is_finite()).collect();
    if samples.is_empty() {
        default
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

// Evapotranspiration

/// Simplified daily evapotranspiration (mm/day) from a day's periods
///
/// `(0.05·T + (5 − 0.05·H) + 0.2·W + (2 − 0.02·C)) · soil`, clamped to [1, 15].
/// Returns 3.0 when there are no periods.
pub fn evapotranspiration(periods: &[RawForecastPeriod], soil: SoilType) -> f64 {
    if periods.is_empty() {
        return 3.0;
    }

    let temp = mean_or(periods.iter().map(|p| p.temperature), 20.0);
    let humidity = mean_or(periods.iter().map(|p| p.humidity), 50.0);
    let wind = mean_or(periods.iter().map(|p| p.wind_speed), 2.0);
    let clouds = mean_or(periods.iter().map(|p| p.cloud_cover), 50.0);

    let soil_factor = match soil {
        SoilType::Sandy => 1.2,
        SoilType::Clay => 0.8,
        _ => 1.0,
    };

    let et = (0.05 * temp + (5.0 - 0.05 * humidity) + 0.2 * wind + (2.0 - 0.02 * clouds))
        * soil_factor;
    et.clamp(1.0, 15.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EtRating {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl EtRating {
    pub fn from_value(et: f64) -> Self {
        if et < 2.0 {
            EtRating::VeryLow
        } else if et < 3.5 {
            EtRating::Low
        } else if et < 5.0 {
            EtRating::Moderate
        } else if et < 7.0 {
            EtRating::High
        } else {
            EtRating::VeryHigh
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, EtRating::High | EtRating::VeryHigh)
    }
}

// Soil moisture

/// Estimated soil moisture on a 0-1 scale from recent rain (mm) and ET (mm/day)
pub fn soil_moisture(soil: SoilType, recent_precipitation: f64, et: f64) -> f64 {
    let gain = (recent_precipitation.max(0.0) * 0.05).min(0.5);
    let loss = (et.max(0.0) * 0.04).min(0.5);
    let soil_factor = match soil {
        SoilType::Sandy => 0.8,
        SoilType::Clay => 1.2,
        _ => 1.0,
    };
    ((0.5 + gain - loss) * soil_factor).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoistureStatus {
    Dry,
    Moderate,
    Adequate,
    Good,
}

impl MoistureStatus {
    pub fn from_level(level: f64) -> Self {
        if level < 0.3 {
            MoistureStatus::Dry
        } else if level < 0.5 {
            MoistureStatus::Moderate
        } else if level < 0.7 {
            MoistureStatus::Adequate
        } else {
            MoistureStatus::Good
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            MoistureStatus::Dry => AlertType::Danger,
            MoistureStatus::Moderate => AlertType::Warning,
            MoistureStatus::Adequate => AlertType::Info,
            MoistureStatus::Good => AlertType::Success,
        }
    }

    pub fn watering_needed(&self) -> &'static str {
        match self {
            MoistureStatus::Dry => "High priority",
            MoistureStatus::Moderate => "Consider watering",
            MoistureStatus::Adequate => "Monitor conditions",
            MoistureStatus::Good => "No watering needed",
        }
    }
}

// UV index

/// Seasonal sun intensity by month, mirrored for the southern hemisphere
pub fn uv_seasonal_factor(month: u32, latitude: f64) -> f64 {
    if latitude >= 0.0 {
        match month {
            5..=8 => 1.5,
            4 | 9 => 1.2,
            3 | 10 => 0.8,
            _ => 0.5,
        }
    } else {
        match month {
            11 | 12 | 1 | 2 => 1.5,
            3 | 10 => 1.2,
            4 | 9 => 0.8,
            _ => 0.5,
        }
    }
}

pub fn uv_weather_factor(condition: WeatherCondition) -> f64 {
    match condition {
        WeatherCondition::Rain | WeatherCondition::Drizzle => 0.7,
        WeatherCondition::Snow => 0.6,
        WeatherCondition::Thunderstorm => 0.5,
        WeatherCondition::Clear => 1.2,
        _ => 1.0,
    }
}

/// Unrounded UV estimate: `6 · season · (1 − 0.008·clouds) · weather`
pub fn uv_estimate(clouds: f64, condition: WeatherCondition, month: u32, latitude: f64) -> f64 {
    let cloud_factor = 1.0 - clouds.clamp(0.0, 100.0) * 0.008;
    6.0 * uv_seasonal_factor(month, latitude) * cloud_factor * uv_weather_factor(condition)
}

/// UV index rounded and clamped to 0..=12
pub fn uv_index(clouds: f64, condition: WeatherCondition, month: u32, latitude: f64) -> u8 {
    uv_estimate(clouds, condition, month, latitude)
        .round()
        .clamp(0.0, 12.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvCategory {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    Extreme,
}

impl UvCategory {
    pub fn from_index(uv: u8) -> Self {
        match uv {
            0..=2 => UvCategory::Low,
            3..=5 => UvCategory::Moderate,
            6..=7 => UvCategory::High,
            8..=11 => UvCategory::VeryHigh,
            _ => UvCategory::Extreme,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UvCategory::Low => "Low",
            UvCategory::Moderate => "Moderate",
            UvCategory::High => "High",
            UvCategory::VeryHigh => "Very High",
            UvCategory::Extreme => "Extreme",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UvCategory::Low => "Low danger from the sun's UV rays.",
            UvCategory::Moderate => "Moderate risk of harm from unprotected sun exposure.",
            UvCategory::High => "High risk of harm from unprotected sun exposure.",
            UvCategory::VeryHigh => "Very high risk of harm from unprotected sun exposure.",
            UvCategory::Extreme => "Extreme risk of harm from unprotected sun exposure.",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            UvCategory::Low => "#299501",
            UvCategory::Moderate => "#F7E401",
            UvCategory::High => "#F85900",
            UvCategory::VeryHigh => "#D8001D",
            UvCategory::Extreme => "#6B49C8",
        }
    }

    pub fn protection(&self) -> &'static str {
        match self {
            UvCategory::Low => "No protection needed.",
            UvCategory::Moderate => "Wear sunscreen and protective clothing.",
            UvCategory::High => "Wear SPF 30+ sunscreen, a hat, and sunglasses.",
            UvCategory::VeryHigh => "Seek shade during midday hours, wear protective clothing.",
            UvCategory::Extreme => "Avoid being outside during midday hours.",
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            UvCategory::Low => AlertType::Success,
            UvCategory::Moderate => AlertType::Info,
            UvCategory::High => AlertType::Warning,
            UvCategory::VeryHigh | UvCategory::Extreme => AlertType::Danger,
        }
    }
}

// Pollen

/// Pollen level 1-10 from weather. Wind is in provider units.
pub fn pollen_level(temp: f64, humidity: f64, wind: f64, condition: WeatherCondition) -> i32 {
    let mut level = 3;

    if temp > 30.0 {
        level += 2;
    } else if temp > 25.0 {
        level += 1;
    } else if temp < 10.0 {
        level -= 1;
    }

    if humidity > 80.0 {
        level -= 1;
    } else if humidity < 30.0 {
        level += 1;
    }

    if wind > 20.0 {
        level += 2;
    } else if wind > 10.0 {
        level += 1;
    }

    match condition {
        WeatherCondition::Rain | WeatherCondition::Drizzle => level -= 2,
        WeatherCondition::Snow => level -= 3,
        WeatherCondition::Clear => level += 1,
        _ => {}
    }

    level.clamp(1, 10)
}

/// Four-band scale shared by pollen and cold/flu risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskBand {
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=3 => RiskBand::Low,
            4..=6 => RiskBand::Moderate,
            7..=8 => RiskBand::High,
            _ => RiskBand::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
            RiskBand::VeryHigh => "Very High",
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            RiskBand::Low => AlertType::Success,
            RiskBand::Moderate => AlertType::Info,
            RiskBand::High => AlertType::Warning,
            RiskBand::VeryHigh => AlertType::Danger,
        }
    }
}

// Cold and flu

/// Deterministic part of the cold/flu score (0-8)
pub fn cold_flu_base(temp: f64, humidity: f64, month: u32) -> i32 {
    let temp_factor = if temp < 0.0 {
        3
    } else if temp < 10.0 {
        2
    } else if temp < 20.0 {
        1
    } else {
        0
    };

    let humidity_factor = if humidity < 30.0 {
        2
    } else if humidity > 80.0 {
        1
    } else {
        0
    };

    let seasonal_factor = match month {
        10..=12 | 1..=3 => 3,
        4 | 9 => 2,
        5 | 8 => 1,
        _ => 0,
    };

    temp_factor + humidity_factor + seasonal_factor
}

/// Cold/flu risk 1-10: base score plus 0-2 points of local outbreak noise
pub fn cold_flu_risk(temp: f64, humidity: f64, month: u32, rng: &mut dyn RandomSource) -> i32 {
    (cold_flu_base(temp, humidity, month) + rng.integer(0, 2)).clamp(1, 10)
}

// Trend series

/// Variation bands for the smoothed multi-day outlook
#[derive(Debug, Clone, Copy)]
pub struct TrendBands {
    pub near: (f64, f64), // days 1-3
    pub far: (f64, f64),  // days 4+
}

pub const POLLEN_TREND: TrendBands = TrendBands {
    near: (0.85, 1.15),
    far: (0.7, 1.3),
};

pub const STEADY_TREND: TrendBands = TrendBands {
    near: (0.9, 1.1),
    far: (0.8, 1.2),
};

/// Autoregressive jittered outlook: day 1 is `base·v`, later days `base·v·0.7 + prev·0.3`,
/// each clamped to `[min, max]` and rounded.
pub fn trend_series(
    base: f64,
    days: usize,
    (min, max): (f64, f64),
    bands: TrendBands,
    rng: &mut dyn RandomSource,
) -> Vec<i64> {
    let mut series: Vec<i64> = Vec::with_capacity(days);
    for day in 1..=days {
        let (lo, hi) = if day <= 3 { bands.near } else { bands.far };
        let variation = rng.uniform(lo, hi);
        let raw = match series.last() {
            Some(prev) => base * variation * 0.7 + *prev as f64 * 0.3,
            None => base * variation,
        };
        series.push(raw.clamp(min, max).round() as i64);
    }
    series
}

// Commute

/// Delay factor from sky and wind alone, shared by commute and route estimates
pub fn road_delay(period: &RawForecastPeriod) -> (f64, String) {
    let condition = period.condition_or_default();
    let description = period
        .description
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let wind = period.wind_speed.unwrap_or(0.0);

    let (mut factor, impact) = match condition {
        WeatherCondition::Thunderstorm => (0.5, "Thunderstorm significantly slows traffic"),
        WeatherCondition::Rain | WeatherCondition::Drizzle => {
            if description.contains("heavy") || description.contains("extreme") {
                (0.4, "Heavy rain reduces visibility and creates slippery roads")
            } else {
                (0.2, "Light rain may cause slowdowns")
            }
        }
        WeatherCondition::Snow => {
            if description.contains("heavy") {
                (0.6, "Heavy snow makes roads hazardous")
            } else {
                (0.3, "Light snow may cause slowdowns")
            }
        }
        WeatherCondition::Fog | WeatherCondition::Mist => (0.25, "Fog reduces visibility"),
        WeatherCondition::Smoke | WeatherCondition::Haze => {
            (0.15, "Reduced visibility from smoke/haze")
        }
        WeatherCondition::Clear => (0.0, "Clear conditions, no weather impact"),
        _ => (0.05, "Normal traffic flow expected"),
    };
    let mut impact = impact.to_string();

    if wind > 20.0 {
        factor += 0.15;
        impact.push_str(" with high winds increasing risk");
    } else if wind > 10.0 {
        factor += 0.05;
        impact.push_str(" with moderate winds");
    }

    (factor, impact)
}

/// Per-period commute delay factor and a human description of why
pub fn commute_delay(period: &RawForecastPeriod, mode: CommuteMode) -> (f64, String) {
    let wind = period.wind_speed.unwrap_or(0.0);
    let temp = period.temperature.unwrap_or(20.0);
    let (mut factor, mut impact) = road_delay(period);

    if temp < -5.0 {
        factor += 0.1;
        impact.push_str(", extreme cold may affect vehicles");
    } else if temp > 35.0 {
        factor += 0.05;
        impact.push_str(", extreme heat may affect road conditions");
    }

    factor *= mode.delay_multiplier();
    if mode == CommuteMode::Bike && wind > 10.0 {
        factor += 0.2;
        impact.push_str(", headwinds will slow cycling");
    }

    (factor.max(0.0), impact)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteSeverity {
    Minimal,
    Minor,
    Moderate,
    Severe,
    Unknown,
}

impl CommuteSeverity {
    pub fn from_factor(factor: f64) -> Self {
        if factor < 0.1 {
            CommuteSeverity::Minimal
        } else if factor < 0.2 {
            CommuteSeverity::Minor
        } else if factor < 0.3 {
            CommuteSeverity::Moderate
        } else {
            CommuteSeverity::Severe
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            CommuteSeverity::Minimal => AlertType::Success,
            CommuteSeverity::Minor => AlertType::Info,
            CommuteSeverity::Moderate => AlertType::Warning,
            CommuteSeverity::Severe => AlertType::Danger,
            CommuteSeverity::Unknown => AlertType::Info,
        }
    }
}

// Pest and stress risk

/// Risk factor 0-10 from how many favorable ranges the day's averages fall in.
/// Rain-sensitive organisms gain `2·pop` when pop exceeds 0.3.
pub fn pest_risk_factor(
    temp_range: (f64, f64),
    humidity_range: (f64, f64),
    rain_sensitive: bool,
    avg_temp: f64,
    avg_humidity: f64,
    precipitation_probability: f64,
) -> f64 {
    let temp_ok = temp_range.0 <= avg_temp && avg_temp <= temp_range.1;
    let humidity_ok = humidity_range.0 <= avg_humidity && avg_humidity <= humidity_range.1;

    let precipitation_factor = if rain_sensitive && precipitation_probability > 0.3 {
        precipitation_probability * 2.0
    } else {
        0.0
    };

    let factor = match (temp_ok, humidity_ok) {
        (true, true) => 7.0 + precipitation_factor,
        (true, false) | (false, true) => 3.0 + precipitation_factor,
        (false, false) => 0.0,
    };
    factor.clamp(0.0, 10.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_factor(factor: f64) -> Self {
        if factor >= 7.0 {
            RiskLevel::High
        } else if factor >= 4.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn alert_type(&self) -> AlertType {
        match self {
            RiskLevel::High => AlertType::Danger,
            RiskLevel::Moderate => AlertType::Warning,
            RiskLevel::Low => AlertType::Success,
        }
    }
}

// Air quality

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthySensitive,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthySensitive
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Shift the category for a person's risk adjustment
    pub fn personalized(&self, adjustment: i32) -> (AqiCategory, AlertType) {
        match self {
            AqiCategory::Good if adjustment >= 3 => (AqiCategory::Moderate, AlertType::Info),
            AqiCategory::Good => (AqiCategory::Good, AlertType::Success),
            AqiCategory::Moderate if adjustment >= 2 => {
                (AqiCategory::UnhealthySensitive, AlertType::Warning)
            }
            AqiCategory::Moderate => (AqiCategory::Moderate, AlertType::Info),
            AqiCategory::UnhealthySensitive if adjustment >= 1 => {
                (AqiCategory::Unhealthy, AlertType::Danger)
            }
            AqiCategory::UnhealthySensitive => {
                (AqiCategory::UnhealthySensitive, AlertType::Warning)
            }
            AqiCategory::Unhealthy => (AqiCategory::Unhealthy, AlertType::Danger),
            AqiCategory::VeryUnhealthy | AqiCategory::Hazardous => {
                (AqiCategory::Hazardous, AlertType::Danger)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::random::{FixedSource, RngSource};
    use chrono::NaiveDate;

    fn sample(temp: f64, humidity: f64, wind: f64, clouds: f64) -> RawForecastPeriod {
        RawForecastPeriod {
            timestamp: NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            temperature: Some(temp),
            humidity: Some(humidity),
            wind_speed: Some(wind),
            cloud_cover: Some(clouds),
            ..Default::default()
        }
    }

    #[test]
    fn et_defaults_and_soil_adjustment() {
        assert_eq!(evapotranspiration(&[], SoilType::Loamy), 3.0);

        // 0.05*20 + (5 - 2.5) + 0.2*2 + (2 - 1) = 4.9
        let day = vec![sample(20.0, 50.0, 2.0, 50.0)];
        assert!((evapotranspiration(&day, SoilType::Loamy) - 4.9).abs() < 1e-9);
        assert!((evapotranspiration(&day, SoilType::Sandy) - 5.88).abs() < 1e-9);
        assert!((evapotranspiration(&day, SoilType::Clay) - 3.92).abs() < 1e-9);
    }

    #[test]
    fn et_stays_in_range_for_extremes() {
        for (t, h, w, c) in [
            (60.0, 0.0, 100.0, 0.0),
            (-50.0, 100.0, 0.0, 100.0),
            (1e6, -1e6, 1e6, -1e6),
        ] {
            for soil in [SoilType::Sandy, SoilType::Clay, SoilType::Silty] {
                let et = evapotranspiration(&[sample(t, h, w, c)], soil);
                assert!((1.0..=15.0).contains(&et), "et {} out of range", et);
            }
        }
    }

    #[test]
    fn et_rating_bands() {
        assert_eq!(EtRating::from_value(1.9), EtRating::VeryLow);
        assert_eq!(EtRating::from_value(3.4), EtRating::Low);
        assert_eq!(EtRating::from_value(4.9), EtRating::Moderate);
        assert_eq!(EtRating::from_value(6.9), EtRating::High);
        assert_eq!(EtRating::from_value(7.0), EtRating::VeryHigh);
    }

    #[test]
    fn dry_clay_soil_needs_water() {
        let level = soil_moisture(SoilType::Clay, 0.0, 7.0);
        assert!((level - 0.264).abs() < 1e-9);
        let status = MoistureStatus::from_level(level);
        assert_eq!(status, MoistureStatus::Dry);
        assert_eq!(status.watering_needed(), "High priority");
        assert_eq!(status.alert_type(), AlertType::Danger);
    }

    #[test]
    fn soil_moisture_clamped() {
        for (p, et) in [(0.0, 100.0), (500.0, 0.0), (-10.0, -10.0)] {
            for soil in [SoilType::Sandy, SoilType::Loamy, SoilType::Clay] {
                let m = soil_moisture(soil, p, et);
                assert!((0.0..=1.0).contains(&m));
            }
        }
        assert_eq!(soil_moisture(SoilType::Clay, 50.0, 0.0), 1.0);
    }

    #[test]
    fn clear_july_uv_is_very_high() {
        let raw = uv_estimate(0.0, WeatherCondition::Clear, 7, 40.7);
        assert!((raw - 10.8).abs() < 1e-9);
        let uv = uv_index(0.0, WeatherCondition::Clear, 7, 40.7);
        assert_eq!(uv, 11);
        assert_eq!(UvCategory::from_index(uv), UvCategory::VeryHigh);
        assert_eq!(UvCategory::from_index(uv).label(), "Very High");
    }

    #[test]
    fn uv_mirrors_southern_hemisphere() {
        assert_eq!(uv_seasonal_factor(1, -33.9), 1.5);
        assert_eq!(uv_seasonal_factor(7, -33.9), 0.5);
        assert_eq!(uv_seasonal_factor(1, 51.5), 0.5);
        // 6 * 0.5 * 0.6 * 0.7 = 1.26
        assert_eq!(uv_index(50.0, WeatherCondition::Rain, 12, 51.5), 1);
        // 6 * 0.5 * 0.2 * 0.5 = 0.3
        assert_eq!(uv_index(100.0, WeatherCondition::Thunderstorm, 12, 51.5), 0);
        assert_eq!(UvCategory::from_index(12), UvCategory::Extreme);
    }

    #[test]
    fn pollen_adjustments_and_clamp() {
        // hot, dry, windy, clear: 3 + 2 + 1 + 2 + 1
        assert_eq!(pollen_level(31.0, 20.0, 25.0, WeatherCondition::Clear), 9);
        // cold, humid, snowing
        assert_eq!(pollen_level(-5.0, 90.0, 0.0, WeatherCondition::Snow), 1);
        assert_eq!(pollen_level(20.0, 50.0, 5.0, WeatherCondition::Clouds), 3);
        assert_eq!(RiskBand::from_level(7), RiskBand::High);
        assert_eq!(RiskBand::from_level(9).label(), "Very High");
    }

    #[test]
    fn cold_flu_combines_factors() {
        assert_eq!(cold_flu_base(-2.0, 20.0, 1), 8);
        assert_eq!(cold_flu_base(25.0, 50.0, 7), 0);
        let mut rng = FixedSource;
        assert_eq!(cold_flu_risk(25.0, 50.0, 7, &mut rng), 1);

        let mut rng = RngSource::seeded(3);
        for _ in 0..50 {
            let risk = cold_flu_risk(-10.0, 10.0, 12, &mut rng);
            assert!((1..=10).contains(&risk));
        }
    }

    #[test]
    fn trend_series_smooths_and_clamps() {
        let mut rng = FixedSource;
        let series = trend_series(6.0, 7, (1.0, 10.0), POLLEN_TREND, &mut rng);
        assert_eq!(series.len(), 7);
        // midpoint variation is 1.0, so the series settles at the base
        assert!(series.iter().all(|v| *v == 6));

        let mut rng = RngSource::seeded(11);
        let series = trend_series(12.0, 7, (0.0, 12.0), STEADY_TREND, &mut rng);
        assert!(series.iter().all(|v| (0..=12).contains(v)));
    }

    #[test]
    fn commute_delay_by_condition_and_mode() {
        let mut storm = sample(20.0, 80.0, 12.0, 100.0);
        storm.condition = Some(WeatherCondition::Thunderstorm);
        let (factor, impact) = commute_delay(&storm, CommuteMode::Drive);
        assert!((factor - 0.55).abs() < 1e-9);
        assert_eq!(
            impact,
            "Thunderstorm significantly slows traffic with moderate winds"
        );

        let (bike, impact) = commute_delay(&storm, CommuteMode::Bike);
        assert!((bike - (0.55 * 1.5 + 0.2)).abs() < 1e-9);
        assert!(impact.ends_with(", headwinds will slow cycling"));

        let mut clear = sample(20.0, 50.0, 2.0, 0.0);
        clear.condition = Some(WeatherCondition::Clear);
        assert_eq!(commute_delay(&clear, CommuteMode::Walk).0, 0.0);
        assert_eq!(CommuteSeverity::from_factor(0.55), CommuteSeverity::Severe);
        assert_eq!(CommuteSeverity::from_factor(0.05), CommuteSeverity::Minimal);
    }

    #[test]
    fn road_delay_ignores_temperature() {
        let mut frozen = sample(-12.0, 80.0, 25.0, 100.0);
        frozen.condition = Some(WeatherCondition::Snow);
        frozen.description = Some("heavy snow".into());
        let (road, impact) = road_delay(&frozen);
        assert!((road - 0.75).abs() < 1e-9);
        assert_eq!(impact, "Heavy snow makes roads hazardous with high winds increasing risk");
        let (drive, _) = commute_delay(&frozen, CommuteMode::Drive);
        assert!((drive - 0.85).abs() < 1e-9);
    }

    #[test]
    fn pest_factor_levels() {
        let aphids = ((20.0, 30.0), (60.0, 90.0));
        assert_eq!(
            pest_risk_factor(aphids.0, aphids.1, false, 25.0, 70.0, 0.9),
            7.0
        );
        assert_eq!(
            pest_risk_factor(aphids.0, aphids.1, false, 25.0, 30.0, 0.9),
            3.0
        );
        assert_eq!(
            pest_risk_factor(aphids.0, aphids.1, false, 5.0, 30.0, 0.9),
            0.0
        );
        // rain-sensitive: 7 + 2*0.9 capped at 10 stays 8.8
        let slugs = pest_risk_factor((5.0, 25.0), (70.0, 100.0), true, 15.0, 85.0, 0.9);
        assert!((slugs - 8.8).abs() < 1e-9);
        assert_eq!(RiskLevel::from_factor(slugs), RiskLevel::High);
        assert_eq!(RiskLevel::from_factor(4.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_factor(3.0), RiskLevel::Low);
    }

    #[test]
    fn aqi_categories_and_personalization() {
        assert_eq!(AqiCategory::from_aqi(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(101.0), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_aqi(301.0), AqiCategory::Hazardous);

        assert_eq!(
            AqiCategory::Moderate.personalized(2),
            (AqiCategory::UnhealthySensitive, AlertType::Warning)
        );
        assert_eq!(
            AqiCategory::Good.personalized(2),
            (AqiCategory::Good, AlertType::Success)
        );
        assert_eq!(
            AqiCategory::VeryUnhealthy.personalized(0),
            (AqiCategory::Hazardous, AlertType::Danger)
        );
    }
}
