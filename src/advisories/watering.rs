use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::calculations::{
    evapotranspiration, round_to, soil_moisture, EtRating, MoistureStatus,
};
use crate::logic::normalizer::dominant_condition;
use crate::models::{RawForecastPeriod, SoilProperties, SoilType, WeatherCondition, WeatherSnapshot};
use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;

const SOIL_SATURATED: f64 = 0.8;
const SOIL_ADEQUATE: f64 = 0.7;
const SIGNIFICANT_RAIN_MM: f64 = 5.0;
const MAX_WATERING_WIND: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct EtOutlook {
    pub today: f64,
    pub tomorrow: f64,
    pub rating: EtRating,
}

/// First rain signal in today's or tomorrow's periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingPrecipitation {
    pub expected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>, // %
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>, // mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub timeframe: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl UpcomingPrecipitation {
    pub fn none() -> Self {
        Self {
            expected: false,
            probability: None,
            amount: None,
            time: None,
            timeframe: "next 48 hours",
            timestamp: None,
        }
    }

    pub fn amount_mm(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    fn is_significant(&self) -> bool {
        self.expected && self.amount_mm() > SIGNIFICANT_RAIN_MM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WateringTime {
    pub should_water: bool,
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_24: Option<u32>,
    pub day: &'static str,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WateringPlan {
    pub should_water: bool,
    pub message: String,
    pub details: Vec<String>,
    pub best_time: WateringTime,
    pub water_amount: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub high_temp: f64,
    pub low_temp: f64,
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct WateringReport {
    pub city: String,
    pub soil_type: SoilType,
    pub soil_properties: &'static SoilProperties,
    pub soil_moisture: f64,
    pub moisture_status: MoistureStatus,
    pub watering_needed: &'static str,
    pub evapotranspiration: EtOutlook,
    pub watering_recommendation: WateringPlan,
    pub best_watering_time: WateringTime,
    pub upcoming_precipitation: UpcomingPrecipitation,
    pub recent_precipitation: f64,
    pub weather_summary: DaySummary,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralWateringAdvice {
    pub should_water: bool,
    pub message: &'static str,
    pub water_amount: &'static str,
    pub follow_up: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WateringFallback {
    pub city: String,
    pub soil_type: SoilType,
    pub error: String,
    pub watering_recommendation: GeneralWateringAdvice,
    pub timestamp: NaiveDateTime,
}

/// Scan today's periods, then tomorrow's, for the first likely rain
pub(crate) fn find_upcoming_precipitation(
    today: &[RawForecastPeriod],
    tomorrow: &[RawForecastPeriod],
) -> UpcomingPrecipitation {
    let windows = [(today, "later today"), (tomorrow, "tomorrow")];
    for (periods, timeframe) in windows {
        for period in periods {
            let pop = period.precipitation_probability.unwrap_or(0.0);
            let amount = period.precipitation_mm.unwrap_or(0.0);
            if pop > 0.4 || amount > 0.0 {
                return UpcomingPrecipitation {
                    expected: true,
                    probability: Some(pop * 100.0),
                    amount: Some(amount),
                    time: Some(period.timestamp.format("%H:%M").to_string()),
                    timeframe,
                    timestamp: Some(period.timestamp),
                };
            }
        }
    }
    UpcomingPrecipitation::none()
}

/// Next calm, dry slot among the preferred evening and morning hours
pub(crate) fn best_watering_time(
    now: NaiveDateTime,
    today: &[RawForecastPeriod],
    tomorrow: &[RawForecastPeriod],
    soil: SoilType,
    moisture: f64,
) -> WateringTime {
    if moisture > SOIL_SATURATED {
        return WateringTime {
            should_water: false,
            time: None,
            hour_24: None,
            day: "tomorrow",
            reasons: vec![
                "Soil is already adequately moist".into(),
                "Delaying watering to prevent overwatering".into(),
            ],
        };
    }

    let rain = find_upcoming_precipitation(today, tomorrow);
    if rain.is_significant() {
        return WateringTime {
            should_water: false,
            time: None,
            hour_24: None,
            day: "after rain",
            reasons: vec![
                format!(
                    "Significant rain ({} mm) expected {}",
                    rain.amount_mm(),
                    rain.timeframe
                ),
                "Natural rainfall is better for plants than irrigation".into(),
            ],
        };
    }

    let current_hour = now.hour();
    const SLOTS: [(u32, &str); 4] = [(19, "Evening"), (20, "Evening"), (6, "Morning"), (7, "Morning")];

    for (hour, period_name) in SLOTS {
        let evening = hour >= 12;
        if hour <= current_hour && !evening {
            continue;
        }

        let later_today = hour > current_hour;
        let target = if later_today { today } else { tomorrow };
        let calm_and_dry = target
            .iter()
            .filter(|p| p.timestamp.hour().abs_diff(hour) <= 1)
            .all(|p| !p.is_raining() && p.wind_speed.unwrap_or(0.0) <= MAX_WATERING_WIND);

        if calm_and_dry {
            let mut reasons = vec![
                format!("{} watering reduces evaporation", period_name),
                "Plants have time to dry before nightfall, reducing disease risk".to_string(),
            ];
            match soil {
                SoilType::Sandy => reasons.push(
                    "Sandy soil benefits from evening watering to retain moisture longer".into(),
                ),
                SoilType::Clay => reasons.push(
                    "Clay soil benefits from morning watering to prevent waterlogging overnight".into(),
                ),
                _ => {}
            }
            return WateringTime {
                should_water: true,
                time: Some(clock_label(hour)),
                hour_24: Some(hour),
                day: if later_today { "today" } else { "tomorrow" },
                reasons,
            };
        }
    }

    WateringTime {
        should_water: true,
        time: Some(clock_label(19)),
        hour_24: Some(19),
        day: if current_hour < 19 { "today" } else { "tomorrow" },
        reasons: vec![
            "Evening watering reduces evaporation".into(),
            "Allows soil to absorb moisture overnight".into(),
        ],
    }
}

/// 19 -> "7 PM"
fn clock_label(hour: u32) -> String {
    let twelve = match hour % 12 {
        0 => 12,
        h => h,
    };
    let suffix = if hour < 12 { "AM" } else { "PM" };
    format!("{} {}", twelve, suffix)
}

fn watering_plan(
    soil: SoilType,
    moisture: f64,
    today_et: f64,
    rain: &UpcomingPrecipitation,
    best_time: &WateringTime,
) -> WateringPlan {
    if moisture > SOIL_ADEQUATE {
        return WateringPlan {
            should_water: false,
            message: "Soil moisture is adequate. No need to water at this time.".into(),
            details: vec![
                "Allow soil to dry slightly before watering again".into(),
                "Check soil moisture by inserting finger 1-2 inches into soil".into(),
            ],
            best_time: best_time.clone(),
            water_amount: "No watering needed",
        };
    }

    if rain.is_significant() {
        return WateringPlan {
            should_water: false,
            message: format!("Rain expected {}. Hold off on watering.", rain.timeframe),
            details: vec![
                format!("Expected rainfall: {} mm", rain.amount_mm()),
                "Natural rain is better for plants than irrigation water".into(),
            ],
            best_time: best_time.clone(),
            water_amount: "No watering needed",
        };
    }

    let (water_amount, amount_detail) = if moisture < 0.3 {
        (
            "Heavy watering",
            "Water deeply to saturate the root zone (about 1 inch of water)",
        )
    } else if moisture < 0.5 {
        ("Moderate watering", "Apply about 1/2 to 3/4 inch of water")
    } else {
        ("Light watering", "Apply about 1/4 to 1/2 inch of water")
    };

    let frequency = match soil {
        SoilType::Sandy => "More frequent, lighter waterings are better for sandy soil",
        SoilType::Clay => "Less frequent, deeper waterings are better for clay soil",
        _ => "Balanced watering approach works well for loamy soil",
    };

    let et_note = if EtRating::from_value(today_et).is_high() {
        format!(
            "High evapotranspiration ({:.1} mm/day) means plants lose moisture quickly",
            today_et
        )
    } else {
        format!(
            "Moderate evapotranspiration ({:.1} mm/day) means moisture loss is typical",
            today_et
        )
    };

    WateringPlan {
        should_water: true,
        message: format!(
            "Water your garden at {} {}.",
            best_time.time.as_deref().unwrap_or("7 PM"),
            best_time.day
        ),
        details: vec![amount_detail.into(), frequency.into(), et_note],
        best_time: best_time.clone(),
        water_amount,
    }
}

impl Advisor<'_> {
    pub fn watering(
        &mut self,
        weather: &WeatherSnapshot,
        soil: SoilType,
    ) -> Advisory<WateringReport, WateringFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        or_fallback("watering recommendations", self.try_watering(weather, soil), |error| {
            WateringFallback {
                city,
                soil_type: soil,
                error,
                watering_recommendation: GeneralWateringAdvice {
                    should_water: true,
                    message: "Unable to determine precise watering needs. As a general rule, check soil moisture by inserting your finger an inch into the soil. If it feels dry, it's time to water.",
                    water_amount: "Moderate watering recommended",
                    follow_up: "Water at sunset or early morning for best water conservation.",
                },
                timestamp: now,
            }
        })
    }

    fn try_watering(&self, weather: &WeatherSnapshot, soil: SoilType) -> Result<WateringReport> {
        let now = self.now();
        let today = weather.periods_on_or_current(self.today(), now);
        let tomorrow: Vec<RawForecastPeriod> = weather
            .periods_on(self.today() + Duration::days(1))
            .into_iter()
            .cloned()
            .collect();

        let today_et = evapotranspiration(&today, soil);
        let tomorrow_et = evapotranspiration(&tomorrow, soil);

        let recent_precipitation: f64 = today.iter().filter_map(|p| p.precipitation_mm).sum();
        let moisture = soil_moisture(soil, recent_precipitation, today_et);
        let status = MoistureStatus::from_level(moisture);

        let upcoming = find_upcoming_precipitation(&today, &tomorrow);
        let best_time = best_watering_time(now, &today, &tomorrow, soil, moisture);
        let plan = watering_plan(soil, moisture, today_et, &upcoming, &best_time);

        let temps: Vec<f64> = today.iter().filter_map(|p| p.temperature).collect();
        let high = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = temps.iter().copied().fold(f64::INFINITY, f64::min);

        Ok(WateringReport {
            city: weather.location.city.clone(),
            soil_type: soil,
            soil_properties: soil.properties(),
            soil_moisture: moisture,
            moisture_status: status,
            watering_needed: status.watering_needed(),
            evapotranspiration: EtOutlook {
                today: today_et,
                tomorrow: tomorrow_et,
                rating: EtRating::from_value(today_et),
            },
            watering_recommendation: plan,
            best_watering_time: best_time,
            upcoming_precipitation: upcoming,
            recent_precipitation,
            weather_summary: DaySummary {
                high_temp: if temps.is_empty() { 0.0 } else { round_to(high, 1) },
                low_temp: if temps.is_empty() { 0.0 } else { round_to(low, 1) },
                condition: dominant_condition(today.iter().filter_map(|p| p.condition)),
            },
            timestamp: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{advisor, mild_snapshot, noon, period};
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        noon(2024, 7, 1).date().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn clock_labels() {
        assert_eq!(clock_label(19), "7 PM");
        assert_eq!(clock_label(6), "6 AM");
        assert_eq!(clock_label(0), "12 AM");
        assert_eq!(clock_label(12), "12 PM");
    }

    #[test]
    fn saturated_soil_delays_watering() {
        let t = best_watering_time(at(10), &[], &[], SoilType::Loamy, 0.9);
        assert!(!t.should_water);
        assert_eq!(t.day, "tomorrow");
    }

    #[test]
    fn evening_slot_uses_period_name() {
        let t = best_watering_time(at(10), &[], &[], SoilType::Sandy, 0.4);
        assert_eq!(t.time.as_deref(), Some("7 PM"));
        assert_eq!(t.day, "today");
        assert_eq!(t.reasons[0], "Evening watering reduces evaporation");
        assert_eq!(t.reasons.len(), 3);
    }

    #[test]
    fn windy_evening_moves_to_next_slot() {
        let today = vec![
            period(at(18), 25.0, 40.0, 9.0, 10.0, 0.0, WeatherCondition::Clear),
            period(at(21), 22.0, 40.0, 2.0, 10.0, 0.0, WeatherCondition::Clear),
        ];
        let t = best_watering_time(at(10), &today, &[], SoilType::Loamy, 0.4);
        // the windy 18:00 period only blocks the 7 PM slot
        assert_eq!(t.hour_24, Some(20));
        assert!(t.should_water);
    }

    #[test]
    fn heavy_rain_tomorrow_postpones() {
        let tomorrow_noon = at(12) + Duration::days(1);
        let mut wet = period(tomorrow_noon, 18.0, 90.0, 3.0, 100.0, 0.9, WeatherCondition::Rain);
        wet.precipitation_mm = Some(8.0);
        let rain = find_upcoming_precipitation(&[], &[wet.clone()]);
        assert!(rain.expected);
        assert_eq!(rain.timeframe, "tomorrow");
        assert_eq!(rain.time.as_deref(), Some("12:00"));

        let t = best_watering_time(at(10), &[], &[wet], SoilType::Loamy, 0.4);
        assert_eq!(t.day, "after rain");
    }

    #[test]
    fn dry_clay_plan_waters_heavily() {
        let best = best_watering_time(at(10), &[], &[], SoilType::Clay, 0.264);
        let plan = watering_plan(SoilType::Clay, 0.264, 7.0, &UpcomingPrecipitation::none(), &best);
        assert!(plan.should_water);
        assert_eq!(plan.water_amount, "Heavy watering");
        assert_eq!(plan.message, "Water your garden at 7 PM today.");
        assert!(plan.details[2].starts_with("High evapotranspiration (7.0 mm/day)"));
    }

    #[test]
    fn report_for_mild_day() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now).watering(&snap, SoilType::Loamy).ready().unwrap();
        assert_eq!(report.city, "Testville");
        assert_eq!(report.weather_summary.high_temp, 20.0);
        assert!(!report.upcoming_precipitation.expected);
        assert!((0.0..=1.0).contains(&report.soil_moisture));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["soil_type"], "loamy");
        assert_eq!(json["soil_properties"]["drainage_rate"], "moderate");
    }
}
