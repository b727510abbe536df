//! Pollen, UV, cold/flu and air-quality advisories plus the combined health summary.
//!
//! Pollen, UV and cold/flu work from the current observation. Air quality
//! needs an externally supplied reading.

use super::{or_fallback, Advisor, Advisory};
use crate::error::{Result, SkywiseError};
use crate::logic::calculations::{
    cold_flu_risk, pollen_level, trend_series, uv_index, AqiCategory, RiskBand, UvCategory,
    POLLEN_TREND, STEADY_TREND,
};
use crate::logic::random::RandomSource;
use crate::logic::templates::number;
use crate::models::{
    ActivityLevel, AgeGroup, AlertType, AqiReading, HealthConcern, HealthProfile,
    WeatherCondition, WeatherSnapshot,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

const OUTLOOK_DAYS: usize = 7;

/// A current-observation field, defaulted when missing and rejected when not finite
fn observed(value: Option<f64>, default: f64, field: &str) -> Result<f64> {
    match value {
        None => Ok(default),
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(SkywiseError::InvalidData(format!(
            "current {} is not a number: {}",
            field, v
        ))),
    }
}

fn outlook_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..=OUTLOOK_DAYS as i64).map(move |i| today + Duration::days(i))
}

fn push_unique<S: Into<String>>(list: &mut Vec<String>, item: S) {
    let item = item.into();
    if !list.contains(&item) {
        list.push(item);
    }
}

// Pollen

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollenType {
    Tree,
    Grass,
    Weed,
    Mold,
    Indoor,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollenOutlook {
    pub date: NaiveDate,
    pub level: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollenReport {
    pub overall_level: i32,
    pub level_category: RiskBand,
    pub level_description: &'static str,
    pub alert_type: AlertType,
    pub active_pollen_types: Vec<PollenType>,
    pub pollen_levels: BTreeMap<PollenType, i32>,
    pub recommendations: Vec<&'static str>,
    pub forecast: Vec<PollenOutlook>,
}

impl PollenReport {
    pub fn fallback() -> Self {
        Self {
            overall_level: 3,
            level_category: RiskBand::Moderate,
            level_description: "Could not get precise pollen data.",
            alert_type: AlertType::Info,
            active_pollen_types: vec![PollenType::Tree, PollenType::Grass],
            pollen_levels: BTreeMap::from([(PollenType::Tree, 3), (PollenType::Grass, 3)]),
            recommendations: vec![
                "Keep windows closed during high pollen days.",
                "Check local pollen forecasts regularly.",
            ],
            forecast: Vec::new(),
        }
    }
}

fn pollen_description(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "Most people won't be affected.",
        RiskBand::Moderate => "Some individuals may experience symptoms.",
        RiskBand::High => "Many people will experience symptoms.",
        RiskBand::VeryHigh => "Most people with allergies will experience symptoms.",
    }
}

/// Active pollen types by month, dominant type first, with per-type levels
pub fn pollen_mix(
    level: i32,
    month: u32,
    rng: &mut dyn RandomSource,
) -> (Vec<PollenType>, BTreeMap<PollenType, i32>) {
    use PollenType::*;

    let levels: Vec<(PollenType, i32)> = match month {
        3..=5 => vec![
            (Tree, (level + rng.integer(0, 2)).min(10)),
            (Grass, (level - rng.integer(1, 3)).max(1)),
            (Weed, (level - rng.integer(2, 4)).max(1)),
        ],
        6..=8 => vec![
            (Grass, (level + rng.integer(0, 2)).min(10)),
            (Weed, level.min(10)),
            (Tree, (level - rng.integer(2, 4)).max(1)),
        ],
        9..=11 => vec![
            (Weed, (level + rng.integer(0, 2)).min(10)),
            (Mold, level.min(10)),
            (Grass, (level - rng.integer(1, 3)).max(1)),
        ],
        _ => vec![(Mold, (level - 1).max(1)), (Indoor, (level - 2).max(1))],
    };

    let active = levels.iter().map(|(t, _)| *t).collect();
    (active, levels.into_iter().collect())
}

fn pollen_recommendations(level: i32, levels: &BTreeMap<PollenType, i32>) -> Vec<&'static str> {
    let above = |t: PollenType, n: i32| levels.get(&t).is_some_and(|v| *v > n);
    let mut recs = Vec::new();

    if level > 6 {
        recs.push("Keep windows closed to prevent pollen from entering your home.");
        recs.push("Use air purifiers indoors to reduce airborne pollen.");
        recs.push("Consider wearing a mask when outdoors for extended periods.");
        if above(PollenType::Tree, 6) {
            recs.push("Tree pollen is high. Limit exposure to wooded areas.");
        }
        if above(PollenType::Grass, 6) {
            recs.push("Grass pollen is high. Avoid freshly cut lawns.");
        }
        if above(PollenType::Weed, 6) {
            recs.push("Weed pollen is high. Be cautious in areas with unmanaged vegetation.");
        }
        if above(PollenType::Mold, 6) {
            recs.push("Mold spores are high. Be cautious in damp outdoor areas.");
        }
    } else if level > 3 {
        recs.push("Consider taking preventative allergy medication.");
        recs.push("Shower after spending time outdoors to wash off pollen.");
        if above(PollenType::Indoor, 3) {
            recs.push("Indoor allergens may be elevated. Keep your home clean and dust-free.");
        }
    } else {
        recs.push("Pollen levels are low. Good time for outdoor activities for allergy sufferers.");
    }
    recs
}

// UV

#[derive(Debug, Clone, Serialize)]
pub struct UvOutlook {
    pub date: NaiveDate,
    pub uv_index: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UvReport {
    pub uv_index: u8,
    pub category: UvCategory,
    pub description: &'static str,
    pub color: &'static str,
    pub protection_needed: &'static str,
    pub alert_type: AlertType,
    pub recommendations: Vec<&'static str>,
    pub forecast: Vec<UvOutlook>,
}

impl UvReport {
    pub fn fallback() -> Self {
        let category = UvCategory::Moderate;
        Self {
            uv_index: 4,
            category,
            description: category.description(),
            color: category.color(),
            protection_needed: category.protection(),
            alert_type: category.alert_type(),
            recommendations: vec![
                "Apply sunscreen with SPF appropriate for your skin type.",
                "Wear protective clothing, a hat, and sunglasses.",
            ],
            forecast: Vec::new(),
        }
    }
}

fn uv_recommendations(uv: u8) -> Vec<&'static str> {
    if uv <= 2 {
        return vec!["You can safely stay outside with minimal protection."];
    }
    let mut recs = vec!["Apply sunscreen with SPF appropriate for your skin type."];
    if uv > 5 {
        recs.push("Wear protective clothing, a wide-brimmed hat, and UV-blocking sunglasses.");
        recs.push("Seek shade between 10am and 4pm when UV is strongest.");
    }
    if uv > 7 {
        recs.push("Reapply sunscreen every 2 hours, especially after swimming or sweating.");
        recs.push("Consider UV-protective clothing with UPF rating.");
    }
    if uv > 10 {
        recs.push("Minimize outdoor activities during midday hours.");
        recs.push("Check for UV alerts in your weather forecasts.");
    }
    recs
}

// Cold and flu

const COLD_FLU_SYMPTOMS: &[&str] = &[
    "Fever or feeling feverish/chills",
    "Cough",
    "Sore throat",
    "Runny or stuffy nose",
    "Muscle or body aches",
    "Headaches",
    "Fatigue (tiredness)",
];

#[derive(Debug, Clone, Serialize)]
pub struct RiskOutlook {
    pub date: NaiveDate,
    pub risk: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColdFluReport {
    pub risk_value: i32,
    pub risk_category: RiskBand,
    pub risk_description: &'static str,
    pub alert_type: AlertType,
    pub symptoms: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
    pub forecast: Vec<RiskOutlook>,
}

impl ColdFluReport {
    pub fn fallback() -> Self {
        Self {
            risk_value: 4,
            risk_category: RiskBand::Moderate,
            risk_description: cold_flu_description(RiskBand::Moderate),
            alert_type: AlertType::Info,
            symptoms: COLD_FLU_SYMPTOMS[..3].to_vec(),
            recommendations: vec![
                "Wash hands regularly, especially before eating.",
                "Avoid touching your face, eyes, nose, and mouth.",
            ],
            forecast: Vec::new(),
        }
    }
}

fn cold_flu_description(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "Low risk of cold and flu in your area.",
        RiskBand::Moderate => "Moderate risk of cold and flu in your area.",
        RiskBand::High => "High risk of cold and flu in your area.",
        RiskBand::VeryHigh => "Very high risk of cold and flu in your area.",
    }
}

fn cold_flu_recommendations(risk: i32) -> Vec<&'static str> {
    if risk > 6 {
        let mut recs = vec![
            "Wash hands frequently with soap and water for at least 20 seconds.",
            "Avoid close contact with people who are sick.",
            "Consider wearing a mask in crowded indoor spaces.",
            "Get your seasonal flu vaccination if you haven't already.",
            "Boost your immune system with vitamin-rich foods and sufficient sleep.",
        ];
        if risk > 8 {
            recs.push("Avoid unnecessary travel to high-risk areas.");
            recs.push("Consider limiting time in crowded public places.");
            recs.push("Keep sanitizer with you when out in public.");
        }
        recs
    } else if risk > 3 {
        vec![
            "Wash hands regularly, especially before eating.",
            "Avoid touching your face, eyes, nose, and mouth.",
            "Consider getting a flu shot if you haven't already.",
        ]
    } else {
        vec![
            "Practice normal hygiene like regular handwashing.",
            "Stay home if you feel unwell to prevent spreading illness.",
        ]
    }
}

// Air quality

#[derive(Debug, Clone, Serialize)]
pub struct AirQualityReport {
    pub aqi: f64,
    pub aqi_category: AqiCategory,
    pub alert_type: AlertType,
    pub recommendations: Vec<&'static str>,
    pub pollutants: BTreeMap<String, f64>,
    pub main_pollutant: Option<String>,
}

impl AirQualityReport {
    pub fn fallback() -> Self {
        Self {
            aqi: 50.0,
            aqi_category: AqiCategory::Moderate,
            alert_type: AlertType::Info,
            recommendations: vec![
                "Unusually sensitive individuals should consider reducing prolonged outdoor exertion.",
                "Watch for symptoms like coughing or shortness of breath.",
                "Check local air quality forecasts for updates.",
            ],
            pollutants: BTreeMap::new(),
            main_pollutant: Some("PM2.5".into()),
        }
    }
}

/// How much a person's profile raises (or lowers) their sensitivity to poor air
pub fn risk_adjustment(profile: &HealthProfile) -> i32 {
    let concerns: i32 = profile
        .concerns
        .iter()
        .map(|c| match c {
            HealthConcern::Copd => 2,
            HealthConcern::Asthma | HealthConcern::HeartDisease | HealthConcern::Allergies => 1,
        })
        .sum();
    let activity = match profile.activity_level {
        ActivityLevel::High => 1,
        ActivityLevel::Low => -1,
        ActivityLevel::Moderate => 0,
    };
    let age = match profile.age_group {
        AgeGroup::Child | AgeGroup::Senior => 1,
        AgeGroup::Adult => 0,
    };
    concerns + activity + age
}

fn air_quality_recommendations(aqi: f64, profile: &HealthProfile) -> Vec<&'static str> {
    let mut recs = Vec::new();

    if aqi > 150.0 {
        recs.push("Avoid outdoor activities and exercise.");
        recs.push("Keep windows and doors closed.");
        recs.push("Use air purifiers indoors if available.");
        if aqi > 200.0 {
            recs.push("Wear N95 masks if you must go outside.");
            recs.push("Reconsider travel plans in the area.");
        }
    } else if aqi > 100.0 {
        recs.push("Reduce prolonged or heavy outdoor exertion.");
        recs.push("Take more breaks during outdoor activities.");
        recs.push("Watch for symptoms like coughing or shortness of breath.");
    } else if aqi > 50.0 {
        recs.push("Unusually sensitive individuals should consider reducing prolonged outdoor exertion.");
    } else {
        recs.push("Air quality is good. It's a great day for outdoor activities.");
    }

    let moderate = aqi > 50.0;
    let sensitive = aqi > 100.0;

    if profile.has(HealthConcern::Asthma) {
        if moderate {
            recs.push("Asthma sufferers: Keep rescue inhaler nearby.");
        }
        if sensitive {
            recs.push("Asthma sufferers: Consider staying indoors with air filtration.");
        }
    }
    if profile.has(HealthConcern::Copd) {
        if moderate {
            recs.push("COPD sufferers: Monitor breathing closely and limit outdoor exposure.");
        }
        if sensitive {
            recs.push("COPD sufferers: Stay indoors and ensure medications are available.");
        }
    }
    if profile.has(HealthConcern::HeartDisease) && sensitive {
        recs.push("Heart disease patients: Avoid strenuous activities outdoors.");
    }
    if profile.has(HealthConcern::Allergies) && moderate {
        recs.push("Allergy sufferers: Consider taking antihistamines before going outside.");
    }

    if profile.activity_level == ActivityLevel::High {
        if moderate {
            recs.push("Consider moving intensive exercise indoors or reducing intensity.");
        }
        if sensitive {
            recs.push("Reschedule outdoor workouts or competitions to a day with better air quality.");
        }
    }

    match profile.age_group {
        AgeGroup::Child if sensitive => recs.push("Children should limit outdoor play time."),
        AgeGroup::Senior if sensitive => {
            recs.push("Seniors should stay indoors and keep windows closed.")
        }
        _ => {}
    }

    let mut unique = Vec::with_capacity(recs.len());
    for rec in recs {
        if !unique.contains(&rec) {
            unique.push(rec);
        }
    }
    unique
}

// Combined summary

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    AirQuality,
    Uv,
    Pollen,
    ColdFlu,
    General,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrimaryAlert {
    #[serde(rename = "type")]
    pub source: AlertSource,
    pub alert_type: AlertType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthAlerts {
    pub primary_alert: PrimaryAlert,
    pub air_quality: AirQualityReport,
    pub pollen: PollenReport,
    pub uv_index: UvReport,
    pub cold_flu: ColdFluReport,
    pub recommendations: Vec<String>,
}

fn first_or_empty(recs: &[&str]) -> String {
    recs.first().map(|s| s.to_string()).unwrap_or_default()
}

/// Most urgent alert among the components, or an informational one
fn primary_alert(
    city: &str,
    air: &AirQualityReport,
    pollen: &PollenReport,
    uv: &UvReport,
    cold_flu: &ColdFluReport,
) -> PrimaryAlert {
    let mut primary: Option<PrimaryAlert> = None;

    if matches!(air.alert_type, AlertType::Danger | AlertType::Warning) {
        primary = Some(PrimaryAlert {
            source: AlertSource::AirQuality,
            alert_type: air.alert_type,
            message: format!(
                "Air Quality Alert: {} air quality ({} AQI). {}",
                air.aqi_category.label(),
                number(air.aqi),
                first_or_empty(&air.recommendations)
            ),
        });
    }

    let candidates = [
        (
            AlertSource::Uv,
            uv.alert_type,
            format!(
                "UV Alert: {} UV index ({}). {}",
                uv.category.label(),
                uv.uv_index,
                uv.protection_needed
            ),
        ),
        (
            AlertSource::Pollen,
            pollen.alert_type,
            format!(
                "Pollen Alert: {} pollen levels today. {}",
                pollen.level_category.label(),
                first_or_empty(&pollen.recommendations)
            ),
        ),
        (
            AlertSource::ColdFlu,
            cold_flu.alert_type,
            format!(
                "Cold & Flu Alert: {} risk in your area. {}",
                cold_flu.risk_category.label(),
                first_or_empty(&cold_flu.recommendations)
            ),
        ),
    ];

    // danger replaces anything short of danger; warning only fills an empty slot
    for (source, alert_type, message) in candidates {
        let replace = match alert_type {
            AlertType::Danger => !matches!(&primary, Some(p) if p.alert_type == AlertType::Danger),
            AlertType::Warning => primary.is_none(),
            _ => false,
        };
        if replace {
            primary = Some(PrimaryAlert {
                source,
                alert_type,
                message,
            });
        }
    }

    if let Some(alert) = primary {
        return alert;
    }

    let info = |source, message: String| PrimaryAlert {
        source,
        alert_type: AlertType::Info,
        message,
    };

    if air.alert_type == AlertType::Info {
        info(
            AlertSource::AirQuality,
            format!("Air Quality: {} air quality today in {}.", air.aqi_category.label(), city),
        )
    } else if pollen.alert_type == AlertType::Info {
        info(
            AlertSource::Pollen,
            format!("Pollen Levels: {} pollen levels today in {}.", pollen.level_category.label(), city),
        )
    } else if uv.alert_type == AlertType::Info {
        info(
            AlertSource::Uv,
            format!("UV Index: {} UV levels today in {}.", uv.category.label(), city),
        )
    } else if cold_flu.alert_type == AlertType::Info {
        info(
            AlertSource::ColdFlu,
            format!("Cold & Flu: {} risk today in {}.", cold_flu.risk_category.label(), city),
        )
    } else {
        PrimaryAlert {
            source: AlertSource::General,
            alert_type: AlertType::Success,
            message: format!(
                "Good news! Environmental conditions in {} are favorable today. Enjoy your outdoor activities.",
                city
            ),
        }
    }
}

fn combined_recommendations(
    profile: &HealthProfile,
    air: &AirQualityReport,
    pollen: &PollenReport,
    uv: &UvReport,
    cold_flu: &ColdFluReport,
) -> Vec<String> {
    let mut recs = Vec::new();

    if profile.has(HealthConcern::Asthma) && (air.aqi > 100.0 || pollen.overall_level > 6) {
        push_unique(
            &mut recs,
            format!(
                "With your asthma, be extra cautious today with {} air quality and {} pollen levels.",
                air.aqi_category.label(),
                pollen.level_category.label()
            ),
        );
    }
    if profile.has(HealthConcern::Allergies) && pollen.overall_level > 4 {
        push_unique(
            &mut recs,
            format!(
                "Given your allergies, take preventative medication today as pollen levels are {}.",
                pollen.level_category.label()
            ),
        );
    }
    if profile.has(HealthConcern::HeartDisease) && (air.aqi > 100.0 || cold_flu.risk_value > 6) {
        push_unique(
            &mut recs,
            "With your heart condition, limit outdoor activities today due to environmental conditions.",
        );
    }
    if profile.has(HealthConcern::Copd) && air.aqi > 50.0 {
        push_unique(
            &mut recs,
            "With COPD, you should be particularly careful about current air quality conditions.",
        );
    }

    let picks: [(&[&str], usize); 4] = [
        (air.recommendations.as_slice(), 2),
        (pollen.recommendations.as_slice(), 1),
        (uv.recommendations.as_slice(), 1),
        (cold_flu.recommendations.as_slice(), 1),
    ];
    for (list, count) in picks {
        for rec in list.iter().take(count) {
            push_unique(&mut recs, *rec);
        }
    }
    recs
}

impl Advisor<'_> {
    pub fn pollen(&mut self, weather: &WeatherSnapshot) -> Advisory<PollenReport, PollenReport> {
        let result = self.try_pollen(weather);
        or_fallback("pollen count", result, |_| PollenReport::fallback())
    }

    fn try_pollen(&mut self, weather: &WeatherSnapshot) -> Result<PollenReport> {
        let current = &weather.current;
        let temp = observed(current.temperature, 20.0, "temperature")?;
        let humidity = observed(current.humidity, 50.0, "humidity")?;
        let wind = observed(current.wind_speed, 5.0, "wind speed")?;
        let condition = current.condition.unwrap_or(WeatherCondition::Other);

        let level = pollen_level(temp, humidity, wind, condition);
        let band = RiskBand::from_level(level);
        let today = self.today();
        let (active, levels) = pollen_mix(level, today.month(), self.rng());
        let recommendations = pollen_recommendations(level, &levels);

        let series = trend_series(level as f64, OUTLOOK_DAYS, (1.0, 10.0), POLLEN_TREND, self.rng());
        let forecast = outlook_dates(today)
            .zip(series)
            .map(|(date, level)| PollenOutlook { date, level })
            .collect();

        Ok(PollenReport {
            overall_level: level,
            level_category: band,
            level_description: pollen_description(band),
            alert_type: band.alert_type(),
            active_pollen_types: active,
            pollen_levels: levels,
            recommendations,
            forecast,
        })
    }

    pub fn uv(&mut self, weather: &WeatherSnapshot) -> Advisory<UvReport, UvReport> {
        let result = self.try_uv(weather);
        or_fallback("UV index", result, |_| UvReport::fallback())
    }

    fn try_uv(&mut self, weather: &WeatherSnapshot) -> Result<UvReport> {
        let current = &weather.current;
        let clouds = observed(current.cloud_cover, 50.0, "cloud cover")?;
        let condition = current.condition.unwrap_or(WeatherCondition::Other);
        let today = self.today();

        let uv = uv_index(clouds, condition, today.month(), weather.latitude());
        let category = UvCategory::from_index(uv);

        let series = trend_series(uv as f64, OUTLOOK_DAYS, (0.0, 12.0), STEADY_TREND, self.rng());
        let forecast = outlook_dates(today)
            .zip(series)
            .map(|(date, uv_index)| UvOutlook { date, uv_index })
            .collect();

        Ok(UvReport {
            uv_index: uv,
            category,
            description: category.description(),
            color: category.color(),
            protection_needed: category.protection(),
            alert_type: category.alert_type(),
            recommendations: uv_recommendations(uv),
            forecast,
        })
    }

    pub fn cold_flu(&mut self, weather: &WeatherSnapshot) -> Advisory<ColdFluReport, ColdFluReport> {
        let result = self.try_cold_flu(weather);
        or_fallback("cold/flu risk", result, |_| ColdFluReport::fallback())
    }

    fn try_cold_flu(&mut self, weather: &WeatherSnapshot) -> Result<ColdFluReport> {
        let current = &weather.current;
        let temp = observed(current.temperature, 20.0, "temperature")?;
        let humidity = observed(current.humidity, 50.0, "humidity")?;
        let today = self.today();

        let risk = cold_flu_risk(temp, humidity, today.month(), self.rng());
        let band = RiskBand::from_level(risk);

        let series = trend_series(risk as f64, OUTLOOK_DAYS, (1.0, 10.0), STEADY_TREND, self.rng());
        let forecast = outlook_dates(today)
            .zip(series)
            .map(|(date, risk)| RiskOutlook { date, risk })
            .collect();

        Ok(ColdFluReport {
            risk_value: risk,
            risk_category: band,
            risk_description: cold_flu_description(band),
            alert_type: band.alert_type(),
            symptoms: if risk > 3 { COLD_FLU_SYMPTOMS.to_vec() } else { Vec::new() },
            recommendations: cold_flu_recommendations(risk),
            forecast,
        })
    }

    /// Personalized air-quality risk. A missing reading yields the fallback.
    pub fn air_quality(
        &mut self,
        reading: Option<&AqiReading>,
        profile: &HealthProfile,
    ) -> Advisory<AirQualityReport, AirQualityReport> {
        or_fallback(
            "air quality health risk",
            Self::try_air_quality(reading, profile),
            |_| AirQualityReport::fallback(),
        )
    }

    fn try_air_quality(reading: Option<&AqiReading>, profile: &HealthProfile) -> Result<AirQualityReport> {
        let reading = reading.ok_or_else(|| {
            SkywiseError::DataSourceUnavailable("no air quality reading available".into())
        })?;
        if !reading.aqi.is_finite() || reading.aqi < 0.0 {
            return Err(SkywiseError::InvalidData(format!("AQI {}", reading.aqi)));
        }

        let (category, alert_type) =
            AqiCategory::from_aqi(reading.aqi).personalized(risk_adjustment(profile));

        Ok(AirQualityReport {
            aqi: reading.aqi,
            aqi_category: category,
            alert_type,
            recommendations: air_quality_recommendations(reading.aqi, profile),
            pollutants: reading.pollutants.clone(),
            main_pollutant: reading.main_pollutant.clone(),
        })
    }

    /// Every component degrades on its own, so the summary is always assembled
    pub fn health_alerts(
        &mut self,
        weather: &WeatherSnapshot,
        reading: Option<&AqiReading>,
        profile: &HealthProfile,
    ) -> Advisory<HealthAlerts, HealthAlerts> {
        let city = weather.location.city.clone();
        let result = self.try_health_alerts(weather, reading, profile);
        or_fallback("comprehensive health alerts", result, |_| HealthAlerts {
            primary_alert: PrimaryAlert {
                source: AlertSource::General,
                alert_type: AlertType::Info,
                message: format!(
                    "Health alerts service is experiencing some issues. Please check individual health indicators for {}.",
                    city
                ),
            },
            air_quality: AirQualityReport::fallback(),
            pollen: PollenReport::fallback(),
            uv_index: UvReport::fallback(),
            cold_flu: ColdFluReport::fallback(),
            recommendations: vec![
                "Check local forecasts for the most up-to-date health information.".into(),
            ],
        })
    }

    fn try_health_alerts(
        &mut self,
        weather: &WeatherSnapshot,
        reading: Option<&AqiReading>,
        profile: &HealthProfile,
    ) -> Result<HealthAlerts> {
        let city = &weather.location.city;
        if city.trim().is_empty() {
            return Err(SkywiseError::InvalidData("forecast has no city name".into()));
        }

        let air = self.air_quality(reading, profile).into_inner();
        let pollen = self.pollen(weather).into_inner();
        let uv = self.uv(weather).into_inner();
        let cold_flu = self.cold_flu(weather).into_inner();

        Ok(HealthAlerts {
            primary_alert: primary_alert(city, &air, &pollen, &uv, &cold_flu),
            recommendations: combined_recommendations(profile, &air, &pollen, &uv, &cold_flu),
            air_quality: air,
            pollen,
            uv_index: uv,
            cold_flu,
        })
    }
}
