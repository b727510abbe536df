use super::watering::{best_watering_time, find_upcoming_precipitation, UpcomingPrecipitation, WateringTime};
use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::calculations::round_to;
use crate::models::{
    PlantProfile, PlantType, RawForecastPeriod, SoilType, WaterNeeds, WeatherCondition,
    WeatherSnapshot,
};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

const FROST_RISK_TEMP: f64 = 2.0;
const HEAT_RISK_TEMP: f64 = 32.0;
const LIGHT_RAIN_MM: f64 = 5.0;
const DRONE_MAX_WIND: f64 = 5.0;

#[derive(Debug, Clone, Serialize)]
pub struct PlantWeather {
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub frost_risk: bool,
    pub heat_risk: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantAlert {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantCareReport {
    pub city: String,
    pub plant_type: PlantType,
    pub plant_info: PlantProfile,
    pub weather_conditions: PlantWeather,
    pub care_recommendations: Vec<String>,
    pub alerts: Vec<PlantAlert>,
    pub best_watering_time: WateringTime,
    pub upcoming_precipitation: UpcomingPrecipitation,
    pub suitable_for_drone_monitoring: bool,
    pub timestamp: NaiveDateTime,
}

/// Reduced payload for plants without a profile
#[derive(Debug, Clone, Serialize)]
pub struct GenericPlantCare {
    pub city: String,
    pub plant_type: String,
    pub status: &'static str,
    pub care_recommendations: Vec<&'static str>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PlantCare {
    Known(Box<PlantCareReport>),
    Generic(GenericPlantCare),
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantCareFallback {
    pub city: String,
    pub plant_type: String,
    pub error: String,
    pub care_recommendations: Vec<&'static str>,
    pub timestamp: NaiveDateTime,
}

fn care_recommendations(
    plant: PlantType,
    profile: &PlantProfile,
    weather: &PlantWeather,
    rain: &UpcomingPrecipitation,
) -> (Vec<String>, Vec<PlantAlert>) {
    let mut recommendations = Vec::new();
    let mut alerts = Vec::new();
    let (ideal_min, ideal_max) = profile.ideal_temp_range;

    // Temperature
    if weather.avg_temp < ideal_min {
        if profile.frost_sensitive && weather.frost_risk {
            alerts.push(PlantAlert {
                kind: "frost",
                severity: "high",
                message: format!(
                    "Frost risk detected! {} is sensitive to frost. Protect your plants overnight.",
                    plant.title()
                ),
            });
            recommendations.push("Cover plants with frost cloth or bring them indoors if possible".into());
        } else {
            recommendations.push(format!(
                "Current temperatures are below ideal range for {}. Consider using row covers.",
                plant
            ));
        }
    } else if weather.avg_temp > ideal_max {
        if profile.heat_sensitive && weather.heat_risk {
            alerts.push(PlantAlert {
                kind: "heat",
                severity: "high",
                message: format!(
                    "Excessive heat detected! {} is sensitive to high temperatures.",
                    plant.title()
                ),
            });
            recommendations.push("Provide shade during the hottest part of the day".into());
            recommendations.push("Water in early morning or evening to reduce heat stress".into());
        } else {
            recommendations.push(format!(
                "Current temperatures are above ideal range for {}. Monitor for signs of heat stress.",
                plant
            ));
        }
    }

    // Water
    if rain.expected {
        if profile.water_needs == WaterNeeds::High && rain.amount_mm() < LIGHT_RAIN_MM {
            recommendations.push("Light rain expected, but may not be sufficient for this plant's needs. Supplement with additional watering if needed.".into());
        } else {
            recommendations.push(format!(
                "Rain expected {}. Hold off on watering until after rainfall.",
                rain.timeframe
            ));
        }
    } else {
        let advice = match profile.water_needs {
            WaterNeeds::High => "No rain in forecast. Maintain regular watering schedule, checking soil moisture daily.",
            WaterNeeds::Moderate => "Water when the top inch of soil feels dry to the touch.",
            _ => "Allow soil to dry between waterings. Check moisture levels by inserting finger 2 inches into soil.",
        };
        recommendations.push(advice.into());
    }

    (recommendations, alerts)
}

fn drone_friendly(first: Option<&RawForecastPeriod>) -> bool {
    first.is_some_and(|p| {
        matches!(
            p.condition_or_default(),
            WeatherCondition::Clear | WeatherCondition::Clouds
        ) && p.wind_speed.unwrap_or(0.0) < DRONE_MAX_WIND
    })
}

impl Advisor<'_> {
    pub fn plant_care(
        &mut self,
        weather: &WeatherSnapshot,
        plant_name: &str,
    ) -> Advisory<PlantCare, PlantCareFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        let plant_type = plant_name.to_string();
        or_fallback("plant care recommendations", self.try_plant_care(weather, plant_name), |error| {
            PlantCareFallback {
                city,
                plant_type,
                error,
                care_recommendations: vec![
                    "Water early morning or evening",
                    "Check soil moisture before watering",
                    "Protect from extreme weather conditions",
                ],
                timestamp: now,
            }
        })
    }

    fn try_plant_care(&self, weather: &WeatherSnapshot, plant_name: &str) -> Result<PlantCare> {
        let now = self.now();
        let Some(plant) = PlantType::from_str(plant_name) else {
            return Ok(PlantCare::Generic(GenericPlantCare {
                city: weather.location.city.clone(),
                plant_type: plant_name.to_string(),
                status: "Plant type not found in database. Providing general recommendations.",
                care_recommendations: vec![
                    "Water when the top inch of soil feels dry",
                    "Protect from extreme temperatures",
                    "Ensure proper drainage",
                    "Provide adequate sunlight",
                ],
                timestamp: now,
            }));
        };

        let profile = plant.profile();
        let today = weather.periods_on_or_current(self.today(), now);
        let tomorrow: Vec<RawForecastPeriod> = weather
            .periods_on(self.today() + Duration::days(1))
            .into_iter()
            .cloned()
            .collect();

        let temps: Vec<f64> = today.iter().filter_map(|p| p.temperature).collect();
        let (min_temp, max_temp, avg_temp) = if temps.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                temps.iter().copied().fold(f64::INFINITY, f64::min),
                temps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                temps.iter().sum::<f64>() / temps.len() as f64,
            )
        };

        let conditions = PlantWeather {
            min_temp: round_to(min_temp, 1),
            max_temp: round_to(max_temp, 1),
            avg_temp: round_to(avg_temp, 1),
            frost_risk: min_temp < FROST_RISK_TEMP,
            heat_risk: max_temp > HEAT_RISK_TEMP,
        };

        let rain = find_upcoming_precipitation(&today, &tomorrow);
        let (care_recommendations, alerts) = care_recommendations(plant, &profile, &conditions, &rain);
        let best_time = best_watering_time(now, &today, &tomorrow, SoilType::Loamy, 0.5);

        Ok(PlantCare::Known(Box::new(PlantCareReport {
            city: weather.location.city.clone(),
            plant_type: plant,
            plant_info: profile,
            weather_conditions: conditions,
            care_recommendations,
            alerts,
            best_watering_time: best_time,
            upcoming_precipitation: rain,
            suitable_for_drone_monitoring: drone_friendly(today.first()),
            timestamp: now,
        })))
    }
}
