use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::calculations::{evapotranspiration, round_to, MoistureStatus};
use crate::logic::random::RandomSource;
use crate::models::{AlertType, SoilProperties, SoilType, WeatherCondition, WeatherSnapshot};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

const STARTING_MOISTURE: f64 = 0.7;
const FORECAST_DAYS: usize = 5;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Serialize)]
pub struct MoistureDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub soil_moisture: f64, // %
    pub moisture_status: MoistureStatus,
    pub moisture_class: AlertType,
    pub evapotranspiration: f64,
    pub precipitation_probability: f64, // %
    pub estimated_precipitation: f64,   // mm
    pub watering_recommendation: &'static str,
    pub weather_condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoilMoistureForecast {
    pub city: String,
    pub soil_type: SoilType,
    pub soil_properties: &'static SoilProperties,
    pub moisture_forecast: Vec<MoistureDay>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoilMoistureFallback {
    pub city: String,
    pub soil_type: SoilType,
    pub error: String,
    pub timestamp: NaiveDateTime,
}

/// Rain amount guessed from the day's average probability
pub fn estimated_precipitation(probability: f64, rng: &mut dyn RandomSource) -> f64 {
    if probability > 0.7 {
        rng.uniform(10.0, 25.0)
    } else if probability > 0.4 {
        rng.uniform(2.0, 10.0)
    } else if probability > 0.2 {
        rng.uniform(0.1, 2.0)
    } else {
        0.0
    }
}

/// One step of the daily water balance. Infiltration caps how much rain the soil can take in.
pub fn water_balance(moisture: f64, soil: &SoilProperties, precipitation_mm: f64, et_mm: f64) -> f64 {
    let gain = (precipitation_mm / MM_PER_INCH).min(soil.infiltration_rate) / soil.water_holding_capacity;
    let loss = (et_mm / MM_PER_INCH) / soil.water_holding_capacity;
    (moisture + gain - loss).clamp(0.0, 1.0)
}

impl Advisor<'_> {
    pub fn soil_moisture_forecast(
        &mut self,
        weather: &WeatherSnapshot,
        soil: SoilType,
    ) -> Advisory<SoilMoistureForecast, SoilMoistureFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        let result = self.try_soil_moisture_forecast(weather, soil);
        or_fallback("soil moisture forecast", result, |error| SoilMoistureFallback {
            city,
            soil_type: soil,
            error,
            timestamp: now,
        })
    }

    fn try_soil_moisture_forecast(
        &mut self,
        weather: &WeatherSnapshot,
        soil: SoilType,
    ) -> Result<SoilMoistureForecast> {
        let now = self.now();
        let properties = soil.properties();
        let mut moisture = STARTING_MOISTURE;
        let mut forecast = Vec::with_capacity(FORECAST_DAYS);

        for day in self.daily(weather).into_iter().take(FORECAST_DAYS) {
            let periods = weather.periods_on_or_current(day.date, now);
            let et = evapotranspiration(&periods, soil);
            let probability = day.precipitation_probability;
            let precipitation = estimated_precipitation(probability, self.rng());

            moisture = water_balance(moisture, properties, precipitation, et);
            let status = MoistureStatus::from_level(moisture);

            forecast.push(MoistureDay {
                day_name: day.day_name(),
                date: day.date,
                soil_moisture: round_to(moisture * 100.0, 1),
                moisture_status: status,
                moisture_class: status.alert_type(),
                evapotranspiration: round_to(et, 2),
                precipitation_probability: round_to(probability * 100.0, 1),
                estimated_precipitation: round_to(precipitation, 1),
                watering_recommendation: status.watering_needed(),
                weather_condition: day.condition,
            });
        }

        Ok(SoilMoistureForecast {
            city: weather.location.city.clone(),
            soil_type: soil,
            soil_properties: properties,
            moisture_forecast: forecast,
            timestamp: now,
        })
    }
}
