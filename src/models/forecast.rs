use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Forecast (or observation) bundle for one city as delivered by a weather source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub fetched_at: NaiveDateTime,
    pub location: ForecastLocation,
    pub current: RawForecastPeriod,
    pub periods: Vec<RawForecastPeriod>, // 3-hour intervals
    #[serde(default)]
    pub simulated: bool,
}

impl WeatherSnapshot {
    /// Periods whose local timestamp falls on `date`
    pub fn periods_on(&self, date: NaiveDate) -> Vec<&RawForecastPeriod> {
        self.periods
            .iter()
            .filter(|p| p.timestamp.date() == date)
            .collect()
    }

    /// Periods for `date`, or the current observation re-stamped to `now`
    /// when the forecast has nothing for that day.
    pub fn periods_on_or_current(
        &self,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Vec<RawForecastPeriod> {
        let periods: Vec<RawForecastPeriod> =
            self.periods_on(date).into_iter().cloned().collect();
        if periods.is_empty() {
            vec![self.current.observed_at(now)]
        } else {
            periods
        }
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A single 3-hour forecast sample. Any numeric field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawForecastPeriod {
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,               // °C
    pub humidity: Option<f64>,                  // %
    pub wind_speed: Option<f64>,                // provider units (m/s for OWM metric)
    pub cloud_cover: Option<f64>,               // %
    pub precipitation_probability: Option<f64>, // 0.0-1.0
    pub precipitation_mm: Option<f64>,          // rain + snow
    pub condition: Option<WeatherCondition>,
    pub description: Option<String>,
}

impl RawForecastPeriod {
    /// Copy of this sample with a different timestamp and no precipitation chance
    pub fn observed_at(&self, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            precipitation_probability: Some(0.0),
            ..self.clone()
        }
    }

    pub fn condition_or_default(&self) -> WeatherCondition {
        self.condition.unwrap_or_default()
    }

    pub fn is_raining(&self) -> bool {
        self.precipitation_mm.unwrap_or(0.0) > 0.0
    }
}

/// Weather condition categories from OpenWeatherMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    Smoke,
    Other,
}

impl WeatherCondition {
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=232 => WeatherCondition::Thunderstorm,
            300..=321 => WeatherCondition::Drizzle,
            500..=531 => WeatherCondition::Rain,
            600..=622 => WeatherCondition::Snow,
            701 => WeatherCondition::Mist,
            711 => WeatherCondition::Smoke,
            721 => WeatherCondition::Haze,
            741 => WeatherCondition::Fog,
            800 => WeatherCondition::Clear,
            801..=804 => WeatherCondition::Clouds,
            _ => WeatherCondition::Other,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clear" => Some(WeatherCondition::Clear),
            "clouds" | "cloudy" => Some(WeatherCondition::Clouds),
            "rain" => Some(WeatherCondition::Rain),
            "drizzle" => Some(WeatherCondition::Drizzle),
            "thunderstorm" => Some(WeatherCondition::Thunderstorm),
            "snow" => Some(WeatherCondition::Snow),
            "mist" => Some(WeatherCondition::Mist),
            "fog" => Some(WeatherCondition::Fog),
            "haze" => Some(WeatherCondition::Haze),
            "smoke" => Some(WeatherCondition::Smoke),
            "" => None,
            _ => Some(WeatherCondition::Other),
        }
    }

    /// Provider-style label ("Clouds", "Rain", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Mist => "Mist",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Haze => "Haze",
            WeatherCondition::Smoke => "Smoke",
            WeatherCondition::Other => "Other",
        }
    }

    pub fn label_lower(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// Whether this condition involves precipitation
    pub fn has_precipitation(&self) -> bool {
        matches!(
            self,
            WeatherCondition::Rain
                | WeatherCondition::Drizzle
                | WeatherCondition::Thunderstorm
                | WeatherCondition::Snow
        )
    }

    pub fn is_fair(&self) -> bool {
        matches!(self, WeatherCondition::Clear | WeatherCondition::Clouds)
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
