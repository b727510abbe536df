use crate::config::OpenWeatherMapConfig;
use crate::error::{Result, SkywiseError};
use crate::models::{ForecastLocation, RawForecastPeriod, WeatherCondition, WeatherSnapshot};
use chrono::{DateTime, NaiveDateTime};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    pop: Option<f64>, // probability of precipitation
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    dt: i64,
    #[serde(default)]
    timezone: i64,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    clouds: Option<OwmClouds>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: Option<f64>, // cloudiness percentage
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    three_hour: Option<f64>,
}

impl OwmPrecipitation {
    fn volume(&self) -> f64 {
        self.three_hour.or(self.one_hour).unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: OwmCoord,
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwmCoord {
    lat: f64,
    lon: f64,
}

/// Unix seconds to the city's wall-clock time
fn local_time(dt: i64, offset_secs: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(dt + offset_secs, 0)
        .map(|t| t.naive_utc())
        .ok_or_else(|| SkywiseError::InvalidData(format!("timestamp {} out of range", dt)))
}

/// Rain plus snow, or nothing when the provider reported neither
fn precipitation(rain: Option<&OwmPrecipitation>, snow: Option<&OwmPrecipitation>) -> Option<f64> {
    match (rain, snow) {
        (None, None) => None,
        _ => Some(rain.map_or(0.0, OwmPrecipitation::volume) + snow.map_or(0.0, OwmPrecipitation::volume)),
    }
}

fn condition(weather: &[OwmWeather]) -> (Option<WeatherCondition>, Option<String>) {
    match weather.first() {
        Some(w) => (Some(WeatherCondition::from_owm_id(w.id)), w.description.clone()),
        None => (None, None),
    }
}

fn convert_forecast_item(item: &OwmForecastItem, offset_secs: i64) -> Result<RawForecastPeriod> {
    let (condition, description) = condition(&item.weather);
    Ok(RawForecastPeriod {
        timestamp: local_time(item.dt, offset_secs)?,
        temperature: item.main.temp,
        humidity: item.main.humidity,
        wind_speed: item.wind.as_ref().and_then(|w| w.speed),
        cloud_cover: item.clouds.as_ref().and_then(|c| c.all),
        precipitation_probability: item.pop,
        precipitation_mm: precipitation(item.rain.as_ref(), item.snow.as_ref()),
        condition,
        description,
    })
}

fn convert_current(current: &OwmCurrentResponse) -> Result<RawForecastPeriod> {
    let (condition, description) = condition(&current.weather);
    Ok(RawForecastPeriod {
        timestamp: local_time(current.dt, current.timezone)?,
        temperature: current.main.temp,
        humidity: current.main.humidity,
        wind_speed: current.wind.as_ref().and_then(|w| w.speed),
        cloud_cover: current.clouds.as_ref().and_then(|c| c.all),
        precipitation_probability: None,
        precipitation_mm: precipitation(current.rain.as_ref(), current.snow.as_ref()),
        condition,
        description,
    })
}

fn convert_response(
    forecast: OwmForecastResponse,
    current: OwmCurrentResponse,
    fetched_at: NaiveDateTime,
) -> Result<WeatherSnapshot> {
    let offset = forecast.city.timezone;
    let periods = forecast
        .list
        .iter()
        .map(|item| convert_forecast_item(item, offset))
        .collect::<Result<Vec<_>>>()?;

    Ok(WeatherSnapshot {
        fetched_at,
        location: ForecastLocation {
            city: forecast.city.name,
            country: forecast.city.country,
            latitude: forecast.city.coord.lat,
            longitude: forecast.city.coord.lon,
        },
        current: convert_current(&current)?,
        periods,
        simulated: false,
    })
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, config })
    }

    /// Current conditions and the 5-day/3-hour forecast, fetched together
    pub async fn fetch_snapshot(&self, city: &str, fetched_at: NaiveDateTime) -> Result<WeatherSnapshot> {
        let (forecast, current) = tokio::try_join!(
            self.get_json::<OwmForecastResponse>("forecast", city),
            self.get_json::<OwmCurrentResponse>("weather", city),
        )?;
        info!(
            "OpenWeatherMap returned {} forecast periods for {}",
            forecast.list.len(),
            city
        );
        convert_response(forecast, current, fetched_at)
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self, city: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint("weather", city)?)
            .send()
            .await
            .map_err(|e| SkywiseError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn endpoint(&self, path: &str, city: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/{}", API_BASE_URL, path),
            &[("q", city), ("units", "metric"), ("appid", self.config.api_key.as_str())],
        )
        .map_err(|e| SkywiseError::Config(format!("Bad OpenWeatherMap URL: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, city: &str) -> Result<T> {
        let response = self
            .client
            .get(self.endpoint(path, city)?)
            .send()
            .await
            .map_err(|e| SkywiseError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkywiseError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            SkywiseError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FORECAST: &str = r#"{
        "list": [
            {"dt": 1719835200, "main": {"temp": 18.5, "humidity": 70},
             "weather": [{"id": 501, "description": "moderate rain"}],
             "clouds": {"all": 90}, "wind": {"speed": 4.2}, "pop": 0.8,
             "rain": {"3h": 2.5}, "snow": {"3h": 0.5}},
            {"dt": 1719846000, "main": {"temp": 21.0, "humidity": 55},
             "weather": [{"id": 800, "description": "clear sky"}],
             "clouds": {"all": 0}, "wind": {"speed": 2.0}}
        ],
        "city": {"name": "Paris", "country": "FR", "coord": {"lat": 48.85, "lon": 2.35}, "timezone": 7200}
    }"#;

    const CURRENT: &str = r#"{
        "dt": 1719835000, "timezone": 7200,
        "main": {"temp": 17.9, "humidity": 72},
        "weather": [{"id": 741, "description": "fog"}],
        "wind": {"speed": 1.5}
    }"#;

    fn fetched_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    #[test]
    fn converts_to_local_periods() {
        let forecast: OwmForecastResponse = serde_json::from_str(FORECAST).unwrap();
        let current: OwmCurrentResponse = serde_json::from_str(CURRENT).unwrap();
        let snap = convert_response(forecast, current, fetched_at()).unwrap();

        assert_eq!(snap.location.city, "Paris");
        assert!(!snap.simulated);
        assert_eq!(snap.periods.len(), 2);

        let first = &snap.periods[0];
        // 12:00 UTC is 14:00 in Paris
        assert_eq!(first.timestamp, fetched_at());
        assert_eq!(first.condition, Some(WeatherCondition::Rain));
        assert_eq!(first.precipitation_mm, Some(3.0));
        assert_eq!(first.description.as_deref(), Some("moderate rain"));

        let second = &snap.periods[1];
        assert_eq!(second.precipitation_mm, None);
        assert_eq!(second.precipitation_probability, None);
        assert_eq!(second.condition, Some(WeatherCondition::Clear));

        assert_eq!(snap.current.condition, Some(WeatherCondition::Fog));
        assert_eq!(snap.current.cloud_cover, None);
    }

    #[test]
    fn endpoint_encodes_city() {
        let client = OpenWeatherMapClient::new(OpenWeatherMapConfig::new("test_key".into())).unwrap();
        let url = client.endpoint("forecast", "New York").unwrap();
        assert_eq!(url.path(), "/data/2.5/forecast");
        let query = url.query().unwrap();
        assert!(query.contains("q=New+York"));
        assert!(query.contains("units=metric"));
        assert!(query.contains("appid=test_key"));
    }
}
