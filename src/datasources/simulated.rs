//! Offline weather for when no provider key is configured or the provider
//! fails. Output is a pure function of the city name and the date.

use crate::advisories::Season;
use crate::error::Result;
use crate::logic::calculations::round_to;
use crate::logic::random::{RandomSource, RngSource};
use crate::models::{
    ClimateNormals, ForecastLocation, Hemisphere, RawForecastPeriod, WeatherCondition,
    WeatherSnapshot,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

const PERIOD_COUNT: i64 = 40;
const PERIOD_HOURS: i64 = 3;
const NORTHERN_SHARE: f64 = 0.7;

const NORTHERN_NORMALS: [f64; 12] = [5.0, 7.0, 12.0, 17.0, 22.0, 25.0, 27.0, 26.0, 22.0, 16.0, 10.0, 6.0];
const SOUTHERN_NORMALS: [f64; 12] = [25.0, 26.0, 22.0, 16.0, 10.0, 6.0, 5.0, 7.0, 12.0, 17.0, 22.0, 25.0];

/// (name, latitude, longitude, country)
const KNOWN_CITIES: &[(&str, f64, f64, &str)] = &[
    ("new york", 40.7128, -74.006, "US"),
    ("london", 51.5074, -0.1278, "GB"),
    ("tokyo", 35.6895, 139.6917, "JP"),
    ("beijing", 39.9042, 116.4074, "CN"),
    ("mumbai", 19.0760, 72.8777, "IN"),
    ("sydney", -33.8688, 151.2093, "AU"),
    ("paris", 48.8566, 2.3522, "FR"),
    ("berlin", 52.5200, 13.4050, "DE"),
];

/// (OWM condition id, description, weight)
type WeightedCondition = (u32, &'static str, i32);

fn seasonal_conditions(season: Season) -> &'static [WeightedCondition] {
    match season {
        Season::Winter => &[
            (800, "clear sky", 2),
            (801, "few clouds", 2),
            (802, "scattered clouds", 3),
            (600, "light snow", 4),
            (601, "snow", 3),
            (741, "fog", 3),
        ],
        Season::Spring => &[
            (800, "clear sky", 3),
            (801, "few clouds", 4),
            (500, "light rain", 4),
            (501, "moderate rain", 2),
            (721, "haze", 2),
        ],
        Season::Summer => &[
            (800, "clear sky", 5),
            (801, "few clouds", 3),
            (500, "light rain", 2),
            (502, "heavy intensity rain", 1),
            (211, "thunderstorm", 1),
        ],
        Season::Fall => &[
            (800, "clear sky", 3),
            (801, "few clouds", 3),
            (802, "scattered clouds", 4),
            (500, "light rain", 3),
            (501, "moderate rain", 2),
            (741, "fog", 2),
        ],
    }
}

fn pick_weighted(choices: &'static [WeightedCondition], rng: &mut dyn RandomSource) -> WeightedCondition {
    let total: i32 = choices.iter().map(|c| c.2).sum();
    let mut ticket = rng.integer(1, total.max(1));
    for choice in choices {
        if ticket <= choice.2 {
            return *choice;
        }
        ticket -= choice.2;
    }
    choices[0]
}

fn city_seed(city: &str) -> u64 {
    city.to_lowercase().chars().map(|c| c as u64).sum()
}

fn day_seed(city: &str, date: NaiveDate) -> u64 {
    city_seed(city)
        .wrapping_mul(1_000_003)
        .wrapping_add(date.num_days_from_ce() as u64)
}

/// Weather that holds for a whole simulated day
struct DayBase {
    condition: WeatherCondition,
    description: &'static str,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    cloud_cover: f64,
}

impl DayBase {
    fn draw(season: Season, rng: &mut dyn RandomSource) -> Self {
        let (id, description, _) = pick_weighted(seasonal_conditions(season), rng);
        let condition = WeatherCondition::from_owm_id(id);

        let temperature = match season {
            Season::Winter => rng.uniform(-5.0, 10.0),
            Season::Spring => rng.uniform(10.0, 25.0),
            Season::Summer => rng.uniform(20.0, 35.0),
            Season::Fall => rng.uniform(5.0, 20.0),
        };

        let (humidity, wind_speed, cloud_cover) = match condition {
            WeatherCondition::Rain | WeatherCondition::Thunderstorm => {
                (rng.integer(70, 95), rng.uniform(3.0, 8.0), rng.integer(70, 100))
            }
            WeatherCondition::Snow => (rng.integer(80, 95), rng.uniform(2.0, 5.0), rng.integer(70, 100)),
            WeatherCondition::Fog => (rng.integer(85, 100), rng.uniform(0.0, 3.0), rng.integer(80, 100)),
            WeatherCondition::Clear => (rng.integer(40, 70), rng.uniform(2.0, 6.0), rng.integer(0, 10)),
            _ => (rng.integer(40, 70), rng.uniform(2.0, 6.0), rng.integer(20, 90)),
        };

        Self {
            condition,
            description,
            temperature: round_to(temperature, 1),
            humidity: f64::from(humidity),
            wind_speed: round_to(wind_speed, 1),
            cloud_cover: f64::from(cloud_cover),
        }
    }

    fn sample(&self, at: NaiveDateTime, rng: &mut dyn RandomSource) -> RawForecastPeriod {
        let hour = at.hour();
        let temperature = match hour {
            12..=15 => self.temperature + rng.uniform(1.0, 3.0),
            0..=5 => self.temperature - rng.uniform(2.0, 5.0),
            _ => self.temperature + rng.uniform(-1.0, 1.0),
        };

        let wet = self.condition.has_precipitation();
        let precipitation_probability = if wet {
            rng.uniform(0.5, 1.0)
        } else {
            rng.uniform(0.0, 0.3)
        };

        RawForecastPeriod {
            timestamp: at,
            temperature: Some(round_to(temperature, 1)),
            humidity: Some(self.humidity),
            wind_speed: Some(self.wind_speed),
            cloud_cover: Some(self.cloud_cover),
            precipitation_probability: Some(round_to(precipitation_probability, 2)),
            precipitation_mm: wet.then(|| round_to(rng.uniform(0.5, 6.0), 1)),
            condition: Some(self.condition),
            description: Some(self.description.to_string()),
        }
    }
}

pub struct WeatherSimulator;

impl WeatherSimulator {
    pub fn location(city: &str) -> ForecastLocation {
        let lower = city.to_lowercase();
        if let Some(&(_, latitude, longitude, country)) =
            KNOWN_CITIES.iter().find(|(name, ..)| lower.contains(name))
        {
            return ForecastLocation {
                city: city.to_string(),
                country: country.into(),
                latitude,
                longitude,
            };
        }

        let mut rng = RngSource::seeded(city_seed(city));
        ForecastLocation {
            city: city.to_string(),
            country: "XX".into(),
            latitude: round_to(rng.uniform(-60.0, 70.0), 4),
            longitude: round_to(rng.uniform(-180.0, 180.0), 4),
        }
    }

    /// Forty 3-hour periods starting at the 3-hour slot containing `now`
    pub fn snapshot(city: &str, now: NaiveDateTime) -> WeatherSnapshot {
        let location = Self::location(city);
        let hemisphere = if location.latitude < 0.0 {
            Hemisphere::Southern
        } else {
            Hemisphere::Northern
        };

        let slot_hour = now.hour() - now.hour() % PERIOD_HOURS as u32;
        let start = now.date().and_hms_opt(slot_hour, 0, 0).unwrap_or(now);

        let mut periods = Vec::with_capacity(PERIOD_COUNT as usize);
        let mut current = None;
        let mut day: Option<(NaiveDate, RngSource<rand::rngs::StdRng>, DayBase)> = None;

        for i in 0..PERIOD_COUNT {
            let at = start + Duration::hours(PERIOD_HOURS * i);
            if day.as_ref().map(|(date, ..)| *date) != Some(at.date()) {
                let mut rng = RngSource::seeded(day_seed(city, at.date()));
                let base = DayBase::draw(Season::for_month(at.month(), hemisphere), &mut rng);
                day = Some((at.date(), rng, base));
            }
            if let Some((_, rng, base)) = day.as_mut() {
                if current.is_none() {
                    let mut observation = base.sample(now, &mut *rng);
                    observation.precipitation_probability = None;
                    current = Some(observation);
                }
                periods.push(base.sample(at, &mut *rng));
            }
        }

        WeatherSnapshot {
            fetched_at: now,
            location,
            current: current.unwrap_or_else(|| RawForecastPeriod {
                timestamp: now,
                ..Default::default()
            }),
            periods,
            simulated: true,
        }
    }

    /// Twelve monthly mean temperatures; most cities get a northern pattern
    pub fn climate_normals(city: &str) -> Result<ClimateNormals> {
        let mut rng = RngSource::seeded(city_seed(city));
        let base = if rng.uniform(0.0, 1.0) < NORTHERN_SHARE {
            NORTHERN_NORMALS
        } else {
            SOUTHERN_NORMALS
        };
        let temps = base
            .iter()
            .map(|t| round_to(t + rng.uniform(-3.0, 3.0), 1))
            .collect();
        ClimateNormals::new(temps)
    }
}
