use super::{or_fallback, Advisor, Advisory};
use crate::error::{Result, SkywiseError};
use crate::logic::calculations::{commute_delay, road_delay, round_to, CommuteSeverity};
use crate::models::{AlertType, CommuteMode, RawForecastPeriod, WeatherCondition, WeatherSnapshot};
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

const MIN_TRAVEL_DAYS: usize = 1;
const MAX_TRAVEL_DAYS: usize = 14;
const OPTIMIZED_REDUCTION: f64 = 0.5;
const QUIET_DAY_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, Serialize)]
pub struct CommuteHour {
    pub time: String,
    pub condition: WeatherCondition,
    pub description: String,
    pub temperature: f64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommuteReport {
    pub summary: String,
    pub normal_duration: u32,
    pub delay_minutes: u32,
    pub total_duration: u32,
    pub severity: CommuteSeverity,
    pub alert_type: AlertType,
    pub recommendations: Vec<&'static str>,
    pub hourly_forecast: Vec<CommuteHour>,
    pub weather_impacts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteImpact {
    pub delay_minutes: u32,
    pub total_duration: u32,
    pub weather_impact: String,
    pub severity: CommuteSeverity,
    pub alert_type: AlertType,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteOption {
    pub name: &'static str,
    pub description: &'static str,
    pub distance_km: f64,
    pub duration: u32,
    #[serde(flatten)]
    pub impact: RouteImpact,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteOptions {
    pub from: String,
    pub to: String,
    pub departure_time: String,
    pub routes: Vec<RouteOption>,
    pub recommended_route: &'static str,
    pub weather_condition: String,
    pub weather_description: String,
}

/// Candidate route shapes; distances and base durations are drawn per request
struct RouteTemplate {
    name: &'static str,
    description: &'static str,
    distance_km: (f64, f64),
    minutes: (i32, i32),
    weather_optimized: bool,
}

const ROUTE_TEMPLATES: [RouteTemplate; 3] = [
    RouteTemplate {
        name: "Main Route",
        description: "Standard route",
        distance_km: (8.0, 12.0),
        minutes: (25, 35),
        weather_optimized: false,
    },
    RouteTemplate {
        name: "Alternate Route",
        description: "Alternative road network",
        distance_km: (9.0, 14.0),
        minutes: (28, 38),
        weather_optimized: false,
    },
    RouteTemplate {
        name: "Weather-optimized Route",
        description: "Route adjusted for current weather conditions",
        distance_km: (10.0, 15.0),
        minutes: (30, 40),
        weather_optimized: true,
    },
];

/// A saved trip the multi-day travel forecast is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub name: String,
    pub from: String,
    pub to: String,
    pub duration: u32,
    #[serde(default)]
    pub mode: CommuteMode,
}

impl PlannedRoute {
    pub fn new(name: &str, from: &str, to: &str, duration: u32, mode: CommuteMode) -> Self {
        Self {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            duration,
            mode,
        }
    }

    /// The daily round trip used when no routes are configured
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Home to Work", "Home", "Work", 30, CommuteMode::Drive),
            Self::new("Work to Home", "Work", "Home", 35, CommuteMode::Drive),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub const ALL: [DayPart; 3] = [DayPart::Morning, DayPart::Afternoon, DayPart::Evening];

    pub fn hours(&self) -> RangeInclusive<u32> {
        match self {
            DayPart::Morning => 6..=10,
            DayPart::Afternoon => 11..=16,
            DayPart::Evening => 17..=22,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteDelay {
    pub route_name: String,
    pub normal_duration: u32,
    #[serde(flatten)]
    pub impact: RouteImpact,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeOfDayImpact {
    pub time_of_day: DayPart,
    pub route_impacts: Vec<RouteDelay>,
    pub avg_delay_factor: f64,
    pub severity: CommuteSeverity,
    pub alert_type: AlertType,
    pub weather_condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub morning: TimeOfDayImpact,
    pub afternoon: TimeOfDayImpact,
    pub evening: TimeOfDayImpact,
    pub avg_impact: f64,
    pub severity: CommuteSeverity,
    pub alert_type: AlertType,
    pub summary: String,
    pub weather_condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelForecast {
    pub city: String,
    pub forecast_days: Vec<TravelDay>,
    pub routes: Vec<PlannedRoute>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelForecastFallback {
    pub city: String,
    pub forecast_days: Vec<TravelDay>,
    pub routes: Vec<PlannedRoute>,
    pub error: String,
}

/// Weather delay on a single route, scaled by `scale` (route shaping or travel mode)
pub fn route_impact(period: &RawForecastPeriod, base_minutes: u32, scale: f64) -> RouteImpact {
    let (factor, weather_impact) = road_delay(period);
    let factor = factor * scale;
    let delay_minutes = (base_minutes as f64 * factor).round() as u32;
    let severity = CommuteSeverity::from_factor(factor);
    RouteImpact {
        delay_minutes,
        total_duration: base_minutes + delay_minutes,
        weather_impact,
        severity,
        alert_type: severity.alert_type(),
    }
}

/// Impact of one part of the day on every planned route. Uses the periods in
/// the part's hours, or any period of the day when none fall inside them.
fn time_of_day_impact(part: DayPart, day: &[RawForecastPeriod], routes: &[PlannedRoute]) -> TimeOfDayImpact {
    let hours = part.hours();
    let sample = day
        .iter()
        .find(|p| hours.contains(&p.timestamp.hour()))
        .or_else(|| day.first());

    let route_impacts: Vec<RouteDelay> = match sample {
        Some(period) => routes
            .iter()
            .map(|r| RouteDelay {
                route_name: r.name.clone(),
                normal_duration: r.duration,
                impact: route_impact(period, r.duration, r.mode.delay_multiplier()),
            })
            .collect(),
        None => Vec::new(),
    };

    let factors: Vec<f64> = route_impacts
        .iter()
        .filter(|r| r.normal_duration > 0)
        .map(|r| r.impact.delay_minutes as f64 / r.normal_duration as f64)
        .collect();
    let avg_delay_factor = if factors.is_empty() {
        0.0
    } else {
        factors.iter().sum::<f64>() / factors.len() as f64
    };
    let severity = CommuteSeverity::from_factor(avg_delay_factor);

    TimeOfDayImpact {
        time_of_day: part,
        route_impacts,
        avg_delay_factor: round_to(avg_delay_factor, 2),
        severity,
        alert_type: severity.alert_type(),
        weather_condition: sample.map_or(WeatherCondition::Other, |p| p.condition_or_default()),
    }
}

fn travel_day(date: NaiveDate, day: &[RawForecastPeriod], routes: &[PlannedRoute]) -> TravelDay {
    let [morning, afternoon, evening] = DayPart::ALL.map(|part| time_of_day_impact(part, day, routes));
    let (m, a, e) = (
        morning.avg_delay_factor,
        afternoon.avg_delay_factor,
        evening.avg_delay_factor,
    );
    let avg_impact = (m + a + e) / 3.0;
    let severity = CommuteSeverity::from_factor(avg_impact);

    let summary = if avg_impact < QUIET_DAY_FACTOR {
        "Good travel conditions expected throughout the day.".to_string()
    } else if a > m && a > e {
        format!(
            "{} may impact afternoon travel. Morning commute should be better.",
            afternoon.weather_condition
        )
    } else if e > m && e > a {
        format!(
            "{} may impact evening commute. Morning travel should be better.",
            evening.weather_condition
        )
    } else {
        format!(
            "{} may impact morning commute. Afternoon and evening travel should be better.",
            morning.weather_condition
        )
    };

    TravelDay {
        date,
        day_name: date.format("%A").to_string(),
        weather_condition: day.first().map_or(WeatherCondition::Other, |p| p.condition_or_default()),
        morning,
        afternoon,
        evening,
        avg_impact: round_to(avg_impact, 2),
        severity,
        alert_type: severity.alert_type(),
        summary,
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| SkywiseError::InvalidData(format!("bad commute time '{}': {}", value, e)))
}

/// How disruptive a condition is when picking the worst weather of a commute
fn condition_severity(condition: WeatherCondition) -> u8 {
    match condition {
        WeatherCondition::Thunderstorm => 5,
        WeatherCondition::Snow => 4,
        WeatherCondition::Rain => 3,
        WeatherCondition::Drizzle | WeatherCondition::Fog | WeatherCondition::Mist => 2,
        WeatherCondition::Haze => 1,
        _ => 0,
    }
}

pub fn travel_recommendations(
    mode: CommuteMode,
    delay_factor: f64,
    periods: &[RawForecastPeriod],
) -> Vec<&'static str> {
    let mut recs = Vec::new();

    let mut worst = WeatherCondition::Clear;
    let mut max_wind = 0.0_f64;
    let mut min_temp = f64::INFINITY;
    let mut max_temp = f64::NEG_INFINITY;
    for p in periods {
        let condition = p.condition_or_default();
        if condition_severity(condition) > condition_severity(worst) {
            worst = condition;
        }
        max_wind = max_wind.max(p.wind_speed.unwrap_or(0.0));
        let temp = p.temperature.unwrap_or(20.0);
        min_temp = min_temp.min(temp);
        max_temp = max_temp.max(temp);
    }

    if delay_factor >= 0.3 {
        recs.push("Plan for significant delays and leave earlier than usual");
    } else if delay_factor >= 0.15 {
        recs.push("Allow extra time for your commute");
    }

    match (worst, mode) {
        (WeatherCondition::Thunderstorm, _) => {
            recs.push("Be cautious of flash flooding and reduced visibility");
            if mode == CommuteMode::Drive {
                recs.push("Drive slowly and maintain a safe following distance");
            } else if mode.is_exposed() {
                recs.push("Consider alternative transportation modes during thunderstorms");
            }
        }
        (WeatherCondition::Snow, CommuteMode::Drive) => {
            recs.push("Ensure your vehicle is properly equipped for snow conditions");
            recs.push("Drive slowly and avoid sudden maneuvers");
        }
        (WeatherCondition::Snow, CommuteMode::Bike) => {
            recs.push("Consider public transit instead of biking in snow")
        }
        (WeatherCondition::Snow, CommuteMode::Walk) => {
            recs.push("Wear appropriate footwear with good traction")
        }
        (WeatherCondition::Rain | WeatherCondition::Drizzle, CommuteMode::Drive) => {
            recs.push("Use headlights and reduce speed in rainy conditions")
        }
        (WeatherCondition::Rain | WeatherCondition::Drizzle, CommuteMode::Bike) => {
            recs.push("Wear waterproof clothing and use fenders on your bike")
        }
        (WeatherCondition::Rain | WeatherCondition::Drizzle, CommuteMode::Walk) => {
            recs.push("Bring an umbrella and wear waterproof footwear")
        }
        (WeatherCondition::Fog | WeatherCondition::Mist, CommuteMode::Drive) => {
            recs.push("Use low-beam headlights and drive slowly in foggy conditions")
        }
        (WeatherCondition::Fog | WeatherCondition::Mist, m) if m.is_exposed() => {
            recs.push("Wear bright or reflective clothing to increase visibility")
        }
        _ => {}
    }

    if max_wind > 20.0 {
        match mode {
            CommuteMode::Drive => recs.push("Be cautious of strong crosswinds, especially on bridges"),
            CommuteMode::Bike => {
                recs.push("Be prepared for difficult cycling conditions due to strong winds")
            }
            _ => {}
        }
    }

    if min_temp < 0.0 {
        if mode == CommuteMode::Drive {
            recs.push("Watch for icy patches, especially on bridges and overpasses");
        } else if mode.is_exposed() {
            recs.push("Dress in warm layers and protect exposed skin in cold temperatures");
        }
    } else if max_temp > 35.0 && mode.is_exposed() {
        recs.push("Stay hydrated and take breaks in shade during hot weather travel");
    }

    match mode {
        CommuteMode::Transit => {
            recs.push("Check transit alerts for weather-related delays or service changes")
        }
        CommuteMode::Bike => recs.push("Check bike paths for weather-related closures or hazards"),
        CommuteMode::Walk => {
            recs.push("Use walking paths that are well-maintained during adverse weather")
        }
        CommuteMode::Drive => {}
    }

    if recs.is_empty() {
        recs.push("Travel conditions look favorable for your commute");
    }
    recs
}

impl Advisor<'_> {
    /// Weather delay for a commute window given as "HH:MM" clock times
    pub fn commute(
        &mut self,
        weather: &WeatherSnapshot,
        start: &str,
        end: &str,
        mode: CommuteMode,
        normal_minutes: u32,
    ) -> Advisory<CommuteReport, CommuteReport> {
        let result = self.try_commute(weather, start, end, mode, normal_minutes);
        or_fallback("commute impact", result, |_| CommuteReport {
            summary: format!(
                "Unable to determine accurate travel time for your commute ({}–{}).",
                start, end
            ),
            normal_duration: normal_minutes,
            delay_minutes: 5,
            total_duration: normal_minutes + 5,
            severity: CommuteSeverity::Unknown,
            alert_type: AlertType::Info,
            recommendations: vec![
                "Check local weather conditions before departing",
                "Allow extra time for your commute",
            ],
            hourly_forecast: Vec::new(),
            weather_impacts: Vec::new(),
        })
    }

    /// Three candidate routes for a departure given as "HH:MM", with the fastest recommended
    pub fn route_options(
        &mut self,
        weather: &WeatherSnapshot,
        from: &str,
        to: &str,
        departure: &str,
    ) -> Advisory<RouteOptions, RouteOptions> {
        let result = self.try_route_options(weather, from, to, departure);
        or_fallback("route options", result, |_| RouteOptions {
            from: from.to_string(),
            to: to.to_string(),
            departure_time: departure.to_string(),
            routes: vec![RouteOption {
                name: "Default Route",
                description: "Standard route",
                distance_km: 10.0,
                duration: 30,
                impact: RouteImpact {
                    delay_minutes: 5,
                    total_duration: 35,
                    weather_impact: "Some delays possible due to weather".into(),
                    severity: CommuteSeverity::Minor,
                    alert_type: AlertType::Info,
                },
            }],
            recommended_route: "Default Route",
            weather_condition: "Unknown".into(),
            weather_description: "Check local forecasts for details".into(),
        })
    }

    fn try_route_options(
        &mut self,
        weather: &WeatherSnapshot,
        from: &str,
        to: &str,
        departure: &str,
    ) -> Result<RouteOptions> {
        let hour = parse_clock(departure)?.hour();
        let period = weather
            .periods
            .iter()
            .find(|p| p.timestamp.hour() == hour)
            .cloned()
            .unwrap_or_else(|| weather.current.observed_at(self.now()));
        let condition = period.condition_or_default();
        let slowed = matches!(
            condition,
            WeatherCondition::Rain | WeatherCondition::Snow | WeatherCondition::Thunderstorm
        );

        let rng = self.rng();
        let routes: Vec<RouteOption> = ROUTE_TEMPLATES
            .iter()
            .map(|t| {
                let distance_km = round_to(rng.uniform(t.distance_km.0, t.distance_km.1), 1);
                let duration = rng.integer(t.minutes.0, t.minutes.1).max(0) as u32;
                let scale = if t.weather_optimized && slowed {
                    OPTIMIZED_REDUCTION
                } else {
                    1.0
                };
                RouteOption {
                    name: t.name,
                    description: t.description,
                    distance_km,
                    duration,
                    impact: route_impact(&period, duration, scale),
                }
            })
            .collect();

        let recommended_route = routes
            .iter()
            .min_by_key(|r| r.impact.total_duration)
            .map_or(ROUTE_TEMPLATES[0].name, |r| r.name);

        Ok(RouteOptions {
            from: from.to_string(),
            to: to.to_string(),
            departure_time: departure.to_string(),
            routes,
            recommended_route,
            weather_condition: condition.to_string(),
            weather_description: period.description.unwrap_or_default(),
        })
    }

    /// Morning, afternoon and evening delays on each planned route for the next `days` days
    pub fn travel_forecast(
        &mut self,
        weather: &WeatherSnapshot,
        routes: &[PlannedRoute],
        days: usize,
    ) -> Advisory<TravelForecast, TravelForecastFallback> {
        let city = weather.location.city.clone();
        let result = self.try_travel_forecast(weather, routes, days);
        or_fallback("travel forecast", result, |error| TravelForecastFallback {
            city,
            forecast_days: Vec::new(),
            routes: routes.to_vec(),
            error,
        })
    }

    fn try_travel_forecast(
        &self,
        weather: &WeatherSnapshot,
        routes: &[PlannedRoute],
        days: usize,
    ) -> Result<TravelForecast> {
        if routes.is_empty() {
            return Err(SkywiseError::InvalidData("no routes to forecast".into()));
        }

        let today = self.today();
        let days = days.clamp(MIN_TRAVEL_DAYS, MAX_TRAVEL_DAYS);
        let forecast_days = (0..days as i64)
            .map(|offset| {
                let date = today + Duration::days(offset);
                let mut day: Vec<RawForecastPeriod> = weather
                    .periods
                    .iter()
                    .filter(|p| p.timestamp.date() == date)
                    .cloned()
                    .collect();
                if day.is_empty() {
                    let at = if offset == 0 {
                        self.now()
                    } else {
                        date.and_time(self.now().time())
                    };
                    day.push(weather.current.observed_at(at));
                }
                travel_day(date, &day, routes)
            })
            .collect();

        Ok(TravelForecast {
            city: weather.location.city.clone(),
            forecast_days,
            routes: routes.to_vec(),
        })
    }

    fn try_commute(
        &self,
        weather: &WeatherSnapshot,
        start: &str,
        end: &str,
        mode: CommuteMode,
        normal_minutes: u32,
    ) -> Result<CommuteReport> {
        let start_hour = parse_clock(start)?.hour();
        let end_hour = parse_clock(end)?.hour();

        let mut periods: Vec<RawForecastPeriod> = weather
            .periods
            .iter()
            .filter(|p| (start_hour..=end_hour).contains(&p.timestamp.hour()))
            .cloned()
            .collect();
        if periods.is_empty() {
            periods.push(weather.current.observed_at(self.now()));
        }

        let (factors, impacts): (Vec<f64>, Vec<String>) =
            periods.iter().map(|p| commute_delay(p, mode)).unzip();
        let avg_factor = factors.iter().sum::<f64>() / factors.len() as f64;

        let delay_minutes = (normal_minutes as f64 * avg_factor).round() as u32;
        let severity = CommuteSeverity::from_factor(avg_factor);

        let summary = if delay_minutes == 0 {
            format!(
                "Good news! No weather-related delays expected for your {} commute ({}–{}).",
                mode, start, end
            )
        } else {
            format!(
                "{} expected on your {} commute ({}–{}). Allow {} extra minutes.",
                periods[0].condition_or_default(),
                mode,
                start,
                end,
                delay_minutes
            )
        };

        let hourly_forecast = periods
            .iter()
            .map(|p| CommuteHour {
                time: p.timestamp.format("%H:%M").to_string(),
                condition: p.condition_or_default(),
                description: p.description.clone().unwrap_or_default(),
                temperature: p.temperature.unwrap_or(0.0),
                wind_speed: p.wind_speed.unwrap_or(0.0),
            })
            .collect();

        Ok(CommuteReport {
            summary,
            normal_duration: normal_minutes,
            delay_minutes,
            total_duration: normal_minutes + delay_minutes,
            severity,
            alert_type: severity.alert_type(),
            recommendations: travel_recommendations(mode, avg_factor, &periods),
            hourly_forecast,
            weather_impacts: impacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{advisor, mild_snapshot, noon};
    use super::*;

    #[test]
    fn cloudy_drive_is_quiet() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now)
            .commute(&snap, "07:00", "09:00", CommuteMode::Drive, 30)
            .ready()
            .unwrap();
        // only the 09:00 period of each day is inside the window
        assert_eq!(report.hourly_forecast.len(), 5);
        assert_eq!(report.hourly_forecast[0].time, "09:00");
        // cloudy gives 0.05, 30 min * 0.05 = 1.5 -> 2
        assert_eq!(report.delay_minutes, 2);
        assert_eq!(report.severity, CommuteSeverity::Minimal);
        assert_eq!(
            report.summary,
            "Clouds expected on your drive commute (07:00–09:00). Allow 2 extra minutes."
        );
        assert_eq!(
            report.recommendations,
            vec!["Travel conditions look favorable for your commute"]
        );
    }

    #[test]
    fn rainy_bike_ride() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        for p in &mut snap.periods {
            p.condition = Some(WeatherCondition::Rain);
            p.wind_speed = Some(12.0);
        }
        let report = advisor(now)
            .commute(&snap, "17:00", "18:00", CommuteMode::Bike, 40)
            .ready()
            .unwrap();
        // (0.2 + 0.05) * 1.5 + 0.2 = 0.575
        assert_eq!(report.delay_minutes, 23);
        assert_eq!(report.severity, CommuteSeverity::Severe);
        assert_eq!(report.alert_type, AlertType::Danger);
        assert!(report.weather_impacts[0].ends_with(", headwinds will slow cycling"));
        assert_eq!(
            report.recommendations,
            vec![
                "Plan for significant delays and leave earlier than usual",
                "Wear waterproof clothing and use fenders on your bike",
                "Check bike paths for weather-related closures or hazards",
            ]
        );
    }

    #[test]
    fn empty_window_uses_current_observation() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        snap.periods.clear();
        let report = advisor(now)
            .commute(&snap, "08:00", "08:30", CommuteMode::Transit, 40)
            .ready()
            .unwrap();
        assert_eq!(report.hourly_forecast.len(), 1);
        assert_eq!(report.hourly_forecast[0].time, "12:00");
    }

    #[test]
    fn bad_clock_time_falls_back() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now)
            .commute(&snap, "8am", "09:00", CommuteMode::Walk, 25)
            .into_inner();
        assert_eq!(report.severity, CommuteSeverity::Unknown);
        assert_eq!(report.total_duration, 30);
        assert!(report.summary.contains("(8am–09:00)"));
    }

    #[test]
    fn cloudy_departure_prefers_main_route() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let options = advisor(now)
            .route_options(&snap, "Home", "Office", "09:00")
            .ready()
            .unwrap();
        let minutes: Vec<(u32, u32)> = options
            .routes
            .iter()
            .map(|r| (r.duration, r.impact.total_duration))
            .collect();
        assert_eq!(minutes, vec![(25, 26), (28, 29), (30, 32)]);
        assert_eq!(options.routes[0].distance_km, 10.0);
        assert_eq!(options.recommended_route, "Main Route");
        assert_eq!(options.weather_condition, "Clouds");
    }

    #[test]
    fn storms_favor_weather_optimized_route() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        for p in &mut snap.periods {
            p.condition = Some(WeatherCondition::Thunderstorm);
            p.wind_speed = Some(25.0);
        }
        let options = advisor(now)
            .route_options(&snap, "Home", "Office", "09:00")
            .ready()
            .unwrap();
        // 0.65 on the regular routes, halved on the optimized one
        let totals: Vec<u32> = options.routes.iter().map(|r| r.impact.total_duration).collect();
        assert_eq!(totals, vec![41, 46, 40]);
        assert_eq!(options.recommended_route, "Weather-optimized Route");
        assert_eq!(options.routes[2].impact.severity, CommuteSeverity::Severe);
    }

    #[test]
    fn bad_departure_gives_default_route() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let options = advisor(now)
            .route_options(&snap, "Home", "Office", "soon")
            .degraded()
            .unwrap();
        assert_eq!(options.routes.len(), 1);
        assert_eq!(options.recommended_route, "Default Route");
        assert_eq!(options.routes[0].impact.total_duration, 35);
        assert_eq!(options.weather_condition, "Unknown");
    }

    #[test]
    fn mild_week_is_good_for_travel() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let forecast = advisor(now)
            .travel_forecast(&snap, &PlannedRoute::defaults(), 3)
            .ready()
            .unwrap();
        assert_eq!(forecast.routes.len(), 2);
        assert_eq!(forecast.forecast_days.len(), 3);
        let day = &forecast.forecast_days[0];
        assert_eq!(day.date, now.date());
        assert_eq!(day.day_name, "Monday");
        // 30 min and 35 min both pick up 2 minutes of cloud delay
        assert_eq!(day.morning.route_impacts[0].impact.delay_minutes, 2);
        assert_eq!(day.morning.avg_delay_factor, 0.06);
        assert_eq!(day.severity, CommuteSeverity::Minimal);
        assert_eq!(day.summary, "Good travel conditions expected throughout the day.");
    }

    #[test]
    fn stormy_evening_leads_the_summary() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        for p in snap
            .periods
            .iter_mut()
            .filter(|p| p.timestamp.date() == now.date() && p.timestamp.hour() >= 17)
        {
            p.condition = Some(WeatherCondition::Thunderstorm);
            p.wind_speed = Some(25.0);
        }
        let routes = [PlannedRoute::new("Bridge", "North", "South", 40, CommuteMode::Drive)];
        let forecast = advisor(now).travel_forecast(&snap, &routes, 2).ready().unwrap();

        let today = &forecast.forecast_days[0];
        assert_eq!(today.morning.avg_delay_factor, 0.05);
        assert_eq!(today.evening.avg_delay_factor, 0.65);
        assert_eq!(today.evening.severity, CommuteSeverity::Severe);
        assert_eq!(today.avg_impact, 0.25);
        assert_eq!(today.severity, CommuteSeverity::Moderate);
        assert_eq!(
            today.summary,
            "Thunderstorm may impact evening commute. Morning travel should be better."
        );
        assert_eq!(forecast.forecast_days[1].severity, CommuteSeverity::Minimal);
    }

    #[test]
    fn days_without_periods_use_current_observation() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        snap.periods.clear();
        let routes = [PlannedRoute::new("Bridge", "North", "South", 40, CommuteMode::Drive)];
        let forecast = advisor(now).travel_forecast(&snap, &routes, 2).ready().unwrap();
        assert_eq!(forecast.forecast_days.len(), 2);
        assert_eq!(forecast.forecast_days[1].date, now.date() + Duration::days(1));
        assert_eq!(forecast.forecast_days[1].weather_condition, WeatherCondition::Clouds);
        assert_eq!(forecast.forecast_days[1].afternoon.avg_delay_factor, 0.05);
    }

    #[test]
    fn no_routes_falls_back() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let fallback = advisor(now).travel_forecast(&snap, &[], 5).degraded().unwrap();
        assert_eq!(fallback.city, "Testville");
        assert!(fallback.forecast_days.is_empty());
        assert!(fallback.error.contains("no routes"));
    }

    #[test]
    fn freezing_snow_walk() {
        let period = RawForecastPeriod {
            timestamp: noon(2024, 1, 10),
            temperature: Some(-3.0),
            condition: Some(WeatherCondition::Snow),
            ..Default::default()
        };
        let recs = travel_recommendations(CommuteMode::Walk, 0.6, &[period]);
        assert_eq!(
            recs,
            vec![
                "Plan for significant delays and leave earlier than usual",
                "Wear appropriate footwear with good traction",
                "Dress in warm layers and protect exposed skin in cold temperatures",
                "Use walking paths that are well-maintained during adverse weather",
            ]
        );
    }
}
