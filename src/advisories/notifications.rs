//! Smart notifications: rule scans, calendar events, pattern detection and
//! garden notices merged into one prioritized list.

use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::composer::{NotificationBatch, NotificationComposer};
use crate::logic::rules::{ExternalConditions, RiskSubject, Rule};
use crate::logic::scanner::{ConditionScanner, MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};
use crate::logic::templates::choose_and_render;
use crate::models::{
    AgriculturalType, ChangeType, DailySummary, Finding, Notification, NotificationDetail,
    NotificationKind, PatternType, SoilType, TrendType, WeatherCondition, WeatherSnapshot,
};
use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SEASONAL_LOOKAHEAD_DAYS: i64 = 7;
const TREND_THRESHOLD: f64 = 5.0;
const JUMP_THRESHOLD: f64 = 8.0;
const RAIN_STREAK: usize = 4;
const CLEAR_STREAK: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct SmartNotifications {
    pub city: String,
    pub generated_at: NaiveDateTime,
    pub forecast_days: usize,
    pub notifications: Vec<Notification>,
    pub notification_count: usize,
}

impl SmartNotifications {
    /// Drop what the user opted out of and apply their tighter cap
    pub fn personalize(mut self, prefs: &NotificationPreferences) -> Self {
        self.notifications.retain(|n| prefs.allows(n));
        self.notifications.truncate(prefs.max_daily_notifications);
        self.notification_count = self.notifications.len();
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsFallback {
    pub city: String,
    pub error: String,
    pub notifications: Vec<Notification>,
    pub notification_count: usize,
    pub generated_at: NaiveDateTime,
}

/// Per-type toggles and activity interests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub warning_notifications: bool,
    pub activity_notifications: bool,
    pub seasonal_notifications: bool,
    pub agricultural_notifications: bool,
    pub weather_pattern_notifications: bool,
    pub max_daily_notifications: usize,
    /// Activity ids to keep. Empty keeps every activity.
    pub preferred_activities: Vec<String>,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            warning_notifications: true,
            activity_notifications: true,
            seasonal_notifications: true,
            agricultural_notifications: true,
            weather_pattern_notifications: true,
            max_daily_notifications: 5,
            preferred_activities: ["gardening", "outdoor_painting", "hiking", "cycling"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl NotificationPreferences {
    pub fn allows(&self, notification: &Notification) -> bool {
        let enabled = match notification.kind {
            NotificationKind::Warning => self.warning_notifications,
            NotificationKind::Activity => self.activity_notifications,
            NotificationKind::Seasonal => self.seasonal_notifications,
            NotificationKind::Agricultural => self.agricultural_notifications,
            NotificationKind::Pattern => self.weather_pattern_notifications,
            NotificationKind::System => true,
        };
        if !enabled {
            return false;
        }

        match &notification.detail {
            Some(NotificationDetail::Activity { activity_type, .. })
                if !self.preferred_activities.is_empty() =>
            {
                self.preferred_activities.iter().any(|a| a == activity_type)
            }
            _ => true,
        }
    }
}

fn finding_notification(rule: Rule<'_>, finding: Finding) -> Notification {
    let Finding {
        rule_id,
        start_date,
        end_date,
        run_length,
        message,
    } = finding;

    match rule {
        Rule::Warning(_) => Notification::new(NotificationKind::Warning, message, rule.icon())
            .with_detail(NotificationDetail::Warning {
                warning_type: rule_id,
                start_date,
                end_date,
                consecutive_days: run_length,
            }),
        Rule::Activity(_) => Notification::new(NotificationKind::Activity, message, rule.icon())
            .with_detail(NotificationDetail::Activity {
                activity_type: rule_id,
                start_date,
                end_date,
                consecutive_days: run_length,
            }),
        Rule::Risk(r) => {
            let notification_type = match r.subject {
                RiskSubject::Pest => AgriculturalType::PestRisk,
                RiskSubject::PlantStress => AgriculturalType::PlantStress,
            };
            Notification::new(NotificationKind::Agricultural, message, rule.icon()).with_detail(
                NotificationDetail::Risk {
                    notification_type,
                    risk_type: rule_id,
                    start_date,
                    end_date,
                    consecutive_days: run_length,
                },
            )
        }
    }
}

fn temperature_trend(days: &[DailySummary]) -> Option<Notification> {
    let (first, fifth) = (days.first()?, days.get(4)?);
    let change = (fifth.min_temp + fifth.max_temp) / 2.0 - (first.min_temp + first.max_temp) / 2.0;
    if change.abs() <= TREND_THRESHOLD {
        return None;
    }

    let (trend_type, message, icon) = if change > 0.0 {
        (
            TrendType::Warming,
            format!(
                "Warming trend detected: Temperatures increasing by {:.1}°C over the next 5 days.",
                change
            ),
            "temperature-arrow-up",
        )
    } else {
        (
            TrendType::Cooling,
            format!(
                "Cooling trend detected: Temperatures decreasing by {:.1}°C over the next 5 days.",
                change.abs()
            ),
            "temperature-arrow-down",
        )
    };

    Some(
        Notification::new(NotificationKind::Seasonal, message, icon).with_detail(
            NotificationDetail::Trend {
                trend_type,
                temperature_change: change,
            },
        ),
    )
}

fn condition_change(today: WeatherCondition, tomorrow: WeatherCondition) -> Option<Notification> {
    let (change_type, message, icon) = if today.is_fair() && tomorrow.has_precipitation() {
        (
            ChangeType::Deteriorating,
            format!(
                "Weather change alert: {} today turning to {} tomorrow.",
                today,
                tomorrow.label_lower()
            ),
            "weather-change-down",
        )
    } else if today.has_precipitation() && tomorrow.is_fair() {
        (
            ChangeType::Improving,
            format!(
                "Weather improvement ahead: {} today clearing to {} tomorrow.",
                today,
                tomorrow.label_lower()
            ),
            "weather-change-up",
        )
    } else {
        return None;
    };

    Some(
        Notification::new(NotificationKind::Pattern, message, icon)
            .with_detail(NotificationDetail::ConditionChange { change_type }),
    )
}

/// First streak of rainy or clear days long enough to be unusual
fn persistent_streak(days: &[DailySummary]) -> Option<Notification> {
    let mut rain = 0;
    let mut clear = 0;

    for day in days {
        match day.condition {
            WeatherCondition::Rain | WeatherCondition::Thunderstorm | WeatherCondition::Drizzle => {
                rain += 1;
                clear = 0;
            }
            WeatherCondition::Clear => {
                clear += 1;
                rain = 0;
            }
            _ => {
                rain = 0;
                clear = 0;
            }
        }

        if rain == RAIN_STREAK {
            return Some(
                Notification::new(
                    NotificationKind::Pattern,
                    format!("Unusual pattern: {} consecutive days of rain in the forecast.", rain),
                    "cloud-rain-persistent",
                )
                .with_detail(NotificationDetail::Streak {
                    pattern_type: PatternType::PersistentRain,
                    days: rain,
                }),
            );
        }
        if clear == CLEAR_STREAK {
            return Some(
                Notification::new(
                    NotificationKind::Pattern,
                    format!("Extended clear spell: {} consecutive days of clear skies ahead.", clear),
                    "sun-persistent",
                )
                .with_detail(NotificationDetail::Streak {
                    pattern_type: PatternType::PersistentClear,
                    days: clear,
                }),
            );
        }
    }
    None
}

/// First day-over-day swing in high temperature above the jump threshold
fn temperature_jump(days: &[DailySummary]) -> Option<Notification> {
    days.windows(2).find_map(|pair| {
        let delta = pair[1].max_temp - pair[0].max_temp;
        if delta < -JUMP_THRESHOLD {
            let drop = -delta;
            Some(
                Notification::new(
                    NotificationKind::Pattern,
                    format!(
                        "Temperature drop alert: {}°C cooler tomorrow compared to today.",
                        drop.trunc() as i64
                    ),
                    "temperature-drop",
                )
                .with_detail(NotificationDetail::TemperatureDrop {
                    pattern_type: PatternType::TempDrop,
                    drop_amount: drop,
                }),
            )
        } else if delta > JUMP_THRESHOLD {
            Some(
                Notification::new(
                    NotificationKind::Pattern,
                    format!(
                        "Temperature surge alert: {}°C warmer tomorrow compared to today.",
                        delta.trunc() as i64
                    ),
                    "temperature-rise",
                )
                .with_detail(NotificationDetail::TemperatureSurge {
                    pattern_type: PatternType::TempSurge,
                    rise_amount: delta,
                }),
            )
        } else {
            None
        }
    })
}

/// Outlook for the coming Saturday and Sunday. `days[0]` is today.
fn weekend_outlook(days: &[DailySummary], weekday_from_monday: u32) -> Option<Notification> {
    let saturday = ((12 - weekday_from_monday) % 7) as usize;
    let sunday = ((13 - weekday_from_monday) % 7) as usize;
    if sunday >= days.len() {
        return None;
    }

    let weekend: Vec<&DailySummary> = [saturday, sunday]
        .iter()
        .filter_map(|&i| days.get(i))
        .collect();
    let will_rain = weekend.iter().any(|d| d.will_rain);
    let avg_temp = weekend.iter().map(|d| d.avg_temp).sum::<f64>() / weekend.len() as f64;

    let (message, icon) = match (will_rain, avg_temp) {
        (true, t) if t < 10.0 => (
            "Weekend forecast: Cool and wet conditions expected. Indoor activities recommended.",
            "weekend-wet-cold",
        ),
        (true, _) => (
            "Weekend forecast: Expect some rainfall. Have indoor backup plans ready.",
            "weekend-wet",
        ),
        (false, t) if t > 25.0 => (
            "Weekend forecast: Warm and dry conditions perfect for outdoor activities.",
            "weekend-sunny-warm",
        ),
        (false, t) if t < 10.0 => (
            "Weekend forecast: Clear but cool conditions. Dress warmly for outdoor plans.",
            "weekend-sunny-cold",
        ),
        (false, _) => (
            "Weekend forecast: Pleasant conditions ideal for outdoor activities.",
            "weekend-sunny",
        ),
    };

    Some(
        Notification::new(NotificationKind::Pattern, message, icon).with_detail(
            NotificationDetail::Weekend {
                pattern_type: PatternType::WeekendForecast,
                will_rain,
                avg_temp,
            },
        ),
    )
}

fn agricultural(notification_type: AgriculturalType, message: String, icon: &'static str) -> Notification {
    Notification::new(NotificationKind::Agricultural, message, icon)
        .with_detail(NotificationDetail::Agricultural { notification_type })
}

impl Advisor<'_> {
    pub fn smart_notifications(
        &mut self,
        weather: &WeatherSnapshot,
        days_ahead: usize,
        external: &dyn ExternalConditions,
    ) -> Advisory<SmartNotifications, NotificationsFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        let result = self.try_smart_notifications(weather, days_ahead, external);
        or_fallback("smart notifications", result, |error| NotificationsFallback {
            city,
            error,
            notifications: vec![Notification::new(
                NotificationKind::System,
                "Weather notification system is currently updating. Check back soon for personalized alerts.",
                "sync",
            )],
            notification_count: 1,
            generated_at: now,
        })
    }

    fn try_smart_notifications(
        &mut self,
        weather: &WeatherSnapshot,
        days_ahead: usize,
        external: &dyn ExternalConditions,
    ) -> Result<SmartNotifications> {
        let days = self.daily(weather);
        let mut batch = NotificationBatch::default();
        let mut risks = Vec::new();

        let tables = self.tables();
        let scanner = ConditionScanner::new(&days, days_ahead, external);
        for rule in tables.rules() {
            let finding = match scanner.scan(rule, self.rng()) {
                Ok(Some(finding)) => finding,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping rule {}: {}", rule.id(), e);
                    continue;
                }
            };
            let notification = finding_notification(rule, finding);
            match rule {
                Rule::Warning(_) => batch.warnings.push(notification),
                Rule::Activity(_) => batch.activities.push(notification),
                Rule::Risk(_) => risks.push(notification),
            }
        }

        batch.seasonal = self.seasonal_notifications(&days)?;
        batch.agricultural = self.agricultural_notifications(weather, &days);
        batch.agricultural.extend(risks);
        batch.patterns = self.pattern_notifications(&days);
        debug!(
            "Generated {} notification(s) for {} before capping",
            batch.len(),
            weather.location.city
        );

        let notifications = NotificationComposer::new(self.notification_cap()).compose(batch);
        Ok(SmartNotifications {
            city: weather.location.city.clone(),
            generated_at: self.now(),
            forecast_days: days_ahead.clamp(MIN_HORIZON_DAYS, MAX_HORIZON_DAYS),
            notification_count: notifications.len(),
            notifications,
        })
    }

    fn seasonal_notifications(&mut self, days: &[DailySummary]) -> Result<Vec<Notification>> {
        let today = self.today();
        let mut out = Vec::new();

        for offset in 1..=SEASONAL_LOOKAHEAD_DAYS {
            let date = today + Duration::days(offset);
            for event in self.tables().seasonal_events.iter().filter(|e| e.falls_on(date)) {
                let condition = days
                    .iter()
                    .find(|d| d.date == date)
                    .map_or_else(|| "varied".to_string(), |d| d.condition.label_lower());
                let message = choose_and_render(event.templates, &[("condition", condition)], self.rng())?;
                out.push(
                    Notification::new(NotificationKind::Seasonal, message, event.icon).with_detail(
                        NotificationDetail::Event {
                            event_name: event.name,
                            event_date: date,
                            days_away: offset,
                        },
                    ),
                );
            }
        }

        out.extend(temperature_trend(days));
        Ok(out)
    }

    fn pattern_notifications(&self, days: &[DailySummary]) -> Vec<Notification> {
        if days.len() < 2 {
            return Vec::new();
        }

        let mut out = Vec::new();
        if days.len() >= 3 {
            out.extend(condition_change(days[0].condition, days[1].condition));
        }
        out.extend(persistent_streak(days));
        out.extend(temperature_jump(days));
        out.extend(weekend_outlook(days, self.today().weekday().num_days_from_monday()));
        out
    }

    fn agricultural_notifications(
        &mut self,
        weather: &WeatherSnapshot,
        days: &[DailySummary],
    ) -> Vec<Notification> {
        let mut out = Vec::new();
        let Some(today) = days.first() else {
            return out;
        };

        match self.watering(weather, SoilType::default()) {
            Advisory::Ready(report) if report.watering_recommendation.should_water => {
                let best = &report.best_watering_time;
                let mut message = format!(
                    "Garden watering alert: Best time to water is {} {}.",
                    best.time.as_deref().unwrap_or("evening"),
                    best.day
                );
                if report.evapotranspiration.rating.is_high() {
                    message.push_str(
                        " High evapotranspiration expected - plants will lose moisture quickly.",
                    );
                }
                out.push(agricultural(AgriculturalType::Watering, message, "water-droplet"));
            }
            Advisory::Ready(report) if report.upcoming_precipitation.expected => {
                out.push(agricultural(
                    AgriculturalType::WateringSkip,
                    format!(
                        "Garden watering notice: Skip watering as rain is expected {}.",
                        report.upcoming_precipitation.timeframe
                    ),
                    "umbrella-rain",
                ));
            }
            Advisory::Ready(_) => {}
            // the general advice always says to water
            Advisory::Degraded(_) => out.push(agricultural(
                AgriculturalType::Watering,
                "Garden watering alert: Best time to water is evening today.".into(),
                "water-droplet",
            )),
        }

        if today.min_temp < 3.0 {
            out.push(agricultural(
                AgriculturalType::Frost,
                "Frost alert: Protect sensitive plants tonight as temperatures approach freezing.".into(),
                "snowflake",
            ));
        }
        if today.max_temp > 32.0 {
            out.push(agricultural(
                AgriculturalType::Heat,
                "Heat stress alert: Provide afternoon shade and extra water for garden plants today.".into(),
                "thermometer-hot",
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{advisor, mild_snapshot, noon};
    use super::*;
    use crate::logic::rules::NoSignals;
    use chrono::NaiveDate;

    fn day(offset: i64, max_temp: f64, condition: WeatherCondition) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap() + Duration::days(offset),
            min_temp: max_temp - 8.0,
            max_temp,
            avg_temp: max_temp - 4.0,
            min_humidity: 40.0,
            max_humidity: 60.0,
            avg_humidity: 50.0,
            max_wind_speed: 4.0,
            avg_wind_speed: 3.0,
            avg_cloud_cover: 40.0,
            precipitation_sum: 0.0,
            precipitation_probability: 0.1,
            will_rain: condition.has_precipitation(),
            condition,
            period_count: 8,
        }
    }

    #[test]
    fn composed_list_is_capped_and_ordered() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let out = advisor(now)
            .smart_notifications(&snap, 7, &NoSignals)
            .ready()
            .unwrap();
        assert_eq!(out.city, "Testville");
        assert_eq!(out.forecast_days, 7);
        assert_eq!(out.notification_count, out.notifications.len());
        assert!(out.notification_count <= 10);
        assert!(out.notifications.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert!(out
            .notifications
            .iter()
            .any(|n| n.message.starts_with("Garden watering alert: Best time to water is 7 PM today.")));
    }

    #[test]
    fn empty_forecast_uses_observation_day() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        snap.periods.clear();
        let out = advisor(now)
            .smart_notifications(&snap, 7, &NoSignals)
            .ready()
            .unwrap();
        assert_eq!(out.city, "Testville");
        assert_eq!(out.forecast_days, 7);
        assert_eq!(out.notification_count, out.notifications.len());
        assert!(out
            .notifications
            .iter()
            .all(|n| n.kind != NotificationKind::System));
    }

    #[test]
    fn equinox_within_a_week() {
        let now = noon(2024, 3, 15);
        let out = advisor(now).seasonal_notifications(&[]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].icon, "seedling");
        assert_eq!(
            out[0].detail,
            Some(NotificationDetail::Event {
                event_name: "Spring Equinox",
                event_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
                days_away: 5,
            })
        );
    }

    #[test]
    fn earth_day_names_the_forecast_condition() {
        let now = noon(2024, 4, 20);
        let days: Vec<DailySummary> = (0..5)
            .map(|i| {
                let mut d = day(i, 18.0, WeatherCondition::Clear);
                d.date = now.date() + Duration::days(i);
                d
            })
            .collect();
        let out = advisor(now).seasonal_notifications(&days).unwrap();
        assert_eq!(
            out[0].message,
            "Earth Day tomorrow! Weather forecast shows clear, perfect for outdoor environmental activities."
        );
    }

    #[test]
    fn warming_trend_over_five_days() {
        let days: Vec<DailySummary> = (0..5)
            .map(|i| day(i, 20.0 + 2.0 * i as f64, WeatherCondition::Clouds))
            .collect();
        let n = temperature_trend(&days).unwrap();
        assert_eq!(
            n.message,
            "Warming trend detected: Temperatures increasing by 8.0°C over the next 5 days."
        );
        assert!(temperature_trend(&days[..4]).is_none());
    }

    #[test]
    fn condition_changes() {
        let worse = condition_change(WeatherCondition::Clear, WeatherCondition::Rain).unwrap();
        assert_eq!(worse.message, "Weather change alert: Clear today turning to rain tomorrow.");
        let better = condition_change(WeatherCondition::Snow, WeatherCondition::Clouds).unwrap();
        assert_eq!(
            better.detail,
            Some(NotificationDetail::ConditionChange {
                change_type: ChangeType::Improving
            })
        );
        assert!(condition_change(WeatherCondition::Fog, WeatherCondition::Rain).is_none());
    }

    #[test]
    fn rain_streak_reported_once() {
        let days: Vec<DailySummary> = (0..6)
            .map(|i| day(i, 15.0, WeatherCondition::Drizzle))
            .collect();
        let n = persistent_streak(&days).unwrap();
        assert_eq!(n.message, "Unusual pattern: 4 consecutive days of rain in the forecast.");

        let mut broken = days.clone();
        broken[2].condition = WeatherCondition::Clouds;
        assert!(persistent_streak(&broken).is_none());
    }

    #[test]
    fn first_temperature_jump_wins() {
        let days = vec![
            day(0, 30.0, WeatherCondition::Clear),
            day(1, 20.5, WeatherCondition::Clear),
            day(2, 31.0, WeatherCondition::Clear),
        ];
        let n = temperature_jump(&days).unwrap();
        assert_eq!(n.message, "Temperature drop alert: 9°C cooler tomorrow compared to today.");
    }

    #[test]
    fn weekend_outlook_from_monday() {
        let mut days: Vec<DailySummary> = (0..7)
            .map(|i| day(i, 30.0, WeatherCondition::Clear))
            .collect();
        // avg 26 on both days
        let n = weekend_outlook(&days, 0).unwrap();
        assert_eq!(n.icon, "weekend-sunny-warm");

        days[6] = day(6, 12.0, WeatherCondition::Rain);
        let n = weekend_outlook(&days, 0).unwrap();
        assert_eq!(n.icon, "weekend-wet");
        assert!(weekend_outlook(&days[..6], 0).is_none());
    }

    #[test]
    fn frost_and_heat_notices() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let mut hot = day(0, 35.0, WeatherCondition::Clear);
        hot.min_temp = 2.0;
        let out = advisor(now).agricultural_notifications(&snap, &[hot]);
        let kinds: Vec<_> = out
            .iter()
            .filter_map(|n| match n.detail {
                Some(NotificationDetail::Agricultural { notification_type }) => Some(notification_type),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                AgriculturalType::Watering,
                AgriculturalType::Frost,
                AgriculturalType::Heat
            ]
        );
    }

    #[test]
    fn preferences_filter_activities_and_cap() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let activity = |id: &'static str| {
            Notification::new(NotificationKind::Activity, id, "icon").with_detail(
                NotificationDetail::Activity {
                    activity_type: id,
                    start_date: date,
                    end_date: date,
                    consecutive_days: 3,
                },
            )
        };
        let report = SmartNotifications {
            city: "Testville".into(),
            generated_at: noon(2024, 7, 1),
            forecast_days: 7,
            notifications: vec![
                Notification::new(NotificationKind::Warning, "w", "icon"),
                activity("beach_day"),
                activity("hiking"),
                Notification::new(NotificationKind::Pattern, "p", "icon"),
            ],
            notification_count: 4,
        };

        let prefs = NotificationPreferences {
            weather_pattern_notifications: false,
            max_daily_notifications: 5,
            ..Default::default()
        };
        let out = report.clone().personalize(&prefs);
        let messages: Vec<_> = out.notifications.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["w", "hiking"]);
        assert_eq!(out.notification_count, 2);

        let everything = NotificationPreferences {
            preferred_activities: Vec::new(),
            max_daily_notifications: 3,
            ..Default::default()
        };
        assert_eq!(report.personalize(&everything).notification_count, 3);
    }
}
