use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::calculations::{round_to, RiskLevel};
use crate::logic::rules::RiskRule;
use crate::models::{AlertType, DailySummary, WeatherCondition, WeatherSnapshot};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DayConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation_probability: f64, // %
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct PestDayRisk {
    pub risk_factor: f64,
    pub risk_level: RiskLevel,
    pub risk_class: AlertType,
    pub description: &'static str,
    pub control_methods: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct PestRiskDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub weather_summary: DayConditions,
    pub pest_risks: BTreeMap<&'static str, PestDayRisk>,
    pub risk_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PestRiskReport {
    pub city: String,
    pub risk_forecast: Vec<PestRiskDay>,
    pub pests_info: BTreeMap<&'static str, RiskRule>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct PestRiskFallback {
    pub city: String,
    pub error: String,
    pub timestamp: NaiveDateTime,
}

/// One-line summary naming the pest with the highest factor (first one on ties)
fn risk_summary<'r>(scores: impl IntoIterator<Item = (&'r RiskRule, f64)>) -> String {
    let top = scores
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best });

    match top {
        Some((rule, factor)) if factor >= 7.0 => format!(
            "High risk of {}. Consider preventative measures.",
            rule.display_name()
        ),
        Some((rule, factor)) if factor >= 4.0 => format!(
            "Moderate risk of {}. Monitor plants closely.",
            rule.display_name()
        ),
        _ => "Low pest risk. Continue routine monitoring.".to_string(),
    }
}

fn assess_day(day: &DailySummary, pests: &[&RiskRule]) -> PestRiskDay {
    let scores: Vec<(&RiskRule, f64)> = pests.iter().map(|r| (*r, r.factor(day))).collect();

    let pest_risks = scores
        .iter()
        .map(|(rule, factor)| {
            let level = RiskLevel::from_factor(*factor);
            (
                rule.id,
                PestDayRisk {
                    risk_factor: round_to(*factor, 1),
                    risk_level: level,
                    risk_class: level.alert_type(),
                    description: rule.description,
                    control_methods: rule.control_methods,
                },
            )
        })
        .collect();

    PestRiskDay {
        date: day.date,
        day_name: day.day_name(),
        weather_summary: DayConditions {
            temperature: round_to(day.avg_temp, 1),
            humidity: round_to(day.avg_humidity, 1),
            precipitation_probability: round_to(day.precipitation_probability * 100.0, 1),
            condition: day.condition,
        },
        pest_risks,
        risk_summary: risk_summary(scores),
    }
}

impl Advisor<'_> {
    pub fn pest_risk(&mut self, weather: &WeatherSnapshot) -> Advisory<PestRiskReport, PestRiskFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        or_fallback("pest risk forecast", self.try_pest_risk(weather), |error| PestRiskFallback {
            city,
            error,
            timestamp: now,
        })
    }

    fn try_pest_risk(&self, weather: &WeatherSnapshot) -> Result<PestRiskReport> {
        let pests: Vec<&RiskRule> = self.tables().pests().collect();

        let risk_forecast = self
            .daily(weather)
            .iter()
            .take(FORECAST_DAYS)
            .map(|day| assess_day(day, &pests))
            .collect();

        Ok(PestRiskReport {
            city: weather.location.city.clone(),
            risk_forecast,
            pests_info: pests.iter().map(|r| (r.id, (*r).clone())).collect(),
            timestamp: self.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{advisor, mild_snapshot, noon};
    use super::*;

    #[test]
    fn mild_dry_week_is_low_risk() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now).pest_risk(&snap).ready().unwrap();
        assert_eq!(report.risk_forecast.len(), 5);
        assert_eq!(report.pests_info.len(), 5);

        let day = &report.risk_forecast[0];
        assert_eq!(day.weather_summary.temperature, 20.0);
        // 20 °C suits aphids, but 45 % humidity does not
        assert_eq!(day.pest_risks["aphids"].risk_factor, 3.0);
        assert_eq!(day.pest_risks["aphids"].risk_level, RiskLevel::Low);
        // powdery mildew likes 15-28 °C and 50-90 %
        assert_eq!(day.pest_risks["powdery_mildew"].risk_factor, 3.0);
        assert_eq!(day.risk_summary, "Low pest risk. Continue routine monitoring.");
    }

    #[test]
    fn summary_names_the_worst_pest() {
        let now = noon(2024, 7, 1);
        let mut snap = mild_snapshot(now.date(), 40.0);
        for p in &mut snap.periods {
            p.temperature = Some(18.0);
            p.humidity = Some(80.0);
            p.precipitation_probability = Some(0.5);
        }
        let report = advisor(now).pest_risk(&snap).ready().unwrap();
        let day = &report.risk_forecast[0];
        // slugs and blight both reach 8.0; slugs come first
        assert_eq!(day.pest_risks["slugs_snails"].risk_factor, 8.0);
        assert_eq!(day.pest_risks["late_blight"].risk_factor, 8.0);
        assert_eq!(
            day.risk_summary,
            "High risk of Slugs Snails. Consider preventative measures."
        );
        assert_eq!(day.pest_risks["late_blight"].risk_class, AlertType::Danger);
    }

    #[test]
    fn pests_info_serializes_ranges() {
        let now = noon(2024, 7, 1);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now).pest_risk(&snap).ready().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pests_info"]["aphids"]["favorable_temp"][0], 20.0);
        assert!(json["pests_info"]["aphids"].get("icon").is_none());
    }
}
