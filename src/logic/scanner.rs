use crate::error::Result;
use crate::logic::random::RandomSource;
use crate::logic::calculations::RiskLevel;
use crate::logic::rules::{
    ActivityRule, ExternalConditions, ExternalMetric, RiskRule, Rule, WarningRule,
    WarningThreshold,
};
use crate::logic::templates::{choose_and_render, number};
use crate::models::{DailySummary, Finding};
use tracing::debug;

/// Shortest and longest look-ahead a caller may ask for
pub const MIN_HORIZON_DAYS: usize = 3;
pub const MAX_HORIZON_DAYS: usize = 14;

/// A consecutive-day run: index of the first day and number of days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub length: usize,
}

/// Number of days to scan for a requested look-ahead
pub fn horizon(days_ahead: usize, available: usize) -> usize {
    days_ahead
        .clamp(MIN_HORIZON_DAYS, MAX_HORIZON_DAYS)
        .min(available)
}

/// First run of at least `min_run` qualifying days within the horizon,
/// extended to its full length. A failing day resets the count.
pub fn find_run<F>(days: &[DailySummary], horizon: usize, min_run: usize, qualifies: F) -> Option<Run>
where
    F: Fn(&DailySummary) -> bool,
{
    let min_run = min_run.max(1);
    let mut start = 0;
    let mut length = 0;

    for (i, day) in days.iter().take(horizon).enumerate() {
        if qualifies(day) {
            if length == 0 {
                start = i;
            }
            length += 1;
        } else if length >= min_run {
            break;
        } else {
            length = 0;
        }
    }

    (length >= min_run).then_some(Run { start, length })
}

/// Scans daily summaries for the first qualifying run of each rule
pub struct ConditionScanner<'a> {
    days: &'a [DailySummary],
    horizon: usize,
    external: &'a dyn ExternalConditions,
}

impl<'a> ConditionScanner<'a> {
    pub fn new(days: &'a [DailySummary], days_ahead: usize, external: &'a dyn ExternalConditions) -> Self {
        Self {
            days,
            horizon: horizon(days_ahead, days.len()),
            external,
        }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn scan(&self, rule: Rule<'_>, rng: &mut dyn RandomSource) -> Result<Option<Finding>> {
        match rule {
            Rule::Activity(r) => self.scan_activity(r, rng),
            Rule::Warning(r) => self.scan_warning(r, rng),
            Rule::Risk(r) => self.scan_risk(r, rng),
        }
    }

    pub fn scan_activity(&self, rule: &ActivityRule, rng: &mut dyn RandomSource) -> Result<Option<Finding>> {
        let Some(run) = find_run(self.days, self.horizon, rule.min_days, |d| rule.ideal.holds(d)) else {
            return Ok(None);
        };

        let unit = if rule.night_only { "nights" } else { "days" };
        let message = choose_and_render(rule.templates, &[(unit, run.length.to_string())], rng)?;
        Ok(Some(self.finding(rule.id, run, message)))
    }

    pub fn scan_warning(&self, rule: &WarningRule, rng: &mut dyn RandomSource) -> Result<Option<Finding>> {
        let threshold = rule.threshold;
        let qualifies = |day: &DailySummary| match threshold.holds(day) {
            Some(hit) => hit,
            None => {
                let metric = match threshold {
                    WarningThreshold::AqiAtLeast(_) => ExternalMetric::Aqi,
                    _ => ExternalMetric::Uv,
                };
                self.external.holds(metric, threshold.value(), day)
            }
        };

        let Some(run) = find_run(self.days, self.horizon, rule.min_days, qualifies) else {
            return Ok(None);
        };

        let vars = [
            ("days", run.length.to_string()),
            (threshold.placeholder(), number(threshold.value())),
        ];
        let message = choose_and_render(rule.templates, &vars, rng)?;
        Ok(Some(self.finding(rule.id, run, message)))
    }

    /// A day counts toward a risk run when its level is high
    pub fn scan_risk(&self, rule: &RiskRule, rng: &mut dyn RandomSource) -> Result<Option<Finding>> {
        let Some(run) = find_run(self.days, self.horizon, rule.min_days, |d| {
            rule.level(d) == RiskLevel::High
        }) else {
            return Ok(None);
        };

        let vars = [
            ("days", run.length.to_string()),
            ("name", rule.id.replace('_', " ")),
        ];
        let message = choose_and_render(rule.templates, &vars, rng)?;
        Ok(Some(self.finding(rule.id, run, message)))
    }

    fn finding(&self, rule_id: &'static str, run: Run, message: String) -> Finding {
        let start_date = self.days[run.start].date;
        let end_date = self.days[run.start + run.length - 1].date;
        debug!(
            "Rule {} matched {} day(s) from {}",
            rule_id, run.length, start_date
        );
        Finding {
            rule_id,
            start_date,
            end_date,
            run_length: run.length,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::random::FixedSource;
    use crate::logic::rules::{NoSignals, ObservedConditions, RuleTables};
    use crate::models::WeatherCondition;
    use chrono::{Duration, NaiveDate};

    fn painting_day(offset: i64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap() + Duration::days(offset),
            min_temp: 17.0,
            max_temp: 25.0,
            avg_temp: 21.0,
            min_humidity: 35.0,
            max_humidity: 55.0,
            avg_humidity: 45.0,
            max_wind_speed: 4.0,
            avg_wind_speed: 3.0,
            avg_cloud_cover: 40.0,
            precipitation_sum: 0.0,
            precipitation_probability: 0.05,
            will_rain: false,
            condition: WeatherCondition::Clouds,
            period_count: 8,
        }
    }

    fn days(n: i64) -> Vec<DailySummary> {
        (0..n).map(painting_day).collect()
    }

    #[test]
    fn horizon_is_clamped() {
        assert_eq!(horizon(1, 10), 3);
        assert_eq!(horizon(30, 20), 14);
        assert_eq!(horizon(7, 5), 5);
    }

    #[test]
    fn run_extends_past_the_minimum() {
        let d = days(6);
        let run = find_run(&d, 6, 3, |day| day.max_temp < 30.0).unwrap();
        assert_eq!(run, Run { start: 0, length: 6 });
    }

    #[test]
    fn failing_day_resets_the_count() {
        let mut d = days(6);
        d[2].will_rain = true;
        // qualifying pattern: yes yes no yes yes yes
        let run = find_run(&d, 6, 3, |day| !day.will_rain).unwrap();
        assert_eq!(run, Run { start: 3, length: 3 });
        assert!(find_run(&d, 6, 4, |day| !day.will_rain).is_none());
    }

    #[test]
    fn first_run_wins() {
        let mut d = days(9);
        d[3].will_rain = true;
        let run = find_run(&d, 9, 2, |day| !day.will_rain).unwrap();
        assert_eq!(run, Run { start: 0, length: 3 });
    }

    #[test]
    fn run_stops_at_horizon() {
        let d = days(8);
        let run = find_run(&d, 4, 3, |_| true).unwrap();
        assert_eq!(run.length, 4);
        assert!(find_run(&d, 2, 3, |_| true).is_none());
        assert!(find_run(&[], 5, 1, |_| true).is_none());
    }

    #[test]
    fn five_painting_days_give_one_finding() {
        let tables = RuleTables::shared();
        let d = days(5);
        let scanner = ConditionScanner::new(&d, 7, &NoSignals);
        let rule = tables.find("outdoor_painting").unwrap();

        let finding = scanner.scan(rule, &mut FixedSource).unwrap().unwrap();
        assert_eq!(finding.rule_id, "outdoor_painting");
        assert_eq!(finding.run_length, 5);
        assert_eq!(finding.start_date, d[0].date);
        assert_eq!(finding.end_date, d[4].date);
        assert!(finding.message.contains('5'));
    }

    #[test]
    fn no_qualifying_days_give_nothing() {
        let tables = RuleTables::shared();
        let mut d = days(5);
        for day in &mut d {
            day.will_rain = true;
        }
        let scanner = ConditionScanner::new(&d, 7, &NoSignals);
        for rule in &tables.activities {
            if rule.ideal.no_rain {
                assert!(scanner.scan_activity(rule, &mut FixedSource).unwrap().is_none());
            }
        }
    }

    #[test]
    fn stargazing_counts_nights() {
        let tables = RuleTables::shared();
        let mut d = days(3);
        for day in &mut d {
            day.avg_cloud_cover = 10.0;
        }
        let scanner = ConditionScanner::new(&d, 7, &NoSignals);
        let rule = tables.find("stargazing").unwrap();
        let finding = scanner.scan(rule, &mut FixedSource).unwrap().unwrap();
        assert_eq!(
            finding.message,
            "Stargazing alert: Clear night skies expected for the next 3 nights."
        );
    }

    #[test]
    fn heat_wave_message_carries_threshold() {
        let tables = RuleTables::shared();
        let mut d = days(4);
        for day in &mut d {
            day.max_temp = 34.0;
        }
        let scanner = ConditionScanner::new(&d, 7, &NoSignals);
        let rule = tables.find("heat_wave").unwrap();
        let finding = scanner.scan(rule, &mut FixedSource).unwrap().unwrap();
        assert_eq!(
            finding.message,
            "Heat wave alert: Temperatures above 32°C expected for 4 consecutive days."
        );
    }

    #[test]
    fn uv_warning_depends_on_injected_signal() {
        let tables = RuleTables::shared();
        let mut d = days(3);
        let july = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        for (i, day) in d.iter_mut().enumerate() {
            day.date = july + Duration::days(i as i64);
            day.avg_cloud_cover = 0.0;
            day.condition = WeatherCondition::Clear;
        }
        let rule = tables.find("high_uv").unwrap();

        let blind = ConditionScanner::new(&d, 7, &NoSignals);
        assert!(blind.scan(rule, &mut FixedSource).unwrap().is_none());

        let observed = ObservedConditions::new(40.7);
        let scanner = ConditionScanner::new(&d, 7, &observed);
        let finding = scanner.scan(rule, &mut FixedSource).unwrap().unwrap();
        assert_eq!(finding.run_length, 3);
    }

    #[test]
    fn humid_mild_days_raise_blight_risk() {
        let tables = RuleTables::shared();
        let mut d = days(4);
        for day in &mut d {
            day.avg_temp = 18.0;
            day.avg_humidity = 85.0;
        }
        let scanner = ConditionScanner::new(&d, 7, &NoSignals);
        let rule = tables.find("late_blight").unwrap();
        let finding = scanner.scan(rule, &mut FixedSource).unwrap().unwrap();
        assert_eq!(finding.run_length, 4);
        assert_eq!(
            finding.message,
            "Pest watch: conditions favor late blight for 4 consecutive days."
        );
    }
}
