use crate::models::{DailySummary, RawForecastPeriod, WeatherCondition};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const DEFAULT_TEMP: f64 = 20.0;
const DEFAULT_HUMIDITY: f64 = 50.0;
const DEFAULT_WIND: f64 = 0.0;
const DEFAULT_CLOUDS: f64 = 50.0;

const RAIN_PROBABILITY_THRESHOLD: f64 = 0.4;
const RAIN_AMOUNT_THRESHOLD_MM: f64 = 0.5;

/// Group 3-hour periods by local calendar date into daily summaries, ordered by date
pub fn summarize_days(periods: &[RawForecastPeriod]) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&RawForecastPeriod>> = BTreeMap::new();
    for period in periods {
        by_date
            .entry(period.timestamp.date())
            .or_default()
            .push(period);
    }

    by_date
        .into_iter()
        .map(|(date, points)| summarize_day(date, &points))
        .collect()
}

/// Aggregate one day's periods. Fields with no samples take their documented defaults.
pub fn summarize_day(date: NaiveDate, points: &[&RawForecastPeriod]) -> DailySummary {
    let temps = Stats::collect(points.iter().map(|p| p.temperature), DEFAULT_TEMP);
    let humidity = Stats::collect(points.iter().map(|p| p.humidity), DEFAULT_HUMIDITY);
    let wind = Stats::collect(points.iter().map(|p| p.wind_speed), DEFAULT_WIND);
    let clouds = Stats::collect(points.iter().map(|p| p.cloud_cover), DEFAULT_CLOUDS);
    let pop = Stats::collect(
        points.iter().map(|p| p.precipitation_probability),
        0.0,
    );

    let precipitation_sum: f64 = points
        .iter()
        .filter_map(|p| p.precipitation_mm)
        .filter(|mm| mm.is_finite() && *mm >= 0.0)
        .sum();

    let will_rain =
        pop.avg > RAIN_PROBABILITY_THRESHOLD || precipitation_sum > RAIN_AMOUNT_THRESHOLD_MM;

    DailySummary {
        date,
        min_temp: temps.min,
        max_temp: temps.max,
        avg_temp: temps.avg,
        min_humidity: humidity.min,
        max_humidity: humidity.max,
        avg_humidity: humidity.avg,
        max_wind_speed: wind.max,
        avg_wind_speed: wind.avg,
        avg_cloud_cover: clouds.avg,
        precipitation_sum,
        precipitation_probability: pop.avg,
        will_rain,
        condition: dominant_condition(points.iter().filter_map(|p| p.condition)),
        period_count: points.len(),
    }
}

/// Most frequent condition; ties go to whichever was seen first
pub fn dominant_condition<I>(conditions: I) -> WeatherCondition
where
    I: IntoIterator<Item = WeatherCondition>,
{
    let mut counts: Vec<(WeatherCondition, usize)> = Vec::new();
    for condition in conditions {
        match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((condition, 1)),
        }
    }

    let mut best: Option<(WeatherCondition, usize)> = None;
    for (condition, n) in counts {
        match best {
            Some((_, top)) if n <= top => {}
            _ => best = Some((condition, n)),
        }
    }
    best.map(|(c, _)| c).unwrap_or_default()
}

struct Stats {
    min: f64,
    max: f64,
    avg: f64,
}

impl Stats {
    fn collect<I>(values: I, default: f64) -> Self
    where
        I: Iterator<Item = Option<f64>>,
    {
        let samples: Vec<f64> = values.flatten().filter(|v| v.is_finite()).collect();
        if samples.is_empty() {
            return Self {
                min: default,
                max: default,
                avg: default,
            };
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = samples.iter().sum::<f64>() / samples.len() as f64;
        // Guard against rounding pushing the mean outside the observed range
        Self {
            min,
            max,
            avg: avg.clamp(min, max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn period(day: u32, hour: u32, temp: f64, humidity: f64) -> RawForecastPeriod {
        RawForecastPeriod {
            timestamp: at(day, hour),
            temperature: Some(temp),
            humidity: Some(humidity),
            wind_speed: Some(3.0),
            cloud_cover: Some(20.0),
            precipitation_probability: Some(0.1),
            precipitation_mm: None,
            condition: Some(WeatherCondition::Clear),
            description: None,
        }
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(summarize_days(&[]).is_empty());
    }

    #[test]
    fn groups_by_date_in_order() {
        let periods = vec![
            period(3, 12, 20.0, 40.0),
            period(1, 9, 10.0, 60.0),
            period(1, 15, 16.0, 50.0),
            period(2, 0, 12.0, 70.0),
        ];
        let days = summarize_days(&periods);
        let dates: Vec<u32> = days.iter().map(|d| chrono::Datelike::day(&d.date)).collect();
        assert_eq!(dates, vec![1, 2, 3]);

        let first = &days[0];
        assert_eq!(first.period_count, 2);
        assert_eq!(first.min_temp, 10.0);
        assert_eq!(first.max_temp, 16.0);
        assert_eq!(first.avg_temp, 13.0);
        assert_eq!(first.min_humidity, 50.0);
        assert_eq!(first.max_humidity, 60.0);
    }

    #[test]
    fn min_avg_max_ordering_holds() {
        let periods: Vec<_> = (0..8)
            .map(|i| period(4, i * 3, -5.0 + i as f64 * 4.3, 30.0 + i as f64 * 7.1))
            .collect();
        for day in summarize_days(&periods) {
            assert!(day.min_temp <= day.avg_temp && day.avg_temp <= day.max_temp);
            assert!(day.min_humidity <= day.avg_humidity && day.avg_humidity <= day.max_humidity);
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let bare = RawForecastPeriod {
            timestamp: at(6, 12),
            ..Default::default()
        };
        let day = &summarize_days(&[bare])[0];
        assert_eq!(day.avg_temp, 20.0);
        assert_eq!(day.avg_humidity, 50.0);
        assert_eq!(day.max_wind_speed, 0.0);
        assert_eq!(day.avg_cloud_cover, 50.0);
        assert_eq!(day.condition, WeatherCondition::Clear);
        assert!(!day.will_rain);
    }

    #[test]
    fn rain_flag_from_probability_or_amount() {
        let mut wet = period(7, 12, 15.0, 80.0);
        wet.precipitation_probability = Some(0.1);
        wet.precipitation_mm = Some(0.6);
        assert!(summarize_days(&[wet])[0].will_rain);

        let mut likely = period(8, 12, 15.0, 80.0);
        likely.precipitation_probability = Some(0.45);
        assert!(summarize_days(&[likely])[0].will_rain);

        let mut borderline = period(9, 12, 15.0, 80.0);
        borderline.precipitation_probability = Some(0.4);
        borderline.precipitation_mm = Some(0.5);
        assert!(!summarize_days(&[borderline])[0].will_rain);
    }

    #[test]
    fn dominant_condition_prefers_first_on_tie() {
        use WeatherCondition::*;
        assert_eq!(dominant_condition(vec![Rain, Clouds, Clouds, Rain]), Rain);
        assert_eq!(dominant_condition(vec![Rain, Clouds, Clouds]), Clouds);
        assert_eq!(dominant_condition(Vec::new()), Clear);
    }
}
