use crate::models::DailySummary;

/// Checks an activity needs; an unset field is not checked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdealConditions {
    pub no_rain: bool,
    pub temp_range: Option<(f64, f64)>,
    pub humidity_range: Option<(f64, f64)>,
    pub wind_speed_max: Option<f64>,
    pub cloud_cover_max: Option<f64>,
}

impl IdealConditions {
    pub fn holds(&self, day: &DailySummary) -> bool {
        if self.no_rain && day.will_rain {
            return false;
        }
        if let Some((lo, hi)) = self.temp_range {
            if day.min_temp < lo || day.max_temp > hi {
                return false;
            }
        }
        if let Some((lo, hi)) = self.humidity_range {
            if day.min_humidity < lo || day.max_humidity > hi {
                return false;
            }
        }
        if let Some(cap) = self.wind_speed_max {
            if day.max_wind_speed > cap {
                return false;
            }
        }
        if let Some(cap) = self.cloud_cover_max {
            if day.avg_cloud_cover > cap {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct ActivityRule {
    pub id: &'static str,
    pub ideal: IdealConditions,
    pub night_only: bool,
    pub min_days: usize,
    pub icon: &'static str,
    pub templates: &'static [&'static str],
}

pub(super) fn builtin() -> Vec<ActivityRule> {
    vec![
        ActivityRule {
            id: "outdoor_painting",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((15.0, 28.0)),
                humidity_range: Some((20.0, 60.0)),
                wind_speed_max: Some(15.0),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "paint-brush",
            templates: &[
                "Dry spell alert: No rain expected for {days} days, a good week for outdoor painting.",
                "Perfect painting weather ahead: {days} consecutive dry days with mild temperatures.",
                "Great opportunity for outdoor painting projects this week with {days} rain-free days ahead.",
            ],
        },
        ActivityRule {
            id: "gardening",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((15.0, 30.0)),
                wind_speed_max: Some(20.0),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "leaf",
            templates: &[
                "Garden-friendly forecast: Mild temperatures and no heavy rain for the next {days} days.",
                "Ideal gardening window: {days} days of favorable conditions ahead for planting and maintenance.",
                "Green thumb alert: Perfect weather for garden projects over the next {days} days.",
            ],
        },
        ActivityRule {
            id: "hiking",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((12.0, 27.0)),
                wind_speed_max: Some(25.0),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "hiking",
            templates: &[
                "Trail conditions looking great: {days} days of hiking-friendly weather ahead.",
                "Hiking forecast: Clear skies and comfortable temperatures for the next {days} days.",
                "Outdoor adventure alert: Excellent hiking conditions expected for {days} consecutive days.",
            ],
        },
        ActivityRule {
            id: "beach_day",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((25.0, 35.0)),
                cloud_cover_max: Some(30.0),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "umbrella-beach",
            templates: &[
                "Beach weather alert: {days} days of sunshine and warm temperatures perfect for the shore.",
                "Sun and sand forecast: Ideal beach conditions for the next {days} days.",
                "Pack your beach gear: {days} days of perfect beach weather ahead.",
            ],
        },
        ActivityRule {
            id: "laundry_drying",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((15.0, 35.0)),
                humidity_range: Some((30.0, 60.0)),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "tshirt",
            templates: &[
                "Laundry-friendly forecast: Great drying conditions for the next {days} days.",
                "Efficient drying alert: {days} consecutive days optimal for air-drying laundry.",
                "Energy-saving opportunity: Perfect natural drying conditions for {days} days.",
            ],
        },
        ActivityRule {
            id: "cycling",
            ideal: IdealConditions {
                no_rain: true,
                temp_range: Some((13.0, 28.0)),
                wind_speed_max: Some(20.0),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "bicycle",
            templates: &[
                "Cycling weather alert: {days} days of ideal riding conditions ahead.",
                "Perfect for pedaling: {days} consecutive days of cyclist-friendly weather expected.",
                "Bike commute forecast: Favorable conditions for the next {days} days.",
            ],
        },
        // Counts nights, so fewer are needed
        ActivityRule {
            id: "stargazing",
            ideal: IdealConditions {
                no_rain: true,
                cloud_cover_max: Some(20.0),
                wind_speed_max: Some(15.0),
                ..Default::default()
            },
            night_only: true,
            min_days: 2,
            icon: "stars",
            templates: &[
                "Stargazing alert: Clear night skies expected for the next {nights} nights.",
                "Astronomy-friendly forecast: {nights} consecutive nights with optimal viewing conditions.",
                "Look up! Perfect stargazing conditions for {nights} nights ahead.",
            ],
        },
        ActivityRule {
            id: "marathon_training",
            ideal: IdealConditions {
                temp_range: Some((5.0, 20.0)),
                humidity_range: Some((30.0, 70.0)),
                ..Default::default()
            },
            night_only: false,
            min_days: 3,
            icon: "running",
            templates: &[
                "Runner's forecast: {days} days of ideal training conditions ahead.",
                "Perfect for marathon training: {days} consecutive days with optimal running weather.",
                "Training opportunity: {days} days of runner-friendly weather expected.",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;
    use chrono::NaiveDate;

    fn day(min_temp: f64, max_temp: f64, humidity: f64, wind: f64, clouds: f64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            min_temp,
            max_temp,
            avg_temp: (min_temp + max_temp) / 2.0,
            min_humidity: humidity,
            max_humidity: humidity,
            avg_humidity: humidity,
            max_wind_speed: wind,
            avg_wind_speed: wind,
            avg_cloud_cover: clouds,
            precipitation_sum: 0.0,
            precipitation_probability: 0.0,
            will_rain: false,
            condition: WeatherCondition::Clear,
            period_count: 8,
        }
    }

    #[test]
    fn unset_checks_are_vacuous() {
        let anything = IdealConditions::default();
        assert!(anything.holds(&day(-30.0, 50.0, 100.0, 80.0, 100.0)));
    }

    #[test]
    fn painting_conditions() {
        let rules = builtin();
        let painting = &rules[0].ideal;
        assert!(painting.holds(&day(16.0, 24.0, 45.0, 5.0, 80.0)));
        assert!(!painting.holds(&day(14.0, 24.0, 45.0, 5.0, 80.0)));
        assert!(!painting.holds(&day(16.0, 24.0, 65.0, 5.0, 80.0)));
        assert!(!painting.holds(&day(16.0, 24.0, 45.0, 16.0, 80.0)));

        let mut wet = day(16.0, 24.0, 45.0, 5.0, 80.0);
        wet.will_rain = true;
        assert!(!painting.holds(&wet));
    }

    #[test]
    fn marathon_ignores_rain() {
        let rules = builtin();
        let marathon = rules.iter().find(|r| r.id == "marathon_training").unwrap();
        let mut wet = day(8.0, 15.0, 50.0, 30.0, 100.0);
        wet.will_rain = true;
        assert!(marathon.ideal.holds(&wet));
    }
}
