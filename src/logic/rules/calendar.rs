use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone)]
pub struct SeasonalEvent {
    pub name: &'static str,
    pub month: u32,
    pub day: u32,
    pub icon: &'static str,
    pub templates: &'static [&'static str],
}

impl SeasonalEvent {
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }
}

pub(super) fn builtin() -> Vec<SeasonalEvent> {
    vec![
        SeasonalEvent {
            name: "Spring Equinox",
            month: 3,
            day: 20,
            icon: "seedling",
            templates: &[
                "Spring officially begins tomorrow! Expect gradually warming temperatures and increasing daylight.",
                "Welcome spring! Equinox occurs tomorrow with day and night of nearly equal length.",
                "Garden planning alert: Spring equinox tomorrow marks the official start of planting season.",
            ],
        },
        SeasonalEvent {
            name: "Summer Solstice",
            month: 6,
            day: 20,
            icon: "sun",
            templates: &[
                "Summer officially begins tomorrow with the longest day of the year!",
                "Solstice alert: Tomorrow marks the official start of summer and peak daylight hours.",
                "Seasonal shift: Summer begins tomorrow with the solstice, the longest day of the year.",
            ],
        },
        SeasonalEvent {
            name: "Fall Equinox",
            month: 9,
            day: 22,
            icon: "leaf",
            templates: &[
                "Fall officially begins tomorrow! Expect gradually cooling temperatures and shortening days.",
                "Autumn equinox tomorrow marks the official end of summer with day and night of equal length.",
                "Seasonal transition: Fall begins tomorrow. Perfect time for garden cleanup and cool-weather planting.",
            ],
        },
        SeasonalEvent {
            name: "Winter Solstice",
            month: 12,
            day: 21,
            icon: "snowflake",
            templates: &[
                "Winter officially begins tomorrow with the shortest day of the year.",
                "Solstice alert: Tomorrow marks the official start of winter and the gradual return of daylight.",
                "Seasonal milestone: Winter begins tomorrow with the solstice, the shortest day of the year.",
            ],
        },
        SeasonalEvent {
            name: "Earth Day",
            month: 4,
            day: 22,
            icon: "globe-americas",
            templates: &[
                "Earth Day tomorrow! Weather forecast shows {condition}, perfect for outdoor environmental activities.",
                "Earth Day celebration alert: Tomorrow's {condition} weather is ideal for community cleanup events.",
                "Environmental awareness day: Tomorrow's Earth Day forecast shows {condition} conditions.",
            ],
        },
    ]
}
