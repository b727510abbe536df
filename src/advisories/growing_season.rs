use super::{or_fallback, Advisor, Advisory};
use crate::error::Result;
use crate::logic::calculations::round_to;
use crate::models::{ClimateNormals, Hemisphere, WeatherCondition, WeatherSnapshot};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

const FORECAST_DAYS: usize = 5;

const SPRING_PLANTS: &[&str] = &["Tomatoes", "Peppers", "Cucumbers", "Squash", "Beans", "Corn"];
const SUMMER_PLANTS: &[&str] = &[
    "Basil",
    "Okra",
    "Sweet Potatoes",
    "Eggplant",
    "Melons",
    "Heat-resistant Lettuce",
];
const FALL_PLANTS: &[&str] = &["Spinach", "Lettuce", "Kale", "Radishes", "Carrots", "Broccoli"];
const WINTER_PLANTS: &[&str] = &[
    "Garlic",
    "Winter Onions",
    "Cover Crops",
    "Broad Beans",
    "Winter Lettuce",
];
const SOUTHERN_SPRING_EXTRAS: &[&str] = &["Artichokes", "Passion Fruit", "Subtropical Berries"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn months(&self, hemisphere: Hemisphere) -> [u32; 3] {
        let northern = match self {
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Fall => [9, 10, 11],
            Season::Winter => [12, 1, 2],
        };
        match hemisphere {
            Hemisphere::Northern => northern,
            Hemisphere::Southern => northern.map(|m| (m + 5) % 12 + 1),
        }
    }

    pub fn for_month(month: u32, hemisphere: Hemisphere) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.months(hemisphere).contains(&month))
            .unwrap_or(Season::Winter)
    }

    pub fn next(&self) -> Self {
        match self {
            Season::Winter => Season::Spring,
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
        }
    }

    /// Typical temperature when no climate normals are known
    fn default_temp(&self) -> f64 {
        match self {
            Season::Spring | Season::Fall => 15.0,
            Season::Summer => 25.0,
            Season::Winter => 5.0,
        }
    }

    fn plants(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => SPRING_PLANTS,
            Season::Summer => SUMMER_PLANTS,
            Season::Fall => FALL_PLANTS,
            Season::Winter => WINTER_PLANTS,
        }
    }

    fn harvest_soon(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &["Early Lettuce", "Radishes", "Spring Onions"],
            Season::Summer => &["Tomatoes", "Cucumbers", "Zucchini", "Summer Squash"],
            Season::Fall => &["Late Tomatoes", "Peppers", "Root Vegetables"],
            Season::Winter => &["Winter Greens", "Brussels Sprouts", "Stored Root Vegetables"],
        }
    }

    fn care_tips(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &[
                "Monitor for late frosts and protect tender seedlings",
                "Begin regular fertilization schedule",
                "Set up supports for climbing plants",
                "Thin seedlings to proper spacing",
            ],
            Season::Summer => &[
                "Water deeply and consistently in morning or evening",
                "Mulch to conserve moisture",
                "Provide shade for heat-sensitive crops",
                "Monitor for pests that thrive in warm weather",
            ],
            Season::Fall => &[
                "Protect cold-sensitive crops from early frosts",
                "Add compost to harvested areas",
                "Clean up garden debris to prevent disease carryover",
                "Reduce watering as temperatures cool",
            ],
            Season::Winter => &[
                "Protect overwintering crops with row covers or cold frames",
                "Monitor soil moisture in protected areas",
                "Plan next season's garden",
                "Order seeds for next growing season",
            ],
        }
    }

    fn preparation_tips(&self) -> &'static [&'static str] {
        match self {
            Season::Spring => &[
                "Start seeds indoors for warm-season crops",
                "Prepare soil with compost and amendments",
                "Clean and sharpen gardening tools",
                "Set up irrigation systems before planting",
            ],
            Season::Summer => &[
                "Install shade cloth for heat-sensitive plants",
                "Set up consistent watering system",
                "Mulch extensively to conserve moisture",
                "Plan succession plantings for continual harvest",
            ],
            Season::Fall => &[
                "Start seeds for fall crops in a cool, shaded area",
                "Prepare areas where summer crops will be removed",
                "Add compost to replenish soil nutrients",
                "Have frost protection ready for late season",
            ],
            Season::Winter => &[
                "Install cold frames or hoop houses",
                "Add heavy mulch to protect perennial crops",
                "Plant cover crops in empty beds",
                "Set up protection for winter harvests",
            ],
        }
    }

    /// Plant list for a season, with southern-hemisphere spring extras
    fn plants_for(&self, hemisphere: Hemisphere) -> Vec<&'static str> {
        let mut plants = self.plants().to_vec();
        if *self == Season::Spring && hemisphere == Hemisphere::Southern {
            plants.extend_from_slice(SOUTHERN_SPRING_EXTRAS);
        }
        plants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonalTemperatures {
    pub spring: f64,
    pub summer: f64,
    pub fall: f64,
    pub winter: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub precipitation_probability: f64, // %
    pub condition: WeatherCondition,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentSeasonPlan {
    pub season: Season,
    pub plants_to_maintain: Vec<&'static str>,
    pub harvest_soon: Vec<&'static str>,
    pub care_tips: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextSeasonPlan {
    pub season: Season,
    pub plants_to_start: Vec<&'static str>,
    pub preparation_tips: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantingRecommendations {
    pub current_season: CurrentSeasonPlan,
    pub next_season: NextSeasonPlan,
}

impl PlantingRecommendations {
    pub fn new(current: Season, hemisphere: Hemisphere) -> Self {
        let next = current.next();
        Self {
            current_season: CurrentSeasonPlan {
                season: current,
                plants_to_maintain: current.plants_for(hemisphere),
                harvest_soon: current.harvest_soon().to_vec(),
                care_tips: current.care_tips().to_vec(),
            },
            next_season: NextSeasonPlan {
                season: next,
                plants_to_start: next.plants_for(hemisphere),
                preparation_tips: next.preparation_tips().to_vec(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowingSeasonReport {
    pub city: String,
    pub hemisphere: Hemisphere,
    pub current_season: Season,
    pub next_season: Season,
    pub seasonal_temperatures: SeasonalTemperatures,
    pub five_day_forecast: Vec<ForecastDay>,
    pub planting_recommendations: PlantingRecommendations,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowingSeasonFallback {
    pub city: String,
    pub error: String,
    pub planting_recommendations: Vec<&'static str>,
    pub timestamp: NaiveDateTime,
}

fn seasonal_temperatures(
    normals: Option<&ClimateNormals>,
    hemisphere: Hemisphere,
) -> Result<SeasonalTemperatures> {
    let temp = |season: Season| -> Result<f64> {
        match normals {
            Some(n) => Ok(round_to(n.mean_of(&season.months(hemisphere))?, 1)),
            None => Ok(season.default_temp()),
        }
    };
    Ok(SeasonalTemperatures {
        spring: temp(Season::Spring)?,
        summer: temp(Season::Summer)?,
        fall: temp(Season::Fall)?,
        winter: temp(Season::Winter)?,
    })
}

impl Advisor<'_> {
    /// Season outlook and planting plan. Without normals the city is assumed northern.
    pub fn growing_season(
        &mut self,
        weather: &WeatherSnapshot,
        normals: Option<&ClimateNormals>,
    ) -> Advisory<GrowingSeasonReport, GrowingSeasonFallback> {
        let now = self.now();
        let city = weather.location.city.clone();
        or_fallback("growing season forecast", self.try_growing_season(weather, normals), |error| {
            GrowingSeasonFallback {
                city,
                error,
                planting_recommendations: vec![
                    "Check local gardening resources for specific planting dates in your region",
                    "Consider starting seeds indoors for transplanting later",
                    "Monitor soil temperature before planting heat-loving crops",
                ],
                timestamp: now,
            }
        })
    }

    fn try_growing_season(
        &self,
        weather: &WeatherSnapshot,
        normals: Option<&ClimateNormals>,
    ) -> Result<GrowingSeasonReport> {
        let hemisphere = normals.map_or(Hemisphere::Northern, ClimateNormals::hemisphere);
        let current = Season::for_month(self.today().month(), hemisphere);
        let seasonal_temperatures = seasonal_temperatures(normals, hemisphere)?;

        let five_day_forecast = self
            .daily(weather)
            .into_iter()
            .take(FORECAST_DAYS)
            .map(|d| ForecastDay {
                day_name: d.day_name(),
                date: d.date,
                min_temp: round_to(d.min_temp, 1),
                max_temp: round_to(d.max_temp, 1),
                precipitation_probability: round_to(d.precipitation_probability * 100.0, 1),
                condition: d.condition,
            })
            .collect();

        Ok(GrowingSeasonReport {
            city: weather.location.city.clone(),
            hemisphere,
            current_season: current,
            next_season: current.next(),
            seasonal_temperatures,
            five_day_forecast,
            planting_recommendations: PlantingRecommendations::new(current, hemisphere),
            timestamp: self.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{advisor, mild_snapshot, noon};
    use super::*;

    fn southern_normals() -> ClimateNormals {
        ClimateNormals::new(vec![
            26.0, 26.0, 24.0, 21.0, 17.0, 14.0, 13.0, 14.0, 16.0, 19.0, 22.0, 24.0,
        ])
        .unwrap()
    }

    #[test]
    fn seasons_flip_south_of_the_equator() {
        assert_eq!(Season::for_month(7, Hemisphere::Northern), Season::Summer);
        assert_eq!(Season::for_month(7, Hemisphere::Southern), Season::Winter);
        assert_eq!(Season::for_month(10, Hemisphere::Southern), Season::Spring);
        assert_eq!(Season::Spring.months(Hemisphere::Southern), [9, 10, 11]);
        assert_eq!(Season::Fall.next(), Season::Winter);
    }

    #[test]
    fn southern_spring_gets_extra_plants() {
        let recs = PlantingRecommendations::new(Season::Winter, Hemisphere::Southern);
        assert_eq!(recs.next_season.season, Season::Spring);
        assert_eq!(recs.next_season.plants_to_start.len(), 9);
        assert!(recs.next_season.plants_to_start.contains(&"Passion Fruit"));
        assert_eq!(recs.current_season.plants_to_maintain.len(), 5);

        let north = PlantingRecommendations::new(Season::Winter, Hemisphere::Northern);
        assert_eq!(north.next_season.plants_to_start.len(), 6);
    }

    #[test]
    fn defaults_without_normals() {
        let now = noon(2024, 7, 10);
        let snap = mild_snapshot(now.date(), 40.0);
        let report = advisor(now).growing_season(&snap, None).ready().unwrap();
        assert_eq!(report.hemisphere, Hemisphere::Northern);
        assert_eq!(report.current_season, Season::Summer);
        assert_eq!(report.next_season, Season::Fall);
        assert_eq!(report.seasonal_temperatures.winter, 5.0);
        assert_eq!(report.five_day_forecast.len(), 5);
        assert_eq!(report.five_day_forecast[0].precipitation_probability, 5.0);
    }

    #[test]
    fn southern_city_in_july() {
        let now = noon(2024, 7, 10);
        let snap = mild_snapshot(now.date(), -33.9);
        let normals = southern_normals();
        let report = advisor(now).growing_season(&snap, Some(&normals)).ready().unwrap();
        assert_eq!(report.hemisphere, Hemisphere::Southern);
        assert_eq!(report.current_season, Season::Winter);
        assert_eq!(report.seasonal_temperatures.summer, 25.3);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hemisphere"], "Southern");
        assert_eq!(json["planting_recommendations"]["next_season"]["season"], "spring");
    }

    #[test]
    fn malformed_normals_fall_back() {
        let now = noon(2024, 7, 10);
        let snap = mild_snapshot(now.date(), 40.0);
        let normals = ClimateNormals {
            monthly_temps: vec![12.0; 4],
        };
        let fallback = advisor(now)
            .growing_season(&snap, Some(&normals))
            .degraded()
            .unwrap();
        assert_eq!(fallback.planting_recommendations.len(), 3);
        assert!(fallback.error.contains("no normal for month"));
    }
}
