use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display severity shared by every advisory payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthConcern {
    Asthma,
    Copd,
    HeartDisease,
    Allergies,
}

impl HealthConcern {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "asthma" => Some(HealthConcern::Asthma),
            "copd" => Some(HealthConcern::Copd),
            "heart_disease" | "heart" => Some(HealthConcern::HeartDisease),
            "allergies" | "allergy" => Some(HealthConcern::Allergies),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(ActivityLevel::Low),
            "moderate" => Some(ActivityLevel::Moderate),
            "high" => Some(ActivityLevel::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    #[default]
    Adult,
    Senior,
}

impl AgeGroup {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "child" => Some(AgeGroup::Child),
            "adult" => Some(AgeGroup::Adult),
            "senior" => Some(AgeGroup::Senior),
            _ => None,
        }
    }
}

/// Personal risk factors used to tailor health advisories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    #[serde(default)]
    pub concerns: Vec<HealthConcern>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub age_group: AgeGroup,
}

impl HealthProfile {
    pub fn has(&self, concern: HealthConcern) -> bool {
        self.concerns.contains(&concern)
    }

    /// Build a profile from loose user input. Unknown values are ignored or defaulted.
    pub fn from_inputs(concerns: &[String], activity: Option<&str>, age: Option<&str>) -> Self {
        let mut parsed = Vec::new();
        for raw in concerns {
            match HealthConcern::from_str(raw) {
                Some(c) if !parsed.contains(&c) => parsed.push(c),
                Some(_) => {}
                None => tracing::warn!("Ignoring unknown health concern '{}'", raw),
            }
        }
        Self {
            concerns: parsed,
            activity_level: activity
                .and_then(ActivityLevel::from_str)
                .unwrap_or_default(),
            age_group: age.and_then(AgeGroup::from_str).unwrap_or_default(),
        }
    }
}

/// Externally resolved air quality observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiReading {
    pub aqi: f64,
    #[serde(default)]
    pub pollutants: BTreeMap<String, f64>,
    #[serde(default)]
    pub main_pollutant: Option<String>,
}

impl AqiReading {
    pub fn new(aqi: f64) -> Self {
        Self {
            aqi,
            pollutants: BTreeMap::new(),
            main_pollutant: None,
        }
    }

    /// Parse `name=value` pollutant pairs, skipping malformed entries
    pub fn with_pollutants(mut self, pairs: &[String]) -> Self {
        for pair in pairs {
            let parsed = pair
                .split_once('=')
                .and_then(|(k, v)| v.trim().parse::<f64>().ok().map(|v| (k.trim(), v)));
            match parsed {
                Some((name, value)) => {
                    self.pollutants.insert(name.to_string(), value);
                }
                None => tracing::warn!("Ignoring malformed pollutant '{}'", pair),
            }
        }
        self.main_pollutant = self
            .pollutants
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_from_loose_inputs() {
        let profile = HealthProfile::from_inputs(
            &["Asthma".into(), "heart-disease".into(), "gout".into(), "asthma".into()],
            Some("HIGH"),
            Some("elder"),
        );
        assert_eq!(
            profile.concerns,
            vec![HealthConcern::Asthma, HealthConcern::HeartDisease]
        );
        assert_eq!(profile.activity_level, ActivityLevel::High);
        assert_eq!(profile.age_group, AgeGroup::Adult);
    }

    #[test]
    fn aqi_reading_picks_main_pollutant() {
        let reading = AqiReading::new(120.0)
            .with_pollutants(&["pm2_5=41.0".into(), "o3=12".into(), "bogus".into()]);
        assert_eq!(reading.pollutants.len(), 2);
        assert_eq!(reading.main_pollutant.as_deref(), Some("pm2_5"));
    }
}
