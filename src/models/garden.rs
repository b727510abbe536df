use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Sandy,
    #[default]
    Loamy,
    Clay,
    Silty,
}

/// Physical constants for a soil class
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SoilProperties {
    pub water_holding_capacity: f64, // inches per foot
    pub infiltration_rate: f64,      // inches per hour
    pub drainage_rate: &'static str,
    pub description: &'static str,
}

const SANDY: SoilProperties = SoilProperties {
    water_holding_capacity: 0.5,
    infiltration_rate: 2.0,
    drainage_rate: "fast",
    description: "Sandy soils drain quickly and have low water retention",
};

const LOAMY: SoilProperties = SoilProperties {
    water_holding_capacity: 1.5,
    infiltration_rate: 0.5,
    drainage_rate: "moderate",
    description: "Loamy soils have balanced water retention and drainage",
};

const CLAY: SoilProperties = SoilProperties {
    water_holding_capacity: 2.5,
    infiltration_rate: 0.1,
    drainage_rate: "slow",
    description: "Clay soils retain water longer but have poor drainage",
};

const SILTY: SoilProperties = SoilProperties {
    water_holding_capacity: 2.0,
    infiltration_rate: 0.3,
    drainage_rate: "moderate-slow",
    description: "Silty soils hold more water than sandy soils but drain faster than clay",
};

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "sandy",
            SoilType::Loamy => "loamy",
            SoilType::Clay => "clay",
            SoilType::Silty => "silty",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sandy" | "sand" => Some(SoilType::Sandy),
            "loamy" | "loam" => Some(SoilType::Loamy),
            "clay" => Some(SoilType::Clay),
            "silty" | "silt" => Some(SoilType::Silty),
            _ => None,
        }
    }

    /// Parse a user-supplied soil name, falling back to loamy
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            tracing::warn!("Unknown soil type '{}', assuming loamy", s);
            SoilType::default()
        })
    }

    pub fn properties(&self) -> &'static SoilProperties {
        match self {
            SoilType::Sandy => &SANDY,
            SoilType::Loamy => &LOAMY,
            SoilType::Clay => &CLAY,
            SoilType::Silty => &SILTY,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaterNeeds {
    LowModerate,
    Moderate,
    ModerateHigh,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    Tomato,
    Lettuce,
    Cucumber,
    Carrot,
    Pepper,
    Onion,
    Potato,
    Spinach,
}

/// Growing requirements of a common garden plant
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlantProfile {
    pub ideal_temp_range: (f64, f64), // °C
    pub water_needs: WaterNeeds,
    pub frost_sensitive: bool,
    pub heat_sensitive: bool,
    pub drought_resistant: bool,
}

impl PlantType {
    pub const ALL: [PlantType; 8] = [
        PlantType::Tomato,
        PlantType::Lettuce,
        PlantType::Cucumber,
        PlantType::Carrot,
        PlantType::Pepper,
        PlantType::Onion,
        PlantType::Potato,
        PlantType::Spinach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantType::Tomato => "tomato",
            PlantType::Lettuce => "lettuce",
            PlantType::Cucumber => "cucumber",
            PlantType::Carrot => "carrot",
            PlantType::Pepper => "pepper",
            PlantType::Onion => "onion",
            PlantType::Potato => "potato",
            PlantType::Spinach => "spinach",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == wanted)
    }

    pub fn profile(&self) -> PlantProfile {
        let (lo, hi, water_needs, frost_sensitive, heat_sensitive) = match self {
            PlantType::Tomato => (18.0, 29.0, WaterNeeds::Moderate, true, false),
            PlantType::Lettuce => (10.0, 24.0, WaterNeeds::ModerateHigh, true, true),
            PlantType::Cucumber => (18.0, 30.0, WaterNeeds::High, true, false),
            PlantType::Carrot => (10.0, 25.0, WaterNeeds::Moderate, false, true),
            PlantType::Pepper => (18.0, 32.0, WaterNeeds::Moderate, true, false),
            PlantType::Onion => (13.0, 24.0, WaterNeeds::LowModerate, false, false),
            PlantType::Potato => (15.0, 24.0, WaterNeeds::Moderate, true, true),
            PlantType::Spinach => (7.0, 23.0, WaterNeeds::Moderate, false, true),
        };
        PlantProfile {
            ideal_temp_range: (lo, hi),
            water_needs,
            frost_sensitive,
            heat_sensitive,
            drought_resistant: false,
        }
    }

    /// Display name with a leading capital ("Tomato")
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for PlantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soil_type_from_str() {
        assert_eq!(SoilType::from_str("Clay"), Some(SoilType::Clay));
        assert_eq!(SoilType::from_str("loam"), Some(SoilType::Loamy));
        assert_eq!(SoilType::from_str("peat"), None);
        assert_eq!(SoilType::parse_or_default("peat"), SoilType::Loamy);
    }

    #[test]
    fn soil_properties_ordered_by_retention() {
        assert!(
            SoilType::Sandy.properties().water_holding_capacity
                < SoilType::Clay.properties().water_holding_capacity
        );
        assert!(
            SoilType::Sandy.properties().infiltration_rate
                > SoilType::Clay.properties().infiltration_rate
        );
    }

    #[test]
    fn plant_lookup_and_profile() {
        assert_eq!(PlantType::from_str("Lettuce"), Some(PlantType::Lettuce));
        assert_eq!(PlantType::from_str("kumquat"), None);

        let lettuce = PlantType::Lettuce.profile();
        assert!(lettuce.frost_sensitive && lettuce.heat_sensitive);
        assert_eq!(lettuce.water_needs, WaterNeeds::ModerateHigh);
        assert_eq!(PlantType::Tomato.title(), "Tomato");
    }
}
