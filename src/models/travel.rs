use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteMode {
    #[default]
    Drive,
    Transit,
    Bike,
    Walk,
}

impl CommuteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommuteMode::Drive => "drive",
            CommuteMode::Transit => "transit",
            CommuteMode::Bike => "bike",
            CommuteMode::Walk => "walk",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drive" | "car" => Some(CommuteMode::Drive),
            "transit" | "bus" | "train" => Some(CommuteMode::Transit),
            "bike" | "cycle" => Some(CommuteMode::Bike),
            "walk" => Some(CommuteMode::Walk),
            _ => None,
        }
    }

    /// Parse a user-supplied mode, falling back to driving
    pub fn parse_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            tracing::warn!("Unknown commute mode '{}', assuming drive", s);
            CommuteMode::default()
        })
    }

    /// Scale applied to a weather delay factor
    pub fn delay_multiplier(&self) -> f64 {
        match self {
            CommuteMode::Drive => 1.0,
            CommuteMode::Transit => 0.8,
            CommuteMode::Bike => 1.5,
            CommuteMode::Walk => 2.0,
        }
    }

    pub fn is_exposed(&self) -> bool {
        matches!(self, CommuteMode::Bike | CommuteMode::Walk)
    }
}

impl std::fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mode_means_drive() {
        assert_eq!(CommuteMode::parse_or_default("Bus"), CommuteMode::Transit);
        assert_eq!(CommuteMode::parse_or_default(" cycle "), CommuteMode::Bike);
        assert_eq!(CommuteMode::parse_or_default("teleport"), CommuteMode::Drive);
        assert_eq!(CommuteMode::parse_or_default(""), CommuteMode::Drive);
    }
}
