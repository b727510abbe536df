use crate::logic::calculations::{pest_risk_factor, RiskLevel};
use crate::models::DailySummary;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSubject {
    Pest,
    PlantStress,
}

/// Favorable-condition ranges for a pest, disease or plant stressor
#[derive(Debug, Clone, Serialize)]
pub struct RiskRule {
    #[serde(skip)]
    pub id: &'static str,
    #[serde(skip)]
    pub subject: RiskSubject,
    pub favorable_temp: (f64, f64),
    pub favorable_humidity: (f64, f64),
    #[serde(skip)]
    pub rain_sensitive: bool,
    pub description: &'static str,
    pub control_methods: &'static [&'static str],
    #[serde(skip)]
    pub min_days: usize,
    #[serde(skip)]
    pub icon: &'static str,
    #[serde(skip)]
    pub templates: &'static [&'static str],
}

impl RiskRule {
    /// 0-10 risk factor for one day
    pub fn factor(&self, day: &DailySummary) -> f64 {
        pest_risk_factor(
            self.favorable_temp,
            self.favorable_humidity,
            self.rain_sensitive,
            day.avg_temp,
            day.avg_humidity,
            day.precipitation_probability,
        )
    }

    pub fn level(&self, day: &DailySummary) -> RiskLevel {
        RiskLevel::from_factor(self.factor(day))
    }

    /// "slugs_snails" -> "Slugs Snails"
    pub fn display_name(&self) -> String {
        self.id
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const PEST_TEMPLATES: &[&str] = &[
    "Pest watch: conditions favor {name} for {days} consecutive days.",
    "Garden pest alert: {days} days of weather that lets {name} thrive. Inspect plants closely.",
    "Plant health notice: high {name} risk expected over the next {days} days.",
];

const STRESS_TEMPLATES: &[&str] = &[
    "Plant stress alert: {days} days of conditions likely to cause {name}.",
    "Crop care notice: expect {name} over the next {days} days. Protect tender plants.",
];

pub(super) fn builtin() -> Vec<RiskRule> {
    vec![
        RiskRule {
            id: "aphids",
            subject: RiskSubject::Pest,
            favorable_temp: (20.0, 30.0),
            favorable_humidity: (60.0, 90.0),
            rain_sensitive: false,
            description: "Small sap-sucking insects that can quickly multiply in warm conditions",
            control_methods: &["Introduce beneficial insects", "Neem oil spray", "Insecticidal soap"],
            min_days: 2,
            icon: "bug",
            templates: PEST_TEMPLATES,
        },
        RiskRule {
            id: "slugs_snails",
            subject: RiskSubject::Pest,
            favorable_temp: (5.0, 25.0),
            favorable_humidity: (70.0, 100.0),
            rain_sensitive: true,
            description: "Mollusks that feed on plant leaves and are most active in moist conditions",
            control_methods: &["Diatomaceous earth barriers", "Beer traps", "Copper tape barriers"],
            min_days: 2,
            icon: "bug",
            templates: PEST_TEMPLATES,
        },
        RiskRule {
            id: "spider_mites",
            subject: RiskSubject::Pest,
            favorable_temp: (27.0, 38.0),
            favorable_humidity: (20.0, 40.0),
            rain_sensitive: false,
            description: "Tiny pests that thrive in hot, dry conditions and cause stippling on leaves",
            control_methods: &["Increase humidity", "Neem oil", "Predatory mites"],
            min_days: 2,
            icon: "bug",
            templates: PEST_TEMPLATES,
        },
        RiskRule {
            id: "powdery_mildew",
            subject: RiskSubject::Pest,
            favorable_temp: (15.0, 28.0),
            favorable_humidity: (50.0, 90.0),
            rain_sensitive: false,
            description: "Fungal disease causing white powdery spots on leaves in warm, humid conditions",
            control_methods: &["Improve air circulation", "Baking soda spray", "Fungicides"],
            min_days: 2,
            icon: "bug",
            templates: PEST_TEMPLATES,
        },
        RiskRule {
            id: "late_blight",
            subject: RiskSubject::Pest,
            favorable_temp: (10.0, 24.0),
            favorable_humidity: (75.0, 100.0),
            rain_sensitive: true,
            description: "Fungal disease affecting tomatoes and potatoes, thrives in cool, wet conditions",
            control_methods: &["Copper fungicides", "Proper spacing", "Avoid overhead watering"],
            min_days: 2,
            icon: "bug",
            templates: PEST_TEMPLATES,
        },
        RiskRule {
            id: "plant_heat_stress",
            subject: RiskSubject::PlantStress,
            favorable_temp: (30.0, 50.0),
            favorable_humidity: (0.0, 40.0),
            rain_sensitive: false,
            description: "Hot, dry air drives wilting and blossom drop in most vegetable crops",
            control_methods: &[
                "Water deeply at dawn",
                "Apply shade cloth over tender crops",
                "Mulch to keep roots cool",
            ],
            min_days: 2,
            icon: "seedling-alert",
            templates: STRESS_TEMPLATES,
        },
        RiskRule {
            id: "plant_chill_stress",
            subject: RiskSubject::PlantStress,
            favorable_temp: (-10.0, 5.0),
            favorable_humidity: (60.0, 100.0),
            rain_sensitive: false,
            description: "Cold, damp conditions slow root growth and invite rot in seedlings",
            control_methods: &[
                "Delay transplanting",
                "Use row covers overnight",
                "Avoid watering late in the day",
            ],
            min_days: 2,
            icon: "seedling-alert",
            templates: STRESS_TEMPLATES,
        },
    ]
}
