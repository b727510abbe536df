pub mod activities;
pub mod calendar;
pub mod conditions;
pub mod risks;
pub mod warnings;

pub use activities::{ActivityRule, IdealConditions};
pub use calendar::SeasonalEvent;
pub use conditions::{ExternalConditions, ExternalMetric, NoSignals, ObservedConditions};
pub use risks::{RiskRule, RiskSubject};
pub use warnings::{WarningRule, WarningThreshold};

use std::sync::LazyLock;

static BUILTIN: LazyLock<RuleTables> = LazyLock::new(RuleTables::builtin);

/// A rule of any variant, borrowed from the tables
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    Activity(&'a ActivityRule),
    Warning(&'a WarningRule),
    Risk(&'a RiskRule),
}

impl Rule<'_> {
    pub fn id(&self) -> &'static str {
        match self {
            Rule::Activity(r) => r.id,
            Rule::Warning(r) => r.id,
            Rule::Risk(r) => r.id,
        }
    }

    pub fn min_days(&self) -> usize {
        match self {
            Rule::Activity(r) => r.min_days,
            Rule::Warning(r) => r.min_days,
            Rule::Risk(r) => r.min_days,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Rule::Activity(r) => r.icon,
            Rule::Warning(r) => r.icon,
            Rule::Risk(r) => r.icon,
        }
    }
}

/// Static rule data, built once and handed out by reference
#[derive(Debug, Clone)]
pub struct RuleTables {
    pub activities: Vec<ActivityRule>,
    pub warnings: Vec<WarningRule>,
    pub risks: Vec<RiskRule>,
    pub seasonal_events: Vec<SeasonalEvent>,
}

impl RuleTables {
    pub fn builtin() -> Self {
        Self {
            activities: activities::builtin(),
            warnings: warnings::builtin(),
            risks: risks::builtin(),
            seasonal_events: calendar::builtin(),
        }
    }

    /// Process-wide tables
    pub fn shared() -> &'static RuleTables {
        &BUILTIN
    }

    pub fn rules(&self) -> impl Iterator<Item = Rule<'_>> {
        self.warnings
            .iter()
            .map(Rule::Warning)
            .chain(self.activities.iter().map(Rule::Activity))
            .chain(self.risks.iter().map(Rule::Risk))
    }

    pub fn find(&self, rule_id: &str) -> Option<Rule<'_>> {
        self.rules().find(|r| r.id() == rule_id)
    }

    pub fn pests(&self) -> impl Iterator<Item = &RiskRule> {
        self.risks
            .iter()
            .filter(|r| r.subject == RiskSubject::Pest)
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::builtin()
    }
}
