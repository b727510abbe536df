use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Activity,
    Seasonal,
    Agricultural,
    Pattern,
    System,
}

impl NotificationKind {
    /// Lower number sorts first
    pub fn priority(&self) -> u8 {
        match self {
            NotificationKind::Warning | NotificationKind::System => 1,
            NotificationKind::Activity => 2,
            NotificationKind::Seasonal | NotificationKind::Agricultural => 3,
            NotificationKind::Pattern => 4,
        }
    }
}

/// A consecutive-day run found by a scanner, with its rendered message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule_id: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub run_length: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendType {
    Warming,
    Cooling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Deteriorating,
    Improving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    PersistentRain,
    PersistentClear,
    TempDrop,
    TempSurge,
    WeekendForecast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgriculturalType {
    Watering,
    WateringSkip,
    Frost,
    Heat,
    PestRisk,
    PlantStress,
}

/// Supporting fields flattened into the notification object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NotificationDetail {
    Warning {
        warning_type: &'static str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        consecutive_days: usize,
    },
    Activity {
        activity_type: &'static str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        consecutive_days: usize,
    },
    Event {
        event_name: &'static str,
        event_date: NaiveDate,
        days_away: i64,
    },
    Trend {
        trend_type: TrendType,
        temperature_change: f64,
    },
    ConditionChange {
        change_type: ChangeType,
    },
    Streak {
        pattern_type: PatternType,
        days: usize,
    },
    TemperatureDrop {
        pattern_type: PatternType,
        drop_amount: f64,
    },
    TemperatureSurge {
        pattern_type: PatternType,
        rise_amount: f64,
    },
    Weekend {
        pattern_type: PatternType,
        will_rain: bool,
        avg_temp: f64,
    },
    Agricultural {
        notification_type: AgriculturalType,
    },
    Risk {
        notification_type: AgriculturalType,
        risk_type: &'static str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        consecutive_days: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: u8,
    pub message: String,
    pub icon: &'static str,
    #[serde(flatten)]
    pub detail: Option<NotificationDetail>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, icon: &'static str) -> Self {
        Self {
            kind,
            priority: kind.priority(),
            message: message.into(),
            icon,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: NotificationDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_flattens_detail() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let n = Notification::new(NotificationKind::Activity, "Go hiking", "hiking").with_detail(
            NotificationDetail::Activity {
                activity_type: "hiking",
                start_date: date,
                end_date: date,
                consecutive_days: 1,
            },
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "activity");
        assert_eq!(json["priority"], 2);
        assert_eq!(json["activity_type"], "hiking");
        assert_eq!(json["start_date"], "2024-06-03");
    }

    #[test]
    fn system_notification_has_no_detail_fields() {
        let n = Notification::new(NotificationKind::System, "Updating", "sync");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
