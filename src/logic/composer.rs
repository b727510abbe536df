use crate::models::Notification;
use std::collections::HashSet;

pub const DEFAULT_NOTIFICATION_CAP: usize = 10;

/// Generated notifications, one list per category
#[derive(Debug, Clone, Default)]
pub struct NotificationBatch {
    pub warnings: Vec<Notification>,
    pub activities: Vec<Notification>,
    pub seasonal: Vec<Notification>,
    pub agricultural: Vec<Notification>,
    pub patterns: Vec<Notification>,
}

impl NotificationBatch {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
            + self.activities.len()
            + self.seasonal.len()
            + self.agricultural.len()
            + self.patterns.len()
    }
}

/// Merges categories into one prioritized, capped list
#[derive(Debug, Clone, Copy)]
pub struct NotificationComposer {
    cap: usize,
}

impl NotificationComposer {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Lower-priority categories may be dropped entirely once the cap is reached.
    pub fn compose(&self, batch: NotificationBatch) -> Vec<Notification> {
        let NotificationBatch {
            warnings,
            activities,
            seasonal,
            agricultural,
            patterns,
        } = batch;

        let mut seen = HashSet::new();
        let mut merged: Vec<Notification> = warnings
            .into_iter()
            .chain(activities)
            .chain(seasonal)
            .chain(agricultural)
            .chain(patterns)
            .filter(|n| seen.insert((n.kind, n.message.clone())))
            .collect();

        // sort_by_key is stable: ties keep category order
        merged.sort_by_key(|n| n.priority);
        merged.truncate(self.cap);
        merged
    }
}

impl Default for NotificationComposer {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;

    fn note(kind: NotificationKind, msg: &str) -> Notification {
        Notification::new(kind, msg, "icon")
    }

    fn batch() -> NotificationBatch {
        NotificationBatch {
            warnings: vec![note(NotificationKind::Warning, "w1")],
            activities: (0..4)
                .map(|i| note(NotificationKind::Activity, &format!("a{}", i)))
                .collect(),
            seasonal: vec![note(NotificationKind::Seasonal, "s1")],
            agricultural: vec![note(NotificationKind::Agricultural, "g1")],
            patterns: vec![
                note(NotificationKind::Pattern, "p1"),
                note(NotificationKind::Pattern, "p2"),
            ],
        }
    }

    #[test]
    fn output_is_sorted_and_capped() {
        let composer = NotificationComposer::new(5);
        let out = composer.compose(batch());
        assert_eq!(out.len(), 5);
        assert!(out.windows(2).all(|w| w[0].priority <= w[1].priority));
        // patterns dropped entirely
        assert!(out.iter().all(|n| n.kind != NotificationKind::Pattern));
    }

    #[test]
    fn seasonal_precedes_agricultural_at_equal_priority() {
        let out = NotificationComposer::default().compose(batch());
        assert_eq!(out.len(), 9);
        let s = out.iter().position(|n| n.message == "s1").unwrap();
        let g = out.iter().position(|n| n.message == "g1").unwrap();
        assert!(s < g);
        assert_eq!(out[0].message, "w1");
    }

    #[test]
    fn duplicates_are_removed() {
        let mut b = batch();
        b.activities.push(note(NotificationKind::Activity, "a0"));
        // same text under another type is kept
        b.patterns.push(note(NotificationKind::Pattern, "a0"));
        let out = NotificationComposer::new(100).compose(b);
        assert_eq!(out.iter().filter(|n| n.message == "a0").count(), 2);
    }

    #[test]
    fn zero_cap_yields_nothing() {
        assert!(NotificationComposer::new(0).compose(batch()).is_empty());
        assert_eq!(batch().len(), 9);
        assert!(NotificationBatch::default().is_empty());
    }
}
