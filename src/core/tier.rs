use crate::domain::model::{Record, StudentRecord};

/// Known tiers, highest first, with their marker colours.
pub const TIER_PALETTE: [(&str, &str); 5] = [
    ("Diamond", "#00ff2f"),
    ("Platinum", "#8e44ad"),
    ("Gold", "#f1c40f"),
    ("Silver", "#5dade2"),
    ("Bronze", "#c0392b"),
];

pub const UNKNOWN_TIER_COLOR: &str = "#888888";

/// Legend name of the catch-all group in a tiered batch.
pub const UNASSIGNED_TIER: &str = "Unassigned";

pub fn tier_column(focus: &str) -> String {
    format!("TIER_{}", focus)
}

/// Tier of one raw row for the given focus area. Blank cells, nulls and
/// a missing column all resolve to `None`.
pub fn resolve_tier(record: &Record, focus: &str) -> Option<String> {
    let value = record.get(&tier_column(focus))?;
    let text = match value {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

pub fn tier_color(tier: &str) -> &'static str {
    TIER_PALETTE
        .iter()
        .find(|(name, _)| *name == tier)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_TIER_COLOR)
}

fn tier_rank(tier: &str) -> usize {
    TIER_PALETTE
        .iter()
        .position(|(name, _)| *name == tier)
        .unwrap_or(TIER_PALETTE.len())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierGroup<'a> {
    /// `None` is the catch-all group: every student when grouping is off,
    /// or the students without a tier when it is on.
    pub tier: Option<String>,
    pub members: Vec<&'a StudentRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierGrouping<'a> {
    pub active: bool,
    pub groups: Vec<TierGroup<'a>>,
}

impl<'a> TierGrouping<'a> {
    /// Grouping switches on for the whole batch as soon as one student has
    /// a tier. Groups follow palette order, then unknown tiers by name,
    /// then the untiered students.
    ///
    /// An active batch yields one group per distinct tier plus at most one
    /// catch-all group. Students whose tier is literally `Unassigned` join
    /// the catch-all group so the legend never shows that name twice.
    pub fn for_batch(students: &'a [StudentRecord]) -> Self {
        let active = students.iter().any(|s| s.tier.is_some());
        if !active {
            let groups = if students.is_empty() {
                Vec::new()
            } else {
                vec![TierGroup {
                    tier: None,
                    members: students.iter().collect(),
                }]
            };
            return Self { active, groups };
        }

        let mut groups: Vec<TierGroup<'a>> = Vec::new();
        for student in students {
            let tier = student
                .tier
                .as_deref()
                .filter(|tier| *tier != UNASSIGNED_TIER);
            match groups.iter_mut().find(|g| g.tier.as_deref() == tier) {
                Some(group) => group.members.push(student),
                None => groups.push(TierGroup {
                    tier: tier.map(str::to_string),
                    members: vec![student],
                }),
            }
        }

        groups.sort_by(|a, b| match (&a.tier, &b.tier) {
            (Some(x), Some(y)) => (tier_rank(x), x).cmp(&(tier_rank(y), y)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Self { active, groups }
    }

    pub fn distinct_tiers(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter_map(|g| g.tier.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        let data: HashMap<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Record { data }
    }

    #[test]
    fn test_resolve_tier_uses_focus_column() {
        let row = record(&[("TIER_LANGUAGE", json!(" Gold ")), ("TIER_ALL", json!(""))]);
        assert_eq!(resolve_tier(&row, "LANGUAGE").as_deref(), Some("Gold"));
        assert_eq!(resolve_tier(&row, "ALL"), None);
        assert_eq!(resolve_tier(&row, "MATH_SCIENCE"), None);
        assert_eq!(resolve_tier(&record(&[("TIER_ALL", json!(null))]), "ALL"), None);
    }

    #[test]
    fn test_all_empty_tiers_stay_uniform() {
        let students = vec![
            StudentRecord::new("A", 10.0, 10.0),
            StudentRecord::new("B", 90.0, 90.0),
        ];
        let grouping = TierGrouping::for_batch(&students);
        assert!(!grouping.active);
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].tier, None);
        assert_eq!(grouping.groups[0].members.len(), 2);
    }

    #[test]
    fn test_one_tier_activates_whole_batch() {
        let students = vec![
            StudentRecord::new("A", 10.0, 10.0),
            StudentRecord::new("B", 90.0, 90.0).with_tier("Silver"),
            StudentRecord::new("C", 60.0, 60.0).with_tier("Diamond"),
            StudentRecord::new("D", 70.0, 60.0).with_tier("Silver"),
            StudentRecord::new("E", 70.0, 20.0).with_tier("Rookie"),
        ];
        let grouping = TierGrouping::for_batch(&students);
        assert!(grouping.active);
        assert_eq!(grouping.distinct_tiers(), vec!["Diamond", "Silver", "Rookie"]);
        assert_eq!(grouping.groups.len(), 4);
        assert_eq!(grouping.groups[1].members.len(), 2);
        assert_eq!(grouping.groups[3].tier, None);
        assert_eq!(grouping.groups[3].members[0].person_id, "A");
    }

    #[test]
    fn test_literal_unassigned_tier_joins_catch_all_group() {
        let students = vec![
            StudentRecord::new("A", 10.0, 10.0),
            StudentRecord::new("B", 90.0, 90.0).with_tier("Unassigned"),
            StudentRecord::new("C", 60.0, 60.0).with_tier("Gold"),
        ];
        let grouping = TierGrouping::for_batch(&students);
        assert!(grouping.active);
        assert_eq!(grouping.distinct_tiers(), vec!["Gold"]);
        assert_eq!(grouping.groups.len(), 2);
        assert_eq!(grouping.groups[1].tier, None);
        let ids: Vec<&str> = grouping.groups[1]
            .members
            .iter()
            .map(|s| s.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_batch_has_no_groups() {
        let grouping = TierGrouping::for_batch(&[]);
        assert!(!grouping.active);
        assert!(grouping.groups.is_empty());
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(tier_color("Gold"), "#f1c40f");
        assert_eq!(tier_color("gold"), UNKNOWN_TIER_COLOR);
    }
}
