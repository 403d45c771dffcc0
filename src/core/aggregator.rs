use crate::core::zone_map::ZoneLabel;
use crate::domain::model::{AggregateResult, BatchSummary, StudentRecord, ZoneAssignment};
use std::collections::BTreeMap;

pub fn aggregate(assignments: &[ZoneAssignment]) -> AggregateResult {
    let mut zone_counts: BTreeMap<ZoneLabel, usize> =
        ZoneLabel::ALL.iter().map(|zone| (*zone, 0)).collect();

    for assignment in assignments {
        *zone_counts.entry(assignment.zone_label).or_insert(0) += 1;
    }

    let total_students = assignments.len();
    let zone_percentages = if total_students > 0 {
        zone_counts
            .iter()
            .map(|(zone, count)| (*zone, *count as f64 / total_students as f64 * 100.0))
            .collect()
    } else {
        BTreeMap::new()
    };

    AggregateResult {
        total_students,
        zone_counts,
        zone_percentages,
    }
}

pub fn summarize(students: &[StudentRecord]) -> BatchSummary {
    let total_students = students.len();
    let mean = |score: fn(&StudentRecord) -> f64| {
        (total_students > 0)
            .then(|| students.iter().map(score).sum::<f64>() / total_students as f64)
    };

    BatchSummary {
        total_students,
        average_stem: mean(|s| s.stem_score),
        average_language: mean(|s| s.language_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify_batch;

    fn sample() -> Vec<StudentRecord> {
        vec![
            StudentRecord::new("A", 45.0, 30.0),
            StudentRecord::new("B", 90.0, 95.0),
            StudentRecord::new("C", 60.0, 65.0),
        ]
    }

    #[test]
    fn test_counts_are_zero_filled() {
        let result = aggregate(&classify_batch(&sample()));
        assert_eq!(result.total_students, 3);
        assert_eq!(result.zone_counts.len(), 9);
        assert_eq!(result.zone_counts[&ZoneLabel::WarningZone], 1);
        assert_eq!(result.zone_counts[&ZoneLabel::PerfectZone], 1);
        assert_eq!(result.zone_counts[&ZoneLabel::DevelopmentZone], 1);
        assert_eq!(result.zone_counts[&ZoneLabel::StemExpert], 0);
        assert_eq!(result.zone_counts.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let result = aggregate(&classify_batch(&sample()));
        let total: f64 = result.zone_percentages.values().sum();
        assert!((total - 100.0).abs() < 1e-6);
        assert!((result.zone_percentages[&ZoneLabel::WarningZone] - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.zone_percentages[&ZoneLabel::StemStrong], 0.0);
    }

    #[test]
    fn test_empty_input_has_no_percentages() {
        let result = aggregate(&[]);
        assert_eq!(result.total_students, 0);
        assert!(result.zone_percentages.is_empty());
        assert_eq!(result.zone_counts.values().sum::<usize>(), 0);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let students = sample();
        let first = aggregate(&classify_batch(&students));
        let second = aggregate(&classify_batch(&students));
        assert_eq!(first, second);
        for (a, b) in first.zone_percentages.values().zip(second.zone_percentages.values()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_students, 3);
        assert!((summary.average_stem.unwrap() - 65.0).abs() < 1e-9);
        assert!((summary.average_language.unwrap() - 190.0 / 3.0).abs() < 1e-9);
        assert_eq!(summarize(&[]).average_stem, None);
    }
}
