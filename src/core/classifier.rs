use crate::core::zone_map::{ZoneLabel, LANGUAGE_CUTS, STEM_CUTS};
use crate::domain::model::{StudentRecord, ZoneAssignment};

/// Index of the bracket `score` falls into: the number of cut points at or
/// below it. A score sitting exactly on a cut belongs to the higher bracket,
/// and anything outside [0, 100] lands in the nearest open-ended bracket.
pub fn bracket_index(score: f64, cuts: &[f64]) -> usize {
    cuts.iter().take_while(|&&cut| score >= cut).count()
}

pub fn classify(stem_score: f64, language_score: f64) -> ZoneLabel {
    ZoneLabel::from_grid_cell(
        bracket_index(stem_score, &STEM_CUTS),
        bracket_index(language_score, &LANGUAGE_CUTS),
    )
}

pub fn classify_record(record: &StudentRecord) -> ZoneAssignment {
    ZoneAssignment {
        person_id: record.person_id.clone(),
        zone_label: classify(record.stem_score, record.language_score),
        tier: record.tier.clone(),
    }
}

pub fn classify_batch(records: &[StudentRecord]) -> Vec<ZoneAssignment> {
    records.iter().map(classify_record).collect()
}
