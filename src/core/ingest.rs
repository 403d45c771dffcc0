use crate::core::tier::resolve_tier;
use crate::core::zone_map::AXIS_RANGE;
use crate::domain::model::{AnomalyKind, Record, RecordAnomaly, StudentRecord, Table};
use crate::utils::error::{Result, ZoneError};

pub const PERSON_ID_COLUMN: &str = "PERSON_ID";
pub const STEM_COLUMN: &str = "STEM_AVG";
pub const LANGUAGE_COLUMN: &str = "LANGUAGE_AVG";

#[derive(Debug, Clone, Default)]
pub struct IngestedBatch {
    pub students: Vec<StudentRecord>,
    pub anomalies: Vec<RecordAnomaly>,
}

/// Both score columns must exist before any row is looked at; a table
/// missing either one is rejected as a whole.
pub fn check_required_columns(table: &Table, focus: &str) -> Result<()> {
    let missing: Vec<String> = [STEM_COLUMN, LANGUAGE_COLUMN]
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ZoneError::MissingColumns {
            focus: focus.to_string(),
            missing,
        })
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_score(value: Option<&serde_json::Value>) -> std::result::Result<f64, String> {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|score| score.is_finite())
        .ok_or_else(|| value.map(cell_text).unwrap_or_default())
}

fn person_id(record: &Record) -> Option<String> {
    record
        .get(PERSON_ID_COLUMN)
        .map(cell_text)
        .filter(|id| !id.is_empty())
}

/// Turns raw rows into student records for one focus area.
///
/// Rows whose scores are not numbers are dropped and reported. Scores
/// outside the axis range are kept as-is and reported.
pub fn ingest(table: &Table, focus: &str) -> Result<IngestedBatch> {
    check_required_columns(table, focus)?;

    let mut batch = IngestedBatch::default();

    for (index, record) in table.records.iter().enumerate() {
        let row = index + 1;
        let id = match person_id(record) {
            Some(id) => id,
            None => {
                let generated = format!("row-{}", row);
                tracing::debug!("{} row {} has no {}, using {}", focus, row, PERSON_ID_COLUMN, generated);
                batch.anomalies.push(RecordAnomaly {
                    row,
                    person_id: generated.clone(),
                    kind: AnomalyKind::MissingPersonId,
                });
                generated
            }
        };

        let mut scores = [0.0; 2];
        let mut rejected = false;
        for (slot, column) in [STEM_COLUMN, LANGUAGE_COLUMN].iter().enumerate() {
            match parse_score(record.get(column)) {
                Ok(score) => {
                    if score < AXIS_RANGE.0 || score > AXIS_RANGE.1 {
                        tracing::warn!(
                            "⚠️ {} row {} ({}): {} = {} is outside {:?}, classifying raw value",
                            focus,
                            row,
                            id,
                            column,
                            score,
                            AXIS_RANGE
                        );
                        batch.anomalies.push(RecordAnomaly {
                            row,
                            person_id: id.clone(),
                            kind: AnomalyKind::OutOfRange {
                                column: column.to_string(),
                                value: score,
                            },
                        });
                    }
                    scores[slot] = score;
                }
                Err(raw) => {
                    tracing::warn!(
                        "⚠️ {} row {} ({}): {} = {:?} is not a number, row skipped",
                        focus,
                        row,
                        id,
                        column,
                        raw
                    );
                    batch.anomalies.push(RecordAnomaly {
                        row,
                        person_id: id.clone(),
                        kind: AnomalyKind::NonNumericScore {
                            column: column.to_string(),
                            value: raw,
                        },
                    });
                    rejected = true;
                }
            }
        }

        if rejected {
            continue;
        }

        batch.students.push(StudentRecord {
            person_id: id,
            stem_score: scores[0],
            language_score: scores[1],
            tier: resolve_tier(record, focus),
        });
    }

    Ok(batch)
}
