use crate::core::chart::{DistributionChart, ScatterChart};
use crate::core::zone_map::ZoneLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One raw row as delivered by a data source, keyed by column header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.data.get(column)
    }
}

/// A fetched worksheet. Columns are kept separately so a header-only table
/// still reports which columns it has.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub person_id: String,
    pub stem_score: f64,
    pub language_score: f64,
    pub tier: Option<String>,
}

impl StudentRecord {
    pub fn new(person_id: impl Into<String>, stem_score: f64, language_score: f64) -> Self {
        Self {
            person_id: person_id.into(),
            stem_score,
            language_score,
            tier: None,
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    pub person_id: String,
    pub zone_label: ZoneLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total_students: usize,
    /// Every zone is present, zero-filled, in canonical order.
    pub zone_counts: BTreeMap<ZoneLabel, usize>,
    /// Empty when `total_students == 0`.
    pub zone_percentages: BTreeMap<ZoneLabel, f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_students: usize,
    pub average_stem: Option<f64>,
    pub average_language: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Row dropped: the score cannot be placed on its axis.
    NonNumericScore { column: String, value: String },
    /// Row kept and classified with the raw value.
    OutOfRange { column: String, value: f64 },
    /// Row kept under a generated id.
    MissingPersonId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAnomaly {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub person_id: String,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

/// Everything produced for one focus area of one grade level.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub level: String,
    pub focus: String,
    pub generated_at: DateTime<Utc>,
    pub tier_active: bool,
    pub students: Vec<StudentRecord>,
    pub assignments: Vec<ZoneAssignment>,
    pub aggregate: AggregateResult,
    pub summary: BatchSummary,
    pub anomalies: Vec<RecordAnomaly>,
    pub scatter: ScatterChart,
    pub distribution: DistributionChart,
}

/// What the presentation layer receives for each batch. Failures arrive
/// here as data instead of as errors.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Completed {
        report: Box<BatchReport>,
        output_path: String,
    },
    Failed {
        focus: String,
        message: String,
        suggestion: String,
        severity: crate::utils::error::ErrorSeverity,
    },
}

impl BatchOutcome {
    pub fn focus(&self) -> &str {
        match self {
            BatchOutcome::Completed { report, .. } => &report.focus,
            BatchOutcome::Failed { focus, .. } => focus,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Completed { .. })
    }
}
