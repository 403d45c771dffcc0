use crate::core::zone_map::ZoneLabel;
use crate::domain::model::{AggregateResult, AnomalyKind, BatchReport, BatchSummary, RecordAnomaly};
use crate::utils::error::{Result, ZoneError};
use serde::Serialize;

/// Output files a batch can produce, keyed by the format names accepted in
/// `[output] formats`.
pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "json", "markdown"];

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Serialize)]
struct AssignmentRow<'a> {
    person_id: &'a str,
    stem_score: f64,
    language_score: f64,
    zone: ZoneLabel,
    tier: &'a str,
}

pub fn render_assignments_csv(report: &BatchReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for (student, assignment) in report.students.iter().zip(&report.assignments) {
        writer.serialize(AssignmentRow {
            person_id: &assignment.person_id,
            stem_score: student.stem_score,
            language_score: student.language_score,
            zone: assignment.zone_label,
            tier: assignment.tier.as_deref().unwrap_or(""),
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| ZoneError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ZoneError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[derive(Serialize)]
struct AggregateDocument<'a> {
    level: &'a str,
    focus: &'a str,
    generated_at: String,
    tier_active: bool,
    summary: &'a BatchSummary,
    aggregate: &'a AggregateResult,
    anomalies: &'a [RecordAnomaly],
}

pub fn render_aggregate_json(report: &BatchReport) -> Result<String> {
    let document = AggregateDocument {
        level: &report.level,
        focus: &report.focus,
        generated_at: report.generated_at.to_rfc3339(),
        tier_active: report.tier_active,
        summary: &report.summary,
        aggregate: &report.aggregate,
        anomalies: &report.anomalies,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

fn display_focus(focus: &str) -> String {
    focus
        .split('_')
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_markdown(report: &BatchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Performance Analysis: {} ({})\n\n",
        display_focus(&report.focus),
        report.level
    ));
    out.push_str(&format!(
        "_Generated {}_\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str(&format!("- Total Students: {}\n", report.summary.total_students));
    if let Some(avg) = report.summary.average_stem {
        out.push_str(&format!("- Average STEM Score: {:.1}\n", avg));
    }
    if let Some(avg) = report.summary.average_language {
        out.push_str(&format!("- Average Language Score: {:.1}\n", avg));
    }

    out.push_str("\n## Zone Distribution\n\n");
    if report.aggregate.total_students == 0 {
        out.push_str("No students in this batch.\n");
    }
    for (zone, count) in &report.aggregate.zone_counts {
        if let Some(percentage) = report.aggregate.zone_percentages.get(zone) {
            out.push_str(&format!(
                "- {}: {} students ({:.1}%)\n",
                zone, count, percentage
            ));
        }
    }

    if !report.anomalies.is_empty() {
        out.push_str("\n## Data Warnings\n\n");
        for anomaly in &report.anomalies {
            let detail = match &anomaly.kind {
                AnomalyKind::NonNumericScore { column, value } => {
                    format!("{} = {:?} is not a number; row skipped", column, value)
                }
                AnomalyKind::OutOfRange { column, value } => {
                    format!("{} = {} is outside 0-100; plotted as-is", column, value)
                }
                AnomalyKind::MissingPersonId => "no PERSON_ID; listed by row number".to_string(),
            };
            out.push_str(&format!("- Row {} ({}): {}\n", anomaly.row, anomaly.person_id, detail));
        }
    }

    out.push_str("\n## Zone Guide\n");
    for zone in ZoneLabel::ALL {
        let guidance = zone.guidance();
        out.push_str(&format!(
            "\n### {}\n\n- Situation: {}\n- Next steps: {}\n- Target: {}\n",
            zone, guidance.situation, guidance.next_steps, guidance.target
        ));
    }

    out
}

/// Renders the requested formats. `json` covers the aggregate and both
/// chart specs.
pub fn render_outputs(report: &BatchReport, formats: &[String]) -> Result<Vec<RenderedFile>> {
    let mut files = Vec::new();

    for format in formats {
        match format.as_str() {
            "csv" => files.push(RenderedFile {
                name: "assignments.csv".to_string(),
                contents: render_assignments_csv(report)?.into_bytes(),
            }),
            "json" => {
                files.push(RenderedFile {
                    name: "aggregate.json".to_string(),
                    contents: render_aggregate_json(report)?.into_bytes(),
                });
                files.push(RenderedFile {
                    name: "scatter_chart.json".to_string(),
                    contents: serde_json::to_vec_pretty(&report.scatter)?,
                });
                files.push(RenderedFile {
                    name: "distribution_chart.json".to_string(),
                    contents: serde_json::to_vec_pretty(&report.distribution)?,
                });
            }
            "markdown" => files.push(RenderedFile {
                name: "report.md".to_string(),
                contents: render_markdown(report).into_bytes(),
            }),
            other => {
                return Err(ZoneError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: other.to_string(),
                    reason: format!("Supported formats: {}", SUPPORTED_FORMATS.join(", ")),
                })
            }
        }
    }

    Ok(files)
}
