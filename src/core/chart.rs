//! Declarative chart specifications for the zoning scatter plot and the
//! zone distribution pie. Nothing here draws pixels; a front end renders
//! the serialized specs.

use crate::core::tier::{tier_color, TierGrouping, UNASSIGNED_TIER, UNKNOWN_TIER_COLOR};
use crate::core::zone_map::{ZoneLabel, AXIS_RANGE, LANGUAGE_CUTS, STEM_CUTS, ZONE_MAP};
use crate::domain::model::{AggregateResult, StudentRecord};
use serde::Serialize;

const ZONE_OPACITY: f64 = 0.3;
const ZONE_LABEL_SIZE: u32 = 10;
const MARKER_SIZE: u32 = 20;
const MARKER_SYMBOL: &str = "diamond";
const UNIFORM_MARKER_COLOR: &str = "red";
const CHART_HEIGHT: u32 = 700;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Dash,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRect {
    pub zone: ZoneLabel,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub fill_color: String,
    pub opacity: f64,
    pub label_x: f64,
    pub label_y: f64,
    pub label_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideLine {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub dash: LineDash,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSeries {
    pub name: String,
    pub color: String,
    pub symbol: String,
    pub size: u32,
    pub outline_color: String,
    pub outline_width: f64,
    pub text_position: String,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend_title: String,
    pub height: u32,
    pub background: String,
    pub zones: Vec<ZoneRect>,
    pub guide_lines: Vec<GuideLine>,
    pub series: Vec<MarkerSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub zone: ZoneLabel,
    pub count: usize,
    pub percentage: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionChart {
    pub title: String,
    pub total: usize,
    pub slices: Vec<PieSlice>,
}

pub fn zone_rects() -> Vec<ZoneRect> {
    ZONE_MAP
        .iter()
        .map(|zone| {
            let (label_x, label_y) = zone.center();
            ZoneRect {
                zone: zone.label,
                x0: zone.stem_range.0,
                x1: zone.stem_range.1,
                y0: zone.language_range.0,
                y1: zone.language_range.1,
                fill_color: zone.color_hint.to_string(),
                opacity: ZONE_OPACITY,
                label_x,
                label_y,
                label_size: ZONE_LABEL_SIZE,
            }
        })
        .collect()
}

/// The first cut on each axis is the pass line (red, dashed), the second
/// the excellence line (gray, dotted). The identity diagonal is gray,
/// dotted.
pub fn guide_lines() -> Vec<GuideLine> {
    let (lo, hi) = AXIS_RANGE;
    let style = |index: usize| match index {
        0 => ("red", LineDash::Dash),
        _ => ("gray", LineDash::Dot),
    };
    let line = |x0, y0, x1, y1, (color, dash): (&str, LineDash)| GuideLine {
        x0,
        y0,
        x1,
        y1,
        color: color.to_string(),
        dash,
        width: 1.0,
    };

    let mut lines = Vec::with_capacity(STEM_CUTS.len() + LANGUAGE_CUTS.len() + 1);
    for (i, x) in STEM_CUTS.iter().enumerate() {
        lines.push(line(*x, lo, *x, hi, style(i)));
    }
    for (i, y) in LANGUAGE_CUTS.iter().enumerate() {
        lines.push(line(lo, *y, hi, *y, style(i)));
    }
    lines.push(line(lo, lo, hi, hi, ("gray", LineDash::Dot)));
    lines
}

fn marker_series(name: &str, color: &str, members: &[&StudentRecord]) -> MarkerSeries {
    MarkerSeries {
        name: name.to_string(),
        color: color.to_string(),
        symbol: MARKER_SYMBOL.to_string(),
        size: MARKER_SIZE,
        outline_color: "white".to_string(),
        outline_width: 1.0,
        text_position: "top center".to_string(),
        markers: members
            .iter()
            .map(|s| Marker {
                x: s.stem_score,
                y: s.language_score,
                label: s.person_id.clone(),
            })
            .collect(),
    }
}

pub fn compose_scatter(grouping: &TierGrouping<'_>) -> ScatterChart {
    let series = grouping
        .groups
        .iter()
        .map(|group| match (&group.tier, grouping.active) {
            (Some(tier), _) => marker_series(tier, tier_color(tier), &group.members),
            (None, true) => marker_series(UNASSIGNED_TIER, UNKNOWN_TIER_COLOR, &group.members),
            (None, false) => marker_series("Students", UNIFORM_MARKER_COLOR, &group.members),
        })
        .collect();

    let title = if grouping.active {
        "Student Performance by Zone and Tier"
    } else {
        "Student Performance by Zone"
    };

    ScatterChart {
        title: title.to_string(),
        x_axis: Axis {
            title: "STEM Average (Math + Science)".to_string(),
            range: AXIS_RANGE,
        },
        y_axis: Axis {
            title: "Language Average (English + Thai)".to_string(),
            range: AXIS_RANGE,
        },
        legend_title: if grouping.active { "Tier" } else { "Students" }.to_string(),
        height: CHART_HEIGHT,
        background: "white".to_string(),
        zones: zone_rects(),
        guide_lines: guide_lines(),
        series,
    }
}

pub fn compose_distribution(aggregate: &AggregateResult) -> DistributionChart {
    let slices = ZoneLabel::ALL
        .iter()
        .map(|zone| PieSlice {
            zone: *zone,
            count: aggregate.zone_counts.get(zone).copied().unwrap_or(0),
            percentage: aggregate.zone_percentages.get(zone).copied(),
            color: zone.definition().color_hint.to_string(),
        })
        .collect();

    DistributionChart {
        title: "Student Distribution by Zone".to_string(),
        total: aggregate.total_students,
        slices,
    }
}
