//! The fixed 3×3 zoning of the (STEM, Language) score plane.
//!
//! Both the classifier and the chart composer read their cut points from
//! [`STEM_CUTS`] and [`LANGUAGE_CUTS`], so the drawn guide lines always
//! match the brackets used for counting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower and upper edge of both axes.
pub const AXIS_RANGE: (f64, f64) = (0.0, 100.0);

/// Interior cut points on the STEM axis, ascending.
pub const STEM_CUTS: [f64; 2] = [50.0, 80.0];

/// Interior cut points on the Language axis, ascending.
pub const LANGUAGE_CUTS: [f64; 2] = [50.0, 80.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneLabel {
    #[serde(rename = "Warning Zone")]
    WarningZone,
    #[serde(rename = "STEM Support")]
    StemSupport,
    #[serde(rename = "Language Expert")]
    LanguageExpert,
    #[serde(rename = "Language Support")]
    LanguageSupport,
    #[serde(rename = "Development Zone")]
    DevelopmentZone,
    #[serde(rename = "Language Strong")]
    LanguageStrong,
    #[serde(rename = "STEM Expert")]
    StemExpert,
    #[serde(rename = "STEM Strong")]
    StemStrong,
    #[serde(rename = "Perfect Zone")]
    PerfectZone,
}

impl ZoneLabel {
    /// All zones, ordered by STEM bracket then Language bracket.
    pub const ALL: [ZoneLabel; 9] = [
        ZoneLabel::WarningZone,
        ZoneLabel::StemSupport,
        ZoneLabel::LanguageExpert,
        ZoneLabel::LanguageSupport,
        ZoneLabel::DevelopmentZone,
        ZoneLabel::LanguageStrong,
        ZoneLabel::StemExpert,
        ZoneLabel::StemStrong,
        ZoneLabel::PerfectZone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneLabel::WarningZone => "Warning Zone",
            ZoneLabel::StemSupport => "STEM Support",
            ZoneLabel::LanguageExpert => "Language Expert",
            ZoneLabel::LanguageSupport => "Language Support",
            ZoneLabel::DevelopmentZone => "Development Zone",
            ZoneLabel::LanguageStrong => "Language Strong",
            ZoneLabel::StemExpert => "STEM Expert",
            ZoneLabel::StemStrong => "STEM Strong",
            ZoneLabel::PerfectZone => "Perfect Zone",
        }
    }

    /// Cell of this zone in the grid as `(stem_bracket, language_bracket)`.
    pub fn grid_cell(&self) -> (usize, usize) {
        let index = ZoneLabel::ALL
            .iter()
            .position(|zone| zone == self)
            .unwrap_or_default();
        (index / 3, index % 3)
    }

    pub fn from_grid_cell(stem_bracket: usize, language_bracket: usize) -> ZoneLabel {
        ZoneLabel::ALL[stem_bracket.min(2) * 3 + language_bracket.min(2)]
    }

    pub fn definition(&self) -> &'static ZoneDefinition {
        let (stem, language) = self.grid_cell();
        &ZONE_MAP[stem * 3 + language]
    }

    pub fn guidance(&self) -> ZoneGuidance {
        match self {
            ZoneLabel::WarningZone => ZoneGuidance {
                situation: "The student has not yet grasped the fundamentals and needs support from both school and family.",
                next_steps: "Adapt the curriculum, work closely with parents and teach in small separate groups.",
                target: "Move into the Development Zone.",
            },
            ZoneLabel::StemSupport => ZoneGuidance {
                situation: "Language foundations are in place but science and mathematics need reinforcement.",
                next_steps: "Pair with STEM teachers, add hands-on experiments and teach in small separate groups.",
                target: "Move into the Development Zone.",
            },
            ZoneLabel::LanguageSupport => ZoneGuidance {
                situation: "Science and mathematics foundations are in place but language needs reinforcement.",
                next_steps: "Pair with language teachers, assign regular practice exercises and teach in small separate groups.",
                target: "Move into the Development Zone.",
            },
            ZoneLabel::DevelopmentZone => ZoneGuidance {
                situation: "Solid foundations in every subject without a clear strength yet.",
                next_steps: "Mix study groups with peers strong in different areas and assess across several skills.",
                target: "Move into a Strong zone or the Perfect Zone.",
            },
            ZoneLabel::LanguageExpert => ZoneGuidance {
                situation: "Very strong language foundations; analytical thinking needs work.",
                next_steps: "Study alongside peers strong in analysis and science, with regular problem-solving assessments.",
                target: "Move into a Strong zone or the Perfect Zone.",
            },
            ZoneLabel::StemExpert => ZoneGuidance {
                situation: "Very strong analytical and mathematical foundations; language needs work.",
                next_steps: "Study alongside peers strong in languages, with regular language assessments.",
                target: "Move into a Strong zone or the Perfect Zone.",
            },
            ZoneLabel::StemStrong => ZoneGuidance {
                situation: "Excels at analysis and science while keeping good language foundations.",
                next_steps: "Study alongside peers strong in languages and help the student keep this standard.",
                target: "Move into the Perfect Zone.",
            },
            ZoneLabel::LanguageStrong => ZoneGuidance {
                situation: "Excels at languages while keeping good analytical and science foundations.",
                next_steps: "Study alongside peers strong in analysis and science and help the student keep this standard.",
                target: "Move into the Perfect Zone.",
            },
            ZoneLabel::PerfectZone => ZoneGuidance {
                situation: "Strong in both analytical subjects and languages.",
                next_steps: "Help the student keep this standard and watch closely for any slip out of the zone.",
                target: "Grow beyond academics: resilience, diligence and a winning mindset.",
            },
        }
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneGuidance {
    pub situation: &'static str,
    pub next_steps: &'static str,
    pub target: &'static str,
}

/// One rectangle of the zone map. Ranges are `[min, max)` except on the
/// top edge of the axis, which is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDefinition {
    pub stem_range: (f64, f64),
    pub language_range: (f64, f64),
    pub label: ZoneLabel,
    pub color_hint: &'static str,
}

impl ZoneDefinition {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.stem_range.0 + self.stem_range.1) / 2.0,
            (self.language_range.0 + self.language_range.1) / 2.0,
        )
    }
}

const fn bracket(cuts: &[f64; 2], index: usize) -> (f64, f64) {
    match index {
        0 => (AXIS_RANGE.0, cuts[0]),
        1 => (cuts[0], cuts[1]),
        _ => (cuts[1], AXIS_RANGE.1),
    }
}

const fn zone(stem: usize, language: usize, label: ZoneLabel, color_hint: &'static str) -> ZoneDefinition {
    ZoneDefinition {
        stem_range: bracket(&STEM_CUTS, stem),
        language_range: bracket(&LANGUAGE_CUTS, language),
        label,
        color_hint,
    }
}

/// Indexed by `stem_bracket * 3 + language_bracket`, same order as
/// [`ZoneLabel::ALL`].
pub const ZONE_MAP: [ZoneDefinition; 9] = [
    zone(0, 0, ZoneLabel::WarningZone, "#f9ebea"),
    zone(0, 1, ZoneLabel::StemSupport, "#fef9e7"),
    zone(0, 2, ZoneLabel::LanguageExpert, "#eafaf1"),
    zone(1, 0, ZoneLabel::LanguageSupport, "#fef5e7"),
    zone(1, 1, ZoneLabel::DevelopmentZone, "#e8f8f5"),
    zone(1, 2, ZoneLabel::LanguageStrong, "#eaf2f8"),
    zone(2, 0, ZoneLabel::StemExpert, "#f4ecf7"),
    zone(2, 1, ZoneLabel::StemStrong, "#e8daef"),
    zone(2, 2, ZoneLabel::PerfectZone, "#d4efdf"),
];
