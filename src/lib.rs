pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, toml_config::TrackerConfig, CliConfig};

pub use crate::core::{
    classifier::classify,
    engine::ReportEngine,
    pipeline::{build_report, ZonePipeline},
    zone_map::ZoneLabel,
};
pub use crate::domain::model::{AggregateResult, BatchOutcome, BatchReport, StudentRecord, ZoneAssignment};
pub use crate::utils::error::{Result, ZoneError};
