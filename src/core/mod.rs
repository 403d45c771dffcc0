pub mod aggregator;
pub mod chart;
pub mod classifier;
pub mod engine;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod tier;
pub mod zone_map;

pub use crate::domain::model::{BatchOutcome, BatchReport, Record, Table};
pub use crate::domain::ports::{ConfigProvider, DataSource, Pipeline, Storage};
pub use crate::utils::error::Result;
