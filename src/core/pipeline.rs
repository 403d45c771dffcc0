use crate::core::aggregator::{aggregate, summarize};
use crate::core::chart::{compose_distribution, compose_scatter};
use crate::core::classifier::classify_batch;
use crate::core::ingest::{ingest, IngestedBatch};
use crate::core::report::render_outputs;
use crate::core::tier::TierGrouping;
use crate::core::{BatchReport, ConfigProvider, DataSource, Pipeline, Storage, Table};
use crate::utils::error::Result;
use std::io::Write;
use std::sync::Arc;
use zip::write::{FileOptions, ZipWriter};

/// Classify, aggregate and compose charts for one already-ingested batch.
pub fn build_report(level: &str, focus: &str, batch: IngestedBatch) -> BatchReport {
    let IngestedBatch {
        students,
        anomalies,
    } = batch;

    let assignments = classify_batch(&students);
    let aggregate = aggregate(&assignments);
    let summary = summarize(&students);

    let grouping = TierGrouping::for_batch(&students);
    let tier_active = grouping.active;
    let scatter = compose_scatter(&grouping);
    let distribution = compose_distribution(&aggregate);

    BatchReport {
        level: level.to_string(),
        focus: focus.to_string(),
        generated_at: chrono::Utc::now(),
        tier_active,
        students,
        assignments,
        aggregate,
        summary,
        anomalies,
        scatter,
        distribution,
    }
}

/// One focus area of one grade level: fetch the worksheet, classify it and
/// write the report files.
pub struct ZonePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) source: Arc<dyn DataSource>,
    pub(crate) level: String,
    pub(crate) focus: String,
}

impl<S: Storage, C: ConfigProvider> ZonePipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        source: Arc<dyn DataSource>,
        level: impl Into<String>,
        focus: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            config,
            source,
            level: level.into(),
            focus: focus.into(),
        }
    }

    fn output_dir(&self) -> String {
        format!("{}/{}", self.level, self.focus)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ZonePipeline<S, C> {
    fn focus(&self) -> &str {
        &self.focus
    }

    async fn extract(&self) -> Result<Table> {
        tracing::debug!("Fetching {}", self.source.describe(&self.focus));
        let table = self.source.fetch_table(&self.focus).await?;
        tracing::debug!(
            "Fetched {} rows with columns [{}]",
            table.len(),
            table.columns.join(", ")
        );
        Ok(table)
    }

    async fn transform(&self, table: Table) -> Result<BatchReport> {
        let batch = ingest(&table, &self.focus)?;

        if batch.students.is_empty() {
            tracing::warn!("⚠️ No classifiable students for {}", self.focus);
        }

        let report = build_report(&self.level, &self.focus, batch);
        tracing::debug!(
            "{}: {} students, tier grouping {}",
            self.focus,
            report.aggregate.total_students,
            if report.tier_active { "on" } else { "off" }
        );
        Ok(report)
    }

    async fn load(&self, report: &BatchReport) -> Result<String> {
        let files = render_outputs(report, self.config.output_formats())?;
        let dir = self.output_dir();

        if self.config.archive_enabled() {
            let archive_name = format!("{}.zip", dir);
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for file in &files {
                    zip.start_file::<_, ()>(file.name.as_str(), FileOptions::default())?;
                    zip.write_all(&file.contents)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_name, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), archive_name));
        }

        for file in &files {
            let path = format!("{}/{}", dir, file.name);
            tracing::debug!("Writing {} ({} bytes)", path, file.contents.len());
            self.storage.write_file(&path, &file.contents).await?;
        }

        Ok(format!("{}/{}", self.config.output_path(), dir))
    }
}
