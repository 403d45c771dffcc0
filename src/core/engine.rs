use crate::core::{BatchOutcome, Pipeline};
use crate::utils::error::{Result, ZoneError};

/// Runs a set of independent batches, one pipeline per focus area.
///
/// A failing batch never stops the others; its error is turned into a
/// [`BatchOutcome::Failed`] the presentation layer can show.
pub struct ReportEngine<P: Pipeline> {
    pipelines: Vec<P>,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipelines: Vec<P>) -> Self {
        Self { pipelines }
    }

    async fn run_one(&self, pipeline: &P) -> Result<BatchOutcome> {
        tracing::info!("📥 Extracting {}", pipeline.focus());
        let table = pipeline.extract().await?;
        tracing::info!("Extracted {} rows", table.len());

        tracing::info!("🧮 Classifying {}", pipeline.focus());
        let report = pipeline.transform(table).await?;
        tracing::info!(
            "Classified {} students ({} data warnings)",
            report.aggregate.total_students,
            report.anomalies.len()
        );

        tracing::info!("💾 Writing {} report", pipeline.focus());
        let output_path = pipeline.load(&report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(BatchOutcome::Completed {
            report: Box::new(report),
            output_path,
        })
    }

    pub async fn run(&self) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(self.pipelines.len());

        for pipeline in &self.pipelines {
            let outcome = match self.run_one(pipeline).await {
                Ok(outcome) => outcome,
                Err(e) => failed(pipeline.focus(), &e),
            };
            outcomes.push(outcome);
        }

        let completed = outcomes.iter().filter(|o| o.is_success()).count();
        tracing::info!(
            "✅ {} of {} batches completed",
            completed,
            outcomes.len()
        );
        outcomes
    }
}

pub fn failed(focus: &str, error: &ZoneError) -> BatchOutcome {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        focus,
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());

    BatchOutcome::Failed {
        focus: focus.to_string(),
        message: error.user_friendly_message(),
        suggestion: error.recovery_suggestion(),
        severity: error.severity(),
    }
}
