use clap::Parser;
use std::sync::Arc;
use zone_tracker::core::{ConfigProvider, DataSource};
use zone_tracker::utils::error::{ErrorSeverity, ZoneError};
use zone_tracker::utils::{logger, validation::Validate};
use zone_tracker::{BatchOutcome, CliConfig, LocalStorage, ReportEngine, TrackerConfig, ZonePipeline};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &ZoneError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting zone-tracker");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TrackerConfig::from_file(path).unwrap_or_else(|e| fail(&e))
        }
        None => TrackerConfig::default(),
    };
    cli.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let level = config.resolve_level(None).unwrap_or_else(|e| fail(&e));
    let source = config.build_source(&level).unwrap_or_else(|e| fail(&e));

    display_config_summary(&config, &level, source.as_ref(), &cli);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path());
    let pipelines: Vec<_> = config
        .focus_areas()
        .iter()
        .map(|focus| {
            ZonePipeline::new(
                storage.clone(),
                config.clone(),
                Arc::clone(&source),
                level.clone(),
                focus.clone(),
            )
        })
        .collect();

    let engine = ReportEngine::new(pipelines);
    let outcomes = engine.run().await;

    let mut worst: Option<ErrorSeverity> = None;
    for outcome in &outcomes {
        print_outcome(outcome);
        if let BatchOutcome::Failed { severity, .. } = outcome {
            worst = worst.max(Some(*severity));
        }
    }

    if let Some(severity) = worst {
        std::process::exit(exit_code(severity));
    }

    Ok(())
}

fn display_config_summary(config: &TrackerConfig, level: &str, source: &dyn DataSource, cli: &CliConfig) {
    println!("📋 {}", config.tracker.name);
    println!("  Grade Level: {}", level);
    for focus in config.focus_areas() {
        println!("  Focus {}: {}", focus, source.describe(focus));
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.archive_enabled() {
        println!("  Archive: one zip per focus area");
    }
    if cli.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

fn print_outcome(outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::Completed {
            report,
            output_path,
        } => {
            println!("✅ {} ({} students)", report.focus, report.summary.total_students);
            if let (Some(stem), Some(lang)) = (report.summary.average_stem, report.summary.average_language) {
                println!("  Average STEM Score: {:.1}", stem);
                println!("  Average Language Score: {:.1}", lang);
            }
            for (zone, count) in &report.aggregate.zone_counts {
                if let Some(percentage) = report.aggregate.zone_percentages.get(zone) {
                    println!("  - {}: {} students ({:.1}%)", zone, count, percentage);
                }
            }
            if !report.anomalies.is_empty() {
                println!("  ⚠️ {} data warnings (see report)", report.anomalies.len());
            }
            println!("  📁 {}", output_path);
        }
        BatchOutcome::Failed {
            focus,
            message,
            suggestion,
            ..
        } => {
            eprintln!("❌ {}: {}", focus, message);
            eprintln!("💡 Suggestion: {}", suggestion);
        }
    }
}
