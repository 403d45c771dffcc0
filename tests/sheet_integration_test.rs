use anyhow::Result;
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;
use zone_tracker::core::ConfigProvider;
use zone_tracker::utils::error::ErrorSeverity;
use zone_tracker::{BatchOutcome, LocalStorage, ReportEngine, TrackerConfig, ZoneLabel, ZonePipeline};

fn tracker_config(server: &MockServer, output_path: &str, focus: &[&str]) -> Result<TrackerConfig> {
    let areas = focus
        .iter()
        .map(|f| format!("\"{}\"", f))
        .collect::<Vec<_>>()
        .join(", ");
    let toml_content = format!(
        r#"
[tracker]
name = "integration"

[source]
type = "sheet"
url_template = "{}/sheets/{{spreadsheet_id}}/{{worksheet}}"

[sheet_mapping]
Primary4 = "p4-sheet"

[focus]
areas = [{}]

[output]
output_path = "{}"
formats = ["csv", "json", "markdown"]
"#,
        server.base_url(),
        areas,
        output_path.replace('\\', "/")
    );
    Ok(TrackerConfig::from_toml_str(&toml_content)?)
}

fn engine(config: &TrackerConfig) -> Result<ReportEngine<ZonePipeline<LocalStorage, TrackerConfig>>> {
    let level = config.resolve_level(None)?;
    let source = config.build_source(&level)?;
    let storage = LocalStorage::new(config.output_path());
    let pipelines = config
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
    Ok(ReportEngine::new(pipelines))
}

#[tokio::test]
async fn test_sheet_batch_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let sheet_mock = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/ALL");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body("PERSON_ID,STEM_AVG,LANGUAGE_AVG\nA,45,30\nB,90,95\nC,60,65\n");
    });

    let config = tracker_config(&server, &output_path, &["ALL"])?;
    let outcomes = engine(&config)?.run().await;
    sheet_mock.assert();

    assert_eq!(outcomes.len(), 1);
    let report = match &outcomes[0] {
        BatchOutcome::Completed { report, .. } => report,
        other => panic!("expected a completed batch, got {:?}", other),
    };

    let zones: Vec<(&str, ZoneLabel)> = report
        .assignments
        .iter()
        .map(|a| (a.person_id.as_str(), a.zone_label))
        .collect();
    assert_eq!(
        zones,
        vec![
            ("A", ZoneLabel::WarningZone),
            ("B", ZoneLabel::PerfectZone),
            ("C", ZoneLabel::DevelopmentZone),
        ]
    );

    assert_eq!(report.aggregate.zone_counts.values().sum::<usize>(), 3);
    for zone in ZoneLabel::ALL {
        let expected = match zone {
            ZoneLabel::WarningZone | ZoneLabel::PerfectZone | ZoneLabel::DevelopmentZone => 1,
            _ => 0,
        };
        assert_eq!(report.aggregate.zone_counts[&zone], expected, "{}", zone);
    }
    let total: f64 = report.aggregate.zone_percentages.values().sum();
    assert!((total - 100.0).abs() < 1e-6);
    assert!((report.aggregate.zone_percentages[&ZoneLabel::WarningZone] - 33.33).abs() < 0.01);

    let dir = temp_dir.path().join("Primary4").join("ALL");
    for name in [
        "assignments.csv",
        "aggregate.json",
        "scatter_chart.json",
        "distribution_chart.json",
        "report.md",
    ] {
        assert!(dir.join(name).exists(), "missing {}", name);
    }

    let scatter: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("scatter_chart.json"))?)?;
    assert_eq!(scatter["zones"].as_array().unwrap().len(), 9);
    assert_eq!(scatter["guide_lines"].as_array().unwrap().len(), 5);
    assert_eq!(scatter["series"][0]["name"], "Students");
    assert_eq!(scatter["x_axis"]["range"], serde_json::json!([0.0, 100.0]));

    let pie: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("distribution_chart.json"))?)?;
    assert_eq!(pie["slices"].as_array().unwrap().len(), 9);

    let markdown = std::fs::read_to_string(dir.join("report.md"))?;
    assert!(markdown.contains("- Development Zone: 1 students (33.3%)"));

    Ok(())
}

#[tokio::test]
async fn test_missing_columns_fail_only_their_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let broken = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/LANGUAGE");
        then.status(200).body("PERSON_ID,LANGUAGE_AVG\nA,30\n");
    });
    let healthy = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/MATH_SCIENCE");
        then.status(200)
            .body("PERSON_ID,STEM_AVG,LANGUAGE_AVG,TIER_MATH_SCIENCE\nA,85,40,Gold\nB,20,20,\n");
    });

    let config = tracker_config(&server, &output_path, &["LANGUAGE", "MATH_SCIENCE"])?;
    let outcomes = engine(&config)?.run().await;
    broken.assert();
    healthy.assert();

    match &outcomes[0] {
        BatchOutcome::Failed {
            focus,
            message,
            severity,
            ..
        } => {
            assert_eq!(focus, "LANGUAGE");
            assert!(message.contains("STEM_AVG"));
            assert_eq!(*severity, ErrorSeverity::High);
        }
        other => panic!("expected a failed batch, got {:?}", other),
    }
    assert!(!temp_dir.path().join("Primary4").join("LANGUAGE").exists());

    match &outcomes[1] {
        BatchOutcome::Completed { report, .. } => {
            assert!(report.tier_active);
            let names: Vec<&str> = report.scatter.series.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Gold", "Unassigned"]);
            assert_eq!(report.aggregate.zone_counts[&ZoneLabel::StemExpert], 1);
        }
        other => panic!("expected a completed batch, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_unreachable_worksheet_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/ALL");
        then.status(404);
    });

    let config = tracker_config(&server, &output_path, &["ALL"])?;
    let outcomes = engine(&config)?.run().await;
    missing.assert();

    match &outcomes[0] {
        BatchOutcome::Failed {
            severity, message, ..
        } => {
            assert_eq!(*severity, ErrorSeverity::Medium);
            assert!(message.contains("404"));
        }
        other => panic!("expected a failed batch, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_empty_worksheet_renders_zones_without_markers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let empty = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/ALL");
        then.status(200).body("PERSON_ID,STEM_AVG,LANGUAGE_AVG\n");
    });

    let config = tracker_config(&server, &output_path, &["ALL"])?;
    let outcomes = engine(&config)?.run().await;
    empty.assert();

    match &outcomes[0] {
        BatchOutcome::Completed { report, .. } => {
            assert_eq!(report.aggregate.total_students, 0);
            assert!(report.aggregate.zone_percentages.is_empty());
            assert!(report.scatter.series.is_empty());
            assert_eq!(report.scatter.zones.len(), 9);
            assert_eq!(report.summary.average_stem, None);
        }
        other => panic!("expected a completed batch, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_blank_tier_column_keeps_uniform_markers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let sheet = server.mock(|when, then| {
        when.method(GET).path("/sheets/p4-sheet/ALL");
        then.status(200)
            .body("PERSON_ID,STEM_AVG,LANGUAGE_AVG,TIER_ALL\n007,45,30,\n7,90,95,  \n");
    });

    let config = tracker_config(&server, &output_path, &["ALL"])?;
    let outcomes = engine(&config)?.run().await;
    sheet.assert();

    let report = match &outcomes[0] {
        BatchOutcome::Completed { report, .. } => report,
        other => panic!("expected a completed batch, got {:?}", other),
    };
    assert!(!report.tier_active);
    assert_eq!(report.scatter.title, "Student Performance by Zone");
    assert_eq!(report.scatter.series.len(), 1);
    assert_eq!(report.scatter.series[0].name, "Students");
    let labels: Vec<&str> = report.scatter.series[0]
        .markers
        .iter()
        .map(|m| m.label.as_str())
        .collect();
    assert_eq!(labels, vec!["007", "7"]);

    let csv = std::fs::read_to_string(temp_dir.path().join("Primary4").join("ALL").join("assignments.csv"))?;
    assert!(csv.lines().any(|line| line.trim_end() == "007,45.0,30.0,Warning Zone,"));

    Ok(())
}
