pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::{ArchiveConfig, SourceType, TrackerConfig};

#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "zone-tracker"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Classify students into STEM/Language performance zones and build chart specs")
)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub config: Option<String>,

    /// Grade level to load (a key of [sheet_mapping])
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub level: Option<String>,

    /// Focus areas (worksheets) to analyse, comma separated
    #[cfg_attr(feature = "cli", arg(short, long, value_delimiter = ','))]
    pub focus: Vec<String>,

    /// Output directory
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub output_path: Option<String>,

    /// Read <DIR>/<FOCUS>.csv files instead of the spreadsheet service
    #[cfg_attr(feature = "cli", arg(long))]
    pub input_dir: Option<String>,

    /// Output formats (csv, json, markdown), comma separated
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ','))]
    pub format: Vec<String>,

    /// Bundle each focus area's files into one zip
    #[cfg_attr(feature = "cli", arg(long))]
    pub archive: bool,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,

    /// Show what would be processed without fetching anything
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,
}

impl CliConfig {
    /// Command line values win over the file.
    pub fn apply_to(&self, config: &mut TrackerConfig) {
        if let Some(level) = &self.level {
            config.tracker.default_level = Some(level.clone());
        }
        if !self.focus.is_empty() {
            config.focus.areas = self.focus.clone();
        }
        if let Some(path) = &self.output_path {
            config.output.output_path = path.clone();
        }
        if let Some(dir) = &self.input_dir {
            config.source.r#type = SourceType::Csv;
            config.source.input_dir = Some(dir.clone());
        }
        if !self.format.is_empty() {
            config.output.formats = self.format.clone();
        }
        if self.archive {
            config.output.archive = Some(ArchiveConfig { enabled: true });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = TrackerConfig::from_toml_str(
            "[focus]\nareas = [\"ALL\"]\n[output]\noutput_path = \"./from-file\"\n",
        )
        .unwrap();

        let cli = CliConfig {
            level: Some("Primary6".to_string()),
            focus: vec!["LANGUAGE".to_string(), "MATH_SCIENCE".to_string()],
            input_dir: Some("./data".to_string()),
            archive: true,
            ..Default::default()
        };
        cli.apply_to(&mut config);

        assert_eq!(config.resolve_level(None).unwrap(), "Primary6");
        assert_eq!(config.focus_areas().len(), 2);
        assert_eq!(config.output_path(), "./from-file");
        assert_eq!(config.source.r#type, SourceType::Csv);
        assert!(config.archive_enabled());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_parse_command_line() {
        let cli = CliConfig::parse_from([
            "zone-tracker",
            "--level",
            "Primary4",
            "--focus",
            "ALL,LANGUAGE",
            "--format",
            "json",
            "--dry-run",
        ]);
        assert_eq!(cli.level.as_deref(), Some("Primary4"));
        assert_eq!(cli.focus, vec!["ALL", "LANGUAGE"]);
        assert_eq!(cli.format, vec!["json"]);
        assert!(cli.dry_run);
        assert!(!cli.verbose);
    }
}
