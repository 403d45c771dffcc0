use crate::adapters::sheet_source::{
    DEFAULT_SHEET_URL_TEMPLATE, SPREADSHEET_ID_PLACEHOLDER, WORKSHEET_PLACEHOLDER,
};
use crate::adapters::{CsvFileSource, SheetCsvSource};
use crate::core::report::SUPPORTED_FORMATS;
use crate::core::{ConfigProvider, DataSource};
use crate::utils::error::{Result, ZoneError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tracker: TrackerSection,
    #[serde(default)]
    pub source: SourceConfig,
    /// Grade level -> spreadsheet id.
    #[serde(default)]
    pub sheet_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSection {
    #[serde(default = "default_name")]
    pub name: String,
    pub description: Option<String>,
    pub default_level: Option<String>,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            default_level: None,
        }
    }
}

fn default_name() -> String {
    "Student Performance Tracker".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Sheet,
    Csv,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceType,
    pub url_template: Option<String>,
    pub input_dir: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    #[serde(default = "default_focus_areas")]
    pub areas: Vec<String>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            areas: default_focus_areas(),
        }
    }
}

fn default_focus_areas() -> Vec<String> {
    vec!["ALL".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub archive: Option<ArchiveConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            formats: default_formats(),
            archive: None,
        }
    }
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_formats() -> Vec<String> {
    SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
}

/// Used when the configuration has no `[sheet_mapping]`.
pub fn fallback_sheet_mapping() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Primary4".to_string(),
            "1qUHxr2HmNSzuUZQ2KbcbD-3_2nWuhtVGxDIb5yGBhKg".to_string(),
        ),
        (
            "Primary6".to_string(),
            "11UBdhdiB7ear04ZnJ6WLN5ZIRu1SLVTOwMTqz1iKEW0".to_string(),
        ),
    ])
}

impl TrackerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ZoneError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ZoneError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn url_template(&self) -> &str {
        self.source
            .url_template
            .as_deref()
            .unwrap_or(DEFAULT_SHEET_URL_TEMPLATE)
    }

    pub fn sheet_mapping(&self) -> BTreeMap<String, String> {
        if self.sheet_mapping.is_empty() {
            tracing::warn!("⚠️ No [sheet_mapping] configured, using the built-in mapping");
            fallback_sheet_mapping()
        } else {
            self.sheet_mapping.clone()
        }
    }

    /// Picks the grade level: the explicit one, then `default_level`, then
    /// the first configured level.
    pub fn resolve_level(&self, requested: Option<&str>) -> Result<String> {
        if let Some(level) = requested.or(self.tracker.default_level.as_deref()) {
            return Ok(level.to_string());
        }

        match self.source.r#type {
            SourceType::Sheet => self
                .sheet_mapping()
                .into_keys()
                .next()
                .ok_or_else(|| ZoneError::MissingConfigError {
                    field: "sheet_mapping".to_string(),
                }),
            SourceType::Csv => Ok("local".to_string()),
        }
    }

    pub fn spreadsheet_id(&self, level: &str) -> Result<String> {
        let mapping = self.sheet_mapping();
        mapping
            .get(level)
            .cloned()
            .ok_or_else(|| ZoneError::UnknownLevel {
                level: level.to_string(),
                available: mapping.keys().cloned().collect(),
            })
    }

    /// Builds the data source for one grade level. The same source serves
    /// every focus area of the run.
    pub fn build_source(&self, level: &str) -> Result<Arc<dyn DataSource>> {
        match self.source.r#type {
            SourceType::Sheet => {
                let mut source = SheetCsvSource::new(self.url_template(), self.spreadsheet_id(level)?);
                if let Some(headers) = &self.source.headers {
                    source = source.with_headers(headers.clone());
                }
                if let Some(timeout) = self.source.timeout_seconds {
                    source = source.with_timeout(timeout);
                }
                Ok(Arc::new(source))
            }
            SourceType::Csv => {
                let dir = validation::validate_required_field("source.input_dir", &self.source.input_dir)?;
                Ok(Arc::new(CsvFileSource::new(dir)))
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("tracker.name", &self.tracker.name)?;

        match self.source.r#type {
            SourceType::Sheet => {
                validation::validate_url_template(
                    "source.url_template",
                    self.url_template(),
                    &[SPREADSHEET_ID_PLACEHOLDER, WORKSHEET_PLACEHOLDER],
                )?;
                for (level, id) in &self.sheet_mapping {
                    validation::validate_non_empty_string(&format!("sheet_mapping.{}", level), id)?;
                }
            }
            SourceType::Csv => {
                let dir = validation::validate_required_field("source.input_dir", &self.source.input_dir)?;
                validation::validate_path("source.input_dir", dir)?;
            }
        }

        validation::validate_non_empty_list("focus.areas", &self.focus.areas)?;
        for area in &self.focus.areas {
            validation::validate_non_empty_string("focus.areas", area)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_non_empty_list("output.formats", &self.output.formats)?;
        validation::validate_allowed_values("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;

        Ok(())
    }
}

impl ConfigProvider for TrackerConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn archive_enabled(&self) -> bool {
        self.output.archive.as_ref().map(|a| a.enabled).unwrap_or(false)
    }

    fn focus_areas(&self) -> &[String] {
        &self.focus.areas
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
