use crate::adapters::csv_source::parse_table;
use crate::core::{DataSource, Table};
use crate::utils::error::{Result, ZoneError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub const SPREADSHEET_ID_PLACEHOLDER: &str = "{spreadsheet_id}";
pub const WORKSHEET_PLACEHOLDER: &str = "{worksheet}";

pub const DEFAULT_SHEET_URL_TEMPLATE: &str =
    "https://docs.google.com/spreadsheets/d/{spreadsheet_id}/gviz/tq?tqx=out:csv&sheet={worksheet}";

fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

// Form encoding escapes a literal `+` as `%2B`, so any `+` left is a space.
fn encode_path(value: &str) -> String {
    encode_query(value).replace('+', "%20")
}

/// Fetches one worksheet per focus area as CSV from a spreadsheet service.
/// The worksheet name is the focus area name.
pub struct SheetCsvSource {
    client: Client,
    url_template: String,
    spreadsheet_id: String,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl SheetCsvSource {
    pub fn new(url_template: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url_template: url_template.into(),
            spreadsheet_id: spreadsheet_id.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    /// Fills the template. Placeholders before the `?` are path segments and
    /// use `%20` for spaces; placeholders in the query use form encoding.
    pub fn worksheet_url(&self, worksheet: &str) -> String {
        let fill = |part: &str, encode: fn(&str) -> String| {
            part.replace(SPREADSHEET_ID_PLACEHOLDER, &encode(&self.spreadsheet_id))
                .replace(WORKSHEET_PLACEHOLDER, &encode(worksheet))
        };

        match self.url_template.split_once('?') {
            Some((path, query)) => format!("{}?{}", fill(path, encode_path), fill(query, encode_query)),
            None => fill(&self.url_template, encode_path),
        }
    }
}

#[async_trait]
impl DataSource for SheetCsvSource {
    async fn fetch_table(&self, focus: &str) -> Result<Table> {
        let url = self.worksheet_url(focus);
        tracing::debug!("Making sheet request to: {}", url);

        let mut request = self.client.get(&url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("Sheet response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ZoneError::DataSource {
                message: format!(
                    "worksheet '{}' returned HTTP {}",
                    focus,
                    response.status()
                ),
            });
        }

        let body = response.bytes().await?;
        parse_table(&body)
    }

    fn describe(&self, focus: &str) -> String {
        format!(
            "worksheet '{}' of spreadsheet {}",
            focus, self.spreadsheet_id
        )
    }
}
