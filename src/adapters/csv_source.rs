use crate::core::{DataSource, Record, Table};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Empty cells become `null`; everything else is kept as the exported text.
/// Scores are parsed where they are read, so ids like `007` survive intact.
fn cell_value(cell: &str) -> serde_json::Value {
    if cell.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::String(cell.to_string())
    }
}

/// Parses a CSV export (header row first) into a table.
pub fn parse_table(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let data: HashMap<String, serde_json::Value> = columns
            .iter()
            .zip(row.iter())
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, cell)| (column.clone(), cell_value(cell)))
            .collect();
        records.push(Record { data });
    }

    Ok(Table { columns, records })
}

/// Reads `<input_dir>/<focus>.csv` for each focus area.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    input_dir: PathBuf,
}

impl CsvFileSource {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    fn path_for(&self, focus: &str) -> PathBuf {
        self.input_dir.join(format!("{}.csv", focus))
    }
}

#[async_trait]
impl DataSource for CsvFileSource {
    async fn fetch_table(&self, focus: &str) -> Result<Table> {
        let bytes = tokio::fs::read(self.path_for(focus)).await?;
        parse_table(&bytes)
    }

    fn describe(&self, focus: &str) -> String {
        format!("csv file {}", self.path_for(focus).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::ingest;
    use serde_json::json;

    #[test]
    fn test_parse_table_keeps_cell_text() {
        let csv = "PERSON_ID, STEM_AVG ,LANGUAGE_AVG,TIER_ALL\nS01,45,30.5,\nS02,90,95,Gold\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["PERSON_ID", "STEM_AVG", "LANGUAGE_AVG", "TIER_ALL"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("STEM_AVG"), Some(&json!("45")));
        assert_eq!(table.records[0].get("LANGUAGE_AVG"), Some(&json!("30.5")));
        assert_eq!(table.records[0].get("TIER_ALL"), Some(&serde_json::Value::Null));
        assert_eq!(table.records[1].get("TIER_ALL"), Some(&json!("Gold")));
    }

    #[test]
    fn test_numeric_looking_ids_are_not_rewritten() {
        let csv = "PERSON_ID,STEM_AVG,LANGUAGE_AVG\n007,45,30\n7,90,95\n12345678901234567890,60,65\n1e3,50,10\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        let batch = ingest(&table, "ALL").unwrap();

        let ids: Vec<&str> = batch.students.iter().map(|s| s.person_id.as_str()).collect();
        assert_eq!(ids, vec!["007", "7", "12345678901234567890", "1e3"]);
        assert!(batch.anomalies.is_empty());
        assert_eq!(batch.students[3].stem_score, 50.0);
        assert_eq!(batch.students[3].language_score, 10.0);
    }

    #[test]
    fn test_parse_table_header_only_and_blank_rows() {
        let table = parse_table(b"PERSON_ID,STEM_AVG,LANGUAGE_AVG\n,,\n").unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("LANGUAGE_AVG"));
    }

    #[test]
    fn test_parse_table_strips_bom() {
        let table = parse_table("\u{feff}PERSON_ID,STEM_AVG\nA,1\n".as_bytes()).unwrap();
        assert!(table.has_column("PERSON_ID"));
    }

    #[tokio::test]
    async fn test_csv_file_source_reads_focus_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("LANGUAGE.csv"),
            "PERSON_ID,STEM_AVG,LANGUAGE_AVG\nA,50,10\n",
        )
        .unwrap();

        let source = CsvFileSource::new(dir.path());
        let table = source.fetch_table("LANGUAGE").await.unwrap();
        assert_eq!(table.len(), 1);
        assert!(source.fetch_table("ALL").await.is_err());
        assert!(source.describe("ALL").ends_with("ALL.csv"));
    }
}
