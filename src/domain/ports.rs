use crate::domain::model::{BatchReport, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Supplies the student table for one focus area (one worksheet).
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_table(&self, focus: &str) -> Result<Table>;

    /// Where the table for `focus` comes from, for logs and dry runs.
    fn describe(&self, focus: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn archive_enabled(&self) -> bool;
    fn focus_areas(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn focus(&self) -> &str;
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, table: Table) -> Result<BatchReport>;
    async fn load(&self, report: &BatchReport) -> Result<String>;
}
