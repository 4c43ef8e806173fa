use crate::domain::model::{Harvest, Tables, UniversityTarget};
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

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn targets(&self) -> &[UniversityTarget];
    fn target_country(&self) -> &str;
    fn min_courses_per_university(&self) -> usize;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;

    /// University page on the ranking site.
    fn ranking_url(&self, slug: &str) -> String {
        format!("{}/universities/{}", self.base_url().trim_end_matches('/'), slug)
    }
}

/// Raw page retrieval. Every failure collapses into `None`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Harvest>;
    async fn transform(&self, harvest: Harvest) -> Result<Tables>;
    async fn load(&self, tables: Tables) -> Result<String>;
}
