use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ETL process");

        tracing::info!("Extracting university and course pages");
        let harvest = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} universities and {} courses",
            harvest.universities.len(),
            harvest.courses.len()
        );

        let tables = self.pipeline.transform(harvest).await?;
        tracing::info!(
            "Assembled {} university rows and {} course rows",
            tables.universities.len(),
            tables.courses.len()
        );

        let output_path = self.pipeline.load(tables).await?;
        tracing::info!(
            "Output saved to {} in {:.1}s",
            output_path,
            started.elapsed().as_secs_f64()
        );

        Ok(output_path)
    }
}
