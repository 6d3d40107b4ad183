use crate::core::Pipeline;
use crate::utils::error::Result;
use std::path::PathBuf;

pub struct RulesetEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RulesetEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<PathBuf> {
        tracing::info!("Reading domain list...");
        let domains = self.pipeline.extract().await?;
        tracing::info!("Found {} domains", domains.len());

        let document = self.pipeline.transform(domains).await?;

        tracing::info!("Compiling rule-set...");
        let artifact = self.pipeline.load(document).await?;
        tracing::info!("Rule-set saved to: {}", artifact.display());

        Ok(artifact)
    }
}
