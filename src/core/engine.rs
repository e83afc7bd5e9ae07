use crate::core::Pipeline;
use crate::domain::model::{Artifact, RetryPolicy};
use crate::utils::error::Result;

/// Drives the three pipeline steps in order and owns the dispatch failure
/// policy. Fetch and render errors propagate immediately; only dispatch
/// errors get the delay-and-retry treatment.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
    retry: RetryPolicy,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting report run");

        tracing::info!("Fetching source data...");
        let dataset = self.pipeline.fetch().await?;
        tracing::info!(
            "Fetched {} records with {} columns",
            dataset.len(),
            dataset.column_count()
        );

        tracing::info!("Rendering workbook...");
        let artifact = self.pipeline.render(dataset).await?;
        tracing::info!(
            "Rendered {} ({} bytes)",
            artifact.file_name,
            artifact.size_bytes
        );

        tracing::info!("Dispatching report...");
        let receipt = self.dispatch_with_retry(&artifact).await?;
        tracing::info!("Message accepted: {}", receipt);

        Ok(receipt)
    }

    async fn dispatch_with_retry(&self, artifact: &Artifact) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            match self.pipeline.dispatch(artifact).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) => {
                    tracing::error!("Error in sending mail: {}", e);
                    if attempt >= self.retry.attempts {
                        return Err(e);
                    }
                    attempt += 1;
                    tracing::warn!(
                        "Retrying dispatch in {:?} (attempt {} of {})",
                        self.retry.delay,
                        attempt,
                        self.retry.attempts
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }
}
