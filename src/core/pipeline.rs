use crate::core::workbook;
use crate::core::{mailer, ConfigProvider, Mailer, Pipeline, Storage};
use crate::domain::model::{Artifact, Dataset, Record};
use crate::utils::error::{ReportError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// The three concrete steps: HTTP fetch of the CSV feed, workbook rendering
/// into storage, and SMTP dispatch of the stored artifact.
pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    mailer: Box<dyn Mailer>,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C, mailer: Box<dyn Mailer>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build()?;

        Ok(Self {
            storage,
            config,
            client,
            mailer,
        })
    }

    /// Wires the real SMTP transport from the configured endpoint.
    pub fn with_smtp(storage: S, config: C) -> Result<Self> {
        let smtp = mailer::SmtpMailer::new(
            config.smtp_host().to_string(),
            config.smtp_port(),
            config.smtp_username().to_string(),
            config.smtp_password().to_string(),
        );
        Self::new(storage, config, Box::new(smtp))
    }
}

/// Parse headered CSV into a Dataset, preserving column and row order.
/// Column names must be unique: records are keyed by name, so a repeated
/// header would silently drop all but the last value.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut seen = std::collections::HashSet::new();
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(ReportError::DuplicateColumnError {
                column: column.clone(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut data = HashMap::new();
        for (column, value) in columns.iter().zip(row.iter()) {
            data.insert(column.clone(), value.to_string());
        }
        records.push(Record { data });
    }

    Ok(Dataset { columns, records })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn fetch(&self) -> Result<Dataset> {
        tracing::debug!("Fetching source data from: {}", self.config.source_url());
        let response = self
            .client
            .get(self.config.source_url())
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Source response status: {}", response.status());
        let body = response.bytes().await?;

        parse_csv(&body)
    }

    async fn render(&self, dataset: Dataset) -> Result<Artifact> {
        let file_name = workbook::artifact_file_name(chrono::Local::now().date_naive());
        let bytes = workbook::workbook_bytes(&dataset)?;

        tracing::debug!("Writing workbook ({} bytes) to: {}", bytes.len(), file_name);
        self.storage.write_file(&file_name, &bytes).await?;

        Ok(Artifact {
            file_name,
            size_bytes: bytes.len(),
        })
    }

    async fn dispatch(&self, artifact: &Artifact) -> Result<String> {
        // Faithful to the original flow: the workbook is re-read from storage
        // rather than kept in memory between render and dispatch.
        let content = self.storage.read_file(&artifact.file_name).await?;
        let message = mailer::build_message(&self.config, &artifact.file_name, content)?;

        tracing::debug!("Submitting message with attachment: {}", artifact.file_name);
        self.mailer.send(message).await
    }
}
