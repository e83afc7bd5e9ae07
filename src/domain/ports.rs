use crate::domain::model::{Artifact, Dataset};
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

/// The externalized option surface: source location, mail parameters, SMTP
/// endpoint and credentials, and the ambient knobs around them.
pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn from_address(&self) -> &str;
    fn to_address(&self) -> &str;
    fn cc_addresses(&self) -> &[String];
    fn subject(&self) -> &str;
    fn body_text(&self) -> &str;
    fn smtp_host(&self) -> &str;
    fn smtp_port(&self) -> u16;
    fn smtp_username(&self) -> &str;
    fn smtp_password(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_seconds(&self) -> u64;
    fn output_dir(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<Dataset>;
    async fn render(&self, dataset: Dataset) -> Result<Artifact>;
    async fn dispatch(&self, artifact: &Artifact) -> Result<String>;
}

/// Submission seam so tests never open an SMTP connection.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: lettre::Message) -> Result<String>;
}
