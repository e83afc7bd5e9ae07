pub mod engine;
pub mod mailer;
pub mod pipeline;
pub mod workbook;

pub use crate::domain::model::{Artifact, Dataset, Record, RetryPolicy};
pub use crate::domain::ports::{ConfigProvider, Mailer, Pipeline, Storage};
pub use crate::utils::error::Result;
