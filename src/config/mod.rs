pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    self, validate_email, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "report-mailer")]
#[command(about = "Fetches a CSV feed and emails it as a spreadsheet attachment")]
pub struct CliConfig {
    /// Path to a TOML configuration file; overrides the other options
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(
        long,
        default_value = "https://support.staffbase.com/hc/en-us/article_attachments/360009197031/username.csv"
    )]
    pub source_url: String,

    #[arg(long, default_value = "dummy.sender@example.com")]
    pub from_address: String,

    #[arg(long, default_value = "dummy.recipient@example.com")]
    pub to_address: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "dummy.cc1@example.com,dummy.cc2@example.com,dummy.cc3@example.com"
    )]
    pub cc_addresses: Vec<String>,

    #[arg(long, default_value = "Dummy Subject: Sample Data")]
    pub subject: String,

    #[arg(
        long,
        default_value = "Dear Recipient,\n\nPlease find the requested Sample Data attached with this mail.\n\nThanks,\nDummy Sender"
    )]
    pub body_text: String,

    #[arg(long, default_value = "smtp.office365.com")]
    pub smtp_host: String,

    #[arg(long, default_value = "587")]
    pub smtp_port: u16,

    #[arg(long, default_value = "dummy.sender@example.com")]
    pub smtp_username: String,

    /// SMTP password; falls back to the SMTP_PASSWORD environment variable
    #[arg(long, default_value = "")]
    pub smtp_password: String,

    /// Per-request timeout for the source fetch, in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Dispatch retries after the first failed attempt
    #[arg(long, default_value = "1")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "5")]
    pub retry_delay_seconds: u64,

    /// Keep the workbook in this directory instead of a temporary one
    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Validate and show the configuration without fetching or sending
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// The password never lives in source; an empty value is filled from the
    /// environment before validation.
    pub fn resolve_password(&mut self) {
        if self.smtp_password.is_empty() {
            if let Ok(password) = std::env::var("SMTP_PASSWORD") {
                self.smtp_password = password;
            }
        }
    }
}

impl ConfigProvider for CliConfig {
    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn from_address(&self) -> &str {
        &self.from_address
    }

    fn to_address(&self) -> &str {
        &self.to_address
    }

    fn cc_addresses(&self) -> &[String] {
        &self.cc_addresses
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn body_text(&self) -> &str {
        &self.body_text
    }

    fn smtp_host(&self) -> &str {
        &self.smtp_host
    }

    fn smtp_port(&self) -> u16 {
        self.smtp_port
    }

    fn smtp_username(&self) -> &str {
        &self.smtp_username
    }

    fn smtp_password(&self) -> &str {
        &self.smtp_password
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay_seconds(&self) -> u64 {
        self.retry_delay_seconds
    }

    fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }
}

impl validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source_url", &self.source_url)?;
        validate_email("from_address", &self.from_address)?;
        validate_email("to_address", &self.to_address)?;
        for address in &self.cc_addresses {
            validate_email("cc_addresses", address)?;
        }
        validate_non_empty_string("subject", &self.subject)?;
        validate_non_empty_string("smtp_host", &self.smtp_host)?;
        validate_positive_number("smtp_port", self.smtp_port as usize, 1)?;
        validate_non_empty_string("smtp_username", &self.smtp_username)?;

        if self.smtp_password.is_empty() {
            return Err(ReportError::MissingConfigError {
                field: "smtp_password".to_string(),
            });
        }

        if let Some(dir) = &self.output_dir {
            validate_path("output_dir", dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    fn base_config() -> CliConfig {
        let mut config = CliConfig::parse_from(["report-mailer"]);
        config.smtp_password = "secret".to_string();
        config
    }

    #[test]
    fn test_defaults_reproduce_the_original_literals() {
        let config = CliConfig::parse_from(["report-mailer"]);

        assert_eq!(config.from_address, "dummy.sender@example.com");
        assert_eq!(config.to_address, "dummy.recipient@example.com");
        assert_eq!(
            config.cc_addresses,
            vec![
                "dummy.cc1@example.com",
                "dummy.cc2@example.com",
                "dummy.cc3@example.com",
            ]
        );
        assert_eq!(config.subject, "Dummy Subject: Sample Data");
        assert_eq!(config.smtp_host, "smtp.office365.com");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.retry_delay_seconds, 5);
        assert!(config.smtp_password.is_empty());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_cc_addresses_split_on_commas() {
        let config = CliConfig::parse_from([
            "report-mailer",
            "--cc-addresses",
            "a@example.com,b@example.com",
        ]);

        assert_eq!(config.cc_addresses, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_validation_accepts_complete_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_missing_password() {
        let mut config = base_config();
        config.smtp_password.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smtp_password"));
    }

    #[test]
    fn test_validation_rejects_bad_source_url() {
        let mut config = base_config();
        config.source_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_cc_address() {
        let mut config = base_config();
        config.cc_addresses = vec!["good@example.com".to_string(), "broken".to_string()];

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_port_zero() {
        let mut config = base_config();
        config.smtp_port = 0;

        assert!(config.validate().is_err());
    }
}
