use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub mail: MailConfig,
    pub smtp: SmtpConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub subject: String,
    pub body_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from_address: String,
    pub to_address: String,
    #[serde(default)]
    pub cc_addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders with environment values. Unresolved
    /// placeholders are kept as-is so validation can flag them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        Self::substitute_vars(content, |name| std::env::var(name).ok())
    }

    // Lookup is injected so tests never have to mutate the process
    // environment.
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("source.url", &self.source.url)?;
        validate_email("mail.from_address", &self.mail.from_address)?;
        validate_email("mail.to_address", &self.mail.to_address)?;
        for address in &self.mail.cc_addresses {
            validate_email("mail.cc_addresses", address)?;
        }
        validate_non_empty_string("report.subject", &self.report.subject)?;
        validate_non_empty_string("smtp.host", &self.smtp.host)?;
        validate_positive_number("smtp.port", self.smtp_port() as usize, 1)?;
        validate_non_empty_string("smtp.username", &self.smtp.username)?;

        if self.smtp.password.is_empty() {
            return Err(ReportError::MissingConfigError {
                field: "smtp.password".to_string(),
            });
        }

        // An unresolved ${VAR} means the environment variable was not set.
        if self.smtp.password.contains("${") {
            return Err(ReportError::InvalidConfigValueError {
                field: "smtp.password".to_string(),
                value: self.smtp.password.clone(),
                reason: "Unresolved environment variable placeholder".to_string(),
            });
        }

        if let Some(dir) = self.output.as_ref().and_then(|o| o.dir.as_deref()) {
            validate_path("output.dir", dir)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn from_address(&self) -> &str {
        &self.mail.from_address
    }

    fn to_address(&self) -> &str {
        &self.mail.to_address
    }

    fn cc_addresses(&self) -> &[String] {
        &self.mail.cc_addresses
    }

    fn subject(&self) -> &str {
        &self.report.subject
    }

    fn body_text(&self) -> &str {
        &self.report.body_text
    }

    fn smtp_host(&self) -> &str {
        &self.smtp.host
    }

    fn smtp_port(&self) -> u16 {
        self.smtp.port.unwrap_or(587)
    }

    fn smtp_username(&self) -> &str {
        &self.smtp.username
    }

    fn smtp_password(&self) -> &str {
        &self.smtp.password
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.smtp.retry_attempts.unwrap_or(1)
    }

    fn retry_delay_seconds(&self) -> u64 {
        self.smtp.retry_delay_seconds.unwrap_or(5)
    }

    fn output_dir(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.dir.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
