use crate::utils::error::{ReportError, Result};
use lettre::message::Mailbox;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ReportError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_email(field_name: &str, address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Address cannot be empty".to_string(),
        });
    }

    match address.trim().parse::<Mailbox>() {
        Ok(_) => Ok(()),
        Err(e) => Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: format!("Invalid mail address: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("source_url", "https://example.com/data.csv").is_ok());
        assert!(validate_url("source_url", "http://example.com/data.csv").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        let err = validate_url("source_url", "ftp://example.com/data.csv").unwrap_err();
        assert!(err.to_string().contains("Unsupported URL scheme"));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("source_url", "not a url").is_err());
        assert!(validate_url("source_url", "").is_err());
    }

    #[test]
    fn test_validate_email_accepts_plain_and_named() {
        assert!(validate_email("mail.to", "alice@example.com").is_ok());
        assert!(validate_email("mail.to", "Alice <alice@example.com>").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_invalid() {
        assert!(validate_email("mail.to", "not-an-address").is_err());
        assert!(validate_email("mail.to", "").is_err());
        assert!(validate_email("mail.to", "   ").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("smtp.host", "smtp.example.com").is_ok());
        assert!(validate_non_empty_string("smtp.host", "  ").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("smtp.port", 587, 1).is_ok());
        assert!(validate_positive_number("smtp.port", 0, 1).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.dir", "./reports").is_ok());
        assert!(validate_path("output.dir", "").is_err());
        assert!(validate_path("output.dir", "bad\0path").is_err());
    }
}
