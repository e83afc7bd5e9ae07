use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Source fetch failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    ParseError(#[from] csv::Error),

    #[error("Duplicate column '{column}' in source data")]
    DuplicateColumnError { column: String },

    #[error("Spreadsheet rendering failed: {0}")]
    RenderError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid mail address '{address}': {source}")]
    AddressError {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Mail message build failed: {0}")]
    MessageError(#[from] lettre::error::Error),

    #[error("Attachment content type error: {0}")]
    ContentTypeError(#[from] lettre::message::header::ContentTypeErr),

    #[error("SMTP submission failed: {0}")]
    MailError(#[from] lettre::transport::smtp::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
