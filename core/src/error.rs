use std::fmt;
use thiserror::Error;

/// The error type for awsig operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    missing_keys: Vec<String>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request cannot be signed (options malformed, required keys missing, etc.)
    RequestInvalid,

    /// A header required for signing is absent, for example `host`
    HeaderMissing,

    /// Neither `x-amz-date` nor `date` header is present
    DateMissing,

    /// The date value cannot be recognized as a timestamp
    DateInvalid,

    /// Credentials exist but are invalid/malformed
    CredentialInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            missing_keys: Vec::new(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Keys reported as missing by a required-keys check.
    ///
    /// Empty for every other error.
    pub fn missing_keys(&self) -> &[String] {
        &self.missing_keys
    }

    /// Check if this error was raised while validating the request
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RequestInvalid
                | ErrorKind::HeaderMissing
                | ErrorKind::DateMissing
                | ErrorKind::DateInvalid
                | ErrorKind::CredentialInvalid
        )
    }
}

// Convenience constructors
impl Error {
    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a request invalid error listing every missing key.
    pub fn missing_keys_in(what: &str, keys: Vec<String>) -> Self {
        let mut err = Self::request_invalid(format!(
            "Missing the following keys in {what}: {}",
            keys.join(", ")
        ));
        err.missing_keys = keys;
        err
    }

    /// Create a header missing error
    pub fn header_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HeaderMissing, message)
    }

    /// Create a date missing error
    pub fn date_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DateMissing, message)
    }

    /// Create a date invalid error
    pub fn date_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DateInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::HeaderMissing => write!(f, "missing header"),
            ErrorKind::DateMissing => write!(f, "missing date"),
            ErrorKind::DateInvalid => write!(f, "invalid date"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
