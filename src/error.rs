//! Error types for forest
//!
//! This module defines the error taxonomy for the whole crate. Every HTTP
//! status the broker understands maps to exactly one variant, and every
//! transport failure is translated into `Connection`, `Timeout` or `Http`,
//! so callers never need to reach for `reqwest` to handle an error.

use thiserror::Error;

/// Discriminant of an [`Error`], used to tell failures apart by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    Connection,
    Timeout,
    Http,
    Api,
    MissingHeader,
    Decode,
    RecordExtraction,
    Config,
    Io,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    ///
    /// Returns `None` for every code outside the classified set, meaning the
    /// response continues down the success path.
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            405 => Some(Self::MethodNotAllowed),
            406 => Some(Self::NotAcceptable),
            500 => Some(Self::InternalServerError),
            502 => Some(Self::BadGateway),
            503 => Some(Self::ServiceUnavailable),
            _ => None,
        }
    }

    /// The status code a status-derived kind stands for
    pub const fn status_code(self) -> Option<u16> {
        match self {
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::MethodNotAllowed => Some(405),
            Self::NotAcceptable => Some(406),
            Self::InternalServerError => Some(500),
            Self::BadGateway => Some(502),
            Self::ServiceUnavailable => Some(503),
            _ => None,
        }
    }
}

/// The main error type for forest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // HTTP Status Errors
    // ============================================================================
    #[error("400 Bad Request: {body}")]
    BadRequest { body: String },

    #[error("401 Unauthorized: {body}")]
    Unauthorized { body: String },

    #[error("403 Forbidden: {body}")]
    Forbidden { body: String },

    #[error("404 Not Found: {body}")]
    NotFound { body: String },

    #[error("405 Method Not Allowed: {body}")]
    MethodNotAllowed { body: String },

    #[error("406 Not Acceptable: {body}")]
    NotAcceptable { body: String },

    #[error("500 Internal Server Error: {body}")]
    InternalServerError { body: String },

    #[error("502 Bad Gateway: {body}")]
    BadGateway { body: String },

    #[error("503 Service Unavailable: {body}")]
    ServiceUnavailable { body: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    #[error("HTTP error: {message}")]
    Http { message: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("The server has gone nuts: unexpected status {status}")]
    Api { status: u16 },

    #[error("Response is missing the '{header}' header")]
    MissingHeader { header: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to extract records from path '{path}': {message}")]
    RecordExtraction { path: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build the error matching a classified status code.
    ///
    /// Returns `None` when the status is not part of the taxonomy.
    pub fn from_status(status: u16, body: impl Into<String>) -> Option<Self> {
        let body = body.into();
        let err = match ErrorKind::from_status(status)? {
            ErrorKind::BadRequest => Self::BadRequest { body },
            ErrorKind::Unauthorized => Self::Unauthorized { body },
            ErrorKind::Forbidden => Self::Forbidden { body },
            ErrorKind::NotFound => Self::NotFound { body },
            ErrorKind::MethodNotAllowed => Self::MethodNotAllowed { body },
            ErrorKind::NotAcceptable => Self::NotAcceptable { body },
            ErrorKind::InternalServerError => Self::InternalServerError { body },
            ErrorKind::BadGateway => Self::BadGateway { body },
            ErrorKind::ServiceUnavailable => Self::ServiceUnavailable { body },
            _ => return None,
        };
        Some(err)
    }

    /// Translate a transport failure into the crate's taxonomy.
    ///
    /// Redirect loops, builder failures and anything unclassified end up as
    /// [`Error::Http`].
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_connect() {
            Self::Connection { message }
        } else if err.is_timeout() {
            Self::Timeout { message }
        } else if err.is_decode() {
            Self::Decode { message }
        } else {
            Self::Http { message }
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a record extraction error
    pub fn extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            Self::NotAcceptable { .. } => ErrorKind::NotAcceptable,
            Self::InternalServerError { .. } => ErrorKind::InternalServerError,
            Self::BadGateway { .. } => ErrorKind::BadGateway,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Http { .. } => ErrorKind::Http,
            Self::Api { .. } => ErrorKind::Api,
            Self::MissingHeader { .. } => ErrorKind::MissingHeader,
            Self::Decode { .. } | Self::JsonParse(_) => ErrorKind::Decode,
            Self::RecordExtraction { .. } => ErrorKind::RecordExtraction,
            Self::Config { .. }
            | Self::InvalidConfigValue { .. }
            | Self::YamlParse(_)
            | Self::InvalidUrl(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Check if the connector should retry after this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Connection { .. } | Error::ServiceUnavailable { .. }
        )
    }
}

/// Result type alias for forest
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(400, ErrorKind::BadRequest)]
    #[test_case(401, ErrorKind::Unauthorized)]
    #[test_case(403, ErrorKind::Forbidden)]
    #[test_case(404, ErrorKind::NotFound)]
    #[test_case(405, ErrorKind::MethodNotAllowed)]
    #[test_case(406, ErrorKind::NotAcceptable)]
    #[test_case(500, ErrorKind::InternalServerError)]
    #[test_case(502, ErrorKind::BadGateway)]
    #[test_case(503, ErrorKind::ServiceUnavailable)]
    fn test_classified_status(status: u16, kind: ErrorKind) {
        assert_eq!(ErrorKind::from_status(status), Some(kind));
        assert_eq!(kind.status_code(), Some(status));

        let err = Error::from_status(status, "boom").unwrap();
        assert_eq!(err.kind(), kind);
        assert!(err.to_string().starts_with(&status.to_string()));
    }

    #[test_case(200)]
    #[test_case(201)]
    #[test_case(204)]
    #[test_case(302)]
    #[test_case(410)]
    #[test_case(429)]
    #[test_case(504)]
    fn test_unclassified_status(status: u16) {
        assert_eq!(ErrorKind::from_status(status), None);
        assert!(Error::from_status(status, "").is_none());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Connection {
            message: "refused".into()
        }
        .is_retryable());
        assert!(Error::from_status(503, "").unwrap().is_retryable());

        assert!(!Error::from_status(500, "").unwrap().is_retryable());
        assert!(!Error::from_status(502, "").unwrap().is_retryable());
        assert!(!Error::from_status(404, "").unwrap().is_retryable());
        assert!(!Error::Timeout {
            message: "slow".into()
        }
        .is_retryable());
        assert!(!Error::Api { status: 410 }.is_retryable());
    }

    #[tokio::test]
    async fn test_connect_phase_failures_are_connection_errors() {
        // Non-routable address: either unreachable or a connect timeout
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_millis(1))
            .no_proxy()
            .build()
            .unwrap();
        let err = client
            .get("http://10.255.255.1:81/")
            .send()
            .await
            .unwrap_err();

        let err = Error::from_transport(&err);
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::Api { status: 410 };
        assert_eq!(
            err.to_string(),
            "The server has gone nuts: unexpected status 410"
        );

        let err = Error::invalid_value("max_retries", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'max_retries': must be positive"
        );

        let err = Error::extraction("objects", "not an array");
        assert_eq!(
            err.to_string(),
            "Failed to extract records from path 'objects': not an array"
        );
    }

    #[test]
    fn test_kind_of_non_taxonomy_errors() {
        assert_eq!(Error::config("x").kind(), ErrorKind::Config);
        assert_eq!(Error::decode("x").kind(), ErrorKind::Decode);
        assert_eq!(
            Error::MissingHeader {
                header: "location".into()
            }
            .kind(),
            ErrorKind::MissingHeader
        );
    }
}
