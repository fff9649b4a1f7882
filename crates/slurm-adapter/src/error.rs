//! The error taxonomy of the adapter layer.
//!
//! Every failure surfaced to a caller is a [`SlurmError`]: a kind with a
//! stable code, a message, and the API version and HTTP status it came
//! from when known. Retry classification is derived from the kind alone.

use std::fmt;

use chrono::{DateTime, Utc};
use slurm_pool::PoolError;
use slurm_types::TypesError;
use slurm_wire::{ApiMessage, WireError};
use thiserror::Error;

use crate::version::ApiVersion;

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The entity does not exist.
    NotFound,
    /// The request was rejected as invalid, either locally or by the server.
    ValidationFailed,
    /// Authentication or authorisation failed.
    Unauthorized,
    /// The server failed.
    ServerInternal,
    /// The server is temporarily unable to serve requests.
    ServiceUnavailable,
    /// Too many requests.
    RateLimited,
    /// The operation does not exist in this API version.
    NotImplemented,
    /// The response could not be decoded or lacked a required field.
    MalformedResponse,
    /// The caller cancelled the request.
    Cancelled,
    /// The caller's deadline passed.
    DeadlineExceeded,
    /// The request could not be delivered.
    NetworkError,
    /// The requested API version is not known.
    UnsupportedVersion,
    /// A non-success status without a more specific mapping.
    UnexpectedStatus,
}

impl ErrorKind {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ServerInternal => "SERVER_INTERNAL",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::RateLimited => "RATE_LIMITED",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::Cancelled => "CONTEXT_CANCELED",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NetworkError => "NETWORK_ERROR",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
            Self::UnexpectedStatus => "UNEXPECTED_STATUS",
        }
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::ServiceUnavailable
                | Self::NetworkError
                | Self::DeadlineExceeded
        )
    }

    /// Whether the condition is expected to clear on its own.
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        self.is_retryable()
    }

    /// Kind for a non-success HTTP status. `None` for 2xx.
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        Some(match status {
            200..=299 => return None,
            400 | 409 | 422 => Self::ValidationFailed,
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            500..=599 => Self::ServerInternal,
            _ => Self::UnexpectedStatus,
        })
    }

    /// Kind for a Slurm error name found in a server message.
    #[must_use]
    pub fn from_slurm_message(text: &str) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        let has = |name: &str| upper.contains(name);
        if has("SLURM_INVALID_JOB_ID")
            || has("SLURM_NO_CHANGE_IN_DATA")
            || has("SLURM_INVALID_PARTITION_NAME")
            || has("INVALID JOB ID")
        {
            Some(Self::NotFound)
        } else if has("SLURM_ACCESS_DENIED") || has("SLURM_AUTHENTICATION_ERROR") {
            Some(Self::Unauthorized)
        } else if has("SLURM_JOB_ALREADY_COMPLETE") {
            Some(Self::ValidationFailed)
        } else if has("SLURM_COMMUNICATIONS_") {
            Some(Self::NetworkError)
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Optional detail text, rendered as `: detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details(Option<String>);

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(details) => write!(f, ": {details}"),
            None => Ok(()),
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error returned by any adapter operation.
#[derive(Debug, Error)]
#[error("[{kind}] {message}{details}")]
pub struct SlurmError {
    kind: ErrorKind,
    message: String,
    details: Details,
    version: Option<ApiVersion>,
    status: Option<u16>,
    timestamp: DateTime<Utc>,
    #[source]
    source: Option<BoxError>,
}

impl SlurmError {
    /// Create an error of `kind`.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Details::default(),
            version: None,
            status: None,
            timestamp: Utc::now(),
            source: None,
        }
    }

    /// Entity not found.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Local or remote validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    /// Undecodable response.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// A required wire field was absent.
    #[must_use]
    pub fn missing_field(entity: &str, field: &str) -> Self {
        Self::malformed(format!("{entity} record is missing required field {field}"))
    }

    /// Operation absent from an API version.
    #[must_use]
    pub fn not_implemented(operation: &str, version: ApiVersion) -> Self {
        Self::new(
            ErrorKind::NotImplemented,
            format!("{operation} not implemented for version {version}"),
        )
        .with_version(version)
    }

    /// Unknown version string.
    #[must_use]
    pub fn unsupported_version(requested: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedVersion,
            format!("unsupported API version {requested:?}"),
        )
    }

    /// The caller cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "context canceled")
    }

    /// The caller's deadline passed.
    #[must_use]
    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::DeadlineExceeded, "context deadline exceeded")
    }

    /// Error for a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, version: ApiVersion) -> Self {
        let kind = ErrorKind::from_status(status).unwrap_or(ErrorKind::UnexpectedStatus);
        Self::new(kind, format!("HTTP {status}"))
            .with_status(status)
            .with_version(version)
    }

    /// Error for a server-reported failure in an otherwise successful
    /// response.
    #[must_use]
    pub fn from_api_message(message: &ApiMessage, status: u16, version: ApiVersion) -> Self {
        let text = message.text();
        let kind = ErrorKind::from_slurm_message(&text).unwrap_or(ErrorKind::ServerInternal);
        Self::new(kind, text)
            .with_status(status)
            .with_version(version)
    }

    /// Classify a wire failure.
    #[must_use]
    pub fn from_wire(err: WireError, version: ApiVersion) -> Self {
        let (kind, message) = match &err {
            WireError::Decode(_) => (ErrorKind::MalformedResponse, "response body is not valid"),
            WireError::InvalidEndpoint { .. } | WireError::InvalidHeader { .. } => {
                (ErrorKind::ValidationFailed, "request could not be built")
            }
            WireError::Pool(PoolError::InvalidConfig(_) | PoolError::ClientBuild { .. }) => {
                (ErrorKind::ValidationFailed, "HTTP client could not be built")
            }
            WireError::Pool(PoolError::Closed { .. }) => {
                (ErrorKind::NetworkError, "connection pool closed")
            }
            WireError::Timeout(_) | WireError::Transport(_) | WireError::Other(_) => {
                (ErrorKind::NetworkError, "request failed")
            }
        };
        Self::new(kind, message)
            .with_version(version)
            .with_source(err)
    }

    /// Attach detail text.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Details(Some(details.into()));
        self
    }

    /// Record the originating version unless one is already recorded.
    #[must_use]
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version.get_or_insert(version);
        self
    }

    /// Record the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Message without code or details.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Detail text.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.0.as_deref()
    }

    /// Originating API version.
    #[must_use]
    pub const fn version(&self) -> Option<ApiVersion> {
        self.version
    }

    /// HTTP status, if the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// When the error was created.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// See [`ErrorKind::is_retryable`].
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// See [`ErrorKind::is_temporary`].
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.kind.is_temporary()
    }

    /// Returns true for [`ErrorKind::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Returns true for cancellation or an expired deadline.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled | ErrorKind::DeadlineExceeded)
    }
}

impl From<TypesError> for SlurmError {
    fn from(err: TypesError) -> Self {
        Self::validation(err.to_string()).with_source(err)
    }
}

/// Result type for adapter operations.
pub type SlurmResult<T> = Result<T, SlurmError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use test_case::test_case;

    use super::*;

    #[test_case(400, ErrorKind::ValidationFailed ; "bad request")]
    #[test_case(401, ErrorKind::Unauthorized ; "unauthorized")]
    #[test_case(403, ErrorKind::Unauthorized ; "forbidden")]
    #[test_case(404, ErrorKind::NotFound ; "not found")]
    #[test_case(409, ErrorKind::ValidationFailed ; "conflict")]
    #[test_case(422, ErrorKind::ValidationFailed ; "unprocessable")]
    #[test_case(429, ErrorKind::RateLimited ; "rate limited")]
    #[test_case(500, ErrorKind::ServerInternal ; "internal")]
    #[test_case(502, ErrorKind::ServerInternal ; "bad gateway")]
    #[test_case(503, ErrorKind::ServiceUnavailable ; "unavailable")]
    #[test_case(418, ErrorKind::UnexpectedStatus ; "teapot")]
    fn test_status_mapping(status: u16, expected: ErrorKind) {
        let err = SlurmError::from_status(status, ApiVersion::V0042);
        assert_eq!(err.kind(), expected);
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.version(), Some(ApiVersion::V0042));
    }

    #[test]
    fn test_success_has_no_kind() {
        assert_eq!(ErrorKind::from_status(200), None);
        assert_eq!(ErrorKind::from_status(204), None);
    }

    #[test_case(429, true ; "rate limited retryable")]
    #[test_case(503, true ; "unavailable retryable")]
    #[test_case(500, false ; "internal not retryable")]
    #[test_case(404, false ; "not found not retryable")]
    #[test_case(422, false ; "validation not retryable")]
    fn test_retry_classification(status: u16, retryable: bool) {
        let err = SlurmError::from_status(status, ApiVersion::V0044);
        assert_eq!(err.is_retryable(), retryable);
        assert_eq!(err.is_temporary(), retryable);
    }

    #[test]
    fn test_cancellation_classification() {
        assert!(!SlurmError::cancelled().is_retryable());
        assert!(SlurmError::deadline_exceeded().is_retryable());
        assert!(SlurmError::cancelled().is_cancellation());
        assert_eq!(SlurmError::cancelled().code(), "CONTEXT_CANCELED");
        assert_eq!(SlurmError::deadline_exceeded().code(), "DEADLINE_EXCEEDED");
    }

    #[test]
    fn test_display_with_details() {
        let err = SlurmError::not_found("job 7").with_details("purged");
        assert_eq!(err.to_string(), "[NOT_FOUND] job 7: purged");
        let plain = SlurmError::validation("name is required");
        assert_eq!(plain.to_string(), "[VALIDATION_FAILED] name is required");
    }

    #[test]
    fn test_not_implemented_message() {
        let err = SlurmError::not_implemented("jobs.update", ApiVersion::V0040);
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert!(err.to_string().contains("not implemented"));
        assert!(err.to_string().contains("v0.0.40"));
    }

    #[test]
    fn test_with_version_keeps_first() {
        let err = SlurmError::malformed("x")
            .with_version(ApiVersion::V0041)
            .with_version(ApiVersion::V0043);
        assert_eq!(err.version(), Some(ApiVersion::V0041));
    }

    #[test_case("SLURM_INVALID_JOB_ID", ErrorKind::NotFound ; "invalid job id")]
    #[test_case("Invalid job id specified", ErrorKind::NotFound ; "invalid job id text")]
    #[test_case("slurm_access_denied", ErrorKind::Unauthorized ; "access denied")]
    #[test_case("SLURM_JOB_ALREADY_COMPLETE", ErrorKind::ValidationFailed ; "already complete")]
    #[test_case("SLURM_COMMUNICATIONS_CONNECTION_ERROR", ErrorKind::NetworkError ; "comms")]
    fn test_slurm_message_mapping(text: &str, expected: ErrorKind) {
        assert_eq!(ErrorKind::from_slurm_message(text), Some(expected));
    }

    #[test]
    fn test_api_message_fallback_is_server_internal() {
        let message = ApiMessage {
            error: Some("Something odd".into()),
            ..ApiMessage::default()
        };
        let err = SlurmError::from_api_message(&message, 200, ApiVersion::V0042);
        assert_eq!(err.kind(), ErrorKind::ServerInternal);
        assert_eq!(err.message(), "Something odd");
    }

    #[test]
    fn test_wire_error_keeps_source() {
        let err = SlurmError::from_wire(WireError::Other("reset".into()), ApiVersion::V0042);
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(err.is_retryable());
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("reset"));
    }

    #[test]
    fn test_types_error_is_validation() {
        let err: SlurmError = TypesError::missing("name").into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SlurmError>();
    }
}
