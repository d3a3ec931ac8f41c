//! Domain-level error types.
//!
//! These errors are transport agnostic. Every failure a command can produce
//! reaches the caller as one of these values inside the response envelope,
//! whichever layer raised it.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error kind describing the failure category.
///
/// The set is closed: callers may branch on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller-supplied input failed shape or range checks.
    Validation,
    /// The acting user is unknown or lacks the required role.
    Unauthorized,
    /// The requested record does not exist.
    NotFound,
    /// A natural key (for example a brand name) is already taken.
    UniqueViolation,
    /// The write would break a reference between records.
    ForeignKeyViolation,
    /// Login name or password did not match.
    IncorrectCredentials,
    /// Anything else, including transport faults.
    Unknown,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use backoffice::domain::{Error, ErrorKind};
///
/// let err = Error::not_found("brand 4 not found");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    cause: Option<String>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// Only call this with literal or formatted messages known to be
    /// non-empty; use [`Error::try_new`] for untrusted text.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        match Self::try_new(kind, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            kind,
            message,
            cause: None,
        })
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message returned to the UI.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Diagnostic detail describing the underlying failure, if any.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// Attach diagnostic detail to the error.
    ///
    /// Blank causes are dropped.
    ///
    /// # Examples
    /// ```
    /// use backoffice::domain::Error;
    ///
    /// let err = Error::unknown("database error").with_cause("database is locked");
    /// assert_eq!(err.cause(), Some("database is locked"));
    /// ```
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        self.cause = (!cause.trim().is_empty()).then_some(cause);
        self
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Convenience constructor for [`ErrorKind::UniqueViolation`].
    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UniqueViolation, message)
    }

    /// Convenience constructor for [`ErrorKind::ForeignKeyViolation`].
    pub fn foreign_key_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ForeignKeyViolation, message)
    }

    /// Convenience constructor for [`ErrorKind::IncorrectCredentials`].
    pub fn incorrect_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncorrectCredentials, message)
    }

    /// Convenience constructor for [`ErrorKind::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ErrorDto {
    kind: ErrorKind,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            kind: value.kind,
            message: value.message,
            cause: value.cause,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            kind,
            message,
            cause,
        } = value;

        let error = Error::try_new(kind, message)?;
        Ok(match cause {
            Some(cause) => error.with_cause(cause),
            None => error,
        })
    }
}
