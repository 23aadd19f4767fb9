//! Layered error taxonomy for the command side
//!
//! Four sibling kinds share one shape: a machine-readable code, a message,
//! and an optional wrapped cause. The kind records which layer first
//! detected the fault; callers dispatch on kind and code, never on message
//! text. The presentation layer is expected to map kinds to transport
//! statuses (domain → 400, application conflict → 409, storage not-found →
//! 404, internal → 500) without exposing the cause chain.

use strum::Display;
use thiserror::Error;

/// Machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A value failed a business rule at construction time
    InvalidArgument,
    /// A uniqueness rule was violated at the orchestration level
    AlreadyExists,
    /// The targeted row does not exist
    NotFound,
    /// The store rejected a write (unique or referential constraint)
    ConstraintViolation,
    /// A transaction could not be started or resolved
    TransactionFailed,
    /// Infrastructure failed independent of business data
    Internal,
}

/// Boxed cause retained for root-cause tracing via `source()`
pub type ErrorCause = Box<dyn std::error::Error + Send + Sync + 'static>;

fn cause_suffix(cause: &Option<ErrorCause>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

macro_rules! error_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Error)]
        #[error("{code}: {message}{}", cause_suffix(.cause))]
        pub struct $name {
            code: ErrorCode,
            message: String,
            #[source]
            cause: Option<ErrorCause>,
        }

        impl $name {
            pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
                Self {
                    code,
                    message: message.into(),
                    cause: None,
                }
            }

            pub fn with_cause(
                code: ErrorCode,
                message: impl Into<String>,
                cause: impl Into<ErrorCause>,
            ) -> Self {
                Self {
                    code,
                    message: message.into(),
                    cause: Some(cause.into()),
                }
            }

            pub fn code(&self) -> ErrorCode {
                self.code
            }

            pub fn message(&self) -> &str {
                &self.message
            }
        }
    };
}

error_kind! {
    /// Raised by aggregate factories when a value fails a business rule.
    /// Never carries a storage-layer cause.
    DomainError
}

error_kind! {
    /// Raised by an application service when a cross-aggregate rule is
    /// violated that the repository alone cannot detect before writing
    ApplicationError
}

error_kind! {
    /// Raised by a repository implementation when the store has no row to
    /// operate on or rejects the operation outright
    CrudError
}

error_kind! {
    /// Raised when infrastructure fails independent of business data
    InternalError
}

impl CrudError {
    /// Missing row on update or delete
    pub fn not_found(entity: &str, id: uuid::Uuid) -> Self {
        Self::new(ErrorCode::NotFound, format!("{entity} {id} does not exist"))
    }
}

/// Sum of the four kinds, used in every fallible signature of this crate
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Crud(#[from] CrudError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Domain(e) => e.code(),
            Self::Application(e) => e.code(),
            Self::Crud(e) => e.code(),
            Self::Internal(e) => e.code(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Crud(e) if e.code() == ErrorCode::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::AlreadyExists | ErrorCode::ConstraintViolation
        )
    }
}

/// A failure while resolving a transaction surfaces as an internal error;
/// the business error, when present, takes priority over it upstream.
impl From<database::DatabaseError> for CatalogError {
    fn from(err: database::DatabaseError) -> Self {
        InternalError::with_cause(
            ErrorCode::TransactionFailed,
            "transaction could not be completed",
            err,
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_renders_code_and_message() {
        let err = CrudError::not_found("product", uuid::Uuid::nil());
        assert_eq!(
            err.to_string(),
            "NOT_FOUND: product 00000000-0000-0000-0000-000000000000 does not exist"
        );
    }

    #[test]
    fn test_renders_cause_when_present() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = InternalError::with_cause(ErrorCode::TransactionFailed, "commit failed", io);
        assert_eq!(
            err.to_string(),
            "TRANSACTION_FAILED: commit failed: connection reset"
        );
    }

    #[test]
    fn test_cause_chain_reaches_originating_fault() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionAborted, "socket closed");
        let crud = CrudError::with_cause(ErrorCode::ConstraintViolation, "insert rejected", io);
        let wrapped: CatalogError =
            InternalError::with_cause(ErrorCode::Internal, "command failed", crud).into();

        let first = wrapped.source().expect("internal error has a cause");
        assert!(first.to_string().starts_with("CONSTRAINT_VIOLATION"));

        let second = first.source().expect("crud error has a cause");
        assert!(second.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_code_dispatch_through_the_sum_type() {
        let conflict: CatalogError =
            ApplicationError::new(ErrorCode::AlreadyExists, "category exists").into();
        assert_eq!(conflict.code(), ErrorCode::AlreadyExists);
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let missing: CatalogError = CrudError::not_found("category", uuid::Uuid::nil()).into();
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_codes_render_screaming_snake_case() {
        assert_eq!(ErrorCode::InvalidArgument.to_string(), "INVALID_ARGUMENT");
        assert_eq!(ErrorCode::AlreadyExists.to_string(), "ALREADY_EXISTS");
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(
            ErrorCode::ConstraintViolation.to_string(),
            "CONSTRAINT_VIOLATION"
        );
    }
}
