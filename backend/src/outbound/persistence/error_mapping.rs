//! Translation of storage-driver failures into domain errors.
//!
//! Every repository funnels Diesel and pool failures through this module so
//! no driver error type reaches a controller. The driver's own message is
//! kept as the error cause.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::Error;

use super::pool::PoolError;

/// Map a Diesel failure raised while working on `entity` to a domain error.
///
/// # Examples
/// ```
/// use backoffice::domain::ErrorKind;
/// use backoffice::outbound::persistence::map_diesel_error;
///
/// let err = map_diesel_error(diesel::result::Error::NotFound, "brand");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.message(), "brand not found");
/// ```
pub fn map_diesel_error(error: DieselError, entity: &str) -> Error {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), entity, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %error,
            entity,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => Error::not_found(format!("{entity} not found")),
        DieselError::DatabaseError(kind, info) => {
            let cause = info.message().to_owned();
            let mapped = match kind {
                DatabaseErrorKind::UniqueViolation => {
                    Error::unique_violation(format!("{entity} already exists"))
                }
                DatabaseErrorKind::ForeignKeyViolation => Error::foreign_key_violation(format!(
                    "{entity} references a missing record or is still in use"
                )),
                DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
                    Error::validation(format!("{entity} violates a data constraint"))
                }
                _ => Error::unknown("database error"),
            };
            mapped.with_cause(cause)
        }
        other => Error::unknown("database error").with_cause(other.to_string()),
    }
}

/// Map a pool checkout or build failure to a domain error.
pub fn map_pool_error(error: PoolError) -> Error {
    debug!(%error, "connection pool failure");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    Error::unknown("database connection error").with_cause(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, message: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(message)))
    }

    #[rstest]
    #[case(
        DatabaseErrorKind::UniqueViolation,
        ErrorKind::UniqueViolation,
        "brand already exists"
    )]
    #[case(
        DatabaseErrorKind::ForeignKeyViolation,
        ErrorKind::ForeignKeyViolation,
        "brand references a missing record or is still in use"
    )]
    #[case(
        DatabaseErrorKind::NotNullViolation,
        ErrorKind::Validation,
        "brand violates a data constraint"
    )]
    #[case(
        DatabaseErrorKind::CheckViolation,
        ErrorKind::Validation,
        "brand violates a data constraint"
    )]
    #[case(DatabaseErrorKind::ClosedConnection, ErrorKind::Unknown, "database error")]
    #[case(DatabaseErrorKind::SerializationFailure, ErrorKind::Unknown, "database error")]
    #[case(DatabaseErrorKind::Unknown, ErrorKind::Unknown, "database error")]
    fn database_errors_map_by_kind(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: ErrorKind,
        #[case] message: &str,
    ) {
        let err = map_diesel_error(database_error(kind, "driver says no"), "brand");
        assert_eq!(err.kind(), expected);
        assert_eq!(err.message(), message);
        assert_eq!(err.cause(), Some("driver says no"));
    }

    #[rstest]
    fn not_found_names_the_entity() {
        let err = map_diesel_error(DieselError::NotFound, "customer");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "customer not found");
    }

    #[rstest]
    fn other_failures_are_unknown_with_cause() {
        let err = map_diesel_error(DieselError::RollbackTransaction, "order");
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.cause().is_some());
    }

    #[rstest]
    #[case(PoolError::checkout("timed out waiting for connection"))]
    #[case(PoolError::build("unable to open database file"))]
    fn pool_errors_are_unknown(#[case] error: PoolError) {
        let err = map_pool_error(error);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), "database connection error");
    }
}
