//! Shared helpers for the Diesel repository implementations.
//!
//! - Error mapping from pool and Diesel errors to [`PersistenceError`],
//!   preserving the constraint name of unique violations.
//! - Row conversion collection.
//! - Count casting between `BIGINT` and domain counters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to persistence errors.
///
/// Unique violations keep the name of the violated constraint so services
/// can tell a duplicate vote from a duplicate email. A unique violation
/// without a constraint name is treated as a plain query failure.
pub(crate) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => PersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match info.constraint_name() {
                Some(constraint) => PersistenceError::unique_violation(constraint),
                None => {
                    warn!(
                        message = info.message(),
                        "unique violation without a constraint name"
                    );
                    PersistenceError::query("database error")
                }
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection error")
        }
        _ => PersistenceError::query("database error"),
    }
}

/// Convert rows into domain values, failing on the first invalid row.
pub(crate) fn collect_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(PersistenceError::query)
}

/// Convert an optional row into a domain value.
pub(crate) fn convert_row<R, T>(row: Option<R>) -> Result<Option<T>, PersistenceError>
where
    T: TryFrom<R, Error = String>,
{
    row.map(T::try_from)
        .transpose()
        .map_err(PersistenceError::query)
}

/// Cast a database count (`BIGINT`) to a domain counter.
#[expect(
    clippy::cast_sign_loss,
    reason = "COUNT(*) is never negative"
)]
pub(crate) fn cast_count(count: i64) -> u64 {
    count as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
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
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Info { constraint }),
        )
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let mapped = map_diesel_error(unique(Some("votes_user_session_key")));
        assert_eq!(mapped.violated_constraint(), Some("votes_user_session_key"));
    }

    #[rstest]
    fn unnamed_unique_violation_is_a_query_error() {
        let mapped = map_diesel_error(unique(None));
        assert!(matches!(mapped, PersistenceError::Query { .. }));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            PersistenceError::query("record not found")
        );
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, PersistenceError::connection("timed out"));
    }
}
