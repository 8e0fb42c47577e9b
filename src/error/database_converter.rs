use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Storage constraints stay authoritative even where services pre-check
/// (uniqueness races, rows deleted concurrently), so their violations must
/// surface as the same client errors the pre-checks produce.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let details = info.details();
        let table = info.table_name();
        let constraint = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(message, details, table, constraint).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(message, details, table, constraint)
                    .map(|(entity, field, value)| AppError::Validation {
                        field,
                        reason: format!("Invalid or still-referenced {} with value '{}'", entity, value),
                    })
            }
            DatabaseErrorKind::NotNullViolation => ConstraintParser::parse_column_violation(
                message,
                table,
                info.column_name(),
                constraint,
            )
            .map(|(entity, field)| AppError::Validation {
                field,
                reason: format!("Field is required for {}", entity),
            }),
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_column_violation(message, table, None, constraint).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {}", entity),
                    },
                )
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockInfo {
        message: &'static str,
        details: Option<&'static str>,
        table: Option<&'static str>,
        column: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for MockInfo {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            self.details
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            self.table
        }
        fn column_name(&self) -> Option<&str> {
            self.column
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, info: MockInfo) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    #[test]
    fn test_unique_violation_becomes_duplicate() {
        let err = db_error(
            DatabaseErrorKind::UniqueViolation,
            MockInfo {
                message: "duplicate key value violates unique constraint \"readers_email_key\"",
                details: Some("Key (email)=(ann@example.com) already exists."),
                table: Some("readers"),
                column: None,
                constraint: Some("readers_email_key"),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(err, "create reader") {
            AppError::Duplicate { entity, field, value } => {
                assert_eq!(entity, "readers");
                assert_eq!(field, "email");
                assert_eq!(value, "ann@example.com");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_check_violation_becomes_validation() {
        let err = db_error(
            DatabaseErrorKind::CheckViolation,
            MockInfo {
                message: "new row for relation \"books\" violates check constraint \"copies_available_non_negative\"",
                details: None,
                table: Some("books"),
                column: None,
                constraint: Some("copies_available_non_negative"),
            },
        );

        assert!(matches!(
            DatabaseErrorConverter::convert_diesel_error(err, "update book"),
            AppError::Validation { .. }
        ));
    }

    #[test]
    fn test_not_found_maps_to_generic_not_found() {
        assert!(matches!(
            DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find"),
            AppError::NotFound { .. }
        ));
    }

    #[test]
    fn test_other_errors_keep_operation() {
        let err = db_error(
            DatabaseErrorKind::SerializationFailure,
            MockInfo {
                message: "could not serialize access",
                details: None,
                table: None,
                column: None,
                constraint: None,
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(err, "borrow") {
            AppError::Database { operation, .. } => assert_eq!(operation, "borrow"),
            other => panic!("Expected Database, got {:?}", other),
        }
    }
}
