//! # Error Handling
//!
//! This module provides the unified error type for the Tenancy Ledger. Every
//! repository operation returns [`LedgerError`], which separates field-level
//! validation failures from the lease admission rule and from foreign-key
//! problems reported by the database.

use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Result alias used throughout the repository layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A field violates its declared constraint (type, length, uniqueness, required-ness).
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    /// The tenant already holds an unpaid lease.
    #[error("Tenant {tenant_name} cannot add more leases until the previous one is paid.")]
    InvariantViolation { tenant_id: Uuid, tenant_name: String },

    /// A write would break a foreign-key relationship.
    #[error("referential integrity violated: {0}")]
    ReferentialIntegrity(String),

    /// The addressed record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

/// Serializable summary of a [`LedgerError`] for operator-facing output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Error code for programmatic handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl LedgerError {
    /// Build a validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Build a not-found error for the given entity name and id.
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Get the error code string for this error (SCREAMING_SNAKE_CASE).
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::Validation { .. } => "VALIDATION_FAILED",
            LedgerError::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            LedgerError::ReferentialIntegrity(_) => "REFERENTIAL_INTEGRITY",
            LedgerError::NotFound { .. } => "NOT_FOUND",
            LedgerError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code(),
            message: self.to_string(),
        }
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, LedgerError::InvariantViolation { .. })
    }
}

impl From<DbErr> for LedgerError {
    fn from(error: DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            return Self::validation("unique", "a record with the same unique value already exists");
        }

        if is_foreign_key_violation(&error) {
            tracing::debug!(?error, "Foreign key violation detected");
            return Self::ReferentialIntegrity(
                "referenced record does not exist or is still referenced".to_string(),
            );
        }

        match error {
            DbErr::RecordNotFound(record) => {
                Self::ReferentialIntegrity(format!("record not found: {record}"))
            }
            other => {
                tracing::error!(error = ?other, "Database error");
                Self::Database(other)
            }
        }
    }
}

fn database_error(error: &DbErr) -> Option<&(dyn sea_orm::sqlx::error::DatabaseError + 'static)> {
    let runtime_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return None,
    };

    runtime_err.as_database_error()
}

/// Whether the database rejected a write because of a unique constraint.
pub fn is_unique_violation(error: &DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let Some(db_error) = database_error(error) else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    db_error
        .code()
        .is_some_and(|code| code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&&*code))
}

/// Whether the database rejected a write because of a foreign-key constraint.
pub fn is_foreign_key_violation(error: &DbErr) -> bool {
    const PG_FOREIGN_KEY: &str = "23503";
    const SQLITE_FOREIGN_KEY: &str = "787";

    let Some(db_error) = database_error(error) else {
        return false;
    };

    if db_error.is_foreign_key_violation() {
        return true;
    }

    db_error
        .code()
        .is_some_and(|code| code == PG_FOREIGN_KEY || code == SQLITE_FOREIGN_KEY)
}

/// Name of the violated constraint, when the driver reports one (Postgres does, SQLite does not).
pub fn violated_constraint(error: &DbErr) -> Option<String> {
    database_error(error)
        .and_then(|db_error| db_error.constraint())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let validation = LedgerError::validation("email", "Invalid email format");
        assert_eq!(validation.error_code(), "VALIDATION_FAILED");

        let invariant = LedgerError::InvariantViolation {
            tenant_id: Uuid::new_v4(),
            tenant_name: "Budi".to_string(),
        };
        assert_eq!(invariant.error_code(), "INVARIANT_VIOLATION");
        assert!(invariant.is_invariant_violation());

        let missing = LedgerError::not_found("tenant", Uuid::nil());
        assert_eq!(missing.error_code(), "NOT_FOUND");
        assert!(!missing.is_invariant_violation());
    }

    #[test]
    fn test_invariant_message_names_tenant() {
        let error = LedgerError::InvariantViolation {
            tenant_id: Uuid::new_v4(),
            tenant_name: "Siti Rahma".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Tenant Siti Rahma cannot add more leases until the previous one is paid."
        );
    }

    #[test]
    fn test_record_not_found_maps_to_referential_integrity() {
        let error: LedgerError = DbErr::RecordNotFound("leases".to_string()).into();

        assert_eq!(error.error_code(), "REFERENTIAL_INTEGRITY");
        assert!(error.to_string().contains("leases"));
    }

    #[test]
    fn test_other_db_errors_are_preserved() {
        let error: LedgerError = DbErr::Custom("boom".to_string()).into();

        assert!(matches!(error, LedgerError::Database(DbErr::Custom(_))));
        assert!(!is_unique_violation(&DbErr::Custom("boom".to_string())));
        assert!(!is_foreign_key_violation(&DbErr::Custom("boom".to_string())));
    }

    #[test]
    fn test_report_serializes_code_and_message() {
        let report = LedgerError::validation("watt", "must not be negative").report();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["message"], "validation failed on `watt`: must not be negative");
    }
}
