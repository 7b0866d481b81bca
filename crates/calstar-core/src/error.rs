use std::fmt;

use axum::http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::response::ApiResponse;

/// Which store constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// A unique column or unique-together tuple already holds the value.
    Unique,
    /// A reference points at a row that does not exist.
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => f.write_str("unique"),
            ConstraintKind::ForeignKey => f.write_str("foreign key"),
        }
    }
}

/// Standard error type for the calstar data layer.
#[derive(Debug, Error)]
pub enum CalstarError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation ({kind}): {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for CalstarError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => CalstarError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                message,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                CalstarError::ConstraintViolation {
                    kind: ConstraintKind::ForeignKey,
                    message,
                }
            }
            _ => match err {
                DbErr::RecordNotFound(what) => CalstarError::NotFound(what),
                other => CalstarError::Database(other),
            },
        }
    }
}

impl CalstarError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CalstarError::NotFound(_) => StatusCode::NOT_FOUND,
            CalstarError::ConstraintViolation { .. } => StatusCode::CONFLICT,
            CalstarError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CalstarError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CalstarError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            CalstarError::NotFound(_) => "NOT_FOUND",
            CalstarError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            } => "UNIQUE_VIOLATION",
            CalstarError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                ..
            } => "FOREIGN_KEY_VIOLATION",
            CalstarError::Validation(_) => "VALIDATION_ERROR",
            CalstarError::Internal(_) => "INTERNAL_ERROR",
            CalstarError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// The constraint that rejected the write, if this is a constraint violation.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            CalstarError::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CalstarError::NotFound(_))
    }
}

/// Error detail for API responses.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl axum::response::IntoResponse for CalstarError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        // Store internals stay in the log, not in the response body.
        let message = match &self {
            CalstarError::Database(err) => {
                tracing::error!(error = %err, "database error while handling request");
                "Database error".to_string()
            }
            _ => self.to_string(),
        };
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: self.error_code().to_string(),
                message,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = CalstarError::from(DbErr::RecordNotFound("Department 7".to_string()));
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_db_errors_stay_database_errors() {
        let err = CalstarError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, CalstarError::Database(_)));
        assert_eq!(err.constraint_kind(), None);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn constraint_codes_distinguish_kinds() {
        let unique = CalstarError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            message: "departments.code".to_string(),
        };
        let fk = CalstarError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            message: "courses.department_id".to_string(),
        };
        assert_eq!(unique.error_code(), "UNIQUE_VIOLATION");
        assert_eq!(fk.error_code(), "FOREIGN_KEY_VIOLATION");
        assert_eq!(unique.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            fk.to_string(),
            "Constraint violation (foreign key): courses.department_id"
        );
    }
}
