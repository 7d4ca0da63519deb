use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    state::error::{EngineError, RuleKind},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A game rule rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Snapshot storage failed.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest {
            code: "VALIDATION_FAILED",
            message: format!("validation failed: {}", err),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{message}")]
    BadRequest {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
    /// Missing or wrong game access code.
    #[error("{0}")]
    Unauthorized(String),
    /// Actor is not allowed to act on the target.
    #[error("{message}")]
    Forbidden {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
    /// Conflict with current state.
    #[error("{message}")]
    Conflict {
        /// Machine-readable code.
        code: &'static str,
        /// Human-readable message.
        message: String,
    },
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. } => *code,
            AppError::Unauthorized(_) => "INVALID_GAME_ID",
            AppError::ServiceUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err.kind() {
            RuleKind::Invalid => AppError::BadRequest { code, message },
            RuleKind::Missing => AppError::NotFound { code, message },
            RuleKind::Forbidden => AppError::Forbidden { code, message },
            RuleKind::Conflict => AppError::Conflict { code, message },
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Engine(engine) => engine.into(),
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest {
                code: "INVALID_INPUT",
                message,
            },
            ServiceError::NotFound(message) => AppError::NotFound {
                code: "NOT_FOUND",
                message,
            },
        }
    }
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable explanation.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let payload = Json(ErrorBody {
            ok: false,
            error: self.code().to_string(),
            message: self.to_string(),
        });

        (self.status(), payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_statuses() {
        let forbidden: AppError = ServiceError::from(EngineError::ProctorNotAuthorized {
            proctor_id: "p1".into(),
            team_id: "t2".into(),
        })
        .into();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.code(), "PROCTOR_NOT_AUTHORIZED");

        let missing: AppError = EngineError::ProctorNotFound("p9".into()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let closed: AppError = EngineError::ScoringClosed.into();
        assert_eq!(closed.status(), StatusCode::CONFLICT);
        assert_eq!(closed.to_string(), "scoring is closed");

        let invalid: AppError = EngineError::InvalidPhase("FINAL".into()).into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_are_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = ServiceError::from(StorageError::io("write", "data/game.json", io)).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "STORAGE_UNAVAILABLE");
        assert!(err.to_string().contains("cannot write data/game.json"));
    }

    #[test]
    fn unauthorized_reports_invalid_game_id() {
        let err = AppError::Unauthorized("missing game id".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "INVALID_GAME_ID");
        assert_eq!(err.to_string(), "missing game id");
    }
}
