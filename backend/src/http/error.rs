//! HTTP error handling.
//!
//! Failures keep the JSON shape clients of the clinic API already parse:
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `ValidationFailed` | 400 | `{"Message", "Errors": [..]}` |
//! | `NotFound` | 404 | `{"Message"}` |
//! | `Store` / `Internal` | 500 | `{"Message", "Error"}` |
//!
//! A store failure exposes only the driver's message; the operation context is
//! logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::db::repository::RepositoryError;

/// Message attached to every 400 response.
pub const INVALID_REQUEST: &str = "La petición contiene campos inválidos";
/// Generic prefix for failed reads.
pub const QUERY_FAILED: &str = "Error al realizar la consulta en la Base de Datos";
/// Prefix for failed single-record lookups.
pub const LOOKUP_FAILED: &str = "Error al lanzar la consulta en la Base de Datos";
/// Prefix for failed inserts.
pub const INSERT_FAILED: &str = "Error al realizar el insert en la Base de Datos";

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Payload or path failed validation; one message per violation.
    ValidationFailed(Vec<String>),
    /// Key not present in the store.
    NotFound(String),
    /// Store rejected or failed the operation.
    Store {
        message: String,
        source: RepositoryError,
    },
    Internal(String),
}

impl AppError {
    /// Wraps a repository error under an operation-specific message.
    ///
    /// ```ignore
    /// services::create(repo, entity)
    ///     .await
    ///     .map_err(AppError::store(INSERT_FAILED))?;
    /// ```
    pub fn store(message: impl Into<String>) -> impl FnOnce(RepositoryError) -> AppError {
        let message = message.into();
        move |source| AppError::Store { message, source }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::ValidationFailed(vec![message.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            AppError::ValidationFailed(errors) => json!({
                "Message": INVALID_REQUEST,
                "Errors": errors,
            }),
            AppError::NotFound(message) => json!({ "Message": message }),
            AppError::Store { message, source } => json!({
                "Message": message,
                "Error": source.message(),
            }),
            AppError::Internal(error) => json!({
                "Message": "Error interno del servidor",
                "Error": error,
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store { message, source } => {
                tracing::error!(error = %source, "{}", message);
            }
            AppError::Internal(error) => tracing::error!("Internal error: {}", error),
            AppError::ValidationFailed(errors) => {
                tracing::debug!(count = errors.len(), "Rejected invalid payload");
            }
            AppError::NotFound(message) => tracing::debug!("{}", message),
        }

        (self.status(), Json(self.body())).into_response()
    }
}
