//! Response bodies for the REST API.
//!
//! Reads return the bare record or list. Writes wrap the record in an
//! envelope keyed by the entity label, e.g.
//! `{"Message": "El paciente ha sido creado con éxito!!", "Paciente": {..}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::AppError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `connected`, `disconnected` or `error: ...`
    pub database: String,
}

/// Successful outcome of a CRUD endpoint.
#[derive(Debug)]
pub enum CrudResponse<E> {
    /// 200 with the bare record.
    Found(E),
    /// 200 with a bare array.
    Listed(Vec<E>),
    /// Enveloped single record with an explicit status.
    Saved {
        status: StatusCode,
        message: String,
        key: &'static str,
        record: E,
    },
    /// 200 enveloped list.
    SavedMany {
        message: String,
        key: &'static str,
        records: Vec<E>,
    },
    /// 200 with only a message.
    Deleted(String),
}

impl<E> CrudResponse<E> {
    pub fn created(message: String, key: &'static str, record: E) -> Self {
        CrudResponse::Saved {
            status: StatusCode::CREATED,
            message,
            key,
            record,
        }
    }

    pub fn updated(status: StatusCode, message: String, key: &'static str, record: E) -> Self {
        CrudResponse::Saved {
            status,
            message,
            key,
            record,
        }
    }
}

fn envelope(message: String, key: &'static str, payload: Value) -> Value {
    let mut body = Map::new();
    body.insert("Message".to_string(), Value::String(message));
    body.insert(key.to_string(), payload);
    Value::Object(body)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize response: {}", e)))
}

impl<E: Serialize> CrudResponse<E> {
    fn into_parts(self) -> Result<(StatusCode, Value), AppError> {
        Ok(match self {
            CrudResponse::Found(record) => (StatusCode::OK, to_json(&record)?),
            CrudResponse::Listed(records) => (StatusCode::OK, to_json(&records)?),
            CrudResponse::Saved {
                status,
                message,
                key,
                record,
            } => (status, envelope(message, key, to_json(&record)?)),
            CrudResponse::SavedMany {
                message,
                key,
                records,
            } => (StatusCode::OK, envelope(message, key, to_json(&records)?)),
            CrudResponse::Deleted(message) => {
                let mut body = Map::new();
                body.insert("Message".to_string(), Value::String(message));
                (StatusCode::OK, Value::Object(body))
            }
        })
    }
}

impl<E: Serialize> IntoResponse for CrudResponse<E> {
    fn into_response(self) -> Response {
        match self.into_parts() {
            Ok((status, body)) => (status, Json(body)).into_response(),
            Err(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_envelope_uses_entity_key() {
        let (status, body) =
            CrudResponse::created("Creado".to_string(), "Médico", json!({"idmedico": 3}))
                .into_parts()
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["Message"], "Creado");
        assert_eq!(body["Médico"]["idmedico"], 3);
    }

    #[test]
    fn test_listed_is_bare_array() {
        let (status, body) = CrudResponse::Listed(vec![1, 2, 3]).into_parts().unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([1, 2, 3]));
    }

    #[test]
    fn test_deleted_has_only_message() {
        let (_, body) = CrudResponse::<()>::Deleted("Eliminado".to_string())
            .into_parts()
            .unwrap();
        assert_eq!(body, json!({"Message": "Eliminado"}));
    }
}
