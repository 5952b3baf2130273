//! HTTP handlers for the REST API.
//!
//! Every handler is generic over the record type and is mounted once per
//! resource by [`super::router`]. Bodies are taken as raw JSON so validation
//! can report every violated field before anything touches the store.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::dto::{CrudResponse, HealthResponse};
use super::error::{AppError, INSERT_FAILED, LOOKUP_FAILED, QUERY_FAILED};
use super::state::AppState;
use crate::db::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, FullRepository,
};
use crate::db::services as db_services;
use crate::models::{parse_payload, DocumentKeyed, Entity, PatientScoped};

/// Result type for CRUD handlers.
pub type CrudResult<E> = Result<CrudResponse<E>, AppError>;

fn payload<E: Entity>(body: Result<Json<Value>, JsonRejection>) -> Result<E, AppError> {
    let Json(value) = body.map_err(|rejection| AppError::invalid(rejection.body_text()))?;
    parse_payload::<E>(value).map_err(AppError::ValidationFailed)
}

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::invalid("El parámetro 'id' debe ser un número entero"))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

// =============================================================================
// CRUD (all records)
// =============================================================================

/// GET /api/{resource}
pub async fn list<E>(State(state): State<AppState>) -> CrudResult<E>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let records = db_services::find_all::<E, _>(state.repository.as_ref())
        .await
        .map_err(AppError::store(QUERY_FAILED))?;
    Ok(CrudResponse::Listed(records))
}

/// GET /api/{resource}/id/{id}
pub async fn show<E>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> CrudResult<E>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let id = path_id(id)?;
    db_services::find_by_id::<E, _>(state.repository.as_ref(), id)
        .await
        .map_err(AppError::store(LOOKUP_FAILED))?
        .map(CrudResponse::Found)
        .ok_or_else(|| AppError::NotFound(E::LABELS.not_found_id(id)))
}

/// POST /api/{resource}
pub async fn create<E>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> CrudResult<E>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let entity = payload::<E>(body)?;
    let saved = db_services::create(state.repository.as_ref(), entity)
        .await
        .map_err(AppError::store(INSERT_FAILED))?;
    Ok(CrudResponse::created(
        E::LABELS.created(),
        E::LABELS.key,
        saved,
    ))
}

/// PUT /api/{resource}/id/{id}
///
/// Answers 201 on success, unlike the update by document.
pub async fn update<E>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> CrudResult<E>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let id = path_id(id)?;
    let changes = payload::<E>(body)?;
    let updated = db_services::update_by_id(state.repository.as_ref(), id, &changes)
        .await
        .map_err(AppError::store(E::LABELS.update_failed()))?
        .ok_or_else(|| AppError::NotFound(E::LABELS.update_not_found_id(id)))?;

    Ok(CrudResponse::updated(
        StatusCode::CREATED,
        E::LABELS.updated(),
        E::LABELS.key,
        updated,
    ))
}

/// DELETE /api/{resource}/id/{id}
pub async fn delete<E>(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> CrudResult<E>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let id = path_id(id)?;
    db_services::delete::<E, _>(state.repository.as_ref(), id)
        .await
        .map_err(AppError::store(E::LABELS.delete_failed()))?;
    Ok(CrudResponse::Deleted(E::LABELS.deleted()))
}

// =============================================================================
// Document-keyed records (administradores, medicos, pacientes)
// =============================================================================

/// GET /api/{resource}/doc/{doc}
pub async fn show_by_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> CrudResult<E>
where
    E: DocumentKeyed,
    dyn FullRepository: DocumentRepository<E>,
{
    db_services::find_by_document::<E, _>(state.repository.as_ref(), &document)
        .await
        .map_err(AppError::store(LOOKUP_FAILED))?
        .map(CrudResponse::Found)
        .ok_or_else(|| AppError::NotFound(E::LABELS.not_found_document(&document)))
}

/// PUT /api/{resource}/doc/{doc}
pub async fn update_by_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> CrudResult<E>
where
    E: DocumentKeyed,
    dyn FullRepository: DocumentRepository<E>,
{
    let changes = payload::<E>(body)?;
    let updated = db_services::update_by_document(state.repository.as_ref(), &document, &changes)
        .await
        .map_err(AppError::store(E::LABELS.update_failed()))?
        .ok_or_else(|| AppError::NotFound(E::LABELS.update_not_found_document(&document)))?;

    Ok(CrudResponse::updated(
        StatusCode::OK,
        E::LABELS.updated(),
        E::LABELS.key,
        updated,
    ))
}

/// DELETE /api/{resource}/doc/{doc}
pub async fn delete_by_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> CrudResult<E>
where
    E: DocumentKeyed,
    dyn FullRepository: DocumentRepository<E>,
{
    db_services::delete_by_document::<E, _>(state.repository.as_ref(), &document)
        .await
        .map_err(AppError::store(E::LABELS.delete_failed()))?;
    Ok(CrudResponse::Deleted(E::LABELS.deleted()))
}

// =============================================================================
// Patient-scoped records (citas, examenes, historias)
// =============================================================================

/// GET /api/{resource}/medico/doc/{doc}
pub async fn list_by_doctor_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> CrudResult<E>
where
    E: PatientScoped,
    dyn FullRepository: CascadeRepository<E>,
{
    let records = db_services::find_by_doctor_document::<E, _>(state.repository.as_ref(), &document)
        .await
        .map_err(AppError::store(QUERY_FAILED))?;

    if records.is_empty() {
        return Err(AppError::NotFound(E::LABELS.none_for_doctor(&document)));
    }
    Ok(CrudResponse::Listed(records))
}

/// GET /api/{resource}/paciente/doc/{doc}
pub async fn list_by_patient_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> CrudResult<E>
where
    E: PatientScoped,
    dyn FullRepository: CascadeRepository<E>,
{
    let records =
        db_services::find_by_patient_document::<E, _>(state.repository.as_ref(), &document)
            .await
            .map_err(AppError::store(QUERY_FAILED))?;

    if records.is_empty() {
        return Err(AppError::NotFound(E::LABELS.none_for_patient(&document)));
    }
    Ok(CrudResponse::Listed(records))
}

/// PUT /api/{resource}/paciente/doc/{doc}
///
/// Overwrites every record of the patient with the payload's business fields.
pub async fn update_by_patient_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> CrudResult<E>
where
    E: PatientScoped,
    dyn FullRepository: CascadeRepository<E>,
{
    let changes = payload::<E>(body)?;
    let records =
        db_services::update_by_patient_document(state.repository.as_ref(), &document, &changes)
            .await
            .map_err(AppError::store(E::LABELS.update_failed()))?;

    if records.is_empty() {
        return Err(AppError::NotFound(E::LABELS.none_for_document()));
    }
    Ok(CrudResponse::SavedMany {
        message: E::LABELS.bulk_updated(),
        key: E::LABELS.plural_key,
        records,
    })
}

/// DELETE /api/{resource}/paciente/doc/{doc}
pub async fn delete_by_patient_document<E>(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> CrudResult<E>
where
    E: PatientScoped,
    dyn FullRepository: CascadeRepository<E>,
{
    db_services::delete_by_patient_document::<E, _>(state.repository.as_ref(), &document)
        .await
        .map_err(AppError::store(E::LABELS.bulk_delete_failed()))?;
    Ok(CrudResponse::Deleted(E::LABELS.bulk_deleted()))
}
