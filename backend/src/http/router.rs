//! Router configuration for the HTTP API.
//!
//! Each record type is mounted under `/api/{resource}` from the same generic
//! handlers; document and patient routes are only added for the record types
//! that support them.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::db::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, FullRepository,
};
use crate::models::{
    Administrador, CitaMedica, DocumentKeyed, Entity, ExamenMedico, HistoriaClinica, Medico,
    Paciente, PatientScoped,
};

fn crud_routes<E>() -> Router<AppState>
where
    E: Entity,
    dyn FullRepository: CrudRepository<E>,
{
    let base = format!("/api/{}", E::RESOURCE);
    Router::new()
        .route(&base, get(handlers::list::<E>).post(handlers::create::<E>))
        .route(
            &format!("{base}/id/{{id}}"),
            get(handlers::show::<E>)
                .put(handlers::update::<E>)
                .delete(handlers::delete::<E>),
        )
}

/// Routes for records addressable by document number.
fn person_routes<E>() -> Router<AppState>
where
    E: DocumentKeyed,
    dyn FullRepository: DocumentRepository<E>,
{
    crud_routes::<E>().route(
        &format!("/api/{}/doc/{{doc}}", E::RESOURCE),
        get(handlers::show_by_document::<E>)
            .put(handlers::update_by_document::<E>)
            .delete(handlers::delete_by_document::<E>),
    )
}

/// Routes for records reached through the patient or doctor document.
fn patient_scoped_routes<E>() -> Router<AppState>
where
    E: PatientScoped,
    dyn FullRepository: CascadeRepository<E>,
{
    crud_routes::<E>()
        .route(
            &format!("/api/{}/medico/doc/{{doc}}", E::RESOURCE),
            get(handlers::list_by_doctor_document::<E>),
        )
        .route(
            &format!("/api/{}/paciente/doc/{{doc}}", E::RESOURCE),
            get(handlers::list_by_patient_document::<E>)
                .put(handlers::update_by_patient_document::<E>)
                .delete(handlers::delete_by_patient_document::<E>),
        )
}

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(person_routes::<Administrador>())
        .merge(person_routes::<Medico>())
        .merge(person_routes::<Paciente>())
        .merge(patient_scoped_routes::<CitaMedica>())
        .merge(patient_scoped_routes::<ExamenMedico>())
        .merge(patient_scoped_routes::<HistoriaClinica>())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
