//! Tests for PostgresRepository against a live database.
//!
//! Skipped unless `DATABASE_URL` (or `PG_DATABASE_URL`) points at a database
//! the tests may write to. Every test uses its own document numbers and
//! removes what it created.
#![cfg(feature = "postgres-repo")]

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, NaiveTime};
use saludcontigo::db::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, HealthRepository, RepositoryError,
};
use saludcontigo::db::{services, PostgresConfig, PostgresRepository};
use saludcontigo::models::{CitaMedica, Medico, MedicoRef, Paciente, PacienteRef};

fn repository() -> Option<PostgresRepository> {
    let config = PostgresConfig::from_env().ok()?;
    Some(PostgresRepository::new(config).expect("failed to connect to test database"))
}

fn unique_doc(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}-{}-{nanos}", std::process::id())
}

fn paciente(doc: &str) -> Paciente {
    Paciente {
        nombres: "Valentina".into(),
        apellidos: "Ruiz".into(),
        numero_documento: doc.into(),
        ..Default::default()
    }
}

fn cita(paciente: i64, medico: i64, tipo: &str) -> CitaMedica {
    CitaMedica {
        idcita: None,
        tipo_cita: tipo.into(),
        fecha_cita: NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
        hora_cita: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        lugar_cita: "Sede Norte".into(),
        estado_cita: "Programada".into(),
        observacion_cita: Some("Traer exámenes".into()),
        paciente: PacienteRef::new(paciente),
        medico: MedicoRef::new(medico),
    }
}

macro_rules! require_db {
    () => {
        match repository() {
            Some(repo) => repo,
            None => {
                eprintln!("DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_health_check() {
    let repo = require_db!();
    assert!(repo.health_check().await.unwrap());
    let stats = repo.get_pool_stats();
    assert!(stats.max_size >= 1);
}

#[tokio::test]
async fn test_patient_round_trip_and_unique_document() {
    let repo = require_db!();
    let doc = unique_doc("pac");

    let saved = services::create(&repo, paciente(&doc)).await.unwrap();
    let id = saved.idpaciente.unwrap();
    let found: Paciente = services::find_by_id(&repo, id).await.unwrap().unwrap();
    assert_eq!(found, saved);

    let err = services::create(&repo, paciente(&doc)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::QueryError { .. }));
    assert!(err.to_string().contains("pacientes_numero_documento_key"));

    let deleted = DocumentRepository::<Paciente>::delete_by_document(&repo, &doc)
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(CrudRepository::<Paciente>::find_by_id(&repo, id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_appointment_cascades() {
    let repo = require_db!();
    let pac_doc = unique_doc("pac");
    let other_doc = unique_doc("otro");
    let med_doc = unique_doc("med");

    let ana = services::create(&repo, paciente(&pac_doc)).await.unwrap();
    let beto = services::create(&repo, paciente(&other_doc)).await.unwrap();
    let medico = services::create(
        &repo,
        Medico {
            nombres: "Mateo".into(),
            numero_documento: med_doc.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (ana, beto, medico) = (
        ana.idpaciente.unwrap(),
        beto.idpaciente.unwrap(),
        medico.idmedico.unwrap(),
    );

    services::create(&repo, cita(ana, medico, "General")).await.unwrap();
    services::create(&repo, cita(ana, medico, "Control")).await.unwrap();
    services::create(&repo, cita(beto, medico, "General")).await.unwrap();

    let by_doctor = CascadeRepository::<CitaMedica>::find_by_doctor_document(&repo, &med_doc)
        .await
        .unwrap();
    assert_eq!(by_doctor.len(), 3);
    assert!(by_doctor
        .iter()
        .all(|c| c.medico.record.as_deref().map(|m| m.numero_documento.as_str()) == Some(med_doc.as_str())));
    assert_eq!(
        by_doctor[0].paciente.record.as_deref().map(|p| p.nombres.as_str()),
        Some("Valentina")
    );

    let mut changes = cita(ana, medico, "Telemedicina");
    changes.observacion_cita = None;
    let updated = services::update_by_patient_document(&repo, &pac_doc, &changes)
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);
    assert!(updated
        .iter()
        .all(|c| c.tipo_cita == "Telemedicina" && c.observacion_cita.is_none()));
    assert!(updated.windows(2).all(|w| w[0].idcita < w[1].idcita));

    let deleted = services::delete_by_patient_document::<CitaMedica, _>(&repo, &pac_doc)
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining: Vec<CitaMedica> = services::find_by_patient_document(&repo, &other_doc)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].tipo_cita, "General");

    // Still referenced by beto's appointment.
    let err = CrudRepository::<Medico>::delete(&repo, medico).await.unwrap_err();
    assert!(err.to_string().contains("foreign key"));

    services::delete_by_patient_document::<CitaMedica, _>(&repo, &other_doc)
        .await
        .unwrap();
    services::delete::<Medico, _>(&repo, medico).await.unwrap();
    services::delete::<Paciente, _>(&repo, ana).await.unwrap();
    services::delete::<Paciente, _>(&repo, beto).await.unwrap();
}

#[tokio::test]
async fn test_missing_reference_is_rejected() {
    let repo = require_db!();
    let err = services::create(&repo, cita(i64::MAX, i64::MAX, "General"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::QueryError { .. }));
}
