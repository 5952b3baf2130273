//! Tests for LocalRepository through the repository traits and services.
//!
//! Cover cascades across the three patient-scoped tables, concurrent
//! writers and the store-level constraints the in-memory backend emulates.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use saludcontigo::db::repositories::LocalRepository;
use saludcontigo::db::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, RepositoryError,
};
use saludcontigo::db::services;
use saludcontigo::models::{
    Administrador, CitaMedica, ExamenMedico, HistoriaClinica, Medico, MedicoRef, Paciente,
    PacienteRef,
};

fn paciente(doc: &str) -> Paciente {
    Paciente {
        nombres: "Sofía".into(),
        apellidos: "Gómez".into(),
        numero_documento: doc.into(),
        ..Default::default()
    }
}

fn medico(doc: &str) -> Medico {
    Medico {
        nombres: "Camilo".into(),
        numero_documento: doc.into(),
        especialidad: "Cardiología".into(),
        ..Default::default()
    }
}

fn examen(paciente: i64, medico: i64, tipo: &str) -> ExamenMedico {
    ExamenMedico {
        idexamen: None,
        tipo_examen: tipo.into(),
        fecha_examen: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        hora_examen: NaiveTime::from_hms_opt(7, 15, 0).unwrap(),
        lugar_examen: "Laboratorio".into(),
        estado_examen: "Pendiente".into(),
        observacion_examen: None,
        paciente: PacienteRef::new(paciente),
        medico: MedicoRef::new(medico),
    }
}

fn historia(paciente: i64, medico: i64) -> HistoriaClinica {
    HistoriaClinica {
        idhistoria: None,
        fecha_historia: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        antecedentes_historia: Some("Asma".into()),
        examenes_historia: None,
        diagnostico_historia: None,
        tratamiento_historia: None,
        paciente: PacienteRef::new(paciente),
        medico: MedicoRef::new(medico),
    }
}

fn cita(paciente: i64, medico: i64) -> CitaMedica {
    CitaMedica {
        idcita: None,
        tipo_cita: "General".into(),
        fecha_cita: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        hora_cita: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        lugar_cita: "Consultorio 3".into(),
        estado_cita: "Programada".into(),
        observacion_cita: None,
        paciente: PacienteRef::new(paciente),
        medico: MedicoRef::new(medico),
    }
}

async fn seed(repo: &LocalRepository) -> (i64, i64, i64) {
    let ana = services::create(repo, paciente("123")).await.unwrap();
    let beto = services::create(repo, paciente("321")).await.unwrap();
    let doc = services::create(repo, medico("456")).await.unwrap();
    (
        ana.idpaciente.unwrap(),
        beto.idpaciente.unwrap(),
        doc.idmedico.unwrap(),
    )
}

#[tokio::test]
async fn test_save_then_find_by_id_round_trips_business_fields() {
    let repo = LocalRepository::new();
    let (ana, _, doc) = seed(&repo).await;

    let saved = services::create(&repo, historia(ana, doc)).await.unwrap();
    let found: HistoriaClinica = services::find_by_id(&repo, saved.idhistoria.unwrap())
        .await
        .unwrap()
        .unwrap();

    let mut expected = historia(ana, doc);
    expected.idhistoria = saved.idhistoria;
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_cascade_delete_is_scoped_to_one_table_and_patient() {
    let repo = LocalRepository::new();
    let (ana, beto, doc) = seed(&repo).await;

    for tipo in ["Sangre", "Orina", "Rayos X"] {
        services::create(&repo, examen(ana, doc, tipo)).await.unwrap();
    }
    services::create(&repo, examen(beto, doc, "Sangre")).await.unwrap();
    services::create(&repo, cita(ana, doc)).await.unwrap();

    let deleted = CascadeRepository::<ExamenMedico>::delete_by_patient_document(&repo, "123")
        .await
        .unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(repo.count::<ExamenMedico>(), 1);
    assert_eq!(repo.count::<CitaMedica>(), 1);

    let left: Vec<ExamenMedico> = services::find_by_patient_document(&repo, "321")
        .await
        .unwrap();
    assert_eq!(left.len(), 1);
}

#[tokio::test]
async fn test_cascade_update_leaves_other_patients_untouched() {
    let repo = LocalRepository::new();
    let (ana, beto, doc) = seed(&repo).await;
    services::create(&repo, examen(ana, doc, "Sangre")).await.unwrap();
    services::create(&repo, examen(beto, doc, "Sangre")).await.unwrap();

    let mut changes = examen(ana, doc, "Glucosa");
    changes.observacion_examen = Some("En ayunas".into());
    let updated = services::update_by_patient_document(&repo, "123", &changes)
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].tipo_examen, "Glucosa");

    let others: Vec<ExamenMedico> = services::find_by_patient_document(&repo, "321")
        .await
        .unwrap();
    assert_eq!(others[0].tipo_examen, "Sangre");
    assert!(others[0].observacion_examen.is_none());
}

#[tokio::test]
async fn test_find_by_doctor_document_spans_patients() {
    let repo = LocalRepository::new();
    let (ana, beto, doc) = seed(&repo).await;
    services::create(&repo, historia(ana, doc)).await.unwrap();
    services::create(&repo, historia(beto, doc)).await.unwrap();

    let historias: Vec<HistoriaClinica> = services::find_by_doctor_document(&repo, "456")
        .await
        .unwrap();
    assert_eq!(historias.len(), 2);

    let none: Vec<HistoriaClinica> = services::find_by_doctor_document(&repo, "000")
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_administrator_documents_are_not_unique() {
    let repo = LocalRepository::new();
    let admin = Administrador {
        nombres: "Root".into(),
        numero_documento: "10".into(),
        rol: "admin".into(),
        ..Default::default()
    };
    services::create(&repo, admin.clone()).await.unwrap();
    services::create(&repo, admin).await.unwrap();

    let err = DocumentRepository::<Administrador>::find_by_document(&repo, "10")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::QueryError { .. }));
    assert!(err.message().contains("unique result"));

    let deleted = services::delete_by_document::<Administrador, _>(&repo, "10")
        .await
        .unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn test_patient_document_is_unique_on_update() {
    let repo = LocalRepository::new();
    seed(&repo).await;

    let mut changes = paciente("321");
    changes.nombres = "Clash".into();
    let err = services::update_by_document(&repo, "123", &changes)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("pacientes_numero_documento_key"));

    let unchanged: Paciente = services::find_by_document(&repo, "123").await.unwrap().unwrap();
    assert_eq!(unchanged.nombres, "Sofía");
}

#[tokio::test]
async fn test_unhealthy_store_rejects_writes() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let err = services::create(&repo, paciente("1")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));

    repo.set_healthy(true);
    assert!(services::create(&repo, paciente("1")).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let repo = Arc::new(LocalRepository::new());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                services::create(repo.as_ref(), paciente(&format!("doc-{i}")))
                    .await
                    .unwrap()
                    .idpaciente
                    .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let all: Vec<Paciente> = CrudRepository::<Paciente>::find_all(repo.as_ref())
        .await
        .unwrap();
    assert_eq!(all.len(), 20);
}
